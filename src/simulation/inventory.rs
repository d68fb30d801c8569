//! Player inventory
//!
//! A typed item counter. Counts only change through `credit` and `debit`,
//! both of which are all-or-nothing.

use std::collections::HashMap;

use super::config::InventoryConfig;
use super::types::ItemKind;

/// Items carried by the player
#[derive(Debug, Clone)]
pub struct Inventory {
    counts: HashMap<ItemKind, u32>,
    max_beans: u32,
    max_coffees: u32,
    /// Extra bean capacity granted by upgrades
    capacity_bonus: u32,
}

impl Default for Inventory {
    fn default() -> Self {
        Self::new(&InventoryConfig::default())
    }
}

impl Inventory {
    pub fn new(config: &InventoryConfig) -> Self {
        let counts = ItemKind::ALL.iter().map(|kind| (*kind, 0)).collect();
        Self {
            counts,
            max_beans: config.max_beans,
            max_coffees: config.max_coffees,
            capacity_bonus: 0,
        }
    }

    pub fn count(&self, kind: ItemKind) -> u32 {
        self.counts.get(&kind).copied().unwrap_or(0)
    }

    /// Capacity ceiling for an item kind, `None` when uncapped
    pub fn capacity(&self, kind: ItemKind) -> Option<u32> {
        match kind {
            ItemKind::Bean => Some(self.max_beans + self.capacity_bonus),
            ItemKind::CoffeeUnit => Some(self.max_coffees),
            ItemKind::Currency => None,
        }
    }

    /// Whether `amount` more items of `kind` fit
    pub fn can_accept(&self, kind: ItemKind, amount: u32) -> bool {
        match self.capacity(kind) {
            Some(capacity) => self
                .count(kind)
                .checked_add(amount)
                .is_some_and(|total| total <= capacity),
            None => self.count(kind).checked_add(amount).is_some(),
        }
    }

    pub fn is_full(&self, kind: ItemKind) -> bool {
        !self.can_accept(kind, 1)
    }

    pub fn has(&self, kind: ItemKind, amount: u32) -> bool {
        self.count(kind) >= amount
    }

    /// Add items. Returns false, leaving the count unchanged, if they don't all fit.
    pub fn credit(&mut self, kind: ItemKind, amount: u32) -> bool {
        if !self.can_accept(kind, amount) {
            return false;
        }
        *self.counts.entry(kind).or_insert(0) += amount;
        true
    }

    /// Remove items. Returns false, leaving the count unchanged, if there aren't enough.
    pub fn debit(&mut self, kind: ItemKind, amount: u32) -> bool {
        if !self.has(kind, amount) {
            return false;
        }
        *self.counts.entry(kind).or_insert(0) -= amount;
        true
    }

    /// Set the upgrade capacity bonus. Beans already carried are kept even if
    /// the ceiling drops below them; only further credits are refused.
    pub fn set_capacity_bonus(&mut self, bonus: u32) {
        self.capacity_bonus = bonus;
    }

    pub fn capacity_bonus(&self) -> u32 {
        self.capacity_bonus
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credit_respects_capacity() {
        let mut inventory = Inventory::default();
        assert!(inventory.credit(ItemKind::Bean, 3));
        assert!(!inventory.credit(ItemKind::Bean, 1));
        assert_eq!(inventory.count(ItemKind::Bean), 3);
        assert!(inventory.is_full(ItemKind::Bean));
    }

    #[test]
    fn credit_is_all_or_nothing() {
        let mut inventory = Inventory::default();
        assert!(inventory.credit(ItemKind::CoffeeUnit, 4));
        assert!(!inventory.credit(ItemKind::CoffeeUnit, 2));
        assert_eq!(inventory.count(ItemKind::CoffeeUnit), 4);
    }

    #[test]
    fn debit_never_goes_negative() {
        let mut inventory = Inventory::default();
        inventory.credit(ItemKind::Bean, 2);
        assert!(!inventory.debit(ItemKind::Bean, 3));
        assert_eq!(inventory.count(ItemKind::Bean), 2);
        assert!(inventory.debit(ItemKind::Bean, 2));
        assert_eq!(inventory.count(ItemKind::Bean), 0);
        assert!(!inventory.debit(ItemKind::Bean, 1));
    }

    #[test]
    fn currency_is_uncapped() {
        let mut inventory = Inventory::default();
        assert_eq!(inventory.capacity(ItemKind::Currency), None);
        assert!(inventory.credit(ItemKind::Currency, 10_000));
        assert!(!inventory.is_full(ItemKind::Currency));
    }

    #[test]
    fn capacity_bonus_raises_bean_ceiling() {
        let mut inventory = Inventory::default();
        inventory.set_capacity_bonus(2);
        assert_eq!(inventory.capacity(ItemKind::Bean), Some(5));
        assert_eq!(inventory.capacity(ItemKind::CoffeeUnit), Some(5));
        assert!(inventory.credit(ItemKind::Bean, 5));
    }
}
