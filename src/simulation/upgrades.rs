//! Purchasable upgrades
//!
//! Upgrades are bought with ledger money and change gameplay multipliers.
//! Other components never look at the upgrade list directly; they read the
//! resulting effects through `UpgradeEffects`.

use log::{info, warn};

use super::economy::EconomyLedger;
use super::persistence::{Persist, SaveStore};

/// What an upgrade changes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpgradeType {
    /// Multiplies brewing time
    MachineSpeed,
    /// Adds bean carrying capacity
    InventoryCapacity,
    /// Multiplies player movement speed
    MovementSpeed,
    /// Sets how many cups a single brew produces
    MultipleCups,
    /// Multiplies patience of newly arriving customers
    CustomerPatience,
}

#[derive(Debug, Clone)]
pub struct Upgrade {
    pub name: String,
    pub description: String,
    pub cost: i32,
    pub upgrade_type: UpgradeType,
    pub value: f32,
    pub purchased: bool,
}

impl Upgrade {
    fn new(name: &str, description: &str, cost: i32, upgrade_type: UpgradeType, value: f32) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            cost,
            upgrade_type,
            value,
            purchased: false,
        }
    }

    fn save_key(&self) -> String {
        format!("Upgrade_{}_Purchased", self.name)
    }
}

/// Effects read by the rest of the simulation
pub trait UpgradeEffects {
    /// Multiplier applied to brewing duration, never negative
    fn machine_speed_multiplier(&self) -> f32;
    fn cups_per_brew(&self) -> u32;
    fn inventory_capacity_bonus(&self) -> u32;
    fn movement_speed_multiplier(&self) -> f32;
    fn patience_multiplier(&self) -> f32;
}

/// No upgrades bought
#[derive(Debug, Clone, Copy, Default)]
pub struct NoUpgrades;

impl UpgradeEffects for NoUpgrades {
    fn machine_speed_multiplier(&self) -> f32 {
        1.0
    }

    fn cups_per_brew(&self) -> u32 {
        1
    }

    fn inventory_capacity_bonus(&self) -> u32 {
        0
    }

    fn movement_speed_multiplier(&self) -> f32 {
        1.0
    }

    fn patience_multiplier(&self) -> f32 {
        1.0
    }
}

/// The upgrade shop and the effects of everything bought from it
#[derive(Debug, Clone)]
pub struct UpgradeSystem {
    upgrades: Vec<Upgrade>,
    machine_speed_multiplier: f32,
    inventory_capacity_bonus: u32,
    movement_speed_multiplier: f32,
    cups_per_brew: u32,
    patience_multiplier: f32,
}

impl Default for UpgradeSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl UpgradeSystem {
    /// Shop stocked with the default upgrades
    pub fn new() -> Self {
        Self::with_upgrades(vec![
            Upgrade::new(
                "Faster Brewing",
                "Reduce brewing time by 25%",
                50,
                UpgradeType::MachineSpeed,
                0.75,
            ),
            Upgrade::new(
                "Bigger Pockets",
                "Carry 2 more beans",
                30,
                UpgradeType::InventoryCapacity,
                2.0,
            ),
            Upgrade::new(
                "Quick Feet",
                "Move 20% faster",
                40,
                UpgradeType::MovementSpeed,
                1.2,
            ),
            Upgrade::new(
                "Double Brew",
                "Brew 2 cups at once",
                100,
                UpgradeType::MultipleCups,
                2.0,
            ),
            Upgrade::new(
                "Cozy Seating",
                "Customers wait 25% longer",
                60,
                UpgradeType::CustomerPatience,
                1.25,
            ),
        ])
    }

    pub fn with_upgrades(upgrades: Vec<Upgrade>) -> Self {
        let mut system = Self {
            upgrades,
            machine_speed_multiplier: 1.0,
            inventory_capacity_bonus: 0,
            movement_speed_multiplier: 1.0,
            cups_per_brew: 1,
            patience_multiplier: 1.0,
        };
        system.reapply();
        system
    }

    pub fn upgrades(&self) -> &[Upgrade] {
        &self.upgrades
    }

    pub fn find(&self, name: &str) -> Option<&Upgrade> {
        self.upgrades.iter().find(|u| u.name == name)
    }

    pub fn purchased(&self) -> Vec<&Upgrade> {
        self.upgrades.iter().filter(|u| u.purchased).collect()
    }

    pub fn affordable(&self, ledger: &EconomyLedger) -> Vec<&Upgrade> {
        self.upgrades
            .iter()
            .filter(|u| !u.purchased && ledger.can_afford(u.cost))
            .collect()
    }

    /// Buy an upgrade by name
    /// Returns false if it is unknown, already owned, or unaffordable
    pub fn purchase(&mut self, name: &str, ledger: &mut EconomyLedger) -> bool {
        let Some(index) = self.upgrades.iter().position(|u| u.name == name) else {
            warn!("Unknown upgrade {}", name);
            return false;
        };

        let upgrade = &self.upgrades[index];
        if upgrade.purchased {
            warn!("Upgrade {} already purchased", name);
            return false;
        }
        if !ledger.spend(upgrade.cost) {
            warn!("Cannot afford upgrade {} (${})", name, upgrade.cost);
            return false;
        }

        self.upgrades[index].purchased = true;
        let upgrade = self.upgrades[index].clone();
        self.apply(&upgrade);
        info!("Purchased upgrade: {}", upgrade.name);
        true
    }

    fn apply(&mut self, upgrade: &Upgrade) {
        match upgrade.upgrade_type {
            UpgradeType::MachineSpeed => {
                self.machine_speed_multiplier *= upgrade.value.max(0.0);
            }
            UpgradeType::InventoryCapacity => {
                self.inventory_capacity_bonus += upgrade.value.max(0.0) as u32;
            }
            UpgradeType::MovementSpeed => {
                self.movement_speed_multiplier *= upgrade.value.max(0.0);
            }
            UpgradeType::MultipleCups => {
                self.cups_per_brew = (upgrade.value as u32).max(1);
            }
            UpgradeType::CustomerPatience => {
                self.patience_multiplier *= upgrade.value.max(0.0);
            }
        }
    }

    /// Reset every effect to base values and re-apply purchased upgrades
    fn reapply(&mut self) {
        self.machine_speed_multiplier = 1.0;
        self.inventory_capacity_bonus = 0;
        self.movement_speed_multiplier = 1.0;
        self.cups_per_brew = 1;
        self.patience_multiplier = 1.0;

        let purchased: Vec<Upgrade> = self.upgrades.iter().filter(|u| u.purchased).cloned().collect();
        for upgrade in &purchased {
            self.apply(upgrade);
        }
    }
}

impl UpgradeEffects for UpgradeSystem {
    fn machine_speed_multiplier(&self) -> f32 {
        self.machine_speed_multiplier
    }

    fn cups_per_brew(&self) -> u32 {
        self.cups_per_brew
    }

    fn inventory_capacity_bonus(&self) -> u32 {
        self.inventory_capacity_bonus
    }

    fn movement_speed_multiplier(&self) -> f32 {
        self.movement_speed_multiplier
    }

    fn patience_multiplier(&self) -> f32 {
        self.patience_multiplier
    }
}

impl Persist for UpgradeSystem {
    fn save(&self, store: &mut SaveStore) {
        for upgrade in &self.upgrades {
            store.set_bool(upgrade.save_key(), upgrade.purchased);
        }
    }

    fn load(&mut self, store: &SaveStore) {
        for upgrade in &mut self.upgrades {
            upgrade.purchased = store.get_bool(&upgrade.save_key(), false);
        }
        self.reapply();
    }
}
