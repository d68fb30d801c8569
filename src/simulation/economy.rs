//! Money tracking for the coffee shop
//!
//! The ledger is the single authority on how much money the player has.
//! Customers pay into it through the service hand-off, achievements award
//! bonuses into it, and upgrades are bought out of it.

use super::persistence::{Persist, SaveStore};

/// Authoritative currency store
#[derive(Debug, Clone, Default)]
pub struct EconomyLedger {
    /// Player's current money
    money: i32,

    /// Customers who paid for a coffee
    customers_served: usize,

    /// Every payment and award ever credited, ignoring spending
    total_earned: i64,

    /// Customer payments only
    total_payments: i64,
}

impl EconomyLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with some money already in the till
    pub fn with_money(money: i32) -> Self {
        Self {
            money: money.max(0),
            ..Self::default()
        }
    }

    pub fn money(&self) -> i32 {
        self.money
    }

    pub fn customers_served(&self) -> usize {
        self.customers_served
    }

    pub fn total_earned(&self) -> i64 {
        self.total_earned
    }

    pub fn total_payments(&self) -> i64 {
        self.total_payments
    }

    /// Check if player can afford a purchase
    pub fn can_afford(&self, cost: i32) -> bool {
        self.money >= cost
    }

    /// Deduct money for a purchase
    /// Returns true if successful, false if insufficient funds
    pub fn spend(&mut self, cost: i32) -> bool {
        if cost >= 0 && self.can_afford(cost) {
            self.money -= cost;
            true
        } else {
            false
        }
    }

    /// Record payment from a served customer
    pub fn credit_payment(&mut self, amount: i32) {
        self.customers_served += 1;
        self.total_payments += i64::from(amount.max(0));
        self.add(amount);
    }

    /// Add bonus money that is not a customer payment
    pub fn award(&mut self, amount: i32) {
        self.add(amount);
    }

    fn add(&mut self, amount: i32) {
        let amount = amount.max(0);
        self.money = self.money.saturating_add(amount);
        self.total_earned += i64::from(amount);
    }

    pub fn average_earnings_per_customer(&self) -> f32 {
        if self.customers_served > 0 {
            self.total_payments as f32 / self.customers_served as f32
        } else {
            0.0
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Get a summary string for display
    pub fn summary(&self) -> String {
        format!(
            "Money: ${} | Customers Served: {}",
            self.money, self.customers_served
        )
    }
}

impl Persist for EconomyLedger {
    fn save(&self, store: &mut SaveStore) {
        store.set_int("Money", i64::from(self.money));
        store.set_int("CustomersServed", self.customers_served as i64);
        store.set_int("TotalEarned", self.total_earned);
        store.set_int("TotalPayments", self.total_payments);
    }

    fn load(&mut self, store: &SaveStore) {
        self.money = store.get_int("Money", 0).clamp(0, i64::from(i32::MAX)) as i32;
        self.customers_served = store.get_int("CustomersServed", 0).max(0) as usize;
        self.total_earned = store.get_int("TotalEarned", 0).max(0);
        self.total_payments = store.get_int("TotalPayments", 0).max(0);
    }
}
