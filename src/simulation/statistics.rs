//! Lifetime and session statistics
//!
//! Times are seconds on the world clock. Lifetime totals persist through
//! `SaveStore`; session counters and the combo do not.

use std::collections::VecDeque;

use log::debug;

use super::persistence::{Persist, SaveStore};

/// Serves closer together than this keep the combo going
pub const COMBO_WINDOW: f32 = 10.0;

/// Number of recent serve times kept for the average
const SERVE_TIME_HISTORY: usize = 100;

#[derive(Debug, Clone, Default)]
pub struct GameStatistics {
    total_customers_served: u32,
    total_money_earned: i64,
    customers_lost: u32,
    total_play_time: f32,
    longest_combo: u32,
    current_combo: u32,
    last_serve_time: Option<f32>,

    session_customers_served: u32,
    session_money_earned: i64,
    session_start_time: f32,

    serve_times: VecDeque<f32>,
}

impl GameStatistics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance play time and drop a combo whose window has passed
    pub fn update(&mut self, delta_secs: f32, now: f32) {
        self.total_play_time += delta_secs.max(0.0);
        if self.current_combo > 0
            && self
                .last_serve_time
                .is_some_and(|last| now - last > COMBO_WINDOW)
        {
            self.break_combo();
        }
    }

    pub fn record_customer_served(&mut self, payment: i32, serve_time: f32, now: f32) {
        let payment = i64::from(payment.max(0));
        self.total_customers_served += 1;
        self.session_customers_served += 1;
        self.total_money_earned += payment;
        self.session_money_earned += payment;

        self.serve_times.push_back(serve_time.max(0.0));
        if self.serve_times.len() > SERVE_TIME_HISTORY {
            self.serve_times.pop_front();
        }

        let in_window = self
            .last_serve_time
            .is_some_and(|last| now - last <= COMBO_WINDOW);
        self.current_combo = if in_window { self.current_combo + 1 } else { 1 };
        self.longest_combo = self.longest_combo.max(self.current_combo);
        self.last_serve_time = Some(now);
    }

    pub fn record_customer_lost(&mut self) {
        self.customers_lost += 1;
        self.break_combo();
    }

    fn break_combo(&mut self) {
        if self.current_combo > 0 {
            debug!("Combo broken at {}", self.current_combo);
            self.current_combo = 0;
        }
    }

    pub fn total_customers_served(&self) -> u32 {
        self.total_customers_served
    }

    pub fn total_money_earned(&self) -> i64 {
        self.total_money_earned
    }

    pub fn customers_lost(&self) -> u32 {
        self.customers_lost
    }

    pub fn total_play_time(&self) -> f32 {
        self.total_play_time
    }

    pub fn current_combo(&self) -> u32 {
        self.current_combo
    }

    pub fn longest_combo(&self) -> u32 {
        self.longest_combo
    }

    pub fn session_customers_served(&self) -> u32 {
        self.session_customers_served
    }

    pub fn session_money_earned(&self) -> i64 {
        self.session_money_earned
    }

    pub fn session_play_time(&self, now: f32) -> f32 {
        (now - self.session_start_time).max(0.0)
    }

    /// Average over the most recent serves, 0 with no serves yet
    pub fn average_serve_time(&self) -> f32 {
        if self.serve_times.is_empty() {
            return 0.0;
        }
        self.serve_times.iter().sum::<f32>() / self.serve_times.len() as f32
    }

    /// Percentage of customers who left served, 100 when nobody has left yet
    pub fn satisfaction_rate(&self) -> f32 {
        let total = self.total_customers_served + self.customers_lost;
        if total == 0 {
            return 100.0;
        }
        self.total_customers_served as f32 / total as f32 * 100.0
    }

    pub fn earnings_per_hour(&self) -> f32 {
        if self.total_play_time <= 0.0 {
            return 0.0;
        }
        self.total_money_earned as f32 / self.total_play_time * 3600.0
    }

    pub fn reset_session(&mut self, now: f32) {
        self.session_customers_served = 0;
        self.session_money_earned = 0;
        self.session_start_time = now;
        self.current_combo = 0;
    }
}

impl Persist for GameStatistics {
    fn save(&self, store: &mut SaveStore) {
        store.set_int("TotalCustomersServed", i64::from(self.total_customers_served));
        store.set_int("TotalMoneyEarned", self.total_money_earned);
        store.set_int("CustomersLost", i64::from(self.customers_lost));
        store.set_float("TotalPlayTime", self.total_play_time);
        store.set_int("LongestCombo", i64::from(self.longest_combo));
    }

    fn load(&mut self, store: &SaveStore) {
        let as_count = |value: i64| value.clamp(0, i64::from(u32::MAX)) as u32;
        self.total_customers_served = as_count(store.get_int("TotalCustomersServed", 0));
        self.total_money_earned = store.get_int("TotalMoneyEarned", 0).max(0);
        self.customers_lost = as_count(store.get_int("CustomersLost", 0));
        self.total_play_time = store.get_float("TotalPlayTime", 0.0).max(0.0);
        self.longest_combo = as_count(store.get_int("LongestCombo", 0));
    }
}
