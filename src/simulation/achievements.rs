//! Achievements and their money rewards

use log::info;

use super::economy::EconomyLedger;
use super::persistence::{Persist, SaveStore};

#[derive(Debug, Clone, PartialEq)]
pub struct Achievement {
    pub id: String,
    pub title: String,
    pub description: String,
    pub target: i64,
    pub current: i64,
    pub unlocked: bool,
    pub reward_money: i32,
}

impl Achievement {
    pub fn new(id: &str, title: &str, description: &str, target: i64, reward_money: i32) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            description: description.to_string(),
            target: target.max(1),
            current: 0,
            unlocked: false,
            reward_money,
        }
    }

    /// Progress towards the target in 0..=1
    pub fn progress(&self) -> f32 {
        (self.current as f32 / self.target as f32).clamp(0.0, 1.0)
    }

    fn value_key(&self) -> String {
        format!("Achievement_{}_Value", self.id)
    }

    fn unlocked_key(&self) -> String {
        format!("Achievement_{}_Unlocked", self.id)
    }
}

#[derive(Debug, Clone)]
pub struct AchievementSystem {
    achievements: Vec<Achievement>,
}

impl Default for AchievementSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl AchievementSystem {
    pub fn new() -> Self {
        Self::with_achievements(vec![
            Achievement::new("first_serve", "First Customer", "Serve your first customer", 1, 10),
            Achievement::new("serve_10", "Getting Started", "Serve 10 customers", 10, 50),
            Achievement::new("serve_50", "Coffee Pro", "Serve 50 customers", 50, 200),
            Achievement::new("serve_100", "Barista Master", "Serve 100 customers", 100, 500),
            Achievement::new(
                "perfect_day",
                "Perfect Day",
                "Serve 20 customers without losing any",
                20,
                300,
            ),
            Achievement::new(
                "speed_demon",
                "Speed Demon",
                "Serve 5 customers in 30 seconds",
                5,
                250,
            ),
            Achievement::new("money_maker", "Money Maker", "Earn $1000 total", 1000, 100),
            Achievement::new("bean_collector", "Bean Collector", "Collect 100 beans", 100, 150),
        ])
    }

    pub fn with_achievements(achievements: Vec<Achievement>) -> Self {
        Self { achievements }
    }

    pub fn get(&self, id: &str) -> Option<&Achievement> {
        self.achievements.iter().find(|a| a.id == id)
    }

    pub fn all(&self) -> &[Achievement] {
        &self.achievements
    }

    /// Add progress to an achievement
    /// Returns the achievement if this call unlocked it
    pub fn increment(
        &mut self,
        id: &str,
        amount: i64,
        ledger: &mut EconomyLedger,
    ) -> Option<Achievement> {
        let achievement = self.achievements.iter_mut().find(|a| a.id == id)?;
        if achievement.unlocked {
            return None;
        }
        let value = achievement.current.saturating_add(amount);
        Self::update_progress(achievement, value, ledger)
    }

    /// Overwrite an achievement's progress
    /// Returns the achievement if this call unlocked it
    pub fn set_value(
        &mut self,
        id: &str,
        value: i64,
        ledger: &mut EconomyLedger,
    ) -> Option<Achievement> {
        let achievement = self.achievements.iter_mut().find(|a| a.id == id)?;
        if achievement.unlocked {
            return None;
        }
        Self::update_progress(achievement, value, ledger)
    }

    fn update_progress(
        achievement: &mut Achievement,
        value: i64,
        ledger: &mut EconomyLedger,
    ) -> Option<Achievement> {
        achievement.current = value.max(0);
        if achievement.current < achievement.target {
            return None;
        }

        achievement.current = achievement.target;
        achievement.unlocked = true;
        if achievement.reward_money > 0 {
            ledger.award(achievement.reward_money);
        }
        info!(
            "Achievement unlocked: {} (+${})",
            achievement.title, achievement.reward_money
        );
        Some(achievement.clone())
    }

    pub fn unlocked(&self) -> Vec<&Achievement> {
        self.achievements.iter().filter(|a| a.unlocked).collect()
    }

    pub fn locked(&self) -> Vec<&Achievement> {
        self.achievements.iter().filter(|a| !a.unlocked).collect()
    }

    pub fn completion_percentage(&self) -> f32 {
        if self.achievements.is_empty() {
            return 0.0;
        }
        self.unlocked().len() as f32 / self.achievements.len() as f32 * 100.0
    }
}

impl Persist for AchievementSystem {
    fn save(&self, store: &mut SaveStore) {
        for achievement in &self.achievements {
            store.set_int(achievement.value_key(), achievement.current);
            store.set_bool(achievement.unlocked_key(), achievement.unlocked);
        }
    }

    fn load(&mut self, store: &SaveStore) {
        for achievement in &mut self.achievements {
            achievement.current = store.get_int(&achievement.value_key(), 0).max(0);
            achievement.unlocked = store.get_bool(&achievement.unlocked_key(), false);
        }
    }
}
