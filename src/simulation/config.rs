//! Tunable parameters for the coffee shop simulation
//!
//! Every section defaults to the values the game ships with. A RON file can
//! override any subset of them; missing fields fall back to the defaults.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

use super::types::Position;

/// Customer behaviour tuning
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CustomerConfig {
    /// Base patience in seconds before a waiting customer gives up
    pub patience_time: f32,
    /// Base payment for one coffee
    pub payment_amount: i32,
    /// Navigation remaining distance under which the customer counts as arrived
    pub arrival_distance: f32,
    /// Direct distance to the serving point that also counts as arrived.
    /// Slightly larger than `arrival_distance` to tolerate blocked paths.
    pub direct_arrival_distance: f32,
    /// A customer still walking this close to the serving point may be served
    pub acceptance_radius: f32,
    /// Delay between receiving an order and walking away
    pub leave_delay: f32,
    /// Navigation remaining distance at which the exit counts as reached
    pub exit_arrival_distance: f32,
    /// Patience fraction below which the impatient cue may play
    pub impatience_threshold: f32,
    /// Chance per tick of playing the impatient cue while below the threshold
    pub impatient_cue_chance: f64,
    /// Walking speed in units per second
    pub walk_speed: f32,
    /// How far past the counter a leaving customer walks
    pub exit_distance: f32,
}

impl Default for CustomerConfig {
    fn default() -> Self {
        Self {
            patience_time: 30.0,
            payment_amount: 10,
            arrival_distance: 1.5,
            direct_arrival_distance: 2.5,
            acceptance_radius: 4.0,
            leave_delay: 2.0,
            exit_arrival_distance: 1.0,
            impatience_threshold: 0.3,
            impatient_cue_chance: 0.01,
            walk_speed: 3.5,
            exit_distance: 20.0,
        }
    }
}

/// Serving counter tuning
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CounterConfig {
    /// Radius around the serving point scanned for customers
    pub detection_radius: f32,
    /// Same tolerance as `CustomerConfig::acceptance_radius`, applied when matching
    pub acceptance_radius: f32,
    /// Height of the serving point above the counter
    pub serving_point_height: f32,
}

impl Default for CounterConfig {
    fn default() -> Self {
        Self {
            detection_radius: 5.0,
            acceptance_radius: 4.0,
            serving_point_height: 0.5,
        }
    }
}

/// Coffee machine tuning
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BrewConfig {
    pub beans_required: u32,
    pub processing_duration: f32,
    pub max_units_on_station: u32,
}

impl Default for BrewConfig {
    fn default() -> Self {
        Self {
            beans_required: 1,
            processing_duration: 3.0,
            max_units_on_station: 3,
        }
    }
}

/// Customer spawner tuning
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SpawnerConfig {
    pub spawn_interval: f32,
    pub max_customers: usize,
    /// Spawn the first customer immediately and keep spawning on the timer
    pub auto_spawn: bool,
    pub names: Vec<String>,
}

impl Default for SpawnerConfig {
    fn default() -> Self {
        Self {
            spawn_interval: 10.0,
            max_customers: 3,
            auto_spawn: true,
            names: ["Alex", "Sam", "Jordan", "Casey", "Taylor"]
                .iter()
                .map(|name| name.to_string())
                .collect(),
        }
    }
}

/// Player inventory capacities
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct InventoryConfig {
    pub max_beans: u32,
    pub max_coffees: u32,
}

impl Default for InventoryConfig {
    fn default() -> Self {
        Self {
            max_beans: 3,
            max_coffees: 5,
        }
    }
}

/// Bean bag tuning
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BeanSourceConfig {
    pub collection_cooldown: f32,
}

impl Default for BeanSourceConfig {
    fn default() -> Self {
        Self {
            collection_cooldown: 0.5,
        }
    }
}

/// Placement of the fixed props in the shop
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub counter: Position,
    pub coffee_machine: Position,
    pub bean_source: Position,
    pub customer_spawn: Position,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            counter: Position::new(0.0, 0.0, 0.0),
            coffee_machine: Position::new(-4.0, 0.0, -2.0),
            bean_source: Position::new(4.0, 0.0, -2.0),
            customer_spawn: Position::new(0.0, 0.0, 15.0),
        }
    }
}

/// Full configuration for a cafe world
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CafeConfig {
    pub customer: CustomerConfig,
    pub counter: CounterConfig,
    pub brew: BrewConfig,
    pub spawner: SpawnerConfig,
    pub inventory: InventoryConfig,
    pub bean_source: BeanSourceConfig,
    pub layout: LayoutConfig,
}

impl CafeConfig {
    /// Parse a configuration from RON text
    pub fn from_ron(contents: &str) -> Result<Self> {
        let config: CafeConfig =
            ron::from_str(contents).context("Failed to parse cafe configuration")?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file '{}'", path.display()))?;
        Self::from_ron(&contents).with_context(|| format!("Invalid config '{}'", path.display()))
    }

    fn validate(&self) -> Result<()> {
        let customer = &self.customer;
        positive("customer.patience_time", customer.patience_time)?;
        if customer.payment_amount < 0 {
            anyhow::bail!("customer.payment_amount must not be negative");
        }
        non_negative("customer.arrival_distance", customer.arrival_distance)?;
        non_negative("customer.direct_arrival_distance", customer.direct_arrival_distance)?;
        non_negative("customer.acceptance_radius", customer.acceptance_radius)?;
        non_negative("customer.leave_delay", customer.leave_delay)?;
        non_negative("customer.exit_arrival_distance", customer.exit_arrival_distance)?;
        fraction("customer.impatience_threshold", f64::from(customer.impatience_threshold))?;
        fraction("customer.impatient_cue_chance", customer.impatient_cue_chance)?;
        positive("customer.walk_speed", customer.walk_speed)?;
        non_negative("customer.exit_distance", customer.exit_distance)?;

        non_negative("counter.detection_radius", self.counter.detection_radius)?;
        non_negative("counter.acceptance_radius", self.counter.acceptance_radius)?;
        finite("counter.serving_point_height", self.counter.serving_point_height)?;

        if self.brew.beans_required == 0 {
            anyhow::bail!("brew.beans_required must be at least 1");
        }
        positive("brew.processing_duration", self.brew.processing_duration)?;
        if self.brew.max_units_on_station == 0 {
            anyhow::bail!("brew.max_units_on_station must be at least 1");
        }

        positive("spawner.spawn_interval", self.spawner.spawn_interval)?;
        non_negative("bean_source.collection_cooldown", self.bean_source.collection_cooldown)?;

        let layout = &self.layout;
        for (name, position) in [
            ("layout.counter", layout.counter),
            ("layout.coffee_machine", layout.coffee_machine),
            ("layout.bean_source", layout.bean_source),
            ("layout.customer_spawn", layout.customer_spawn),
        ] {
            finite(name, position.x)?;
            finite(name, position.y)?;
            finite(name, position.z)?;
        }
        Ok(())
    }
}

fn finite(name: &str, value: f32) -> Result<()> {
    if !value.is_finite() {
        anyhow::bail!("{} must be a finite number, got {}", name, value);
    }
    Ok(())
}

fn positive(name: &str, value: f32) -> Result<()> {
    finite(name, value)?;
    if value <= 0.0 {
        anyhow::bail!("{} must be positive, got {}", name, value);
    }
    Ok(())
}

fn non_negative(name: &str, value: f32) -> Result<()> {
    finite(name, value)?;
    if value < 0.0 {
        anyhow::bail!("{} must not be negative, got {}", name, value);
    }
    Ok(())
}

/// Probabilities and patience fractions live in [0, 1]
fn fraction(name: &str, value: f64) -> Result<()> {
    if !(0.0..=1.0).contains(&value) {
        anyhow::bail!("{} must be between 0 and 1, got {}", name, value);
    }
    Ok(())
}
