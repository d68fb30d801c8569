//! Standalone coffee shop simulation module
//!
//! This module contains all the core game logic that can run independently
//! of the Bevy game engine. It can be tested via console without needing to
//! boot up the full game.

mod achievements;
mod bean_source;
mod brew_station;
mod config;
mod customer;
mod economy;
mod events;
mod inventory;
mod navigation;
mod persistence;
mod service_counter;
mod spawner;
mod statistics;
mod types;
mod upgrades;
mod world;

// Re-export public types for external use
// These may not be used within this crate but are part of the public API
#[allow(unused_imports)]
pub use achievements::{Achievement, AchievementSystem};
#[allow(unused_imports)]
pub use bean_source::BeanSource;
#[allow(unused_imports)]
pub use brew_station::{BrewState, BrewStation};
#[allow(unused_imports)]
pub use config::{
    BeanSourceConfig, BrewConfig, CafeConfig, CounterConfig, CustomerConfig, InventoryConfig,
    LayoutConfig, SpawnerConfig,
};
#[allow(unused_imports)]
pub use customer::{Customer, CustomerState, CustomerType, CustomerUpdateResult};
#[allow(unused_imports)]
pub use economy::EconomyLedger;
#[allow(unused_imports)]
pub use events::{CafeEvent, EventQueue};
#[allow(unused_imports)]
pub use inventory::Inventory;
#[allow(unused_imports)]
pub use navigation::{Navigator, StraightLineNavigator};
#[allow(unused_imports)]
pub use persistence::{Persist, SaveStore, SaveValue};
#[allow(unused_imports)]
pub use service_counter::{HandOff, ServiceCounter};
#[allow(unused_imports)]
pub use spawner::{update_customers, CustomerSpawner};
#[allow(unused_imports)]
pub use statistics::{GameStatistics, COMBO_WINDOW};
#[allow(unused_imports)]
pub use types::{BeanSourceId, CounterId, CustomerId, ItemKind, Position, SimId, StationId};
#[allow(unused_imports)]
pub use upgrades::{NoUpgrades, Upgrade, UpgradeEffects, UpgradeSystem, UpgradeType};
pub use world::{CafeSummary, CafeWorld};
