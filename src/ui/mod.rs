//! UI module that visualizes the simulation state using Bevy
//!
//! This module is purely for visualization - all game logic is in the `simulation` module.
//! The UI reads state from `CafeWorld`, renders it using Bevy's 3D graphics, and forwards
//! key presses to the world's player actions.

mod components;
mod hud;
mod input;
pub mod spawner;
mod sync;
mod world;

use bevy::prelude::*;

pub use components::{CafeWorldResource, EntityMappings, SavePath};

use components::*;
use hud::setup_hud;
use input::{handle_input, handle_player_actions};
use spawner::spawn_initial_visuals;
use sync::{collect_events, sync_customers, tick_simulation, update_hud_text, update_station_colors};
use world::setup_world;

/// Plugin to register all UI systems
///
/// Uses the `CafeWorldResource` already in the app if there is one, otherwise
/// starts a fresh shop.
pub struct CoffeeShopUIPlugin;

impl Plugin for CoffeeShopUIPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<CafeWorldResource>()
            .init_resource::<SavePath>()
            .init_resource::<EntityMappings>()
            .init_resource::<EventLog>()
            .add_systems(
                Startup,
                (setup_world, spawn_initial_visuals.after(setup_world), setup_hud),
            )
            .add_systems(FixedUpdate, tick_simulation)
            .add_systems(
                Update,
                (
                    handle_player_actions,
                    collect_events.after(handle_player_actions),
                    sync_customers,
                    update_station_colors,
                    update_hud_text.after(collect_events),
                    handle_input,
                ),
            );
    }
}
