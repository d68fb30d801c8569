//! UI components and resources for linking Bevy entities to simulation state

use bevy::prelude::*;
use std::collections::{HashMap, VecDeque};
use std::path::PathBuf;

use crate::simulation::{BeanSourceId, CafeWorld, CounterId, CustomerId, StationId};

/// Resource wrapper for the simulation world
#[derive(Resource)]
pub struct CafeWorldResource(pub CafeWorld);

impl Default for CafeWorldResource {
    fn default() -> Self {
        Self(CafeWorld::create_test_world())
    }
}

/// Where progress is written when the game exits
#[derive(Resource, Default)]
pub struct SavePath(pub Option<PathBuf>);

/// Marker component for ground plane
#[derive(Component)]
pub struct Ground;

/// Marker component for the main camera
#[derive(Component)]
pub struct MainCamera;

/// Marker for entities synced from simulation
#[derive(Component)]
pub struct SimSynced;

/// Links a Bevy entity to a simulation customer
#[derive(Component)]
pub struct CustomerLink(pub CustomerId);

/// Links a Bevy entity to a simulation coffee machine
#[derive(Component)]
pub struct StationLink(pub StationId);

/// Links a Bevy entity to a simulation serving counter
#[derive(Component)]
pub struct CounterLink(pub CounterId);

/// Links a Bevy entity to a simulation bean bag
#[derive(Component)]
pub struct BeanSourceLink(pub BeanSourceId);

/// Resource to track Bevy entities mapped to simulation entities
#[derive(Resource, Default)]
pub struct EntityMappings {
    pub customers: HashMap<CustomerId, Entity>,
    pub stations: HashMap<StationId, Entity>,
    pub counters: HashMap<CounterId, Entity>,
    pub bean_sources: HashMap<BeanSourceId, Entity>,
}

/// Most recent presentation events, newest last
#[derive(Resource, Default)]
pub struct EventLog {
    pub lines: VecDeque<String>,
}

impl EventLog {
    pub const MAX_LINES: usize = 6;

    pub fn push(&mut self, line: String) {
        self.lines.push_back(line);
        while self.lines.len() > Self::MAX_LINES {
            self.lines.pop_front();
        }
    }
}

/// Marker for HUD text elements
#[derive(Component)]
pub enum HudText {
    Money,
    Carrying,
    Customers,
    Satisfaction,
    Machine,
    Counter,
    BeanBag,
    Upgrades,
    Events,
}
