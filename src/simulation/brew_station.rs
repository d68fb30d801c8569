//! Coffee machine logic for the coffee shop simulation
//!
//! A brew station turns beans from the player's inventory into coffee units
//! over a fixed processing time. Units wait on the station until the player
//! collects them.

use log::debug;

use super::config::BrewConfig;
use super::events::{CafeEvent, EventQueue};
use super::inventory::Inventory;
use super::types::{ItemKind, Position, StationId};
use super::upgrades::UpgradeEffects;

/// Production state of a brew station
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrewState {
    Idle,
    Processing,
    Ready,
}

/// A coffee machine in the simulation
#[derive(Debug, Clone)]
pub struct BrewStation {
    pub id: StationId,
    pub position: Position,
    state: BrewState,
    beans_required: u32,
    processing_duration: f32,
    /// Duration of the current brew after the upgrade multiplier
    effective_duration: f32,
    /// Cups the current brew will produce
    cups_this_brew: u32,
    elapsed: f32,
    units_ready: u32,
    max_units: u32,
}

impl BrewStation {
    pub fn new(id: StationId, position: Position, config: &BrewConfig) -> Self {
        Self {
            id,
            position,
            state: BrewState::Idle,
            beans_required: config.beans_required.max(1),
            processing_duration: config.processing_duration,
            effective_duration: config.processing_duration,
            cups_this_brew: 1,
            elapsed: 0.0,
            units_ready: 0,
            max_units: config.max_units_on_station.max(1),
        }
    }

    pub fn state(&self) -> BrewState {
        self.state
    }

    pub fn units_ready(&self) -> u32 {
        self.units_ready
    }

    pub fn beans_required(&self) -> u32 {
        self.beans_required
    }

    pub fn max_units(&self) -> u32 {
        self.max_units
    }

    /// Seconds left on the current brew, `None` when not brewing
    pub fn remaining_time(&self) -> Option<f32> {
        match self.state {
            BrewState::Processing => Some((self.effective_duration - self.elapsed).max(0.0)),
            _ => None,
        }
    }

    /// Start a brew, taking the beans from `inventory`
    /// Returns false and changes nothing unless the station is idle and every
    /// required bean can be taken
    pub fn start_brewing(
        &mut self,
        inventory: &mut Inventory,
        upgrades: &dyn UpgradeEffects,
        events: &mut EventQueue,
    ) -> bool {
        if self.state != BrewState::Idle {
            return false;
        }
        if !inventory.debit(ItemKind::Bean, self.beans_required) {
            return false;
        }

        // Upgrades bought mid-brew apply from the next brew
        self.effective_duration =
            self.processing_duration * upgrades.machine_speed_multiplier().max(0.0);
        self.cups_this_brew = upgrades.cups_per_brew().max(1);
        self.elapsed = 0.0;
        self.state = BrewState::Processing;

        debug!(
            "Station {:?} brewing {} cup(s) for {:.2}s",
            self.id.0, self.cups_this_brew, self.effective_duration
        );
        events.push(CafeEvent::BrewingStarted { station: self.id });
        true
    }

    /// Advance the brew timer
    /// Returns true on the tick the brew completes
    pub fn update(&mut self, delta_secs: f32, events: &mut EventQueue) -> bool {
        if self.state != BrewState::Processing {
            return false;
        }

        self.elapsed += delta_secs;
        if self.elapsed < self.effective_duration {
            return false;
        }

        let space_available = self.max_units.saturating_sub(self.units_ready);
        self.units_ready += self.cups_this_brew.min(space_available);
        self.state = BrewState::Ready;

        events.push(CafeEvent::BrewingComplete {
            station: self.id,
            units_ready: self.units_ready,
        });
        true
    }

    /// Move one ready unit into `inventory`
    /// Returns false and changes nothing if nothing is ready or the inventory is full
    pub fn collect(&mut self, inventory: &mut Inventory, events: &mut EventQueue) -> bool {
        if self.state != BrewState::Ready || self.units_ready == 0 {
            return false;
        }
        if !inventory.credit(ItemKind::CoffeeUnit, 1) {
            return false;
        }

        self.units_ready -= 1;
        if self.units_ready == 0 {
            self.state = BrewState::Idle;
        }
        events.push(CafeEvent::CoffeeCollected { station: self.id });
        true
    }

    /// What the interact button does: collect when something is ready,
    /// otherwise try to start a brew
    pub fn interact(
        &mut self,
        inventory: &mut Inventory,
        upgrades: &dyn UpgradeEffects,
        events: &mut EventQueue,
    ) -> bool {
        match self.state {
            BrewState::Ready => self.collect(inventory, events),
            BrewState::Idle => self.start_brewing(inventory, upgrades, events),
            BrewState::Processing => false,
        }
    }

    /// Interaction prompt shown when the player is next to the station
    pub fn prompt(&self, inventory: &Inventory) -> String {
        match self.state {
            BrewState::Processing => {
                format!("Processing... ({:.1}s)", self.remaining_time().unwrap_or(0.0))
            }
            BrewState::Ready if inventory.is_full(ItemKind::CoffeeUnit) => {
                "Hands full - serve some coffee first".to_string()
            }
            BrewState::Ready => "Coffee Ready! Press E to collect".to_string(),
            BrewState::Idle => {
                let beans = inventory.count(ItemKind::Bean);
                if beans < self.beans_required {
                    format!("Need {} beans (have {})", self.beans_required, beans)
                } else {
                    format!("Press E - Make Coffee ({} bean)", self.beans_required)
                }
            }
        }
    }
}
