//! Presentation events
//!
//! The simulation never calls into audio or display code. It queues
//! fire-and-forget events that the presentation layer drains once per frame.

use super::types::{BeanSourceId, CounterId, CustomerId, StationId};

/// Something the presentation layer may want to show or play
#[derive(Debug, Clone, PartialEq)]
pub enum CafeEvent {
    CustomerSpawned {
        customer: CustomerId,
        name: String,
    },
    /// Speech bubble with the order, plus order sound
    ShowOrder {
        customer: CustomerId,
    },
    /// Thank-you bubble, plus thank-you sound
    ShowThankYou {
        customer: CustomerId,
    },
    PlayImpatientCue {
        customer: CustomerId,
    },
    CustomerLeft {
        customer: CustomerId,
        satisfied: bool,
    },
    BrewingStarted {
        station: StationId,
    },
    BrewingComplete {
        station: StationId,
        units_ready: u32,
    },
    CoffeeCollected {
        station: StationId,
    },
    CoffeeServed {
        counter: CounterId,
        customer: CustomerId,
        payment: i32,
    },
    BeanCollected {
        source: BeanSourceId,
    },
    UpgradePurchased {
        name: String,
    },
    AchievementUnlocked {
        id: String,
        title: String,
    },
}

/// Queue of pending presentation events
#[derive(Debug, Default)]
pub struct EventQueue {
    events: Vec<CafeEvent>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: CafeEvent) {
        self.events.push(event);
    }

    /// Take every pending event, oldest first
    pub fn drain(&mut self) -> Vec<CafeEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn pending(&self) -> &[CafeEvent] {
        &self.events
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
