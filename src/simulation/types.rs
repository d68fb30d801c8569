//! Core types for the coffee shop simulation
//!
//! These are standalone types that don't depend on Bevy.

use serde::{Deserialize, Serialize};

/// A unique identifier for simulation entities
/// This is a simple wrapper around a usize for type safety
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SimId(pub usize);

/// A wrapper type for customer IDs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CustomerId(pub SimId);

/// A wrapper type for brew station IDs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StationId(pub SimId);

/// A wrapper type for serving counter IDs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CounterId(pub SimId);

/// A wrapper type for bean source IDs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BeanSourceId(pub SimId);

/// Kinds of items the player can carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ItemKind {
    Bean,
    CoffeeUnit,
    Currency,
}

impl ItemKind {
    pub const ALL: [ItemKind; 3] = [ItemKind::Bean, ItemKind::CoffeeUnit, ItemKind::Currency];
}

/// A 3D position in the simulation
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Position {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn distance(&self, other: &Position) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        (dx * dx + dy * dy + dz * dz).sqrt()
    }

    pub fn lerp(&self, other: &Position, t: f32) -> Position {
        Position {
            x: self.x + (other.x - self.x) * t,
            y: self.y + (other.y - self.y) * t,
            z: self.z + (other.z - self.z) * t,
        }
    }

    /// Move towards `target` by at most `max_step`, never overshooting
    pub fn move_towards(&self, target: &Position, max_step: f32) -> Position {
        let distance = self.distance(target);
        if distance <= max_step || distance == 0.0 {
            *target
        } else {
            self.lerp(target, max_step / distance)
        }
    }

    /// Point `length` units away from `self`, in the direction pointing from `origin` to `self`
    pub fn extend_away_from(&self, origin: &Position, length: f32) -> Position {
        let dx = self.x - origin.x;
        let dz = self.z - origin.z;
        let len = (dx * dx + dz * dz).sqrt();
        if len > 0.0 {
            Position::new(origin.x + dx / len * length, self.y, origin.z + dz / len * length)
        } else {
            Position::new(origin.x, self.y, origin.z + length)
        }
    }
}
