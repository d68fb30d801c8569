//! Coffee Shop Simulation Library
//!
//! A coffee shop game simulation that can run independently or with a Bevy UI.

pub mod simulation;

#[cfg(feature = "ui")]
pub mod ui;
