//! Simulation engine for the AR shooting range.
//!
//! Owns the hecs ECS world, runs systems at a fixed tick rate,
//! and produces FrameSnapshots plus scene events for the host.

pub mod audio;
pub mod engine;
pub mod loader;
pub mod portal;
pub mod score;
pub mod subscriptions;
pub mod systems;

pub use engine::{SimConfig, SimulationEngine};
pub use rangefire_core as core;

#[cfg(test)]
mod tests;
