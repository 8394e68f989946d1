//! Headless host for the AR shooting range.
//!
//! Wires the simulation engine to a game loop thread and a scripted host
//! that stands in for the XR runtime.

pub mod demo;
pub mod game_loop;
pub mod state;

pub use rangefire_core as core;
