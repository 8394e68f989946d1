//! Core types and definitions for the RANGEFIRE simulation.
//!
//! This crate defines the vocabulary shared across all other crates:
//! components, host commands, scene events, snapshots, configuration
//! and constants. It has no dependency on any engine or XR runtime.

pub mod commands;
pub mod components;
pub mod config;
pub mod constants;
pub mod enums;
pub mod error;
pub mod events;
pub mod state;
pub mod types;
