//! ECS components for hecs entities.
//!
//! Components are plain data structs with no game logic.
//! Game logic lives in systems, not components.

use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::types::{Color, EffectCurve, VisualHandle};

/// Host visual backing an entity. Released exactly once on disposal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Visual(pub VisualHandle);

/// A moving projectile fired by the player.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub phase: ProjectilePhase,
    /// Distance travelled per tick.
    pub speed: f32,
    /// Characteristic radius for the distance collision test.
    pub radius: f32,
    /// Tick at which the projectile was fired.
    pub spawned_tick: u64,
    /// Number of ticks the projectile has advanced.
    pub ticks_alive: u64,
}

/// A static destructible target in the circular field.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Target {
    /// Slot index in the circle (0-based).
    pub index: u32,
    /// Characteristic radius for the distance collision test.
    pub radius: f32,
    /// Box edge length.
    pub size: f32,
    /// Whether a static collider is attached.
    pub has_collider: bool,
    pub diffuse: Color,
    pub emissive: Color,
}

/// A struck target waiting out its grace delay before removal.
/// Targets carrying this are no longer hit-testable.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PendingRemoval {
    pub remove_at_tick: u64,
}

/// A short-lived audiovisual effect.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Effect {
    pub kind: EffectKind,
    pub spawned_tick: u64,
    pub expires_at_tick: u64,
    pub curve: EffectCurve,
}

/// Marks an effect whose lifetime has elapsed and awaits cleanup.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Expired;
