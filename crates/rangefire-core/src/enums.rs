//! Enumeration types used throughout the simulation.

use serde::{Deserialize, Serialize};

/// Session phase (top-level state).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Waiting for the host to report whether immersive AR is supported.
    #[default]
    AwaitingCapability,
    /// Immersive AR is not supported. Terminal.
    Unsupported,
    /// Arena prepared, waiting for the XR session to start.
    Ready,
    /// XR session running; systems tick.
    Active,
    /// Session running but hidden; systems do not tick.
    Paused,
}

/// Which experience the session runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExperienceMode {
    /// Tap to fire at the target ring.
    #[default]
    Shooter,
    /// Tap to open a portal into a virtual scene at the hit-test marker.
    Portal,
}

/// Projectile lifecycle phase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProjectilePhase {
    /// Visual created and subscription registered, not yet moved.
    #[default]
    Spawned,
    /// Advancing every tick.
    Active,
    /// Struck a target this tick.
    Hit,
    /// Left the playable range this tick.
    OutOfRange,
    /// Subscription and visual released.
    Disposed,
}

/// Kind of timed visual effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EffectKind {
    /// Particle burst with sound and camera shake.
    Explosion,
    /// Emissive sphere that grows and fades.
    Flash,
}

/// Load state of an asset with fallback sources.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoadStatus {
    /// Not requested yet.
    #[default]
    Idle,
    /// A source has been requested and no answer has arrived.
    Loading,
    /// A source loaded successfully.
    Ready,
    /// Every source failed; the dependent feature is off for the session.
    Unavailable,
}

/// Alert severity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AlertLevel {
    Info,
    Warning,
    Critical,
}
