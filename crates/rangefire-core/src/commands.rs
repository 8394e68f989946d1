//! Commands sent from the host (engine, XR runtime, input) to the simulation.
//!
//! Commands are queued and processed at the next tick boundary.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::types::Pose;

/// Everything the host can tell the simulation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum HostCommand {
    // --- Session ---
    /// Result of the one-time immersive-AR capability query.
    CapabilityReport { immersive_ar: bool },
    /// The XR session started.
    SessionStarted,
    /// The XR session ended.
    SessionEnded,
    /// Page hidden; stop ticking systems.
    Pause,
    /// Page visible again.
    Resume,

    // --- Input ---
    /// Primary pointer/touch action (tap).
    PrimaryAction,
    /// Current camera pose.
    CameraMoved { position: Vec3, forward: Vec3 },
    /// Latest hit-test result; `None` when the floor is not found.
    HitTest { pose: Option<Pose> },

    // --- Asset loading results ---
    TemplateLoaded { source: String },
    TemplateFailed { source: String, reason: String },
    SoundLoaded { source: String },
    SoundFailed { source: String, reason: String },
}
