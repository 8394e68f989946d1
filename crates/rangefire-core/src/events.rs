//! Events emitted by the simulation for the host scene, audio and UI.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::state::PortalView;
use crate::types::{Color, SoundHandle, VisualHandle};

/// Instructions for the host. Applied in emission order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SceneEvent {
    /// Create a target box.
    SpawnTarget {
        handle: VisualHandle,
        index: u32,
        position: Vec3,
        size: f32,
        diffuse: Color,
        emissive: Color,
        collider: bool,
    },
    /// Clone the projectile template, enable it, place it and orient it along `forward`.
    CloneTemplate {
        handle: VisualHandle,
        position: Vec3,
        forward: Vec3,
    },
    /// Release a visual and everything attached to it.
    DisposeVisual { handle: VisualHandle },
    /// Start loading the projectile template from `source`.
    LoadTemplate { source: String },
    /// Start loading the explosion sound from `source`.
    LoadSound { handle: SoundHandle, source: String },
    /// Play the loaded sound at a position.
    PlaySound {
        handle: SoundHandle,
        position: Vec3,
        volume: f32,
        max_distance: f32,
        spatial: bool,
    },
    /// Release a sound.
    DisposeSound { handle: SoundHandle },
    /// Start a particle burst.
    SpawnExplosion {
        handle: VisualHandle,
        position: Vec3,
        burst: ParticleBurst,
    },
    /// Create the flash sphere and start its grow/fade animation.
    SpawnFlash {
        handle: VisualHandle,
        position: Vec3,
        color: Color,
        scale_from: f32,
        scale_to: f32,
        duration_ms: u32,
    },
    /// Shake the active camera.
    CameraShake { intensity: f32, duration_ms: u32 },
    /// Enable the portal roots and build the frame.
    PortalOpened { layout: PortalView },
}

/// Descriptor of one particle burst. The host runs the particles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParticleBurst {
    pub color1: Color,
    pub color2: Color,
    pub color_dead: Color,
    pub particles: Vec<ParticleSeed>,
}

/// Launch parameters of one particle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParticleSeed {
    pub direction: Vec3,
    pub emit_power: f32,
    pub lifetime_secs: f32,
    pub size: f32,
    pub angular_speed: f32,
}

/// Alert for the UI alert queue.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Alert {
    pub level: AlertLevel,
    pub message: String,
    pub tick: u64,
}
