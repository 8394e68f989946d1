//! Fundamental geometric and simulation types.

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Position in scene space (host units, y = up).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position(pub Vec3);

/// Unit direction of travel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Heading(Vec3);

/// Position and orientation reported by the XR hit-test.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub position: Vec3,
    pub orientation: Quat,
}

/// Handle of a visual object (mesh, particle system, flash) owned by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VisualHandle(pub u32);

/// Handle of a sound object owned by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SoundHandle(pub u32);

/// Linear RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

/// Intensity envelope of a timed effect: linear ramp up, then linear fade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectCurve {
    pub ramp_ticks: u64,
    pub fade_ticks: u64,
}

/// Simulation time tracking.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SimTime {
    /// Current tick number (increments by 1 each tick).
    pub tick: u64,
    /// Elapsed simulation time in seconds.
    pub elapsed_secs: f64,
}

impl Position {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self(Vec3::new(x, y, z))
    }

    /// Straight-line distance to another position.
    pub fn range_to(&self, other: &Position) -> f32 {
        self.0.distance(other.0)
    }

    /// Distance from the scene origin.
    pub fn range_from_origin(&self) -> f32 {
        self.0.length()
    }
}

impl Heading {
    /// Normalize `v` into a heading. Zero or non-finite vectors have no heading.
    pub fn from_vector(v: Vec3) -> Option<Self> {
        let unit = v.try_normalize()?;
        Some(Self(unit))
    }

    pub fn vector(&self) -> Vec3 {
        self.0
    }
}

impl Default for Heading {
    fn default() -> Self {
        Self(Vec3::Z)
    }
}

impl Pose {
    pub fn new(position: Vec3, orientation: Quat) -> Self {
        Self {
            position,
            orientation,
        }
    }
}

impl Color {
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }
}

impl EffectCurve {
    /// Total span of the envelope in ticks.
    pub fn span_ticks(&self) -> u64 {
        self.ramp_ticks + self.fade_ticks
    }

    /// Intensity in `0.0..=1.0` at `age` ticks after spawn.
    pub fn intensity(&self, age: u64) -> f32 {
        if age < self.ramp_ticks {
            return age as f32 / self.ramp_ticks as f32;
        }
        let into_fade = age - self.ramp_ticks;
        if into_fade >= self.fade_ticks {
            return 0.0;
        }
        1.0 - into_fade as f32 / self.fade_ticks as f32
    }
}

impl SimTime {
    /// Seconds per tick at the default tick rate.
    pub fn dt(&self) -> f64 {
        crate::constants::DT
    }

    /// Advance by one tick.
    pub fn advance(&mut self) {
        self.tick += 1;
        self.elapsed_secs += self.dt();
    }
}
