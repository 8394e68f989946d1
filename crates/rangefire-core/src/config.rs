//! Game configuration.
//!
//! Every field has a default taken from `constants.rs`, so a config file only
//! needs to name what it changes.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::enums::ExperienceMode;
use crate::error::ConfigError;
use crate::types::Color;

/// Top-level game configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub mode: ExperienceMode,
    pub targets: TargetFieldConfig,
    pub projectile: ProjectileConfig,
    pub effects: EffectConfig,
    pub audio: AudioConfig,
    /// Projectile template sources, tried in order.
    pub template_sources: Vec<String>,
}

/// Circular target layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetFieldConfig {
    pub count: u32,
    pub radius: f32,
    pub height: f32,
    pub z_offset: f32,
    pub size: f32,
    pub collider: bool,
    pub diffuse: Color,
    pub emissive: Color,
}

/// Projectile kinematics and range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectileConfig {
    /// Distance per tick.
    pub speed: f32,
    pub radius: f32,
    pub max_range: f32,
}

/// Hit feedback timing and shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EffectConfig {
    pub explosion_ttl_ms: u32,
    pub explosion_ramp_ms: u32,
    pub flash_ttl_ms: u32,
    pub target_removal_delay_ms: u32,
    pub particle_count: u32,
    pub camera_shake_intensity: f32,
    pub camera_shake_duration_ms: u32,
}

/// Explosion sound.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    /// Sound sources, tried in order.
    pub sources: Vec<String>,
    pub volume: f32,
    pub max_distance: f32,
    pub spatial: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            mode: ExperienceMode::default(),
            targets: TargetFieldConfig::default(),
            projectile: ProjectileConfig::default(),
            effects: EffectConfig::default(),
            audio: AudioConfig::default(),
            template_sources: DEFAULT_TEMPLATE_SOURCES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl Default for TargetFieldConfig {
    fn default() -> Self {
        Self {
            count: TARGET_COUNT,
            radius: TARGET_LAYOUT_RADIUS,
            height: TARGET_HEIGHT,
            z_offset: TARGET_Z_OFFSET,
            size: TARGET_SIZE,
            collider: true,
            diffuse: TARGET_DIFFUSE,
            emissive: TARGET_EMISSIVE,
        }
    }
}

impl Default for ProjectileConfig {
    fn default() -> Self {
        Self {
            speed: PROJECTILE_SPEED,
            radius: PROJECTILE_RADIUS,
            max_range: PROJECTILE_MAX_RANGE,
        }
    }
}

impl Default for EffectConfig {
    fn default() -> Self {
        Self {
            explosion_ttl_ms: EXPLOSION_TTL_MS,
            explosion_ramp_ms: EXPLOSION_RAMP_MS,
            flash_ttl_ms: FLASH_TTL_MS,
            target_removal_delay_ms: TARGET_REMOVAL_DELAY_MS,
            particle_count: EXPLOSION_PARTICLE_COUNT,
            camera_shake_intensity: CAMERA_SHAKE_INTENSITY,
            camera_shake_duration_ms: CAMERA_SHAKE_DURATION_MS,
        }
    }
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            sources: DEFAULT_SOUND_SOURCES.iter().map(|s| s.to_string()).collect(),
            volume: SOUND_VOLUME,
            max_distance: SOUND_MAX_DISTANCE,
            spatial: true,
        }
    }
}

impl GameConfig {
    /// Parse and validate a JSON config.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let data = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&data)
    }

    /// Reject values the simulation cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("targets.radius", self.targets.radius)?;
        positive("targets.size", self.targets.size)?;
        positive("projectile.speed", self.projectile.speed)?;
        positive("projectile.radius", self.projectile.radius)?;
        positive("projectile.max_range", self.projectile.max_range)?;
        finite("targets.height", self.targets.height)?;
        finite("targets.z_offset", self.targets.z_offset)?;

        let effects = &self.effects;
        if effects.explosion_ttl_ms == 0 {
            return Err(invalid("effects.explosion_ttl_ms", "must be non-zero"));
        }
        if effects.explosion_ramp_ms >= effects.explosion_ttl_ms {
            return Err(invalid(
                "effects.explosion_ramp_ms",
                "must be shorter than explosion_ttl_ms",
            ));
        }
        if effects.flash_ttl_ms == 0 || effects.flash_ttl_ms > effects.explosion_ttl_ms {
            return Err(invalid(
                "effects.flash_ttl_ms",
                "must be non-zero and no longer than explosion_ttl_ms",
            ));
        }
        if effects.target_removal_delay_ms > TARGET_REMOVAL_DELAY_MAX_MS {
            return Err(invalid(
                "effects.target_removal_delay_ms",
                format!("must be at most {TARGET_REMOVAL_DELAY_MAX_MS} ms"),
            ));
        }

        if !(0.0..=1.0).contains(&self.audio.volume) {
            return Err(invalid("audio.volume", "must be within 0..=1"));
        }
        positive("audio.max_distance", self.audio.max_distance)?;
        Ok(())
    }
}

fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.into(),
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(invalid(field, format!("must be positive, got {value}")))
    }
}

fn finite(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(invalid(field, format!("must be finite, got {value}")))
    }
}
