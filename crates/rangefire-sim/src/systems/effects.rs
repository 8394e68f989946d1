//! Hit feedback: explosion particle burst, flash sphere, camera shake.
//!
//! Effects are fire-and-forget. Each one carries its own expiry tick and is
//! retired by the timer below whether or not the projectile or target that
//! caused it still exists.

use glam::Vec3;
use hecs::{Entity, World};
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use tracing::warn;

use rangefire_core::components::{Effect, Expired, Visual};
use rangefire_core::config::EffectConfig;
use rangefire_core::constants::*;
use rangefire_core::enums::EffectKind;
use rangefire_core::events::{ParticleBurst, ParticleSeed, SceneEvent};
use rangefire_core::types::{EffectCurve, Position, VisualHandle};

/// Spawn an explosion and its flash at `position`.
/// Returns `(explosion, flash)`.
pub fn spawn_explosion(
    world: &mut World,
    rng: &mut ChaCha8Rng,
    next_visual: &mut u32,
    position: Vec3,
    config: &EffectConfig,
    tick: u64,
    events: &mut Vec<SceneEvent>,
) -> (Entity, Entity) {
    let explosion_ticks = ms_to_ticks(config.explosion_ttl_ms);
    let ramp_ticks = ms_to_ticks(config.explosion_ramp_ms).min(explosion_ticks);
    let flash_ticks = ms_to_ticks(config.flash_ttl_ms);

    let explosion_handle = VisualHandle(*next_visual);
    let flash_handle = VisualHandle(*next_visual + 1);
    *next_visual += 2;

    events.push(SceneEvent::SpawnExplosion {
        handle: explosion_handle,
        position,
        burst: burst(rng, config.particle_count),
    });
    events.push(SceneEvent::SpawnFlash {
        handle: flash_handle,
        position,
        color: FLASH_COLOR,
        scale_from: FLASH_SCALE_START,
        scale_to: FLASH_SCALE_END,
        duration_ms: config.flash_ttl_ms,
    });
    events.push(SceneEvent::CameraShake {
        intensity: config.camera_shake_intensity,
        duration_ms: config.camera_shake_duration_ms,
    });

    let explosion = world.spawn((
        Effect {
            kind: EffectKind::Explosion,
            spawned_tick: tick,
            expires_at_tick: tick + explosion_ticks,
            curve: EffectCurve {
                ramp_ticks,
                fade_ticks: explosion_ticks - ramp_ticks,
            },
        },
        Position(position),
        Visual(explosion_handle),
    ));
    let flash = world.spawn((
        Effect {
            kind: EffectKind::Flash,
            spawned_tick: tick,
            expires_at_tick: tick + flash_ticks,
            curve: EffectCurve {
                ramp_ticks: 0,
                fade_ticks: flash_ticks,
            },
        },
        Position(position),
        Visual(flash_handle),
    ));

    (explosion, flash)
}

/// Draw `count` particle launch parameters.
pub fn burst(rng: &mut ChaCha8Rng, count: u32) -> ParticleBurst {
    let low = Vec3::from(PARTICLE_DIRECTION_1).min(Vec3::from(PARTICLE_DIRECTION_2));
    let high = Vec3::from(PARTICLE_DIRECTION_1).max(Vec3::from(PARTICLE_DIRECTION_2));

    let particles = (0..count)
        .map(|_| ParticleSeed {
            direction: Vec3::new(
                rng.gen_range(low.x..=high.x),
                rng.gen_range(low.y..=high.y),
                rng.gen_range(low.z..=high.z),
            ),
            emit_power: rng.gen_range(PARTICLE_MIN_EMIT_POWER..=PARTICLE_MAX_EMIT_POWER),
            lifetime_secs: rng
                .gen_range(PARTICLE_MIN_LIFETIME_SECS..=PARTICLE_MAX_LIFETIME_SECS),
            size: rng.gen_range(PARTICLE_MIN_SIZE..=PARTICLE_MAX_SIZE),
            angular_speed: rng.gen_range(0.0..=PARTICLE_MAX_ANGULAR_SPEED),
        })
        .collect();

    ParticleBurst {
        color1: PARTICLE_COLOR_1,
        color2: PARTICLE_COLOR_2,
        color_dead: PARTICLE_COLOR_DEAD,
        particles,
    }
}

/// Flag effects whose lifetime has elapsed at `tick`.
pub fn run(world: &mut World, tick: u64, buffer: &mut Vec<Entity>) {
    buffer.clear();
    for (entity, (effect, expired)) in world.query_mut::<(&Effect, Option<&Expired>)>() {
        if expired.is_none() && tick >= effect.expires_at_tick {
            buffer.push(entity);
        }
    }
    for entity in buffer.drain(..) {
        if let Err(err) = world.insert_one(entity, Expired) {
            warn!(?entity, %err, "expired effect vanished before cleanup");
        }
    }
}

/// Flash scale at `age` ticks into a flash lasting `span` ticks.
pub fn flash_scale(age: u64, span: u64) -> f32 {
    if span == 0 {
        return FLASH_SCALE_END;
    }
    let t = (age as f32 / span as f32).clamp(0.0, 1.0);
    FLASH_SCALE_START + (FLASH_SCALE_END - FLASH_SCALE_START) * t
}
