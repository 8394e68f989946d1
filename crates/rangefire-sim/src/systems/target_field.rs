//! Target field setup: N static boxes evenly spaced on a circle.
//!
//! Placement is exact and reproducible. Target `i` of `n` sits at angle
//! `2π·i/n` on a circle of the configured radius, lifted to a fixed height and
//! pushed forward by a fixed z offset.

use glam::Vec3;
use hecs::{Entity, World};
use tracing::debug;

use rangefire_core::components::{Target, Visual};
use rangefire_core::config::TargetFieldConfig;
use rangefire_core::events::SceneEvent;
use rangefire_core::types::{Position, VisualHandle};

/// Positions of every target slot, in slot order.
pub fn layout(config: &TargetFieldConfig) -> Vec<Vec3> {
    (0..config.count)
        .map(|i| slot_position(config, i))
        .collect()
}

/// Position of slot `index` out of `config.count`.
pub fn slot_position(config: &TargetFieldConfig, index: u32) -> Vec3 {
    let angle = index as f32 / config.count as f32 * std::f32::consts::TAU;
    Vec3::new(
        angle.cos() * config.radius,
        config.height,
        angle.sin() * config.radius + config.z_offset,
    )
}

/// Spawn one target entity per slot and ask the host to create its box.
pub fn spawn_field(
    world: &mut World,
    config: &TargetFieldConfig,
    next_visual: &mut u32,
    events: &mut Vec<SceneEvent>,
) -> Vec<Entity> {
    let mut spawned = Vec::with_capacity(config.count as usize);
    for (index, position) in layout(config).into_iter().enumerate() {
        let handle = VisualHandle(*next_visual);
        *next_visual += 1;

        let target = Target {
            index: index as u32,
            radius: config.size * 0.5,
            size: config.size,
            has_collider: config.collider,
            diffuse: config.diffuse,
            emissive: config.emissive,
        };

        events.push(SceneEvent::SpawnTarget {
            handle,
            index: target.index,
            position,
            size: target.size,
            diffuse: target.diffuse,
            emissive: target.emissive,
            collider: target.has_collider,
        });

        spawned.push(world.spawn((target, Position(position), Visual(handle))));
    }
    debug!(count = spawned.len(), "target field spawned");
    spawned
}
