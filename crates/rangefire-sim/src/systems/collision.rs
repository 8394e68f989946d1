//! Distance-based collision between projectiles and live targets.
//!
//! A projectile collides with a target when the distance between them is
//! below the sum of their radii. Detection only records hits; the engine
//! resolves them afterwards, so nothing is despawned mid-iteration. A target
//! claimed by one projectile is invisible to the rest of the tick.

use std::collections::HashSet;

use glam::Vec3;
use hecs::{Entity, World};

use rangefire_core::components::{PendingRemoval, Projectile, Target};
use rangefire_core::enums::ProjectilePhase;
use rangefire_core::types::Position;

/// A projectile striking a target this tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    pub projectile: Entity,
    pub target: Entity,
    pub target_index: u32,
    /// Projectile position at the moment of impact.
    pub contact: Vec3,
}

/// Collect this tick's hits into `hits` (cleared first).
pub fn detect(world: &World, hits: &mut Vec<Hit>) {
    hits.clear();

    let targets: Vec<(Entity, u32, Vec3, f32)> = world
        .query::<(&Target, &Position, Option<&PendingRemoval>)>()
        .iter()
        .filter(|(_, (_, _, pending))| pending.is_none())
        .map(|(entity, (target, pos, _))| (entity, target.index, pos.0, target.radius))
        .collect();
    if targets.is_empty() {
        return;
    }

    let mut claimed: HashSet<Entity> = HashSet::new();

    for (entity, (projectile, pos)) in world.query::<(&Projectile, &Position)>().iter() {
        if projectile.phase != ProjectilePhase::Active {
            continue;
        }

        let nearest = targets
            .iter()
            .filter(|(target, ..)| !claimed.contains(target))
            .map(|&(target, index, target_pos, radius)| {
                (target, index, pos.0.distance(target_pos), radius)
            })
            .filter(|&(_, _, distance, radius)| distance < projectile.radius + radius)
            .min_by(|a, b| a.2.total_cmp(&b.2));

        if let Some((target, target_index, _, _)) = nearest {
            claimed.insert(target);
            hits.push(Hit {
                projectile: entity,
                target,
                target_index,
                contact: pos.0,
            });
        }
    }
}
