//! Cleanup system: disposes finished projectiles, struck targets and expired effects.

use hecs::{Entity, World};
use tracing::debug;

use rangefire_core::components::{Effect, Expired, PendingRemoval, Projectile, Target, Visual};
use rangefire_core::enums::ProjectilePhase;
use rangefire_core::events::SceneEvent;

use crate::subscriptions::TickSubscriptions;
use crate::systems::projectile;

/// Collect everything that ended this tick, then dispose it.
/// Uses a pre-allocated buffer to avoid per-tick allocation.
pub fn run(
    world: &mut World,
    subscriptions: &mut TickSubscriptions,
    tick: u64,
    events: &mut Vec<SceneEvent>,
    despawn_buffer: &mut Vec<Entity>,
) {
    // Projectiles that hit something or left the range.
    despawn_buffer.clear();
    for (entity, proj) in world.query_mut::<&Projectile>() {
        if matches!(
            proj.phase,
            ProjectilePhase::Hit | ProjectilePhase::OutOfRange
        ) {
            despawn_buffer.push(entity);
        }
    }
    for entity in despawn_buffer.drain(..) {
        projectile::dispose(world, subscriptions, entity, events);
    }

    // Struck targets whose grace delay has run out, and expired effects.
    for (entity, (_target, pending)) in world.query_mut::<(&Target, &PendingRemoval)>() {
        if tick >= pending.remove_at_tick {
            despawn_buffer.push(entity);
        }
    }
    for (entity, (_effect, _expired)) in world.query_mut::<(&Effect, &Expired)>() {
        despawn_buffer.push(entity);
    }

    for entity in despawn_buffer.drain(..) {
        dispose_visual_entity(world, entity, events);
    }
}

/// Release the host visual of a target or effect and despawn it.
/// Returns `false` if the entity was already gone.
pub fn dispose_visual_entity(
    world: &mut World,
    entity: Entity,
    events: &mut Vec<SceneEvent>,
) -> bool {
    let handle = match world.get::<&Visual>(entity) {
        Ok(visual) => visual.0,
        Err(_) => return false,
    };
    events.push(SceneEvent::DisposeVisual { handle });
    let _ = world.despawn(entity);
    debug!(?handle, "visual disposed");
    true
}
