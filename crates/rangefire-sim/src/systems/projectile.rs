//! Projectile lifecycle: spawn, per-tick advance, range check, disposal.
//!
//! `Spawned → Active → {Hit | OutOfRange} → Disposed`. Only projectiles
//! holding a live subscription are advanced; disposal releases the
//! subscription and the host visual exactly once.

use hecs::{Entity, World};
use tracing::debug;

use rangefire_core::components::{Projectile, Visual};
use rangefire_core::config::ProjectileConfig;
use rangefire_core::enums::ProjectilePhase;
use rangefire_core::events::SceneEvent;
use rangefire_core::types::{Heading, Position, VisualHandle};

use crate::subscriptions::{TickSubscriptions, Ticking};

/// Clone the template at `start`, facing `heading`, and register it for ticking.
pub fn spawn(
    world: &mut World,
    subscriptions: &mut TickSubscriptions,
    next_visual: &mut u32,
    start: Position,
    heading: Heading,
    config: &ProjectileConfig,
    tick: u64,
    events: &mut Vec<SceneEvent>,
) -> Entity {
    let handle = VisualHandle(*next_visual);
    *next_visual += 1;

    events.push(SceneEvent::CloneTemplate {
        handle,
        position: start.0,
        forward: heading.vector(),
    });

    let projectile = Projectile {
        phase: ProjectilePhase::Spawned,
        speed: config.speed,
        radius: config.radius,
        spawned_tick: tick,
        ticks_alive: 0,
    };
    let ticking = Ticking::new(subscriptions.subscribe());

    let entity = world.spawn((projectile, start, heading, Visual(handle), ticking));
    debug!(?handle, position = ?start.0, "projectile spawned");
    entity
}

/// Move every subscribed projectile one step along its heading.
pub fn advance(world: &mut World, subscriptions: &TickSubscriptions) {
    for (_entity, (projectile, pos, heading, ticking)) in
        world.query_mut::<(&mut Projectile, &mut Position, &Heading, &Ticking)>()
    {
        let live = ticking
            .subscription
            .as_ref()
            .is_some_and(|s| subscriptions.is_live(s));
        if !live {
            continue;
        }
        if !matches!(
            projectile.phase,
            ProjectilePhase::Spawned | ProjectilePhase::Active
        ) {
            continue;
        }
        projectile.phase = ProjectilePhase::Active;
        pos.0 += heading.vector() * projectile.speed;
        projectile.ticks_alive += 1;
    }
}

/// Flag active projectiles beyond `max_range` from the origin.
/// Projectiles already marked `Hit` this tick keep that outcome.
/// Returns how many were flagged.
pub fn check_range(world: &mut World, max_range: f32) -> u32 {
    let mut flagged = 0;
    for (_entity, (projectile, pos)) in world.query_mut::<(&mut Projectile, &Position)>() {
        if projectile.phase == ProjectilePhase::Active && pos.range_from_origin() > max_range {
            projectile.phase = ProjectilePhase::OutOfRange;
            flagged += 1;
        }
    }
    flagged
}

/// Release a projectile's subscription and visual, then despawn it.
///
/// Safe to call more than once: returns `false` and does nothing when the
/// entity is already gone.
pub fn dispose(
    world: &mut World,
    subscriptions: &mut TickSubscriptions,
    entity: Entity,
    events: &mut Vec<SceneEvent>,
) -> bool {
    let handle = {
        let Ok((projectile, visual, ticking)) =
            world.query_one_mut::<(&mut Projectile, &Visual, &mut Ticking)>(entity)
        else {
            return false;
        };
        if projectile.phase == ProjectilePhase::Disposed {
            return false;
        }
        subscriptions.release(ticking);
        projectile.phase = ProjectilePhase::Disposed;
        visual.0
    };

    events.push(SceneEvent::DisposeVisual { handle });
    let _ = world.despawn(entity);
    debug!(?handle, "projectile disposed");
    true
}
