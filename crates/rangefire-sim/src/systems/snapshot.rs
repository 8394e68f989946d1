//! Snapshot system: queries the ECS world and builds a complete FrameSnapshot.
//!
//! This system is read-only; it never modifies the world.

use hecs::World;

use rangefire_core::components::*;
use rangefire_core::enums::*;
use rangefire_core::events::{Alert, SceneEvent};
use rangefire_core::state::*;
use rangefire_core::types::{Heading, Position, SimTime};

use crate::score::ScoreState;
use crate::systems::effects;

/// Session-level state the snapshot needs besides the world.
pub struct FrameContext<'a> {
    pub time: &'a SimTime,
    pub phase: GamePhase,
    pub mode: ExperienceMode,
    pub portal: Option<PortalStatusView>,
    pub overlay: OverlayView,
    pub assets: AssetStatusView,
    pub score: &'a ScoreState,
}

/// Build a complete FrameSnapshot from the current world state.
pub fn build_snapshot(
    world: &World,
    context: FrameContext<'_>,
    events: Vec<SceneEvent>,
    alerts: Vec<Alert>,
) -> FrameSnapshot {
    let targets = build_targets(world);
    let targets_remaining = targets.iter().filter(|t| !t.doomed).count() as u32;
    let score = context.score;

    FrameSnapshot {
        time: *context.time,
        phase: context.phase,
        mode: context.mode,
        targets,
        projectiles: build_projectiles(world),
        effects: build_effects(world, context.time.tick),
        portal: context.portal,
        overlay: context.overlay,
        assets: context.assets,
        score: ScoreView {
            shots_fired: score.shots_fired,
            hits: score.hits,
            misses: score.misses,
            targets_total: score.targets_total,
            targets_remaining,
        },
        events,
        alerts,
    }
}

/// Build TargetView list, in slot order.
fn build_targets(world: &World) -> Vec<TargetView> {
    let mut targets: Vec<TargetView> = world
        .query::<(&Target, &Position, &Visual, Option<&PendingRemoval>)>()
        .iter()
        .map(|(_entity, (target, pos, visual, pending))| TargetView {
            handle: visual.0,
            index: target.index,
            position: pos.0,
            doomed: pending.is_some(),
        })
        .collect();
    targets.sort_by_key(|t| t.index);
    targets
}

/// Build ProjectileView list, oldest first.
fn build_projectiles(world: &World) -> Vec<ProjectileView> {
    let mut projectiles: Vec<ProjectileView> = world
        .query::<(&Projectile, &Position, &Heading, &Visual)>()
        .iter()
        .map(|(_entity, (proj, pos, heading, visual))| ProjectileView {
            handle: visual.0,
            position: pos.0,
            forward: heading.vector(),
            phase: proj.phase,
        })
        .collect();
    projectiles.sort_by_key(|p| p.handle);
    projectiles
}

/// Build EffectView list with this frame's envelope values.
fn build_effects(world: &World, tick: u64) -> Vec<EffectView> {
    let mut views: Vec<EffectView> = world
        .query::<(&Effect, &Position, &Visual)>()
        .iter()
        .map(|(_entity, (effect, pos, visual))| {
            let age = tick.saturating_sub(effect.spawned_tick);
            let span = effect.expires_at_tick - effect.spawned_tick;
            EffectView {
                handle: visual.0,
                kind: effect.kind,
                position: pos.0,
                intensity: effect.curve.intensity(age),
                scale: match effect.kind {
                    EffectKind::Flash => effects::flash_scale(age, span),
                    EffectKind::Explosion => 1.0,
                },
                remaining_ticks: effect.expires_at_tick.saturating_sub(tick),
            }
        })
        .collect();
    views.sort_by_key(|e| e.handle);
    views
}
