//! Tests for the simulation engine, projectile lifecycle, collision and effects.

use glam::{Quat, Vec3};

use rangefire_core::commands::HostCommand;
use rangefire_core::components::{Projectile, Target};
use rangefire_core::config::{AudioConfig, GameConfig, TargetFieldConfig};
use rangefire_core::constants::*;
use rangefire_core::enums::*;
use rangefire_core::events::SceneEvent;
use rangefire_core::state::FrameSnapshot;
use rangefire_core::types::{Pose, Position, SoundHandle, VisualHandle};

use crate::audio::AudioManager;
use crate::engine::{SimConfig, SimulationEngine};
use crate::loader::FallbackLoader;
use crate::portal;
use crate::subscriptions::{TickSubscriptions, Ticking};
use crate::systems::{cleanup, target_field};

fn sources(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

/// Engine with AR confirmed, session running, and both assets loaded.
fn active_engine(game: GameConfig) -> SimulationEngine {
    let template = game.template_sources[0].clone();
    let sound = game.audio.sources[0].clone();
    let mut engine = SimulationEngine::new(SimConfig {
        game,
        ..Default::default()
    });
    engine.queue_commands([
        HostCommand::CapabilityReport { immersive_ar: true },
        HostCommand::SessionStarted,
        HostCommand::TemplateLoaded { source: template },
        HostCommand::SoundLoaded { source: sound },
    ]);
    engine.tick();
    assert_eq!(engine.phase(), GamePhase::Active);
    engine
}

/// Run `n` ticks and collect every scene event emitted on the way.
fn run_ticks(engine: &mut SimulationEngine, n: usize) -> Vec<SceneEvent> {
    let mut events = Vec::new();
    for _ in 0..n {
        events.extend(engine.tick().events);
    }
    events
}

fn count_explosions(events: &[SceneEvent]) -> usize {
    events
        .iter()
        .filter(|e| matches!(e, SceneEvent::SpawnExplosion { .. }))
        .count()
}

fn count_disposals(events: &[SceneEvent], handle: VisualHandle) -> usize {
    events
        .iter()
        .filter(|e| matches!(e, SceneEvent::DisposeVisual { handle: h } if *h == handle))
        .count()
}

/// Aim the camera straight down +Z at target 0 and pull the trigger.
fn fire_at_target_zero(engine: &mut SimulationEngine) {
    engine.queue_commands([
        HostCommand::CameraMoved {
            position: Vec3::new(2.0, 1.5, 0.0),
            forward: Vec3::Z,
        },
        HostCommand::PrimaryAction,
    ]);
}

fn projectile_position(engine: &SimulationEngine, entity: hecs::Entity) -> Vec3 {
    engine.world().get::<&Position>(entity).unwrap().0
}

// ---- Target field ----

#[test]
fn test_layout_ten_targets_on_circle() {
    let config = TargetFieldConfig::default();
    let slots = target_field::layout(&config);
    assert_eq!(slots.len(), 10);
    assert!(slots[0].abs_diff_eq(Vec3::new(2.0, 1.5, 5.0), 1e-5));
    assert!(slots[5].abs_diff_eq(Vec3::new(-2.0, 1.5, 5.0), 1e-5));
}

#[test]
fn test_layout_equal_spacing_no_duplicates() {
    let config = TargetFieldConfig::default();
    let slots = target_field::layout(&config);
    let chord = slots[0].distance(slots[1]);
    for i in 0..slots.len() {
        let next = slots[(i + 1) % slots.len()];
        assert!((slots[i].distance(next) - chord).abs() < 1e-4);
        let centre = Vec3::new(0.0, config.height, config.z_offset);
        assert!((slots[i].distance(centre) - config.radius).abs() < 1e-5);
    }
    for i in 0..slots.len() {
        for j in (i + 1)..slots.len() {
            assert!(slots[i].distance(slots[j]) > 0.1, "slots {i} and {j} overlap");
        }
    }
}

#[test]
fn test_layout_zero_targets_is_empty() {
    let config = TargetFieldConfig {
        count: 0,
        ..Default::default()
    };
    assert!(target_field::layout(&config).is_empty());

    let mut engine = active_engine(GameConfig {
        targets: config,
        ..Default::default()
    });
    let snap = engine.tick();
    assert!(snap.targets.is_empty());
    assert_eq!(snap.score.targets_total, 0);
}

#[test]
fn test_arena_spawns_targets_once() {
    let mut engine = SimulationEngine::new(SimConfig::default());
    engine.queue_command(HostCommand::CapabilityReport { immersive_ar: true });
    let snap = engine.tick();
    assert_eq!(engine.phase(), GamePhase::Ready);
    assert_eq!(snap.targets.len(), TARGET_COUNT as usize);
    let spawns = snap
        .events
        .iter()
        .filter(|e| matches!(e, SceneEvent::SpawnTarget { .. }))
        .count();
    assert_eq!(spawns, TARGET_COUNT as usize);
    assert!(snap
        .events
        .iter()
        .any(|e| matches!(e, SceneEvent::LoadTemplate { source } if source == DEFAULT_TEMPLATE_SOURCES[0])));
    assert!(snap
        .events
        .iter()
        .any(|e| matches!(e, SceneEvent::LoadSound { source, .. } if source == DEFAULT_SOUND_SOURCES[0])));

    // A repeated report does not respawn the field.
    engine.queue_command(HostCommand::CapabilityReport { immersive_ar: true });
    let snap = engine.tick();
    assert!(snap.events.is_empty());
    let count = engine.world().query::<&Target>().iter().count();
    assert_eq!(count, TARGET_COUNT as usize);
}

// ---- Projectile kinematics ----

#[test]
fn test_projectile_advances_linearly() {
    let mut engine = active_engine(GameConfig::default());
    let start = Vec3::new(1.0, -3.0, -2.0);
    let direction = Vec3::new(0.0, -1.0, -1.0);
    let entity = engine.spawn_test_projectile(start, direction);

    run_ticks(&mut engine, 7);

    let expected = start + direction.normalize() * PROJECTILE_SPEED * 7.0;
    assert!(projectile_position(&engine, entity).abs_diff_eq(expected, 1e-4));
    let proj = engine.world().get::<&Projectile>(entity).unwrap();
    assert_eq!(proj.phase, ProjectilePhase::Active);
    assert_eq!(proj.ticks_alive, 7);
}

#[test]
fn test_projectile_still_active_after_99_ticks() {
    let mut engine = active_engine(GameConfig::default());
    let entity = engine.spawn_test_projectile(Vec3::ZERO, Vec3::Z);

    run_ticks(&mut engine, 99);

    assert!(engine.world().contains(entity));
    assert!(projectile_position(&engine, entity).abs_diff_eq(Vec3::new(0.0, 0.0, 49.5), 1e-3));
    assert_eq!(engine.score().misses, 0);
}

#[test]
fn test_projectile_disposed_after_101_ticks() {
    let mut engine = active_engine(GameConfig::default());
    let entity = engine.spawn_test_projectile(Vec3::ZERO, Vec3::Z);

    let events = run_ticks(&mut engine, 100);
    assert!(engine.world().contains(entity), "exactly 50.0 is still in range");
    assert!(events.iter().all(|e| !matches!(e, SceneEvent::DisposeVisual { .. })));

    let events = run_ticks(&mut engine, 1);
    assert!(!engine.world().contains(entity));
    assert_eq!(engine.score().misses, 1);
    assert_eq!(engine.score().hits, 0);
    assert_eq!(
        events
            .iter()
            .filter(|e| matches!(e, SceneEvent::DisposeVisual { .. }))
            .count(),
        1
    );
    assert!(engine.subscriptions().is_empty());
}

#[test]
fn test_zero_direction_falls_back_to_forward() {
    let mut engine = active_engine(GameConfig::default());
    let entity = engine.spawn_test_projectile(Vec3::new(10.0, 0.0, 0.0), Vec3::ZERO);
    run_ticks(&mut engine, 2);
    let pos = projectile_position(&engine, entity);
    assert!(pos.is_finite());
    assert!(pos.abs_diff_eq(Vec3::new(10.0, 0.0, 1.0), 1e-5));
}

// ---- Disposal and subscriptions ----

#[test]
fn test_dispose_is_idempotent() {
    let mut engine = active_engine(GameConfig::default());
    let entity = engine.spawn_test_projectile(Vec3::new(0.0, -5.0, 0.0), -Vec3::Y);
    assert_eq!(engine.subscriptions().len(), 1);

    assert!(engine.dispose_projectile(entity));
    assert!(!engine.dispose_projectile(entity));
    assert!(engine.subscriptions().is_empty());

    let snap = engine.tick();
    assert!(snap.projectiles.is_empty());
    assert_eq!(count_disposals(&snap.events, VisualHandle(TARGET_COUNT)), 1);
}

#[test]
fn test_target_dispose_is_idempotent() {
    let mut world = hecs::World::new();
    let mut next_visual = 0;
    let mut events = Vec::new();
    let targets = target_field::spawn_field(
        &mut world,
        &TargetFieldConfig::default(),
        &mut next_visual,
        &mut events,
    );
    events.clear();

    assert!(cleanup::dispose_visual_entity(&mut world, targets[3], &mut events));
    assert!(!cleanup::dispose_visual_entity(&mut world, targets[3], &mut events));
    assert!(!world.contains(targets[3]));
    assert_eq!(events.len(), 1);
    assert_eq!(count_disposals(&events, VisualHandle(3)), 1);
}

#[test]
fn test_subscription_cancel_and_release() {
    let mut subs = TickSubscriptions::new();
    let a = subs.subscribe();
    let b = subs.subscribe();
    assert_ne!(a.id(), b.id());
    assert_eq!(subs.len(), 2);

    assert!(subs.cancel(a));
    assert_eq!(subs.len(), 1);

    let mut ticking = Ticking::new(b);
    assert!(subs.release(&mut ticking));
    assert!(ticking.subscription.is_none());
    assert!(!subs.release(&mut ticking));
    assert!(subs.is_empty());
}

#[test]
fn test_unsubscribed_projectile_does_not_move() {
    let mut engine = active_engine(GameConfig::default());
    let entity = engine.spawn_test_projectile(Vec3::new(0.0, -5.0, 0.0), -Vec3::Y);
    engine.tick();
    let before = projectile_position(&engine, entity);

    // A projectile whose registration is gone is never advanced again.
    engine.dispose_projectile(entity);
    run_ticks(&mut engine, 3);
    assert!(!engine.world().contains(entity));
    assert!(before.abs_diff_eq(Vec3::new(0.0, -5.5, 0.0), 1e-5));
}

// ---- Collision ----

#[test]
fn test_single_hit_produces_one_of_each() {
    let mut engine = active_engine(GameConfig::default());
    fire_at_target_zero(&mut engine);

    // Shot travels 0.5 per tick and reaches z = 5 on its tenth tick.
    let events = run_ticks(&mut engine, 9);
    assert_eq!(engine.score().hits, 0);
    assert_eq!(engine.score().shots_fired, 1);
    assert_eq!(count_explosions(&events), 0);

    let events = run_ticks(&mut engine, 1);
    assert_eq!(engine.score().hits, 1);
    assert_eq!(count_explosions(&events), 1);
    assert_eq!(
        events
            .iter()
            .filter(|e| matches!(e, SceneEvent::SpawnFlash { .. }))
            .count(),
        1
    );
    assert_eq!(
        events
            .iter()
            .filter(|e| matches!(e, SceneEvent::PlaySound { .. }))
            .count(),
        1
    );
    // Projectile handle follows the ten target handles.
    let projectile_handle = VisualHandle(TARGET_COUNT);
    assert_eq!(count_disposals(&events, projectile_handle), 1);
    assert_eq!(engine.live_target_count(), TARGET_COUNT as usize - 1);
    assert_eq!(engine.effect_count(), 2);

    // Target lingers for the grace delay, then goes exactly once.
    let target_handle = VisualHandle(0);
    let removal_ticks = ms_to_ticks(TARGET_REMOVAL_DELAY_MS) as usize;
    let events = run_ticks(&mut engine, removal_ticks - 1);
    assert_eq!(count_disposals(&events, target_handle), 0);
    let snap = engine.tick();
    assert_eq!(count_disposals(&snap.events, target_handle), 1);
    assert_eq!(snap.targets.len(), TARGET_COUNT as usize - 1);
    assert_eq!(snap.score.targets_remaining, TARGET_COUNT - 1);

    let events = run_ticks(&mut engine, 200);
    assert_eq!(count_disposals(&events, target_handle), 0);
    assert_eq!(count_disposals(&events, projectile_handle), 0);
    assert_eq!(count_explosions(&events), 0);
}

#[test]
fn test_struck_target_is_doomed_in_snapshot() {
    let mut engine = active_engine(GameConfig::default());
    fire_at_target_zero(&mut engine);
    run_ticks(&mut engine, 9);
    let snap = engine.tick();
    let target = snap.targets.iter().find(|t| t.index == 0).unwrap();
    assert!(target.doomed);
    assert_eq!(snap.score.targets_remaining, TARGET_COUNT - 1);
}

#[test]
fn test_two_projectiles_one_target() {
    let mut engine = active_engine(GameConfig::default());
    let first = engine.spawn_test_projectile(Vec3::new(2.0, 1.5, 0.0), Vec3::Z);
    let second = engine.spawn_test_projectile(Vec3::new(2.0, 1.5, 0.0), Vec3::Z);

    let events = run_ticks(&mut engine, 10);

    assert_eq!(engine.score().hits, 1);
    assert_eq!(count_explosions(&events), 1);
    let survivors = [first, second]
        .iter()
        .filter(|e| engine.world().contains(**e))
        .count();
    assert_eq!(survivors, 1, "only one projectile may claim the target");

    // The loser flies on past the doomed target without a second hit.
    let events = run_ticks(&mut engine, 20);
    assert_eq!(count_explosions(&events), 0);
    assert_eq!(engine.score().hits, 1);
}

#[test]
fn test_hit_takes_precedence_over_range() {
    let mut game = GameConfig::default();
    game.projectile.max_range = 5.5;
    let mut engine = active_engine(game);

    // One step lands exactly on target 0, which is also beyond max range.
    let entity = engine.spawn_test_projectile(Vec3::new(2.0, 1.5, 4.5), Vec3::Z);
    let events = run_ticks(&mut engine, 1);

    assert!(!engine.world().contains(entity));
    assert_eq!(engine.score().hits, 1);
    assert_eq!(engine.score().misses, 0);
    assert_eq!(count_explosions(&events), 1);
}

#[test]
fn test_near_miss_outside_combined_radius() {
    let mut engine = active_engine(GameConfig::default());
    // Passes 0.4 from target 0's centre; combined radius is 0.35.
    engine.spawn_test_projectile(Vec3::new(2.4, 1.5, 0.0), Vec3::Z);
    let events = run_ticks(&mut engine, 20);
    assert_eq!(engine.score().hits, 0);
    assert_eq!(count_explosions(&events), 0);
}

// ---- Effects ----

#[test]
fn test_effects_self_terminate() {
    let mut engine = active_engine(GameConfig::default());
    fire_at_target_zero(&mut engine);
    run_ticks(&mut engine, 10);
    assert_eq!(engine.effect_count(), 2);

    let flash_ticks = ms_to_ticks(FLASH_TTL_MS) as usize;
    let explosion_ticks = ms_to_ticks(EXPLOSION_TTL_MS) as usize;

    run_ticks(&mut engine, flash_ticks - 1);
    assert_eq!(engine.effect_count(), 2);
    run_ticks(&mut engine, 1);
    assert_eq!(engine.effect_count(), 1, "flash expires first");

    run_ticks(&mut engine, explosion_ticks - flash_ticks - 1);
    assert_eq!(engine.effect_count(), 1);
    let snap = engine.tick();
    assert_eq!(engine.effect_count(), 0);
    assert!(snap.effects.is_empty());
    assert!(snap.targets.iter().all(|t| t.index != 0));
}

#[test]
fn test_effect_envelope_in_snapshot() {
    let mut engine = active_engine(GameConfig::default());
    fire_at_target_zero(&mut engine);
    run_ticks(&mut engine, 10);

    let snap = engine.tick();
    let explosion = snap
        .effects
        .iter()
        .find(|e| e.kind == EffectKind::Explosion)
        .unwrap();
    assert!(explosion.intensity > 0.0 && explosion.intensity <= 1.0);
    let flash = snap
        .effects
        .iter()
        .find(|e| e.kind == EffectKind::Flash)
        .unwrap();
    assert!(flash.scale > FLASH_SCALE_START && flash.scale < FLASH_SCALE_END);
    assert!(explosion.remaining_ticks > flash.remaining_ticks);
}

#[test]
fn test_camera_shake_on_hit() {
    let mut engine = active_engine(GameConfig::default());
    fire_at_target_zero(&mut engine);
    let events = run_ticks(&mut engine, 10);
    assert!(events.iter().any(|e| matches!(
        e,
        SceneEvent::CameraShake { duration_ms, .. } if *duration_ms == CAMERA_SHAKE_DURATION_MS
    )));
}

#[test]
fn test_explosion_burst_size() {
    let mut engine = active_engine(GameConfig::default());
    fire_at_target_zero(&mut engine);
    let events = run_ticks(&mut engine, 10);
    let burst = events
        .iter()
        .find_map(|e| match e {
            SceneEvent::SpawnExplosion { burst, .. } => Some(burst.clone()),
            _ => None,
        })
        .unwrap();
    assert_eq!(burst.particles.len(), EXPLOSION_PARTICLE_COUNT as usize);
    for p in &burst.particles {
        assert!(p.emit_power >= PARTICLE_MIN_EMIT_POWER && p.emit_power <= PARTICLE_MAX_EMIT_POWER);
        assert!(p.size >= PARTICLE_MIN_SIZE && p.size <= PARTICLE_MAX_SIZE);
    }
}

// ---- Asset loading ----

#[test]
fn test_fallback_loader_walks_sources() {
    let mut loader = FallbackLoader::new(sources(&["a", "b"]));
    assert_eq!(loader.status(), LoadStatus::Idle);
    assert_eq!(loader.begin().as_deref(), Some("a"));
    assert_eq!(loader.begin(), None, "begin only once");
    assert_eq!(loader.status(), LoadStatus::Loading);

    assert_eq!(loader.failed("b"), None, "stale report ignored");
    assert_eq!(loader.current_source(), Some("a"));

    assert_eq!(loader.failed("a").as_deref(), Some("b"));
    assert!(!loader.loaded("a"));
    assert!(loader.loaded("b"));
    assert!(loader.is_ready());
    assert_eq!(loader.current_source(), Some("b"));
}

#[test]
fn test_fallback_loader_exhausted() {
    let mut loader = FallbackLoader::new(sources(&["a"]));
    loader.begin();
    assert_eq!(loader.failed("a"), None);
    assert_eq!(loader.status(), LoadStatus::Unavailable);
    assert_eq!(loader.current_source(), None);
    assert!(!loader.loaded("a"));

    let mut empty = FallbackLoader::new(Vec::new());
    assert_eq!(empty.begin(), None);
    assert_eq!(empty.status(), LoadStatus::Unavailable);
}

#[test]
fn test_audio_manager_lifecycle() {
    let config = AudioConfig {
        sources: sources(&["boom.mp3", "boom.wav"]),
        ..Default::default()
    };
    let mut audio = AudioManager::new(&config);
    let mut events = Vec::new();

    assert!(!audio.play_at(Vec3::ZERO, &mut events), "nothing to play before init");

    audio.init(SoundHandle(3), &mut events);
    assert!(matches!(
        &events[..],
        [SceneEvent::LoadSound { handle: SoundHandle(3), source }] if source == "boom.mp3"
    ));
    audio.init(SoundHandle(4), &mut events);
    assert_eq!(events.len(), 1, "init runs once");

    events.clear();
    audio.on_failed("boom.mp3", "404", &mut events);
    assert!(matches!(
        &events[..],
        [SceneEvent::LoadSound { source, .. }] if source == "boom.wav"
    ));
    assert!(!audio.play_at(Vec3::ZERO, &mut events));

    assert!(audio.on_loaded("boom.wav"));
    events.clear();
    assert!(audio.play_at(Vec3::new(1.0, 2.0, 3.0), &mut events));
    assert!(matches!(
        &events[..],
        [SceneEvent::PlaySound { volume, spatial: true, .. }] if *volume == SOUND_VOLUME
    ));

    events.clear();
    audio.teardown(&mut events);
    assert!(matches!(&events[..], [SceneEvent::DisposeSound { handle: SoundHandle(3) }]));
    assert_eq!(audio.handle(), None);
    assert_eq!(audio.status(), LoadStatus::Idle);

    events.clear();
    audio.teardown(&mut events);
    assert!(events.is_empty(), "second teardown is a no-op");
}

#[test]
fn test_silent_hit_when_sound_unavailable() {
    let game = GameConfig::default();
    let template = game.template_sources[0].clone();
    let mut engine = SimulationEngine::new(SimConfig {
        game: game.clone(),
        ..Default::default()
    });
    engine.queue_commands([
        HostCommand::CapabilityReport { immersive_ar: true },
        HostCommand::SessionStarted,
        HostCommand::TemplateLoaded { source: template },
    ]);
    engine.tick();
    for source in &game.audio.sources {
        engine.queue_command(HostCommand::SoundFailed {
            source: source.clone(),
            reason: "unreachable".into(),
        });
        engine.tick();
    }
    assert_eq!(engine.sound_status(), LoadStatus::Unavailable);

    fire_at_target_zero(&mut engine);
    let events = run_ticks(&mut engine, 10);
    assert_eq!(engine.score().hits, 1);
    assert!(events.iter().all(|e| !matches!(e, SceneEvent::PlaySound { .. })));
}

#[test]
fn test_template_unavailable_disables_shooting() {
    let mut engine = SimulationEngine::new(SimConfig::default());
    engine.queue_command(HostCommand::CapabilityReport { immersive_ar: true });
    engine.tick();

    engine.queue_command(HostCommand::TemplateFailed {
        source: DEFAULT_TEMPLATE_SOURCES[0].into(),
        reason: "404".into(),
    });
    let snap = engine.tick();
    assert!(snap.events.iter().any(
        |e| matches!(e, SceneEvent::LoadTemplate { source } if source == DEFAULT_TEMPLATE_SOURCES[1])
    ));

    engine.queue_command(HostCommand::TemplateFailed {
        source: DEFAULT_TEMPLATE_SOURCES[1].into(),
        reason: "404".into(),
    });
    let snap = engine.tick();
    assert_eq!(snap.assets.template, LoadStatus::Unavailable);
    assert!(snap.alerts.iter().any(|a| a.level == AlertLevel::Warning));

    engine.queue_commands([HostCommand::SessionStarted, HostCommand::PrimaryAction]);
    let snap = engine.tick();
    assert!(snap.projectiles.is_empty());
    assert_eq!(engine.score().shots_fired, 0);
    assert!(snap
        .events
        .iter()
        .all(|e| !matches!(e, SceneEvent::CloneTemplate { .. })));
}

#[test]
fn test_late_template_failure_after_load_is_ignored() {
    let mut engine = active_engine(GameConfig::default());
    assert_eq!(engine.template_status(), LoadStatus::Ready);

    engine.queue_commands([
        HostCommand::TemplateFailed {
            source: DEFAULT_TEMPLATE_SOURCES[0].into(),
            reason: "duplicate report".into(),
        },
        HostCommand::TemplateFailed {
            source: DEFAULT_TEMPLATE_SOURCES[1].into(),
            reason: "never requested".into(),
        },
    ]);
    let snap = engine.tick();
    assert!(snap.alerts.is_empty());
    assert_eq!(snap.assets.template, LoadStatus::Ready);
    assert!(snap
        .events
        .iter()
        .all(|e| !matches!(e, SceneEvent::LoadTemplate { .. })));

    fire_at_target_zero(&mut engine);
    run_ticks(&mut engine, 10);
    assert_eq!(engine.score().shots_fired, 1);
    assert_eq!(engine.score().hits, 1);
}

#[test]
fn test_stale_template_failure_while_loading_is_ignored() {
    let mut engine = SimulationEngine::new(SimConfig::default());
    engine.queue_command(HostCommand::CapabilityReport { immersive_ar: true });
    engine.tick();

    engine.queue_command(HostCommand::TemplateFailed {
        source: DEFAULT_TEMPLATE_SOURCES[1].into(),
        reason: "404".into(),
    });
    let snap = engine.tick();
    assert!(snap.alerts.is_empty());
    assert_eq!(snap.assets.template, LoadStatus::Loading);
    assert_eq!(
        snap.assets.template_source.as_deref(),
        Some(DEFAULT_TEMPLATE_SOURCES[0])
    );
}

#[test]
fn test_shooting_waits_for_template() {
    let mut engine = SimulationEngine::new(SimConfig::default());
    engine.queue_commands([
        HostCommand::CapabilityReport { immersive_ar: true },
        HostCommand::SessionStarted,
        HostCommand::PrimaryAction,
    ]);
    let snap = engine.tick();
    assert_eq!(snap.assets.template, LoadStatus::Loading);
    assert!(snap.projectiles.is_empty());

    engine.queue_commands([
        HostCommand::TemplateLoaded {
            source: DEFAULT_TEMPLATE_SOURCES[0].into(),
        },
        HostCommand::PrimaryAction,
    ]);
    let snap = engine.tick();
    assert_eq!(snap.projectiles.len(), 1);
    assert!(snap
        .events
        .iter()
        .any(|e| matches!(e, SceneEvent::CloneTemplate { .. })));
}

// ---- Session phases ----

#[test]
fn test_ar_unsupported() {
    let mut engine = SimulationEngine::new(SimConfig::default());
    engine.queue_command(HostCommand::CapabilityReport {
        immersive_ar: false,
    });
    let snap = engine.tick();

    assert_eq!(snap.phase, GamePhase::Unsupported);
    assert!(snap.overlay.visible);
    assert_eq!(snap.overlay.message, MESSAGE_AR_UNSUPPORTED);
    assert!(snap.alerts.iter().any(|a| a.level == AlertLevel::Critical));
    assert!(snap.targets.is_empty());
    assert!(snap.events.is_empty());

    engine.queue_commands([
        HostCommand::CapabilityReport { immersive_ar: true },
        HostCommand::SessionStarted,
        HostCommand::PrimaryAction,
    ]);
    let snap = engine.tick();
    assert_eq!(snap.phase, GamePhase::Unsupported);
    assert!(snap.targets.is_empty());
}

#[test]
fn test_session_start_hides_overlay() {
    let mut engine = SimulationEngine::new(SimConfig::default());
    engine.queue_command(HostCommand::CapabilityReport { immersive_ar: true });
    let snap = engine.tick();
    assert!(snap.overlay.visible);
    assert_eq!(snap.overlay.message, MESSAGE_SHOOTER_INTRO);

    engine.queue_command(HostCommand::SessionStarted);
    let snap = engine.tick();
    assert_eq!(snap.phase, GamePhase::Active);
    assert!(!snap.overlay.visible);

    engine.queue_command(HostCommand::SessionEnded);
    let snap = engine.tick();
    assert_eq!(snap.phase, GamePhase::Ready);
    assert!(snap.overlay.visible);
}

#[test]
fn test_session_end_returns_to_ready() {
    let mut engine = active_engine(GameConfig::default());
    let entity = engine.spawn_test_projectile(Vec3::new(0.0, -5.0, 0.0), -Vec3::Y);
    engine.tick();
    let tick = engine.time().tick;
    let before = projectile_position(&engine, entity);

    engine.queue_command(HostCommand::SessionEnded);
    let snap = engine.tick();
    assert_eq!(snap.phase, GamePhase::Ready);
    assert!(snap.overlay.visible);
    assert_eq!(snap.overlay.message, MESSAGE_SHOOTER_INTRO);

    run_ticks(&mut engine, 10);
    assert_eq!(engine.time().tick, tick);
    assert_eq!(projectile_position(&engine, entity), before);

    engine.queue_command(HostCommand::PrimaryAction);
    let snap = engine.tick();
    assert_eq!(snap.projectiles.len(), 1, "no firing outside the session");

    // A paused session ends the same way.
    engine.queue_commands([HostCommand::SessionStarted, HostCommand::Pause]);
    let snap = engine.tick();
    assert_eq!(snap.phase, GamePhase::Paused);
    assert!(!snap.overlay.visible);
    engine.queue_command(HostCommand::SessionEnded);
    let snap = engine.tick();
    assert_eq!(snap.phase, GamePhase::Ready);
    assert!(snap.overlay.visible);
}

#[test]
fn test_no_ticks_before_session() {
    let mut engine = SimulationEngine::new(SimConfig::default());
    for _ in 0..10 {
        engine.tick();
    }
    assert_eq!(engine.time().tick, 0);
    assert_eq!(engine.phase(), GamePhase::AwaitingCapability);
}

#[test]
fn test_pause_freezes_simulation() {
    let mut engine = active_engine(GameConfig::default());
    let entity = engine.spawn_test_projectile(Vec3::new(0.0, -5.0, 0.0), -Vec3::Y);
    engine.tick();
    let tick = engine.time().tick;
    let before = projectile_position(&engine, entity);

    engine.queue_command(HostCommand::Pause);
    run_ticks(&mut engine, 10);
    assert_eq!(engine.phase(), GamePhase::Paused);
    assert_eq!(engine.time().tick, tick);
    assert_eq!(projectile_position(&engine, entity), before);

    engine.queue_command(HostCommand::PrimaryAction);
    let snap = engine.tick();
    assert_eq!(snap.projectiles.len(), 1, "no firing while paused");

    engine.queue_command(HostCommand::Resume);
    engine.tick();
    assert_eq!(engine.time().tick, tick + 1);
}

#[test]
fn test_teardown_releases_everything() {
    let mut engine = active_engine(GameConfig::default());
    engine.spawn_test_projectile(Vec3::new(0.0, -5.0, 0.0), -Vec3::Y);
    fire_at_target_zero(&mut engine);
    run_ticks(&mut engine, 10);

    let events = engine.teardown();
    let disposed = events
        .iter()
        .filter(|e| matches!(e, SceneEvent::DisposeVisual { .. }))
        .count();
    // Nine targets, the struck target, one projectile, explosion and flash.
    assert_eq!(disposed, TARGET_COUNT as usize + 3);
    assert!(events
        .iter()
        .any(|e| matches!(e, SceneEvent::DisposeSound { .. })));
    assert_eq!(engine.world().len(), 0);
    assert!(engine.subscriptions().is_empty());
}

// ---- Portal ----

#[test]
fn test_portal_layout_offsets() {
    let anchor = Vec3::new(1.0, 0.0, 2.0);
    let layout = portal::build_layout(anchor);
    assert!(layout
        .scene_root
        .abs_diff_eq(anchor + Vec3::new(29.0, -1.0, -11.0), 1e-5));
    assert!(layout
        .occluder_root
        .abs_diff_eq(anchor + Vec3::new(0.0, 1.0, 0.0), 1e-5));
    assert!(layout
        .pillar_root
        .abs_diff_eq(anchor + Vec3::new(-0.5, 1.0, 0.05), 1e-5));
    assert_eq!(layout.panels.len(), 5);
    let back = layout.panels.iter().find(|p| p.name == "back").unwrap();
    assert!(back.offset.abs_diff_eq(Vec3::new(0.0, 7.0, 2.0), 1e-5));
    let right = layout
        .pillars
        .iter()
        .find(|p| p.name == "pillar_right")
        .unwrap();
    assert_eq!(right.offset, Vec3::X);
    assert_eq!(layout.neon, PORTAL_NEON);
}

#[test]
fn test_portal_placement_and_visibility() {
    let game = GameConfig {
        mode: ExperienceMode::Portal,
        ..Default::default()
    };
    let mut engine = SimulationEngine::new(SimConfig {
        game,
        ..Default::default()
    });
    engine.queue_commands([
        HostCommand::CapabilityReport { immersive_ar: true },
        HostCommand::SessionStarted,
    ]);
    let snap = engine.tick();
    assert!(snap.targets.is_empty());
    let status = snap.portal.unwrap();
    assert!(!status.marker_visible);
    assert!(status.layout.is_none());

    // No hit pose yet: tapping does nothing.
    engine.queue_command(HostCommand::PrimaryAction);
    let snap = engine.tick();
    assert!(snap.events.is_empty());

    let pose = Pose::new(Vec3::ZERO, Quat::IDENTITY);
    engine.queue_command(HostCommand::HitTest { pose: Some(pose) });
    let snap = engine.tick();
    let status = snap.portal.unwrap();
    assert!(status.marker_visible);
    assert_eq!(status.marker, Some(pose));

    engine.queue_command(HostCommand::PrimaryAction);
    let snap = engine.tick();
    assert_eq!(
        snap.events
            .iter()
            .filter(|e| matches!(e, SceneEvent::PortalOpened { .. }))
            .count(),
        1
    );
    let status = snap.portal.unwrap();
    assert!(!status.marker_visible);
    assert!(!status.viewer_inside, "camera starts in front of the portal");
    assert!(status.front_occluders_visible);
    assert!(!status.reverse_occluder_visible);

    engine.queue_commands([
        HostCommand::CameraMoved {
            position: Vec3::new(0.0, 1.0, 1.0),
            forward: Vec3::Z,
        },
        HostCommand::PrimaryAction,
    ]);
    let snap = engine.tick();
    assert!(snap.events.is_empty(), "portal is placed only once");
    let status = snap.portal.unwrap();
    assert!(status.viewer_inside);
    assert!(!status.front_occluders_visible);
    assert!(status.reverse_occluder_visible);
}

#[test]
fn test_shooter_snapshot_has_no_portal() {
    let mut engine = active_engine(GameConfig::default());
    let snap = engine.tick();
    assert!(snap.portal.is_none());
    assert_eq!(snap.mode, ExperienceMode::Shooter);
}

// ---- Determinism ----

fn scripted_run(seed: u64) -> Vec<String> {
    let mut engine = SimulationEngine::new(SimConfig {
        seed,
        ..Default::default()
    });
    engine.queue_commands([
        HostCommand::CapabilityReport { immersive_ar: true },
        HostCommand::SessionStarted,
        HostCommand::TemplateLoaded {
            source: DEFAULT_TEMPLATE_SOURCES[0].into(),
        },
        HostCommand::SoundLoaded {
            source: DEFAULT_SOUND_SOURCES[0].into(),
        },
    ]);
    fire_at_target_zero(&mut engine);
    (0..60)
        .map(|_| {
            let snap: FrameSnapshot = engine.tick();
            serde_json::to_string(&snap).unwrap()
        })
        .collect()
}

#[test]
fn test_determinism_same_seed() {
    assert_eq!(scripted_run(12345), scripted_run(12345));
}

#[test]
fn test_determinism_different_seeds() {
    let a = scripted_run(111);
    let b = scripted_run(222);
    assert_ne!(a, b, "explosion bursts should differ between seeds");
}
