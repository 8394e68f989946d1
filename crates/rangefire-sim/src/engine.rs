//! Simulation engine: the core of the range.
//!
//! `SimulationEngine` owns the hecs ECS world, processes host commands,
//! runs all systems, and produces `FrameSnapshot`s. Completely headless
//! (no engine or XR dependency), enabling deterministic testing.

use std::collections::VecDeque;

use glam::Vec3;
use hecs::{Entity, World};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info, warn};

use rangefire_core::commands::HostCommand;
use rangefire_core::components::{Effect, PendingRemoval, Projectile, Target, Visual};
use rangefire_core::config::GameConfig;
use rangefire_core::constants::*;
use rangefire_core::enums::{AlertLevel, ExperienceMode, GamePhase, LoadStatus, ProjectilePhase};
use rangefire_core::events::{Alert, SceneEvent};
use rangefire_core::state::{AssetStatusView, FrameSnapshot, OverlayView};
use rangefire_core::types::{Heading, Position, SimTime, SoundHandle};

use crate::audio::AudioManager;
use crate::loader::FallbackLoader;
use crate::portal::PortalState;
use crate::score::ScoreState;
use crate::subscriptions::TickSubscriptions;
use crate::systems;
use crate::systems::collision::Hit;
use crate::systems::snapshot::FrameContext;

/// Configuration for starting a new simulation.
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// RNG seed for determinism. Same seed = same simulation.
    pub seed: u64,
    /// Initial time scale (1.0 = normal).
    pub time_scale: f64,
    pub game: GameConfig,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            time_scale: 1.0,
            game: GameConfig::default(),
        }
    }
}

/// Last camera pose reported by the host.
#[derive(Debug, Clone, Copy)]
struct CameraState {
    position: Vec3,
    heading: Heading,
}

impl Default for CameraState {
    fn default() -> Self {
        let position = Vec3::from(CAMERA_START_POSITION);
        Self {
            position,
            heading: Heading::from_vector(-position).unwrap_or_default(),
        }
    }
}

/// The simulation engine. Owns the ECS world and all sim state.
pub struct SimulationEngine {
    world: World,
    time: SimTime,
    phase: GamePhase,
    config: GameConfig,
    time_scale: f64,
    rng: ChaCha8Rng,
    subscriptions: TickSubscriptions,
    template: FallbackLoader,
    audio: AudioManager,
    portal: PortalState,
    camera: CameraState,
    arena_ready: bool,
    overlay: OverlayView,
    next_visual: u32,
    next_sound: u32,
    command_queue: VecDeque<HostCommand>,
    despawn_buffer: Vec<Entity>,
    hit_buffer: Vec<Hit>,
    events: Vec<SceneEvent>,
    alerts: Vec<Alert>,
    score: ScoreState,
}

impl SimulationEngine {
    /// Create a new simulation engine with the given config.
    pub fn new(config: SimConfig) -> Self {
        Self {
            world: World::new(),
            time: SimTime::default(),
            phase: GamePhase::default(),
            template: FallbackLoader::new(config.game.template_sources.clone()),
            audio: AudioManager::new(&config.game.audio),
            config: config.game,
            time_scale: config.time_scale,
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            subscriptions: TickSubscriptions::new(),
            portal: PortalState::new(),
            camera: CameraState::default(),
            arena_ready: false,
            overlay: OverlayView::default(),
            next_visual: 0,
            next_sound: 0,
            command_queue: VecDeque::new(),
            despawn_buffer: Vec::new(),
            hit_buffer: Vec::new(),
            events: Vec::new(),
            alerts: Vec::new(),
            score: ScoreState::default(),
        }
    }

    /// Queue a host command for processing at the next tick boundary.
    pub fn queue_command(&mut self, command: HostCommand) {
        self.command_queue.push_back(command);
    }

    /// Queue multiple commands.
    pub fn queue_commands(&mut self, commands: impl IntoIterator<Item = HostCommand>) {
        self.command_queue.extend(commands);
    }

    /// Advance the simulation by one tick and return the resulting snapshot.
    pub fn tick(&mut self) -> FrameSnapshot {
        self.process_commands();

        if self.phase == GamePhase::Active {
            self.run_systems();
            self.time.advance();
        }

        self.build_snapshot()
    }

    /// Release every entity, registration and sound. Returns the scene events
    /// the host must apply to tear its side down.
    pub fn teardown(&mut self) -> Vec<SceneEvent> {
        let mut events = std::mem::take(&mut self.events);

        let projectiles: Vec<Entity> = self
            .world
            .query::<&Projectile>()
            .iter()
            .map(|(entity, _)| entity)
            .collect();
        for entity in projectiles {
            systems::projectile::dispose(
                &mut self.world,
                &mut self.subscriptions,
                entity,
                &mut events,
            );
        }

        let rest: Vec<Entity> = self
            .world
            .query::<&Visual>()
            .iter()
            .map(|(entity, _)| entity)
            .collect();
        for entity in rest {
            systems::cleanup::dispose_visual_entity(&mut self.world, entity, &mut events);
        }

        self.audio.teardown(&mut events);
        self.subscriptions.clear();
        self.template.reset();
        self.portal.reset();
        self.arena_ready = false;
        info!(released = events.len(), "session torn down");
        events
    }

    /// Get the current game phase.
    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    /// Get the configured experience mode.
    pub fn mode(&self) -> ExperienceMode {
        self.config.mode
    }

    /// Get the current simulation time.
    pub fn time(&self) -> SimTime {
        self.time
    }

    /// Get the current time scale.
    pub fn time_scale(&self) -> f64 {
        self.time_scale
    }

    /// Get a read-only reference to the ECS world.
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Get the live tick registrations.
    pub fn subscriptions(&self) -> &TickSubscriptions {
        &self.subscriptions
    }

    /// Get the running score.
    pub fn score(&self) -> &ScoreState {
        &self.score
    }

    /// Get the projectile template load status.
    pub fn template_status(&self) -> LoadStatus {
        self.template.status()
    }

    /// Get the explosion sound load status.
    pub fn sound_status(&self) -> LoadStatus {
        self.audio.status()
    }

    /// Fire a projectile from an explicit position (for tests needing exact kinematics).
    #[cfg(test)]
    pub fn spawn_test_projectile(&mut self, start: Vec3, direction: Vec3) -> Entity {
        let heading = Heading::from_vector(direction).unwrap_or_default();
        systems::projectile::spawn(
            &mut self.world,
            &mut self.subscriptions,
            &mut self.next_visual,
            Position(start),
            heading,
            &self.config.projectile,
            self.time.tick,
            &mut self.events,
        )
    }

    /// Dispose a projectile directly (for idempotence tests).
    #[cfg(test)]
    pub fn dispose_projectile(&mut self, entity: Entity) -> bool {
        systems::projectile::dispose(
            &mut self.world,
            &mut self.subscriptions,
            entity,
            &mut self.events,
        )
    }

    /// Process all queued commands.
    fn process_commands(&mut self) {
        while let Some(command) = self.command_queue.pop_front() {
            self.handle_command(command);
        }
    }

    /// Handle a single host command.
    fn handle_command(&mut self, command: HostCommand) {
        if self.phase == GamePhase::Unsupported {
            return;
        }

        match command {
            HostCommand::CapabilityReport { immersive_ar } => {
                if self.phase != GamePhase::AwaitingCapability {
                    return;
                }
                if immersive_ar {
                    info!(mode = ?self.config.mode, "immersive AR supported");
                    self.phase = GamePhase::Ready;
                    self.overlay = OverlayView {
                        visible: true,
                        message: intro_message(self.config.mode).to_string(),
                    };
                    self.setup_arena();
                } else {
                    warn!("immersive AR not supported; AR features disabled");
                    self.phase = GamePhase::Unsupported;
                    self.overlay = OverlayView {
                        visible: true,
                        message: MESSAGE_AR_UNSUPPORTED.to_string(),
                    };
                    self.alert(AlertLevel::Critical, "AR is not available on this device");
                }
            }
            HostCommand::SessionStarted => {
                if self.phase == GamePhase::Ready {
                    info!("XR session started");
                    self.phase = GamePhase::Active;
                    self.overlay.visible = false;
                }
            }
            HostCommand::SessionEnded => {
                if matches!(self.phase, GamePhase::Active | GamePhase::Paused) {
                    info!("XR session ended");
                    self.phase = GamePhase::Ready;
                    self.overlay.visible = true;
                }
            }
            HostCommand::Pause => {
                if self.phase == GamePhase::Active {
                    self.phase = GamePhase::Paused;
                }
            }
            HostCommand::Resume => {
                if self.phase == GamePhase::Paused {
                    self.phase = GamePhase::Active;
                }
            }
            HostCommand::PrimaryAction => {
                if self.phase != GamePhase::Active {
                    return;
                }
                match self.config.mode {
                    ExperienceMode::Shooter => self.fire(),
                    ExperienceMode::Portal => {
                        if let Some(layout) = self.portal.try_place() {
                            self.events.push(SceneEvent::PortalOpened { layout });
                        }
                    }
                }
            }
            HostCommand::CameraMoved { position, forward } => {
                if position.is_finite() {
                    self.camera.position = position;
                }
                if let Some(heading) = Heading::from_vector(forward) {
                    self.camera.heading = heading;
                }
            }
            HostCommand::HitTest { pose } => {
                self.portal.on_hit_test(pose);
            }
            HostCommand::TemplateLoaded { source } => {
                if self.template.loaded(&source) {
                    info!(%source, "projectile template loaded");
                }
            }
            HostCommand::TemplateFailed { source, reason } => {
                if !self.template.is_pending(&source) {
                    debug!(
                        %source,
                        status = ?self.template.status(),
                        "ignoring stale template failure report"
                    );
                    return;
                }
                warn!(%source, %reason, "projectile template failed to load");
                match self.template.failed(&source) {
                    Some(next) => self.events.push(SceneEvent::LoadTemplate { source: next }),
                    None => {
                        warn!("all projectile template sources failed; shooting disabled");
                        self.alert(
                            AlertLevel::Warning,
                            "Projectile model unavailable; shooting is disabled",
                        );
                    }
                }
            }
            HostCommand::SoundLoaded { source } => {
                self.audio.on_loaded(&source);
            }
            HostCommand::SoundFailed { source, reason } => {
                self.audio.on_failed(&source, &reason, &mut self.events);
            }
        }
    }

    /// One-time arena setup after AR support is confirmed.
    fn setup_arena(&mut self) {
        if self.arena_ready {
            return;
        }
        self.arena_ready = true;

        match self.config.mode {
            ExperienceMode::Shooter => {
                let targets = systems::target_field::spawn_field(
                    &mut self.world,
                    &self.config.targets,
                    &mut self.next_visual,
                    &mut self.events,
                );
                self.score.targets_total = targets.len() as u32;

                match self.template.begin() {
                    Some(source) => self.events.push(SceneEvent::LoadTemplate { source }),
                    None => {
                        warn!("no projectile template sources configured; shooting disabled");
                        self.alert(
                            AlertLevel::Warning,
                            "Projectile model unavailable; shooting is disabled",
                        );
                    }
                }

                let handle = SoundHandle(self.next_sound);
                self.next_sound += 1;
                self.audio.init(handle, &mut self.events);
            }
            ExperienceMode::Portal => {
                self.portal.reset();
            }
        }
    }

    /// Fire from the camera along its forward direction.
    /// A no-op until the projectile template has loaded.
    fn fire(&mut self) {
        if !self.template.is_ready() {
            debug!(status = ?self.template.status(), "template not ready; shot ignored");
            return;
        }
        systems::projectile::spawn(
            &mut self.world,
            &mut self.subscriptions,
            &mut self.next_visual,
            Position(self.camera.position),
            self.camera.heading,
            &self.config.projectile,
            self.time.tick,
            &mut self.events,
        );
        self.score.shots_fired += 1;
    }

    /// Run all systems in order.
    fn run_systems(&mut self) {
        let tick = self.time.tick;

        // 1. Advance subscribed projectiles
        systems::projectile::advance(&mut self.world, &self.subscriptions);
        // 2. Collision detection against live targets (mark)
        systems::collision::detect(&self.world, &mut self.hit_buffer);
        // 3. Hit resolution (sweep)
        self.resolve_hits(tick);
        // 4. Range check (after collision, so a hit wins)
        self.score.misses +=
            systems::projectile::check_range(&mut self.world, self.config.projectile.max_range);
        // 5. Effect timers
        systems::effects::run(&mut self.world, tick, &mut self.despawn_buffer);
        // 6. Cleanup (disposed projectiles, removed targets, expired effects)
        systems::cleanup::run(
            &mut self.world,
            &mut self.subscriptions,
            tick,
            &mut self.events,
            &mut self.despawn_buffer,
        );
    }

    /// Apply this tick's hits: one effect, one target removal and one
    /// projectile disposal per hit.
    fn resolve_hits(&mut self, tick: u64) {
        let hits = std::mem::take(&mut self.hit_buffer);
        let removal_delay = ms_to_ticks(self.config.effects.target_removal_delay_ms);

        for hit in &hits {
            if let Ok(mut projectile) = self.world.get::<&mut Projectile>(hit.projectile) {
                projectile.phase = ProjectilePhase::Hit;
            }

            if let Err(err) = self.world.insert_one(
                hit.target,
                PendingRemoval {
                    remove_at_tick: tick + removal_delay,
                },
            ) {
                warn!(
                    target = hit.target_index,
                    %err,
                    "struck target vanished before removal"
                );
            }

            systems::effects::spawn_explosion(
                &mut self.world,
                &mut self.rng,
                &mut self.next_visual,
                hit.contact,
                &self.config.effects,
                tick,
                &mut self.events,
            );
            self.audio.play_at(hit.contact, &mut self.events);

            self.score.hits += 1;
            info!(target = hit.target_index, contact = ?hit.contact, "target hit");
        }

        self.hit_buffer = hits;
        self.hit_buffer.clear();
    }

    fn alert(&mut self, level: AlertLevel, message: &str) {
        self.alerts.push(Alert {
            level,
            message: message.to_string(),
            tick: self.time.tick,
        });
    }

    fn build_snapshot(&mut self) -> FrameSnapshot {
        let portal = match self.config.mode {
            ExperienceMode::Portal if self.arena_ready => {
                Some(self.portal.status(self.camera.position))
            }
            _ => None,
        };

        let context = FrameContext {
            time: &self.time,
            phase: self.phase,
            mode: self.config.mode,
            portal,
            overlay: self.overlay.clone(),
            assets: AssetStatusView {
                template: self.template.status(),
                template_source: self.template.current_source().map(str::to_string),
                sound: self.audio.status(),
                sound_source: self.audio.source().map(str::to_string),
            },
            score: &self.score,
        };

        let events = std::mem::take(&mut self.events);
        let alerts = std::mem::take(&mut self.alerts);
        systems::snapshot::build_snapshot(&self.world, context, events, alerts)
    }

    /// Number of live targets not yet struck.
    pub fn live_target_count(&self) -> usize {
        self.world
            .query::<(&Target, Option<&PendingRemoval>)>()
            .iter()
            .filter(|(_, (_, pending))| pending.is_none())
            .count()
    }

    /// Number of running effects.
    pub fn effect_count(&self) -> usize {
        self.world.query::<&Effect>().iter().count()
    }
}

fn intro_message(mode: ExperienceMode) -> &'static str {
    match mode {
        ExperienceMode::Shooter => MESSAGE_SHOOTER_INTRO,
        ExperienceMode::Portal => MESSAGE_PORTAL_INTRO,
    }
}
