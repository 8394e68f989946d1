//! Scripted stand-in for the XR host.
//!
//! Answers asset requests from a list of reachable sources, reports AR
//! capability, starts the session, then plays: in the shooter it stands at
//! the centre of the target ring and fires at one live target at a time; in
//! the portal experiment it finds a floor hit and taps once.

use std::collections::HashSet;

use glam::{Quat, Vec3};
use tracing::debug;

use rangefire_core::commands::HostCommand;
use rangefire_core::config::GameConfig;
use rangefire_core::enums::{ExperienceMode, GamePhase, LoadStatus};
use rangefire_core::events::SceneEvent;
use rangefire_core::state::FrameSnapshot;
use rangefire_core::types::Pose;

/// Where the scripted player finds the floor in portal mode.
const PORTAL_FLOOR_HIT: Vec3 = Vec3::new(0.0, 0.0, 2.0);

#[derive(Debug, Clone)]
pub struct DemoHost {
    mode: ExperienceMode,
    ar_supported: bool,
    reachable: HashSet<String>,
    /// Centre of the target ring, where the scripted player stands.
    stance: Vec3,
    reported: bool,
    session_requested: bool,
    hit_reported: bool,
}

impl DemoHost {
    /// Every configured source is reachable except those in `unreachable`.
    pub fn new(config: &GameConfig, ar_supported: bool, unreachable: &[String]) -> Self {
        let reachable = config
            .template_sources
            .iter()
            .chain(config.audio.sources.iter())
            .filter(|s| !unreachable.contains(s))
            .cloned()
            .collect();
        Self {
            mode: config.mode,
            ar_supported,
            reachable,
            stance: Vec3::new(0.0, config.targets.height, config.targets.z_offset),
            reported: false,
            session_requested: false,
            hit_reported: false,
        }
    }

    /// React to one snapshot. Returns `None` once there is nothing left to do.
    pub fn observe(&mut self, snapshot: &FrameSnapshot) -> Option<Vec<HostCommand>> {
        let mut commands = Vec::new();

        if !self.reported {
            self.reported = true;
            commands.push(HostCommand::CapabilityReport {
                immersive_ar: self.ar_supported,
            });
            return Some(commands);
        }

        for event in &snapshot.events {
            match event {
                SceneEvent::LoadTemplate { source } => {
                    commands.push(if self.reachable.contains(source) {
                        HostCommand::TemplateLoaded {
                            source: source.clone(),
                        }
                    } else {
                        HostCommand::TemplateFailed {
                            source: source.clone(),
                            reason: "unreachable".into(),
                        }
                    });
                }
                SceneEvent::LoadSound { source, .. } => {
                    commands.push(if self.reachable.contains(source) {
                        HostCommand::SoundLoaded {
                            source: source.clone(),
                        }
                    } else {
                        HostCommand::SoundFailed {
                            source: source.clone(),
                            reason: "unreachable".into(),
                        }
                    });
                }
                _ => {}
            }
        }

        match snapshot.phase {
            GamePhase::Unsupported => return None,
            GamePhase::Ready if !self.session_requested => {
                self.session_requested = true;
                commands.push(HostCommand::SessionStarted);
            }
            GamePhase::Active => match self.mode {
                ExperienceMode::Shooter => {
                    if self.shooter_done(snapshot) {
                        return None;
                    }
                    commands.extend(self.aim_and_fire(snapshot));
                }
                ExperienceMode::Portal => {
                    let placed = snapshot
                        .portal
                        .as_ref()
                        .is_some_and(|p| p.layout.is_some());
                    if placed {
                        return None;
                    }
                    if self.hit_reported {
                        commands.push(HostCommand::PrimaryAction);
                    } else {
                        self.hit_reported = true;
                        commands.push(HostCommand::HitTest {
                            pose: Some(Pose::new(PORTAL_FLOOR_HIT, Quat::IDENTITY)),
                        });
                    }
                }
            },
            _ => {}
        }

        Some(commands)
    }

    /// Every target is gone and the last explosion has faded, or shooting
    /// can never happen.
    fn shooter_done(&self, snapshot: &FrameSnapshot) -> bool {
        let cleared = snapshot.targets.is_empty() && snapshot.effects.is_empty();
        cleared || snapshot.assets.template == LoadStatus::Unavailable
    }

    /// One shot at a time, aimed from the ring centre at the lowest live slot.
    fn aim_and_fire(&self, snapshot: &FrameSnapshot) -> Vec<HostCommand> {
        if snapshot.assets.template != LoadStatus::Ready || !snapshot.projectiles.is_empty() {
            return Vec::new();
        }
        let Some(target) = snapshot.targets.iter().find(|t| !t.doomed) else {
            return Vec::new();
        };
        debug!(target = target.index, "aiming");
        vec![
            HostCommand::CameraMoved {
                position: self.stance,
                forward: target.position - self.stance,
            },
            HostCommand::PrimaryAction,
        ]
    }
}
