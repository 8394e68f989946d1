//! Frame snapshot: the complete visible state handed to the host each tick.

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::events::{Alert, SceneEvent};
use crate::types::{Color, Pose, SimTime, VisualHandle};

/// Complete simulation state published after each tick.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FrameSnapshot {
    pub time: SimTime,
    pub phase: GamePhase,
    pub mode: ExperienceMode,
    pub targets: Vec<TargetView>,
    pub projectiles: Vec<ProjectileView>,
    pub effects: Vec<EffectView>,
    pub portal: Option<PortalStatusView>,
    pub overlay: OverlayView,
    pub assets: AssetStatusView,
    pub score: ScoreView,
    pub events: Vec<SceneEvent>,
    pub alerts: Vec<Alert>,
}

/// A live target.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetView {
    pub handle: VisualHandle,
    pub index: u32,
    pub position: Vec3,
    /// Struck and waiting for removal.
    pub doomed: bool,
}

/// A live projectile, for the host to move its clone.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectileView {
    pub handle: VisualHandle,
    pub position: Vec3,
    pub forward: Vec3,
    pub phase: ProjectilePhase,
}

/// A running effect with its animation state for this frame.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EffectView {
    pub handle: VisualHandle,
    pub kind: EffectKind,
    pub position: Vec3,
    /// Envelope intensity in `0.0..=1.0`.
    pub intensity: f32,
    /// Flash sphere scale (1.0 for explosions).
    pub scale: f32,
    pub remaining_ticks: u64,
}

/// The message panel shown outside the XR session.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OverlayView {
    pub visible: bool,
    pub message: String,
}

/// Load state of the fallback-loaded assets.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AssetStatusView {
    pub template: LoadStatus,
    pub template_source: Option<String>,
    pub sound: LoadStatus,
    pub sound_source: Option<String>,
}

/// Running score.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScoreView {
    pub shots_fired: u32,
    pub hits: u32,
    pub misses: u32,
    pub targets_total: u32,
    pub targets_remaining: u32,
}

/// Portal experiment state for this frame.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PortalStatusView {
    pub marker_visible: bool,
    pub marker: Option<Pose>,
    pub layout: Option<PortalView>,
    /// Camera has walked through the portal plane.
    pub viewer_inside: bool,
    /// Front occluder and the five panels.
    pub front_occluders_visible: bool,
    pub reverse_occluder_visible: bool,
}

/// World placement of an opened portal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortalView {
    pub anchor: Vec3,
    pub scene_root: Vec3,
    pub occluder_root: Vec3,
    pub occluder_rotation: Quat,
    pub panels: Vec<OccluderPanelView>,
    pub pillar_root: Vec3,
    pub pillars: Vec<PillarView>,
    pub neon: Color,
}

/// One occluder panel, relative to the occluder root.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OccluderPanelView {
    pub name: String,
    pub offset: Vec3,
    pub rotation: Quat,
    pub size: f32,
}

/// One frame pillar, relative to the pillar root.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PillarView {
    pub name: String,
    pub offset: Vec3,
    pub rotation: Quat,
    pub height: f32,
    pub particle_snippet: String,
}
