//! AR portal experiment.
//!
//! A hit-test marker follows the floor until the player taps; the tap anchors
//! a portal frame, a box of occluder panels, and a virtual scene behind it.
//! Each frame the occluders flip depending on which side of the portal plane
//! the camera is on.

use std::f32::consts::FRAC_PI_2;

use glam::{Quat, Vec3};
use tracing::info;

use rangefire_core::constants::*;
use rangefire_core::state::{OccluderPanelView, PillarView, PortalStatusView, PortalView};
use rangefire_core::types::Pose;

#[derive(Debug, Clone, Default)]
pub struct PortalState {
    hit: Option<Pose>,
    layout: Option<PortalView>,
}

impl PortalState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_placed(&self) -> bool {
        self.layout.is_some()
    }

    pub fn layout(&self) -> Option<&PortalView> {
        self.layout.as_ref()
    }

    /// Record the latest hit-test result.
    pub fn on_hit_test(&mut self, pose: Option<Pose>) {
        self.hit = pose;
    }

    /// Anchor the portal at the current hit pose. Only the first placement
    /// counts; without a hit pose nothing happens.
    pub fn try_place(&mut self) -> Option<PortalView> {
        if self.layout.is_some() {
            return None;
        }
        let hit = self.hit?;
        let layout = build_layout(hit.position);
        info!(anchor = ?hit.position, "portal opened");
        self.layout = Some(layout.clone());
        Some(layout)
    }

    /// Marker and occluder visibility for a camera at `camera`.
    pub fn status(&self, camera: Vec3) -> PortalStatusView {
        let marker_visible = self.layout.is_none() && self.hit.is_some();
        let viewer_inside = self
            .layout
            .as_ref()
            .is_some_and(|layout| camera.z > layout.anchor.z);
        let placed = self.layout.is_some();

        PortalStatusView {
            marker_visible,
            marker: if marker_visible { self.hit } else { None },
            layout: self.layout.clone(),
            viewer_inside,
            front_occluders_visible: placed && !viewer_inside,
            reverse_occluder_visible: placed && viewer_inside,
        }
    }

    pub fn reset(&mut self) {
        self.hit = None;
        self.layout = None;
    }
}

/// Compute every root, panel and pillar placement for a portal at `anchor`.
pub fn build_layout(anchor: Vec3) -> PortalView {
    let tilt = Quat::from_axis_angle(-Vec3::X, FRAC_PI_2);
    let occluder_root = anchor
        + Vec3::Y * PORTAL_OCCLUDER_RISE
        + local_offset(tilt, Vec3::Z, PORTAL_OCCLUDER_PUSH);

    PortalView {
        anchor,
        scene_root: anchor + Vec3::from(PORTAL_SCENE_OFFSET),
        occluder_root,
        occluder_rotation: tilt,
        panels: occluder_panels(),
        pillar_root: anchor + Vec3::from(PORTAL_PILLAR_OFFSET),
        pillars: pillars(),
        neon: PORTAL_NEON,
    }
}

/// Displacement of `distance` along `axis` expressed in a frame rotated by `rotation`.
fn local_offset(rotation: Quat, axis: Vec3, distance: f32) -> Vec3 {
    rotation * (axis * distance)
}

fn occluder_panels() -> Vec<OccluderPanelView> {
    let flat = Quat::from_axis_angle(-Vec3::X, FRAC_PI_2);
    let upright = Quat::from_axis_angle(Vec3::Z, FRAC_PI_2);

    let panel = |name: &str, rotation: Quat, steps: &[(Vec3, f32)]| OccluderPanelView {
        name: name.to_string(),
        offset: steps
            .iter()
            .map(|&(axis, distance)| local_offset(rotation, axis, distance))
            .sum(),
        rotation,
        size: PORTAL_PANEL_SIZE,
    };

    vec![
        panel("floor", flat, &[(Vec3::Y, 1.0), (Vec3::Z, 3.5)]),
        panel("top", flat, &[(Vec3::Y, -2.0), (Vec3::Z, 3.5)]),
        panel("back", Quat::IDENTITY, &[(Vec3::Y, 7.0), (Vec3::Z, 2.0)]),
        panel("right", upright, &[(Vec3::Y, -3.4), (Vec3::X, 3.5)]),
        panel("left", upright, &[(Vec3::Y, 3.4), (Vec3::X, 3.5)]),
    ]
}

fn pillars() -> Vec<PillarView> {
    let lintel = Quat::from_axis_angle(Vec3::Z, FRAC_PI_2);
    vec![
        PillarView {
            name: "pillar_left".into(),
            offset: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            height: 2.0,
            particle_snippet: PORTAL_SIDE_SNIPPET.into(),
        },
        PillarView {
            name: "pillar_right".into(),
            offset: Vec3::X,
            rotation: Quat::IDENTITY,
            height: 2.0,
            particle_snippet: PORTAL_SIDE_SNIPPET.into(),
        },
        PillarView {
            name: "lintel".into(),
            offset: local_offset(lintel, Vec3::Y, 1.0) + local_offset(lintel, Vec3::Y, -0.5),
            rotation: lintel,
            height: 1.1,
            particle_snippet: PORTAL_LINTEL_SNIPPET.into(),
        },
    ]
}
