//! Explosion sound ownership.
//!
//! The engine owns one `AudioManager` per session. `init` requests the first
//! source, load reports walk the fallback list, and `teardown` releases the
//! host sound. Playback before the sound is ready is silently skipped.

use glam::Vec3;
use tracing::{debug, info, warn};

use rangefire_core::config::AudioConfig;
use rangefire_core::enums::LoadStatus;
use rangefire_core::events::SceneEvent;
use rangefire_core::types::SoundHandle;

use crate::loader::FallbackLoader;

#[derive(Debug, Clone)]
pub struct AudioManager {
    loader: FallbackLoader,
    handle: Option<SoundHandle>,
    volume: f32,
    max_distance: f32,
    spatial: bool,
}

impl AudioManager {
    pub fn new(config: &AudioConfig) -> Self {
        Self {
            loader: FallbackLoader::new(config.sources.clone()),
            handle: None,
            volume: config.volume,
            max_distance: config.max_distance,
            spatial: config.spatial,
        }
    }

    pub fn status(&self) -> LoadStatus {
        self.loader.status()
    }

    pub fn source(&self) -> Option<&str> {
        self.loader.current_source()
    }

    pub fn handle(&self) -> Option<SoundHandle> {
        self.handle
    }

    /// Begin loading under `handle`. Does nothing if already initialized.
    pub fn init(&mut self, handle: SoundHandle, events: &mut Vec<SceneEvent>) {
        if self.handle.is_some() {
            return;
        }
        self.handle = Some(handle);
        match self.loader.begin() {
            Some(source) => {
                debug!(%source, "requesting explosion sound");
                events.push(SceneEvent::LoadSound { handle, source });
            }
            None => warn!("no explosion sound sources configured; explosions will be silent"),
        }
    }

    pub fn on_loaded(&mut self, source: &str) -> bool {
        let accepted = self.loader.loaded(source);
        if accepted {
            info!(%source, "explosion sound loaded");
        } else {
            debug!(%source, "ignoring stale sound load report");
        }
        accepted
    }

    pub fn on_failed(&mut self, source: &str, reason: &str, events: &mut Vec<SceneEvent>) {
        let Some(handle) = self.handle else {
            return;
        };
        if !self.loader.is_pending(source) {
            debug!(%source, "ignoring stale sound failure report");
            return;
        }
        warn!(%source, %reason, "explosion sound failed to load");
        match self.loader.failed(source) {
            Some(next) => {
                debug!(source = %next, "trying next explosion sound source");
                events.push(SceneEvent::LoadSound {
                    handle,
                    source: next,
                });
            }
            None => warn!("all explosion sound sources failed; explosions will be silent"),
        }
    }

    /// Queue playback at `position`. Returns whether a sound was played.
    pub fn play_at(&self, position: Vec3, events: &mut Vec<SceneEvent>) -> bool {
        match self.handle {
            Some(handle) if self.loader.is_ready() => {
                events.push(SceneEvent::PlaySound {
                    handle,
                    position,
                    volume: self.volume,
                    max_distance: self.max_distance,
                    spatial: self.spatial,
                });
                true
            }
            _ => false,
        }
    }

    /// Release the host sound and return to the uninitialized state.
    pub fn teardown(&mut self, events: &mut Vec<SceneEvent>) {
        if let Some(handle) = self.handle.take() {
            events.push(SceneEvent::DisposeSound { handle });
        }
        self.loader.reset();
    }
}
