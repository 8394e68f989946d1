//! State shared between the host driver and the game loop thread.

use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;

use anyhow::{anyhow, Context};

use rangefire_core::commands::HostCommand;
use rangefire_core::events::SceneEvent;
use rangefire_core::state::FrameSnapshot;

/// Commands sent from the host driver to the game loop thread.
#[derive(Debug)]
pub enum GameLoopCommand {
    /// A host command to forward to the simulation engine.
    Host(HostCommand),
    /// Tear the session down and stop the game loop thread.
    Shutdown,
}

/// Handle to a running game loop.
///
/// `mpsc::Sender` is Send but not Sync, so it sits behind a `Mutex`
/// alongside the latest snapshot shared with the loop thread.
pub struct LoopHandle {
    pub command_tx: Mutex<Option<mpsc::Sender<GameLoopCommand>>>,
    /// Latest snapshot for synchronous polling. Updated after each tick.
    pub latest_snapshot: Arc<Mutex<Option<FrameSnapshot>>>,
    pub(crate) join: Option<JoinHandle<Vec<SceneEvent>>>,
}

impl LoopHandle {
    /// Forward a host command to the engine.
    pub fn send(&self, command: HostCommand) -> anyhow::Result<()> {
        let lock = self
            .command_tx
            .lock()
            .map_err(|e| anyhow!("command channel poisoned: {e}"))?;
        match lock.as_ref() {
            Some(tx) => tx
                .send(GameLoopCommand::Host(command))
                .context("game loop is no longer running"),
            None => Err(anyhow!("game loop already shut down")),
        }
    }

    /// Clone of the most recent snapshot, if a tick has run.
    pub fn latest(&self) -> Option<FrameSnapshot> {
        self.latest_snapshot
            .lock()
            .ok()
            .and_then(|lock| lock.clone())
    }

    /// Stop the loop and collect the teardown events it produced.
    pub fn shutdown(&mut self) -> anyhow::Result<Vec<SceneEvent>> {
        if let Ok(mut lock) = self.command_tx.lock() {
            if let Some(tx) = lock.take() {
                let _ = tx.send(GameLoopCommand::Shutdown);
            }
        }
        match self.join.take() {
            Some(join) => join
                .join()
                .map_err(|_| anyhow!("game loop thread panicked")),
            None => Ok(Vec::new()),
        }
    }
}

impl Drop for LoopHandle {
    fn drop(&mut self) {
        let _ = self.shutdown();
    }
}
