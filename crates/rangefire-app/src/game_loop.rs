//! Game loop thread: runs the simulation engine at 60Hz and publishes snapshots.
//!
//! The engine is created inside this thread because it's cleaner for ownership.
//! Commands arrive via `mpsc` channel. Snapshots go out on a second channel
//! and are stored in shared state for synchronous polling.

use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use anyhow::Context;
use tracing::{debug, info};

use rangefire_core::commands::HostCommand;
use rangefire_core::constants::TICK_RATE;
use rangefire_core::events::SceneEvent;
use rangefire_core::state::FrameSnapshot;
use rangefire_sim::engine::{SimConfig, SimulationEngine};

use crate::state::{GameLoopCommand, LoopHandle};

/// Nominal duration of one tick at 1x speed.
const TICK_DURATION: Duration = Duration::from_nanos(1_000_000_000 / TICK_RATE as u64);

/// Spawns the game loop in a new thread.
///
/// Every snapshot is sent on `snapshot_tx`; the loop stops when that
/// receiver goes away, on `Shutdown`, or when the command channel closes.
pub fn spawn_game_loop(
    config: SimConfig,
    paced: bool,
    snapshot_tx: mpsc::Sender<FrameSnapshot>,
) -> anyhow::Result<LoopHandle> {
    let (cmd_tx, cmd_rx) = mpsc::channel::<GameLoopCommand>();
    let latest_snapshot = Arc::new(Mutex::new(None));
    let shared = Arc::clone(&latest_snapshot);

    let join = std::thread::Builder::new()
        .name("rangefire-game-loop".into())
        .spawn(move || {
            let mut engine = SimulationEngine::new(config);
            run_game_loop(&mut engine, paced, &cmd_rx, &snapshot_tx, &shared);
            let released = engine.teardown();
            info!(released = released.len(), "game loop stopped");
            released
        })
        .context("failed to spawn game loop thread")?;

    Ok(LoopHandle {
        command_tx: Mutex::new(Some(cmd_tx)),
        latest_snapshot,
        join: Some(join),
    })
}

/// The game loop. Runs until Shutdown command or channel disconnect.
fn run_game_loop(
    engine: &mut SimulationEngine,
    paced: bool,
    cmd_rx: &mpsc::Receiver<GameLoopCommand>,
    snapshot_tx: &mpsc::Sender<FrameSnapshot>,
    latest_snapshot: &Mutex<Option<FrameSnapshot>>,
) {
    let mut next_tick_time = Instant::now();

    loop {
        // 1. Drain all pending commands
        loop {
            match cmd_rx.try_recv() {
                Ok(GameLoopCommand::Host(cmd)) => {
                    debug!(?cmd, "host command");
                    engine.queue_command(cmd);
                }
                Ok(GameLoopCommand::Shutdown) => return,
                Err(mpsc::TryRecvError::Empty) => break,
                Err(mpsc::TryRecvError::Disconnected) => return,
            }
        }

        // 2. Advance one tick (engine handles pause semantics internally)
        let snapshot = engine.tick();

        // 3. Store latest snapshot for synchronous polling
        if let Ok(mut lock) = latest_snapshot.lock() {
            *lock = Some(snapshot.clone());
        }

        // 4. Publish to the host
        if snapshot_tx.send(snapshot).is_err() {
            return;
        }

        if !paced {
            continue;
        }

        // 5. Sleep until next tick, adjusting for time_scale
        let effective_tick_duration = scaled_tick_duration(engine.time_scale());

        next_tick_time += effective_tick_duration;
        let now = Instant::now();
        if next_tick_time > now {
            std::thread::sleep(next_tick_time - now);
        } else if now - next_tick_time > effective_tick_duration * 2 {
            // Too far behind, reset to avoid a catch-up spiral
            next_tick_time = now;
        }
    }
}

/// Wall-clock duration of one tick at `time_scale`.
/// Non-positive or tiny scales fall back to 1x.
fn scaled_tick_duration(time_scale: f64) -> Duration {
    if time_scale.is_finite() && time_scale > 0.001 {
        TICK_DURATION.div_f64(time_scale)
    } else {
        TICK_DURATION
    }
}

/// Run the engine on the calling thread for at most `ticks` ticks, handing
/// every snapshot to `host` and queueing whatever it answers.
/// Stops early once `host` returns `None`.
pub fn run_lockstep<F>(engine: &mut SimulationEngine, ticks: u64, mut host: F) -> Vec<SceneEvent>
where
    F: FnMut(&FrameSnapshot) -> Option<Vec<HostCommand>>,
{
    for _ in 0..ticks {
        let snapshot = engine.tick();
        match host(&snapshot) {
            Some(commands) => engine.queue_commands(commands),
            None => break,
        }
    }
    engine.teardown()
}
