use std::path::PathBuf;
use std::sync::mpsc;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use rangefire_app::demo::DemoHost;
use rangefire_app::game_loop;
use rangefire_core::config::GameConfig;
use rangefire_core::enums::ExperienceMode;
use rangefire_core::state::FrameSnapshot;
use rangefire_sim::engine::{SimConfig, SimulationEngine};

#[derive(Parser)]
#[command(name = "rangefire", about = "Headless AR shooting range with a scripted host")]
struct Cli {
    /// JSON game config; defaults apply to anything it leaves out
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the experience mode from the config
    #[arg(short, long, value_enum)]
    mode: Option<ModeArg>,

    /// RNG seed for deterministic runs
    #[arg(short, long, default_value = "42")]
    seed: u64,

    /// Maximum number of ticks to simulate
    #[arg(short, long, default_value = "3600")]
    ticks: u64,

    /// Run the game loop thread in real time instead of lockstep
    #[arg(long)]
    paced: bool,

    /// Wall-clock speed multiplier for --paced runs
    #[arg(long, default_value = "1.0")]
    time_scale: f64,

    /// Print every snapshot as a JSON line
    #[arg(long)]
    json: bool,

    /// Pretend the device has no immersive AR
    #[arg(long)]
    no_ar: bool,

    /// Asset sources the scripted host fails to load (repeatable)
    #[arg(long = "unreachable")]
    unreachable: Vec<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum ModeArg {
    Shooter,
    Portal,
}

impl From<ModeArg> for ExperienceMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Shooter => ExperienceMode::Shooter,
            ModeArg::Portal => ExperienceMode::Portal,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .with_writer(std::io::stderr)
        .init();

    let mut game = match &cli.config {
        Some(path) => GameConfig::load(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => GameConfig::default(),
    };
    if let Some(mode) = cli.mode {
        game.mode = mode.into();
    }

    if !(cli.time_scale.is_finite() && cli.time_scale > 0.0) {
        anyhow::bail!("--time-scale must be positive, got {}", cli.time_scale);
    }

    let mut host = DemoHost::new(&game, !cli.no_ar, &cli.unreachable);
    let config = SimConfig {
        seed: cli.seed,
        time_scale: cli.time_scale,
        game,
    };
    info!(seed = config.seed, mode = ?config.game.mode, ticks = cli.ticks, "starting");

    let last = if cli.paced {
        run_paced(config, &mut host, &cli)?
    } else {
        run_headless(config, &mut host, &cli)?
    };

    match last {
        Some(snap) => {
            let score = &snap.score;
            println!(
                "tick={} phase={:?} shots={} hits={} misses={} targets={}/{}",
                snap.time.tick,
                snap.phase,
                score.shots_fired,
                score.hits,
                score.misses,
                score.targets_remaining,
                score.targets_total
            );
        }
        None => warn!("no ticks were run"),
    }
    Ok(())
}

/// Deterministic run on the main thread.
fn run_headless(
    config: SimConfig,
    host: &mut DemoHost,
    cli: &Cli,
) -> anyhow::Result<Option<FrameSnapshot>> {
    let mut engine = SimulationEngine::new(config);
    let mut last = None;
    let mut output = Ok(());

    let released = game_loop::run_lockstep(&mut engine, cli.ticks, |snap| {
        if cli.json && output.is_ok() {
            output = print_json(snap);
        }
        last = Some(snap.clone());
        host.observe(snap)
    });
    output?;

    info!(released = released.len(), "session torn down");
    Ok(last)
}

/// Real-time run on the game loop thread; the host answers asynchronously.
fn run_paced(
    config: SimConfig,
    host: &mut DemoHost,
    cli: &Cli,
) -> anyhow::Result<Option<FrameSnapshot>> {
    let (snap_tx, snap_rx) = mpsc::channel();
    let mut handle = game_loop::spawn_game_loop(config, true, snap_tx)?;
    let mut last = None;

    for snap in snap_rx.iter().take(cli.ticks as usize) {
        if cli.json {
            print_json(&snap)?;
        }
        let commands = host.observe(&snap);
        last = Some(snap);
        match commands {
            Some(commands) => {
                for command in commands {
                    handle.send(command)?;
                }
            }
            None => break,
        }
    }

    let released = handle.shutdown()?;
    info!(released = released.len(), "session torn down");
    Ok(last)
}

fn print_json(snap: &FrameSnapshot) -> anyhow::Result<()> {
    let line = serde_json::to_string(snap).context("serializing snapshot")?;
    println!("{line}");
    Ok(())
}
