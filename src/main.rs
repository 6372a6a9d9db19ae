//! Moderator console for the light-switch usability study.
//!
//! Runs one participant session: counterbalanced conditions, switch presses
//! typed by the moderator, success/failure calls and questionnaire scores,
//! then CSV or JSON export.

mod app;
mod command;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use rand::SeedableRng;
use rand::rngs::StdRng;
use switchex_experiment::ExperimentConfig;
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

pub use app::App;

#[derive(Parser)]
#[command(name = "switchex")]
#[command(version)]
#[command(about = "Light switch interface study session runner")]
struct Cli {
    /// Participant id, e.g. A3 (group letter then sequence number)
    #[arg(short, long)]
    participant: Option<String>,

    /// Group letter override
    #[arg(short, long)]
    group: Option<String>,

    /// JSON config file; missing fields keep their defaults
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory exports are written to
    #[arg(short, long, default_value = ".")]
    output_dir: PathBuf,

    /// Random seed for layouts and targets
    #[arg(long)]
    seed: Option<u64>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();

    let config = match &cli.config {
        Some(path) => ExperimentConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => ExperimentConfig::default(),
    };
    info!(
        rooms = config.room_count,
        debounce_ms = config.debounce_ms,
        replay_window_ms = config.replay_window_ms,
        "config loaded"
    );

    let rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    let mut app = App::new(config, rng, cli.output_dir);
    if let Some(id) = &cli.participant {
        app.session_mut().set_participant(id)?;
    }
    if let Some(group) = &cli.group {
        app.session_mut().set_group(group)?;
    }
    app.run()
}
