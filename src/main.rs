use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use number_snake::game::{Campaign, GameConfig, LevelConfig};
use number_snake::modes::HumanMode;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Parser)]
#[command(name = "number_snake")]
#[command(version, about = "Snake game where numbered apples must be eaten in order")]
struct Cli {
    /// Level to start from (1-based)
    #[arg(long, default_value = "1")]
    level: usize,

    /// JSON file with a custom list of levels
    #[arg(long)]
    levels: Option<PathBuf>,

    /// Side length of the square grid
    #[arg(long, default_value = "20")]
    grid_size: usize,

    /// Seed for a reproducible session
    #[arg(long)]
    seed: Option<u64>,

    /// Directory for the log file (defaults to the system temp dir)
    #[arg(long)]
    log_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_dir = cli
        .log_dir
        .clone()
        .unwrap_or_else(|| std::env::temp_dir().join("number_snake"));
    let _guard = setup_logging(&log_dir)?;

    let config = GameConfig::square(cli.grid_size);
    config.validate().context("Invalid grid configuration")?;

    let levels = match &cli.levels {
        Some(path) => load_levels(path)?,
        None => LevelConfig::presets(),
    };
    let campaign = Campaign::starting_at(levels, cli.level).context("Invalid level selection")?;

    let rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    tracing::info!(
        grid = cli.grid_size,
        level = cli.level,
        seed = ?cli.seed,
        "starting session"
    );

    let mut human_mode = HumanMode::new(config, campaign, rng);
    human_mode.run().await
}

/// Log to a file only; the terminal belongs to the TUI
fn setup_logging(log_dir: &Path) -> Result<WorkerGuard> {
    std::fs::create_dir_all(log_dir)
        .with_context(|| format!("Failed to create log directory {}", log_dir.display()))?;

    let file_appender = tracing_appender::rolling::never(log_dir, "number_snake.log");
    let (non_blocking_file, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing::Level::INFO.into());

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking_file)
        .with_ansi(false);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .try_init()
        .context("Failed to initialize logging")?;

    Ok(guard)
}

fn load_levels(path: &Path) -> Result<Vec<LevelConfig>> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read levels from {}", path.display()))?;
    serde_json::from_str(&json).context("Failed to parse levels file")
}
