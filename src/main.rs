use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use grid_snake::game::{GameConfig, GameEngine};
use grid_snake::logging::{self, LogSink};
use grid_snake::modes::{HumanMode, ReplayMode, parse_script};
use grid_snake::render::ConsolePresenter;

#[derive(Parser)]
#[command(name = "grid_snake")]
#[command(version, about = "Snake on a fixed grid, in the terminal")]
struct Cli {
    /// Game mode
    #[arg(long, default_value = "human")]
    mode: Mode,

    /// JSON file with game settings; missing fields use defaults
    #[arg(long)]
    config: Option<PathBuf>,

    /// Grid width, overrides the config file
    #[arg(long)]
    width: Option<usize>,

    /// Grid height, overrides the config file
    #[arg(long)]
    height: Option<usize>,

    /// Seed for food placement
    #[arg(long)]
    seed: Option<u64>,

    /// Moves for replay mode, one per tick: U/D/L/R, '.' for no input
    #[arg(long, default_value = "")]
    moves: String,

    /// Tick limit for replay mode
    #[arg(long, default_value = "1000")]
    max_ticks: u32,

    /// Write log records to this file
    #[arg(long)]
    log_file: Option<PathBuf>,
}

#[derive(Clone, ValueEnum)]
enum Mode {
    /// Play snake with keyboard controls
    Human,
    /// Run a scripted game without a terminal UI and print the result as JSON
    Replay,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let sink = match (&cli.log_file, &cli.mode) {
        (Some(path), _) => LogSink::File(path),
        (None, Mode::Replay) => LogSink::Stderr,
        (None, Mode::Human) => LogSink::Disabled,
    };
    logging::init(sink)?;

    let config = load_config(&cli)?;
    let engine = match cli.seed {
        Some(seed) => GameEngine::with_seed(config, seed),
        None => GameEngine::new(config),
    }
    .context("Invalid game configuration")?;

    // Dispatch to appropriate mode
    match cli.mode {
        Mode::Human => {
            let mut human_mode = HumanMode::new(engine);
            human_mode.run().await?;
        }
        Mode::Replay => {
            let moves = parse_script(&cli.moves)?;
            let mut replay = ReplayMode::new(engine, ConsolePresenter::stdout(), moves, cli.max_ticks);
            let outcome = replay.run()?;
            let json = serde_json::to_string_pretty(&outcome).context("Failed to encode outcome")?;
            println!("{json}");
        }
    }

    Ok(())
}

fn load_config(cli: &Cli) -> Result<GameConfig> {
    let mut config = match &cli.config {
        Some(path) => GameConfig::load(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => GameConfig::default(),
    };

    if let Some(width) = cli.width {
        config.grid_width = width;
    }
    if let Some(height) = cli.height {
        config.grid_height = height;
    }

    Ok(config)
}
