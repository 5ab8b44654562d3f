use std::fs::File;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use snake_arcade::audio::{AudioSink, SilentAudio, TerminalBell};
use snake_arcade::game::GameConfig;
use snake_arcade::modes::HumanMode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "snake_arcade")]
#[command(version, about = "Snake in your terminal")]
struct Cli {
    /// JSON config file; flags below override its values
    #[arg(long)]
    config: Option<PathBuf>,

    /// Grid width
    #[arg(long)]
    width: Option<usize>,

    /// Grid height
    #[arg(long)]
    height: Option<usize>,

    /// Seed for fruit placement
    #[arg(long)]
    seed: Option<u64>,

    /// Start with sound effects off
    #[arg(long)]
    mute: bool,

    /// Start with music off
    #[arg(long)]
    no_music: bool,

    /// Use the terminal bell for sound effects
    #[arg(long)]
    bell: bool,

    /// Write logs to this file (filter with RUST_LOG)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

impl Cli {
    fn game_config(&self) -> Result<GameConfig> {
        let mut config = match &self.config {
            Some(path) => GameConfig::load(path)?,
            None => GameConfig::default(),
        };

        if let Some(width) = self.width {
            config.grid_width = width;
            config.start = None;
        }
        if let Some(height) = self.height {
            config.grid_height = height;
            config.start = None;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        if self.mute {
            config.sound_enabled = false;
        }
        if self.no_music {
            config.music_enabled = false;
        }

        config
            .validate()
            .map_err(|e| anyhow!("Invalid game configuration: {e}"))?;
        Ok(config)
    }
}

/// The terminal UI owns the screen, so logs only go to a file
fn init_logging(path: Option<&PathBuf>) -> Result<()> {
    let Some(path) = path else {
        return Ok(());
    };
    let file = File::create(path)
        .with_context(|| format!("Failed to create log file {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_file.as_ref())?;

    let config = cli.game_config()?;
    tracing::info!(
        width = config.grid_width,
        height = config.grid_height,
        seed = ?config.seed,
        "starting"
    );

    let sink: Box<dyn AudioSink> = if cli.bell {
        Box::new(TerminalBell::new(std::io::stdout()))
    } else {
        Box::new(SilentAudio)
    };

    let mut human_mode = HumanMode::new(config, sink)?;
    human_mode.run().await?;

    Ok(())
}
