//! retro - lo-fi tape loop in the terminal
//!
//! Run with: cargo run --bin retro
//! Bounce to disk: cargo run --bin retro -- bounce loop.wav --seconds 30

mod app;
mod bounce;
mod ui;

use std::{fs::File, path::PathBuf, sync::Mutex};

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result as EyreResult, WrapErr};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use app::App;
use retro_tape::RetroConfig;

#[derive(Parser)]
#[command(name = "retro")]
#[command(about = "Generative lo-fi background loop with tape-style synthesis", long_about = None)]
struct Cli {
    /// Tempo in beats per minute
    #[arg(long, global = true)]
    bpm: Option<f64>,

    /// Seed for every random decision (syncopation, wobble, stereo placement)
    #[arg(long, global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Play through the default output device (default)
    Play {
        /// Write logs here instead of discarding them
        #[arg(long)]
        log_file: Option<PathBuf>,
    },
    /// Render the loop offline to a 16-bit stereo WAV file
    Bounce {
        output: PathBuf,

        #[arg(short, long, default_value = "30.0")]
        seconds: f64,

        #[arg(long, default_value = "48000")]
        sample_rate: u32,
    },
}

fn main() -> EyreResult<()> {
    color_eyre::install()?;
    let cli = Cli::parse();

    let mut config = RetroConfig::default();
    if let Some(bpm) = cli.bpm {
        config = config.bpm(bpm);
    }
    if let Some(seed) = cli.seed {
        config = config.seed(seed);
    }

    match cli.command.unwrap_or(Command::Play { log_file: None }) {
        Command::Play { log_file } => {
            init_logging(log_file, false)?;
            let app = App::new(config)?;
            let mut terminal = ratatui::init();
            let result = app.run(&mut terminal);
            ratatui::restore();
            result
        }
        Command::Bounce {
            output,
            seconds,
            sample_rate,
        } => {
            init_logging(None, true)?;
            bounce::bounce(config, &output, seconds, sample_rate)
        }
    }
}

/// The TUI owns the terminal, so its logs go to a file or nowhere.
fn init_logging(log_file: Option<PathBuf>, to_stderr: bool) -> EyreResult<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("retro_tape=info"));

    let file_layer = match log_file {
        Some(path) => {
            let file = File::create(&path)
                .wrap_err_with(|| format!("failed to create log file {}", path.display()))?;
            Some(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
        }
        None => None,
    };
    let stderr_layer = to_stderr.then(|| fmt::layer().with_writer(std::io::stderr));

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(stderr_layer)
        .init();
    Ok(())
}
