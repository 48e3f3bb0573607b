//! Command-line seating planner.
//!
//! Reads one command per line from standard input (or a script file),
//! applies it to the seating engine, and saves the guest and table lists
//! after every change.
//!
//! # Startup Sequence
//!
//! 1. Parse command-line arguments
//! 2. Load configuration from `seating-config.yaml` (defaults if absent)
//! 3. Initialize structured logging (tracing) on stderr
//! 4. Open storage and load the saved state
//! 5. Build the engine, repairing any inconsistent saved state
//! 6. Run the shell until input ends or `quit` is given

mod command;
mod error;
mod shell;

use std::fs::File;
use std::io::{BufReader, IsTerminal};
use std::path::{Path, PathBuf};

use clap::Parser;
use seating_core::config::{LogFormat, LoggingConfig};
use seating_core::{PlannerConfig, SeatingEngine};
use seating_db::{FileKvStore, KeyValueStore, MemoryKvStore, StateStore};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::error::PlannerError;
use crate::shell::Shell;

/// Plan who sits where.
#[derive(Debug, Parser)]
#[command(name = "seating-planner", version, about)]
struct Cli {
    /// YAML configuration file.
    #[arg(short, long, default_value = "seating-config.yaml")]
    config: PathBuf,

    /// Directory the guest and table lists are saved in.
    #[arg(short, long)]
    data_dir: Option<PathBuf>,

    /// Read commands from this file instead of standard input.
    #[arg(short, long)]
    script: Option<PathBuf>,

    /// Keep everything in memory; nothing is loaded or saved.
    #[arg(long)]
    memory: bool,
}

fn main() -> Result<(), PlannerError> {
    let cli = Cli::parse();

    let mut config = load_config(&cli.config)?;
    if let Some(dir) = &cli.data_dir {
        config.storage.data_dir.clone_from(dir);
    }

    init_tracing(&config.logging);
    info!(
        config = %cli.config.display(),
        config_found = cli.config.exists(),
        data_dir = %config.storage.data_dir.display(),
        memory = cli.memory,
        "seating-planner starting"
    );

    if cli.memory {
        run(&cli, &config, MemoryKvStore::new())
    } else {
        let backend = FileKvStore::open(&config.storage.data_dir)?;
        run(&cli, &config, backend)
    }
}

fn run<S: KeyValueStore>(cli: &Cli, config: &PlannerConfig, backend: S) -> Result<(), PlannerError> {
    let store = StateStore::new(
        backend,
        config.storage.guests_key.as_str(),
        config.storage.tables_key.as_str(),
    );
    let engine = SeatingEngine::new(store.load(), config);
    let mut shell = Shell::new(engine, store, config);

    let stdout = std::io::stdout();
    let mut output = stdout.lock();
    match &cli.script {
        Some(path) => {
            info!(script = %path.display(), "Running script");
            let file = File::open(path)?;
            shell.run(BufReader::new(file), &mut output, false)?;
        }
        None => {
            let stdin = std::io::stdin();
            let prompt = stdin.is_terminal();
            shell.run(stdin.lock(), &mut output, prompt)?;
        }
    }

    info!("seating-planner finished");
    Ok(())
}

/// Load configuration from `path`, falling back to defaults when the file
/// does not exist.
fn load_config(path: &Path) -> Result<PlannerConfig, PlannerError> {
    if path.exists() {
        Ok(PlannerConfig::from_file(path)?)
    } else {
        Ok(PlannerConfig::parse("")?)
    }
}

/// `RUST_LOG` wins over the configured level.
fn init_tracing(logging: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr);
    match logging.format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.init(),
    }
}
