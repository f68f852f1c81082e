//! Binary entry point that glues the SQLite store to the TUI: resolve the
//! configuration, bring up logging and the database, then drive the Ratatui
//! event loop until the user exits.
use std::fs::{self, OpenOptions};
use std::process;
use std::sync::Mutex;

use anyhow::{Context, Result};
use movie_bookmark_manager::{ensure_schema, run_app, App, Config, MovieError};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let config = Config::from_env()?;

    if let Err(err) = init_logging(&config) {
        eprintln!("Logging disabled: {err:#}");
    }

    let conn = match ensure_schema(&config.db_path) {
        Ok(conn) => conn,
        Err(err) => {
            let err = MovieError::Initialization(err);
            error!(error = %err, "database initialization failed");
            eprintln!("{}: {err}", err.heading());
            process::exit(1);
        }
    };

    let mut app = App::new(conn);
    info!("starting movie bookmark manager");
    let result = run_app(&mut app);
    info!("shutting down");
    result
}

/// Send tracing output to the log file in the data directory. The TUI owns
/// the terminal, so nothing may be written to stdout or stderr while it runs.
fn init_logging(config: &Config) -> Result<()> {
    fs::create_dir_all(&config.data_dir).context("failed to create data directory")?;
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.log_path)
        .with_context(|| format!("failed to open {}", config.log_path.display()))?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|err| anyhow::anyhow!(err))
        .context("failed to install tracing subscriber")
}
