//! msgr entry point.
//!
//! Binary name: `msgr`
//!
//! Parses CLI arguments, initializes the store and services, then runs
//! the interactive menu session until the user exits.

mod prompt;
mod session;
mod state;

use std::path::PathBuf;

use clap::Parser;
use tracing::Instrument;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use state::AppState;

/// Interactive messaging backend.
#[derive(Parser)]
#[command(name = "msgr", version, about)]
struct Cli {
    /// Path to the SQLite database file (defaults to $MSGR_DATA_DIR or
    /// ~/.msgr/msgr.db)
    db_path: Option<PathBuf>,

    /// Increase log verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long)]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up tracing based on verbosity. Logs go to stderr so they never
    // interleave with the menus.
    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "warn",
        1 => "info,msgr=debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    // A connection failure here is fatal; anything after this point is
    // reported inside the session loop instead.
    let state = AppState::init(cli.db_path).await?;

    let session_id = Uuid::now_v7();
    session::run(&state)
        .instrument(tracing::info_span!("session", %session_id))
        .await?;

    // Dropping the state releases the pool.
    Ok(())
}
