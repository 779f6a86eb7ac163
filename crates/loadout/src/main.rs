//! Loadout - Bungie.net OAuth relay
//!
//! Main entry point for the `loadout` CLI.

use std::path::PathBuf;

use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};

mod commands;

use commands::{check, start};

// ─────────────────────────────────────────────────────────────────────────────
// CLI Structure
// ─────────────────────────────────────────────────────────────────────────────

/// Loadout - Bungie.net OAuth relay for the loadout game front end
#[derive(Parser)]
#[command(name = "loadout")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file (default: ./loadout.toml if present)
    #[arg(long, global = true, env = "LOADOUT_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the relay server
    Start(start::StartArgs),

    /// Validate configuration and credentials without starting
    Check(check::CheckArgs),
}

// ─────────────────────────────────────────────────────────────────────────────
// Main
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let loaded = loadout_config::load_config(cli.config.as_deref())
        .context("Failed to load configuration")?;

    // Console (human-readable) + optional rotating JSON file
    let filter = if cli.verbose {
        "loadout=debug,loadout_server=debug,loadout_bungie=debug,loadout_config=debug,tower_http=debug,info"
    } else {
        "loadout=info,loadout_server=info,loadout_bungie=info,warn"
    };

    use tracing_subscriber::prelude::*;
    let console = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_filter(tracing_subscriber::EnvFilter::new(filter));

    let (file_layer, _guard) = match &loaded.config.logging.dir {
        Some(dir) => {
            let file_appender = tracing_appender::rolling::daily(dir, "loadout.log");
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
            let layer = tracing_subscriber::fmt::layer()
                .json()
                .with_writer(non_blocking)
                .with_filter(tracing_subscriber::EnvFilter::new(
                    "loadout=debug,loadout_server=debug,loadout_bungie=debug,info",
                ));
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(console)
        .with(file_layer)
        .init();

    if let Some(path) = &loaded.source {
        tracing::info!(path = %path.display(), "Loaded config file");
    }

    let ctx = commands::Context {
        config: loaded.config,
        verbose: cli.verbose,
    };

    match cli.command {
        Commands::Start(args) => start::run(args, &ctx).await,
        Commands::Check(args) => check::run(args, &ctx).await,
    }
}
