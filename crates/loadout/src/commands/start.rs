//! Start command - launches the relay server.

use std::path::PathBuf;

use anyhow::{Context as _, Result};
use clap::Args;

use loadout_bungie::BungieClient;
use loadout_config::{Credentials, LoadoutConfig};
use loadout_server::{Server, ServerConfig};

use super::Context;

/// Arguments for the start command.
///
/// CLI arguments override config file values.
#[derive(Args, Debug, Default)]
pub struct StartArgs {
    /// Port to listen on (overrides config)
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Address to bind to (overrides config)
    #[arg(short, long)]
    pub bind: Option<String>,

    /// Directory with the front-end bundle to serve (overrides config)
    #[arg(long)]
    pub static_dir: Option<PathBuf>,

    /// Origin to redirect to after login, e.g. https://example.com (overrides config)
    #[arg(long)]
    pub public_origin: Option<String>,

    /// Include upstream error bodies in relay error responses
    #[arg(long)]
    pub echo_upstream_errors: bool,
}

impl StartArgs {
    /// Layer CLI overrides on top of the file config.
    pub fn apply(&self, mut config: LoadoutConfig) -> Result<LoadoutConfig> {
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(bind) = &self.bind {
            config.server.bind = bind.clone();
        }
        if let Some(dir) = &self.static_dir {
            config.server.static_dir = Some(dir.clone());
        }
        if let Some(origin) = &self.public_origin {
            config.server.public_origin = Some(origin.clone());
        }
        if self.echo_upstream_errors {
            config.server.echo_upstream_errors = true;
        }

        config.validate()?;
        Ok(config)
    }
}

/// Run the start command.
pub async fn run(args: StartArgs, ctx: &Context) -> Result<()> {
    let config = args.apply(ctx.config.clone())?;

    let credentials = Credentials::from_env().context("Cannot start without Bungie credentials")?;

    if let Some(dir) = &config.server.static_dir {
        if !dir.is_dir() {
            anyhow::bail!("static_dir '{}' is not a directory", dir.display());
        }
    }

    let bungie = BungieClient::new(config.bungie.clone(), credentials)?;
    let server_config = ServerConfig::from_section(&config.server)?;

    tracing::info!(
        client_id = bungie.client_id(),
        timeout_secs = config.bungie.timeout_secs,
        static_dir = ?server_config.static_dir,
        echo_upstream_errors = server_config.echo_upstream_errors,
        "Relay configured"
    );
    if ctx.verbose {
        tracing::debug!(endpoints = ?config.bungie, "Bungie endpoints");
    }

    let server = Server::new(bungie, server_config);
    println!("Loadout relay listening on http://{}", server.bind_address());

    server
        .run_with_shutdown(async {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::info!("Shutdown signal received");
            }
        })
        .await?;

    Ok(())
}
