//! Check command - validates config and credentials, prints the redacted result.

use anyhow::{Context as _, Result};
use clap::Args;

use loadout_config::Credentials;

use super::Context;

/// Arguments for the check command.
#[derive(Args, Debug)]
pub struct CheckArgs {}

/// Run the check command.
pub async fn run(_args: CheckArgs, ctx: &Context) -> Result<()> {
    let config = &ctx.config;
    config.validate()?;

    let credentials = Credentials::from_env().context("Bungie credentials are incomplete")?;

    println!("Server");
    println!("  listen:               {}", config.server.socket_addr()?);
    println!("  cors:                 {}", config.server.cors);
    println!("  request logging:      {}", config.server.request_logging);
    println!(
        "  static dir:           {}",
        config
            .server
            .static_dir
            .as_ref()
            .map(|d| d.display().to_string())
            .unwrap_or_else(|| "(none)".to_string())
    );
    println!(
        "  public origin:        {}",
        config.server.public_origin.as_deref().unwrap_or("(from Host header)")
    );
    println!("  echo upstream errors: {}", config.server.echo_upstream_errors);
    println!();
    println!("Bungie");
    println!("  authorize url:        {}", config.bungie.authorize_url);
    println!("  token url:            {}", config.bungie.token_url);
    println!("  api base url:         {}", config.bungie.api_base_url);
    println!("  timeout:              {}s", config.bungie.timeout_secs);
    println!("  client id:            {}", credentials.client_id());
    println!("  client secret:        [set]");
    println!("  api key:              [set]");

    if ctx.verbose {
        println!();
        println!("{:?}", credentials);
    }

    Ok(())
}
