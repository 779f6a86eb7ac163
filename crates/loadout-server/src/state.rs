//! Application state shared across handlers.

use std::sync::Arc;

use loadout_bungie::BungieClient;

use crate::config::ServerConfig;

/// Immutable state shared by every request.
#[derive(Clone)]
pub struct AppState {
    /// Vendor client carrying the credentials and connection pool.
    pub bungie: Arc<BungieClient>,

    /// Server configuration.
    pub config: Arc<ServerConfig>,
}

impl AppState {
    /// Create a new application state.
    pub fn new(bungie: BungieClient, config: ServerConfig) -> Self {
        Self {
            bungie: Arc::new(bungie),
            config: Arc::new(config),
        }
    }
}
