//! Server configuration.

use std::net::SocketAddr;
use std::path::PathBuf;

use loadout_config::ServerSection;

/// Runtime settings for the HTTP surface.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind the server to.
    pub bind_address: SocketAddr,

    /// Enable request logging.
    pub request_logging: bool,

    /// Allow cross-origin requests from any origin.
    pub cors: bool,

    /// Front-end bundle served for every path without a route.
    pub static_dir: Option<PathBuf>,

    /// Fixed origin for the post-login redirect. `None` uses the `Host` header.
    pub public_origin: Option<String>,

    /// Attach upstream error bodies to relay error responses as `details`.
    /// Off by default: upstream diagnostics go to the log, not to callers.
    pub echo_upstream_errors: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: SocketAddr::from(([0, 0, 0, 0], loadout_config::DEFAULT_PORT)),
            request_logging: true,
            cors: true,
            static_dir: None,
            public_origin: None,
            echo_upstream_errors: false,
        }
    }
}

impl ServerConfig {
    /// Create a server config with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from the `[server]` section of the config file.
    pub fn from_section(section: &ServerSection) -> loadout_config::Result<Self> {
        Ok(Self {
            bind_address: section.socket_addr()?,
            request_logging: section.request_logging,
            cors: section.cors,
            static_dir: section.static_dir.clone(),
            public_origin: section.public_origin.clone(),
            echo_upstream_errors: section.echo_upstream_errors,
        })
    }

    /// Set the bind address.
    pub fn with_bind_address(mut self, addr: SocketAddr) -> Self {
        self.bind_address = addr;
        self
    }

    /// Enable or disable request logging.
    pub fn with_request_logging(mut self, enabled: bool) -> Self {
        self.request_logging = enabled;
        self
    }

    /// Enable or disable permissive CORS.
    pub fn with_cors(mut self, enabled: bool) -> Self {
        self.cors = enabled;
        self
    }

    /// Serve static files from `dir`.
    pub fn with_static_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.static_dir = Some(dir.into());
        self
    }

    /// Redirect to a fixed origin after login.
    pub fn with_public_origin(mut self, origin: impl Into<String>) -> Self {
        self.public_origin = Some(origin.into());
        self
    }

    /// Echo upstream error bodies to callers.
    pub fn with_echo_upstream_errors(mut self, enabled: bool) -> Self {
        self.echo_upstream_errors = enabled;
        self
    }
}
