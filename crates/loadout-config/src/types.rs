//! Configuration types.
//!
//! Everything here is non-secret. Credentials come from the environment only,
//! see [`crate::secrets`].

use std::net::SocketAddr;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::{ConfigError, Result};

/// Default listen port.
pub const DEFAULT_PORT: u16 = 8080;

/// Default bind address.
pub const DEFAULT_BIND: &str = "0.0.0.0";

/// Bungie.net OAuth authorize endpoint.
pub const BUNGIE_AUTHORIZE_URL: &str = "https://www.bungie.net/en/OAuth/Authorize";

/// Bungie.net OAuth token endpoint.
pub const BUNGIE_TOKEN_URL: &str = "https://www.bungie.net/platform/app/oauth/token/";

/// Bungie.net platform API root.
pub const BUNGIE_API_BASE_URL: &str = "https://www.bungie.net/Platform";

/// Default bound on every outbound vendor call.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Root configuration.
///
/// Maps to the whole `loadout.toml` file. Every section is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoadoutConfig {
    /// HTTP server settings.
    pub server: ServerSection,
    /// Vendor endpoints and outbound call settings.
    pub bungie: BungieSection,
    /// Log output settings.
    pub logging: LoggingSection,
}

impl LoadoutConfig {
    /// Create a config with all defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        let config: Self = toml::from_str(toml_str)?;
        config.validate()?;
        Ok(config)
    }

    /// Check values that deserialize fine but cannot be used.
    pub fn validate(&self) -> Result<()> {
        if self.bungie.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "bungie.timeout_secs".to_string(),
                reason: "must be greater than zero".to_string(),
            });
        }

        for (field, value) in [
            ("bungie.authorize_url", &self.bungie.authorize_url),
            ("bungie.token_url", &self.bungie.token_url),
            ("bungie.api_base_url", &self.bungie.api_base_url),
        ] {
            if !is_http_url(value) {
                return Err(ConfigError::InvalidValue {
                    field: field.to_string(),
                    reason: format!("'{}' is not an http(s) URL", value),
                });
            }
        }

        if let Some(origin) = &self.server.public_origin {
            if !is_http_url(origin) {
                return Err(ConfigError::InvalidValue {
                    field: "server.public_origin".to_string(),
                    reason: format!("'{}' is not an http(s) URL", origin),
                });
            }
        }

        self.server.socket_addr().map(|_| ())
    }
}

fn is_http_url(value: &str) -> bool {
    value.starts_with("https://") || value.starts_with("http://")
}

// ─────────────────────────────────────────────────────────────────────────────
// Server
// ─────────────────────────────────────────────────────────────────────────────

/// `[server]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSection {
    /// Address to bind to.
    pub bind: String,
    /// Port to listen on.
    pub port: u16,
    /// Log every request's method, path, status and latency.
    pub request_logging: bool,
    /// Allow cross-origin requests from any origin.
    pub cors: bool,
    /// Directory holding the front-end bundle. Not served when unset.
    pub static_dir: Option<PathBuf>,
    /// Origin to send the browser back to after login, e.g. `https://example.com`.
    /// When unset, the callback request's `Host` header is used.
    pub public_origin: Option<String>,
    /// Attach upstream error bodies to relay error responses.
    pub echo_upstream_errors: bool,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            bind: DEFAULT_BIND.to_string(),
            port: DEFAULT_PORT,
            request_logging: true,
            cors: true,
            static_dir: None,
            public_origin: None,
            echo_upstream_errors: false,
        }
    }
}

impl ServerSection {
    /// Resolve `bind` and `port` into a socket address.
    ///
    /// Bare IPv6 hosts such as `::` are bracketed before parsing.
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        let host = self.bind.trim();
        let addr = if host.contains(':') && !host.starts_with('[') {
            format!("[{}]:{}", host, self.port)
        } else {
            format!("{}:{}", host, self.port)
        };

        addr.parse().map_err(|e| ConfigError::InvalidValue {
            field: "server.bind".to_string(),
            reason: format!("{}", e),
        })
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Bungie
// ─────────────────────────────────────────────────────────────────────────────

/// `[bungie]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BungieSection {
    pub authorize_url: String,
    pub token_url: String,
    /// Platform API root; relay paths are appended to it.
    pub api_base_url: String,
    /// Timeout in seconds for each outbound call.
    pub timeout_secs: u64,
}

impl Default for BungieSection {
    fn default() -> Self {
        Self {
            authorize_url: BUNGIE_AUTHORIZE_URL.to_string(),
            token_url: BUNGIE_TOKEN_URL.to_string(),
            api_base_url: BUNGIE_API_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Logging
// ─────────────────────────────────────────────────────────────────────────────

/// `[logging]` section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Directory for daily-rolled JSON logs. Console only when unset.
    pub dir: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = LoadoutConfig::new();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.bind, "0.0.0.0");
        assert!(config.server.cors);
        assert!(!config.server.echo_upstream_errors);
        assert_eq!(config.bungie.timeout_secs, 10);
        assert!(config.bungie.authorize_url.contains("bungie.net"));
        assert!(config.logging.dir.is_none());
    }

    #[test]
    fn test_empty_toml_is_default() {
        let config = LoadoutConfig::from_toml("").unwrap();
        assert_eq!(config, LoadoutConfig::default());
    }

    #[test]
    fn test_partial_toml() {
        let config = LoadoutConfig::from_toml(
            r#"
[server]
port = 9000
echo_upstream_errors = true
static_dir = "public"

[bungie]
timeout_secs = 3
"#,
        )
        .unwrap();

        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.bind, DEFAULT_BIND);
        assert!(config.server.echo_upstream_errors);
        assert_eq!(config.server.static_dir, Some(PathBuf::from("public")));
        assert_eq!(config.bungie.timeout_secs, 3);
        assert_eq!(config.bungie.token_url, BUNGIE_TOKEN_URL);
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let err = LoadoutConfig::from_toml("[bungie]\ntimeout_secs = 0\n").unwrap_err();
        assert!(err.to_string().contains("bungie.timeout_secs"));
    }

    #[test]
    fn test_non_http_url_rejected() {
        let err = LoadoutConfig::from_toml("[bungie]\ntoken_url = \"ftp://x\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn test_bad_public_origin_rejected() {
        let err =
            LoadoutConfig::from_toml("[server]\npublic_origin = \"example.com\"\n").unwrap_err();
        assert!(err.to_string().contains("server.public_origin"));
    }

    #[test]
    fn test_socket_addr() {
        let section = ServerSection {
            bind: "127.0.0.1".to_string(),
            port: 3000,
            ..Default::default()
        };
        assert_eq!(section.socket_addr().unwrap().port(), 3000);

        let bad = ServerSection {
            bind: "not an address".to_string(),
            ..Default::default()
        };
        assert!(bad.socket_addr().is_err());
    }

    #[test]
    fn test_socket_addr_ipv6() {
        let any = ServerSection {
            bind: "::".to_string(),
            port: 8080,
            ..Default::default()
        };
        let addr = any.socket_addr().unwrap();
        assert!(addr.is_ipv6());
        assert_eq!(addr.port(), 8080);

        let loopback = ServerSection {
            bind: "[::1]".to_string(),
            port: 9000,
            ..Default::default()
        };
        assert_eq!(loopback.socket_addr().unwrap(), "[::1]:9000".parse().unwrap());
    }

    #[test]
    fn test_malformed_toml() {
        assert!(matches!(
            LoadoutConfig::from_toml("[server\nport = 1"),
            Err(ConfigError::Parse(_))
        ));
    }
}
