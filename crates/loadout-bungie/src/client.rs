//! Shared HTTP client for every outbound Bungie.net call.

use std::time::Duration;

use loadout_config::{BungieSection, Credentials};
use reqwest::Client;
use reqwest::redirect::Policy;

use crate::error::{BungieError, Result};

/// Header carrying the server-held API key.
pub const API_KEY_HEADER: &str = "X-API-Key";

/// Bungie.net client holding the endpoints, credentials and connection pool.
///
/// Cheap to clone; the underlying `reqwest::Client` is reference counted.
#[derive(Debug, Clone)]
pub struct BungieClient {
    pub(crate) http: Client,
    pub(crate) endpoints: BungieSection,
    pub(crate) credentials: Credentials,
}

impl BungieClient {
    /// Build a client whose every request is bounded by `endpoints.timeout_secs`.
    ///
    /// Redirects are never followed: a 3xx is an upstream failure, and the
    /// API key or client secret never reaches the host named in `Location`.
    pub fn new(endpoints: BungieSection, credentials: Credentials) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(endpoints.timeout_secs))
            .redirect(Policy::none())
            .build()
            .map_err(|e| BungieError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            endpoints,
            credentials,
        })
    }

    pub fn endpoints(&self) -> &BungieSection {
        &self.endpoints
    }

    pub fn client_id(&self) -> &str {
        self.credentials.client_id()
    }
}

/// Turn a non-2xx response into [`BungieError::Status`], keeping the body for logs.
pub(crate) async fn check_status(response: reqwest::Response) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(BungieError::Status {
        status: status.as_u16(),
        body,
    })
}
