//! Error types for vendor calls.

/// Result type alias for this crate.
pub type Result<T> = std::result::Result<T, BungieError>;

/// Errors from an outbound call to Bungie.net.
#[derive(Debug, thiserror::Error)]
pub enum BungieError {
    /// Transport failure before any response arrived.
    #[error("Network error: {0}")]
    Network(String),

    /// The call exceeded the configured timeout.
    #[error("Upstream request timed out")]
    Timeout,

    /// Bungie answered with a non-2xx status.
    #[error("Upstream returned status {status}")]
    Status { status: u16, body: String },

    /// Bungie answered 2xx but the body was not what we expected.
    #[error("Invalid upstream response: {0}")]
    InvalidResponse(String),

    /// A user-scoped endpoint was called without a bearer token.
    #[error("Endpoint {0} requires a user access token")]
    MissingToken(&'static str),

    /// The HTTP client could not be built.
    #[error("Config error: {0}")]
    Config(String),
}

impl BungieError {
    /// Upstream HTTP status, when one was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            BungieError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Upstream diagnostic body, when one was received.
    pub fn body(&self) -> Option<&str> {
        match self {
            BungieError::Status { body, .. } if !body.is_empty() => Some(body),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for BungieError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            BungieError::Timeout
        } else {
            BungieError::Network(e.to_string())
        }
    }
}
