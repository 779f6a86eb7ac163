//! Credential resolution from the process environment.
//!
//! The three vendor secrets are read exactly once at startup. Handlers receive
//! them through shared, immutable state and never touch the environment.

use std::fmt;

use crate::{ConfigError, Result};

/// Env var holding the OAuth client id.
pub const CLIENT_ID_VAR: &str = "BUNGIE_CLIENT_ID";

/// Env var holding the OAuth client secret.
pub const CLIENT_SECRET_VAR: &str = "BUNGIE_CLIENT_SECRET";

/// Env var holding the platform API key.
pub const API_KEY_VAR: &str = "BUNGIE_API_KEY";

/// Server-held vendor credentials.
///
/// `Debug` never prints the secret or the API key.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    client_id: String,
    client_secret: String,
    api_key: String,
}

impl Credentials {
    /// Build credentials from explicit values.
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            api_key: api_key.into(),
        }
    }

    /// Read credentials from the process environment.
    ///
    /// Fails listing every variable that is unset or empty.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read credentials through an arbitrary lookup.
    ///
    /// Values are trimmed, so a trailing newline from a mounted secret file
    /// does not end up in a header.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut missing = Vec::new();
        let mut read = |name: &str| match lookup(name).map(|v| v.trim().to_string()) {
            Some(value) if !value.is_empty() => value,
            _ => {
                missing.push(name.to_string());
                String::new()
            }
        };

        let client_id = read(CLIENT_ID_VAR);
        let client_secret = read(CLIENT_SECRET_VAR);
        let api_key = read(API_KEY_VAR);

        if !missing.is_empty() {
            return Err(ConfigError::MissingSecrets(missing));
        }

        Ok(Self {
            client_id,
            client_secret,
            api_key,
        })
    }

    /// OAuth client id. Public; it appears in the authorize URL.
    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    pub fn client_secret(&self) -> &str {
        &self.client_secret
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"[redacted]")
            .field("api_key", &"[redacted]")
            .finish()
    }
}
