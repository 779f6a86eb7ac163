//! OAuth 2.0 authorization-code flow against Bungie.net.
//!
//! Bungie's confidential-client flow: the browser is sent to the authorize
//! endpoint with our client id, comes back with a single-use code, and the
//! server trades that code (plus the client secret) for an access token.

use std::fmt;

use reqwest::header;
use serde::Deserialize;

use crate::client::{BungieClient, check_status};
use crate::error::{BungieError, Result};

/// Build the authorization URL the browser is redirected to.
pub fn build_authorization_url(authorize_url: &str, client_id: &str) -> String {
    let params = [("client_id", client_id), ("response_type", "code")];

    let query = params
        .iter()
        .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&");

    format!("{}?{}", authorize_url, query)
}

/// Build the front-end URL carrying the token in its fragment.
///
/// Fragments are never sent to servers, so the token stays out of access logs.
pub fn fragment_redirect_url(origin: &str, access_token: &str) -> String {
    format!(
        "{}/#access_token={}",
        origin.trim_end_matches('/'),
        urlencoding::encode(access_token)
    )
}

/// Token endpoint response.
#[derive(Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub expires_in: Option<u64>,
    #[serde(default)]
    pub membership_id: Option<String>,
}

impl fmt::Debug for TokenResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenResponse")
            .field("access_token", &"[redacted]")
            .field("token_type", &self.token_type)
            .field("expires_in", &self.expires_in)
            .field("membership_id", &self.membership_id)
            .finish()
    }
}

impl BungieClient {
    /// Authorization URL for this client's configured endpoint and client id.
    pub fn authorization_url(&self) -> String {
        build_authorization_url(&self.endpoints.authorize_url, self.credentials.client_id())
    }

    /// Exchange an authorization code for an access token.
    ///
    /// Exactly one POST; never retried.
    pub async fn exchange_code(&self, code: &str) -> Result<TokenResponse> {
        let form = [
            ("grant_type", "authorization_code"),
            ("code", code),
            ("client_id", self.credentials.client_id()),
            ("client_secret", self.credentials.client_secret()),
        ];

        let response = self
            .http
            .post(&self.endpoints.token_url)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .form(&form)
            .send()
            .await?;

        let response = check_status(response).await?;

        let body = response.text().await?;
        let token: TokenResponse = serde_json::from_str(&body).map_err(|e| {
            BungieError::InvalidResponse(format!("Failed to parse token response: {}", e))
        })?;

        if token.access_token.is_empty() {
            return Err(BungieError::InvalidResponse(
                "Token response has an empty access_token".to_string(),
            ));
        }

        tracing::debug!(
            token_type = ?token.token_type,
            expires_in = ?token.expires_in,
            "Token exchange succeeded"
        );

        Ok(token)
    }
}
