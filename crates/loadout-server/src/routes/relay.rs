//! Credential-injecting relay endpoints.

use axum::{
    body::{Body, Bytes},
    extract::State,
    http::{StatusCode, header},
    response::Response,
};
use loadout_bungie::PlatformResponse;
use serde::Deserialize;

use crate::error::{Result, ServerError};
use crate::state::AppState;

/// Body of `POST /api/get-user-profile`.
#[derive(Debug, Default, Deserialize)]
pub struct ProfileRequest {
    #[serde(rename = "accessToken", default)]
    pub access_token: Option<String>,
}

impl ProfileRequest {
    /// Parse leniently: a missing, empty or malformed body yields no token.
    pub fn from_body(body: &[u8]) -> Self {
        serde_json::from_slice(body).unwrap_or_default()
    }

    /// The bearer token, if present and non-empty.
    pub fn token(&self) -> Option<&str> {
        self.access_token
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }
}

/// POST /api/get-user-profile
///
/// Forwards to Bungie's current-user memberships endpoint with the caller's
/// bearer token and the server's API key.
pub async fn user_profile_handler(State(state): State<AppState>, body: Bytes) -> Result<Response> {
    let request = ProfileRequest::from_body(&body);
    let token = request.token();
    tracing::debug!(token_present = token.is_some(), "User profile relay hit");

    let token = token.ok_or(ServerError::Unauthorized)?;

    let upstream = state
        .bungie
        .current_user_memberships(token)
        .await
        .map_err(|e| {
            ServerError::upstream(
                &e,
                "Failed to fetch user profile from Bungie.",
                state.config.echo_upstream_errors,
            )
        })?;

    tracing::debug!("User profile relayed");
    Ok(passthrough(upstream))
}

/// GET /api/get-public-milestones
pub async fn public_milestones_handler(State(state): State<AppState>) -> Result<Response> {
    let upstream = state.bungie.public_milestones().await.map_err(|e| {
        ServerError::upstream(
            &e,
            "Failed to fetch public milestones from Bungie.",
            state.config.echo_upstream_errors,
        )
    })?;

    Ok(passthrough(upstream))
}

/// 200 with the upstream body untouched.
fn passthrough(upstream: PlatformResponse) -> Response {
    let content_type = upstream
        .content_type
        .unwrap_or_else(|| "application/json".to_string());

    let mut response = Response::new(Body::from(upstream.body));
    *response.status_mut() = StatusCode::OK;
    if let Ok(value) = content_type.parse() {
        response.headers_mut().insert(header::CONTENT_TYPE, value);
    }
    response
}
