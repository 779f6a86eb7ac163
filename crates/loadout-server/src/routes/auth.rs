//! Login redirect and OAuth callback.

use axum::{
    extract::{Query, State},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
};
use loadout_bungie::fragment_redirect_url;
use serde::Deserialize;

use crate::error::{Result, ServerError};
use crate::state::AppState;

/// Query parameters Bungie appends to the callback URL.
#[derive(Debug, Default, Deserialize)]
pub struct CallbackQuery {
    pub code: Option<String>,
    /// Set instead of `code` when the user declines consent.
    pub error: Option<String>,
    pub error_description: Option<String>,
}

/// 302 Found with a `Location` header.
fn found(location: &str) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location)]).into_response()
}

/// GET /login
///
/// Sends the browser to the Bungie authorize page.
pub async fn login_handler(State(state): State<AppState>) -> Response {
    found(&state.bungie.authorization_url())
}

/// GET /callback?code=...
///
/// Trades the code for an access token and sends the browser back to the
/// front end with the token in the URL fragment.
pub async fn callback_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<CallbackQuery>,
) -> Result<Response> {
    let code = match params.code.as_deref().map(str::trim) {
        Some(code) if !code.is_empty() => code.to_string(),
        _ => {
            if let Some(error) = &params.error {
                tracing::warn!(
                    error = %error,
                    description = params.error_description.as_deref().unwrap_or(""),
                    "Authorization was not granted"
                );
            }
            return Err(ServerError::MissingCode);
        }
    };

    let origin = redirect_origin(&state, &headers)?;

    let token = state.bungie.exchange_code(&code).await.map_err(|e| {
        tracing::error!(
            upstream_status = ?e.status(),
            upstream_body = e.body().unwrap_or(""),
            error = %e,
            "Error fetching access token"
        );
        ServerError::TokenExchange
    })?;

    tracing::info!(
        membership_id = token.membership_id.as_deref().unwrap_or("unknown"),
        "Login completed, redirecting to front end"
    );

    Ok(found(&fragment_redirect_url(&origin, &token.access_token)))
}

/// Origin the browser returns to: configured public origin, else `https://<Host>`.
fn redirect_origin(state: &AppState, headers: &HeaderMap) -> Result<String> {
    if let Some(origin) = &state.config.public_origin {
        return Ok(origin.clone());
    }

    let host = headers
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|h| !h.is_empty() && !h.contains(['/', '#', '?', '@', ' ']))
        .ok_or_else(|| ServerError::BadRequest("Missing or invalid Host header".to_string()))?;

    Ok(format!("https://{}", host))
}
