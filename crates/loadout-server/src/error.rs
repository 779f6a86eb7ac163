//! Error types for the server.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use loadout_bungie::BungieError;
use serde::Serialize;
use thiserror::Error;

use crate::logging::UpstreamStatus;

/// Server error type.
#[derive(Debug, Error)]
pub enum ServerError {
    /// `/callback` was hit without an authorization code.
    #[error("No authorization code provided.")]
    MissingCode,

    /// A relay call that needs a user token did not get one.
    #[error("No access token provided.")]
    Unauthorized,

    /// Bad request.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// The code-for-token exchange failed. Details are only in the log.
    #[error("Error during authentication. Check server logs.")]
    TokenExchange,

    /// A relayed platform call failed.
    #[error("{message}")]
    Upstream {
        /// Upstream HTTP status, when one was received.
        status: Option<u16>,
        /// Generic message for the caller.
        message: String,
        /// Upstream body, only populated when echoing is enabled.
        details: Option<serde_json::Value>,
    },

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ServerError {
    /// Map a failed platform call, logging the upstream diagnostics.
    ///
    /// `details` is filled from the upstream body only when `echo` is set.
    pub fn upstream(err: &BungieError, message: impl Into<String>, echo: bool) -> Self {
        let message = message.into();
        tracing::error!(
            upstream_status = ?err.status(),
            upstream_body = err.body().unwrap_or(""),
            error = %err,
            "{}",
            message
        );

        let details = if echo {
            err.body().map(|body| {
                serde_json::from_str(body)
                    .unwrap_or_else(|_| serde_json::Value::String(body.to_string()))
            })
        } else {
            None
        };

        ServerError::Upstream {
            status: err.status(),
            message,
            details,
        }
    }

    /// HTTP status for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            ServerError::MissingCode | ServerError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ServerError::Unauthorized => StatusCode::UNAUTHORIZED,
            ServerError::TokenExchange | ServerError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            ServerError::Upstream { status, .. } => status
                .and_then(|s| StatusCode::from_u16(s).ok())
                .filter(|s| s.is_client_error() || s.is_server_error())
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
        }
    }

    fn code(&self) -> &'static str {
        match self {
            ServerError::MissingCode => "missing_code",
            ServerError::Unauthorized => "unauthorized",
            ServerError::BadRequest(_) => "bad_request",
            ServerError::TokenExchange => "token_exchange_failed",
            ServerError::Upstream { .. } => "upstream_error",
            ServerError::Internal(_) => "internal_error",
        }
    }
}

/// Result type for server operations.
pub type Result<T> = std::result::Result<T, ServerError>;

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Human-readable error message.
    pub error: String,
    /// Error code for programmatic handling.
    pub code: String,
    /// Upstream diagnostics, when echoing is enabled.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();
        let code = self.code();
        let message = self.to_string();

        match &self {
            // Logged with the upstream diagnostics where the call failed.
            ServerError::Upstream { .. } | ServerError::TokenExchange => {}
            ServerError::Internal(_) => tracing::error!(code, error = %message, "Internal error"),
            _ => tracing::debug!(status = %status, code, error = %message, "Request rejected"),
        }

        let (upstream_status, details) = match self {
            ServerError::Upstream {
                status, details, ..
            } => (Some(UpstreamStatus(status)), details),
            _ => (None, None),
        };

        let body = ErrorResponse {
            error: message,
            code: code.to_string(),
            details,
        };

        let mut response = (status, Json(body)).into_response();
        if let Some(upstream_status) = upstream_status {
            response.extensions_mut().insert(upstream_status);
        }
        response
    }
}
