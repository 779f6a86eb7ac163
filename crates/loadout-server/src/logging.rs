//! Access log.
//!
//! One line per request, tagged with the part of the relay that served it.
//! Query strings are never logged: `/callback` carries the authorization code
//! there.

use std::time::Instant;

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::Response,
};

use crate::state::AppState;

/// Which part of the relay served a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteKind {
    Login,
    Callback,
    Relay,
    Health,
    /// Anything else; served from the front-end bundle or 404.
    Frontend,
}

impl RouteKind {
    pub fn from_path(path: &str) -> Self {
        match path {
            "/login" => RouteKind::Login,
            "/callback" => RouteKind::Callback,
            "/health" => RouteKind::Health,
            p if p.starts_with("/api/") => RouteKind::Relay,
            _ => RouteKind::Frontend,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RouteKind::Login => "login",
            RouteKind::Callback => "callback",
            RouteKind::Relay => "relay",
            RouteKind::Health => "health",
            RouteKind::Frontend => "frontend",
        }
    }
}

/// Marks a response produced by a failed Bungie call.
///
/// Set by [`ServerError`](crate::ServerError) so the access log can report the
/// upstream status next to the one sent to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpstreamStatus(pub Option<u16>);

/// Log route kind, status and latency for each request.
pub async fn access_log(
    State(state): State<AppState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    if !state.config.request_logging {
        return next.run(request).await;
    }

    let route = RouteKind::from_path(request.uri().path()).as_str();
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    let started = Instant::now();
    let response = next.run(request).await;
    let elapsed_ms = started.elapsed().as_millis() as u64;
    let status = response.status().as_u16();

    match response.extensions().get::<UpstreamStatus>() {
        // Upstream diagnostics were already logged where the call failed.
        Some(UpstreamStatus(upstream_status)) => tracing::warn!(
            route,
            %method,
            %path,
            status,
            upstream_status = ?upstream_status,
            elapsed_ms,
            "Bungie call failed"
        ),
        None if response.status().is_server_error() => {
            tracing::error!(route, %method, %path, status, elapsed_ms, "Request failed")
        }
        None => tracing::info!(route, %method, %path, status, elapsed_ms, "Request served"),
    }

    response
}
