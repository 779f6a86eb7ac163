//! `GET /health`: liveness for load balancers. Never calls Bungie.

use axum::{Json, extract::State};
use serde::Serialize;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    /// Whether a front-end bundle is being served alongside the relay.
    pub frontend: bool,
}

pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        frontend: state.config.static_dir.is_some(),
    })
}
