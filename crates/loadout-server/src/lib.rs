//! HTTP server for the Loadout relay.
//!
//! Lets a browser client sign in with Bungie.net and read account data
//! without ever holding the client secret or API key.
//!
//! # Routes
//!
//! - `GET /login`: redirect to the Bungie authorize page
//! - `GET /callback`: exchange the code, redirect back with the token in the fragment
//! - `POST /api/get-user-profile`: relay to the current-user memberships endpoint
//! - `GET /api/get-public-milestones`: relay to the public milestones endpoint
//! - `GET /health`: liveness
//!
//! Everything else falls through to the static front-end bundle when one is
//! configured.
//!
//! # Example
//!
//! ```ignore
//! use loadout_bungie::BungieClient;
//! use loadout_config::{BungieSection, Credentials};
//! use loadout_server::{Server, ServerConfig};
//!
//! let bungie = BungieClient::new(BungieSection::default(), Credentials::from_env()?)?;
//! let server = Server::new(bungie, ServerConfig::new());
//! server.run_with_shutdown(async { tokio::signal::ctrl_c().await.ok(); }).await?;
//! ```

pub mod config;
pub mod error;
pub mod logging;
pub mod routes;
pub mod state;

pub use config::ServerConfig;
pub use error::{ErrorResponse, Result, ServerError};
pub use logging::{RouteKind, UpstreamStatus, access_log};
pub use state::AppState;

use std::future::Future;
use std::net::SocketAddr;

use axum::{
    Router,
    body::Body,
    http::Request,
    middleware,
    routing::{get, post},
};
use loadout_bungie::BungieClient;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::info;

/// The Loadout HTTP server.
pub struct Server {
    /// Application state.
    state: AppState,
}

impl Server {
    /// Create a new server with the given vendor client and configuration.
    pub fn new(bungie: BungieClient, config: ServerConfig) -> Self {
        Self {
            state: AppState::new(bungie, config),
        }
    }

    /// Create a server from a pre-built application state.
    pub fn from_state(state: AppState) -> Self {
        Self { state }
    }

    /// Build the router with all routes and middleware.
    pub fn router(&self) -> Router {
        let mut router = Router::new()
            .route("/health", get(routes::health_handler))
            .route("/login", get(routes::login_handler))
            .route("/callback", get(routes::callback_handler))
            .route("/api/get-user-profile", post(routes::user_profile_handler))
            .route(
                "/api/get-public-milestones",
                get(routes::public_milestones_handler),
            );

        if let Some(dir) = &self.state.config.static_dir {
            router = router.fallback_service(ServeDir::new(dir));
        }

        let mut router = router
            .layer(middleware::from_fn_with_state(
                self.state.clone(),
                logging::access_log,
            ))
            // Span records the path only; the query may hold an authorization code.
            .layer(
                TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                    tracing::info_span!(
                        "http",
                        method = %request.method(),
                        path = %request.uri().path(),
                    )
                }),
            )
            .with_state(self.state.clone());

        if self.state.config.cors {
            router = router.layer(
                CorsLayer::new()
                    .allow_origin(Any)
                    .allow_methods(Any)
                    .allow_headers(Any),
            );
        }

        router
    }

    /// Run on the configured address until `shutdown` resolves.
    pub async fn run_with_shutdown(
        self,
        shutdown: impl Future<Output = ()> + Send + 'static,
    ) -> Result<()> {
        let addr = self.state.config.bind_address;
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| ServerError::Internal(format!("Failed to bind {}: {}", addr, e)))?;

        self.serve(listener, shutdown).await
    }

    /// Serve on an already-bound listener (useful for tests and ephemeral ports).
    pub async fn serve(
        self,
        listener: TcpListener,
        shutdown: impl Future<Output = ()> + Send + 'static,
    ) -> Result<()> {
        let local_addr = listener
            .local_addr()
            .map_err(|e| ServerError::Internal(format!("Failed to read local address: {}", e)))?;
        let router = self.router();

        info!(addr = %local_addr, "Starting server");

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(|e| ServerError::Internal(format!("Server error: {}", e)))?;

        info!("Server stopped");
        Ok(())
    }

    /// Get the configured bind address.
    pub fn bind_address(&self) -> SocketAddr {
        self.state.config.bind_address
    }
}
