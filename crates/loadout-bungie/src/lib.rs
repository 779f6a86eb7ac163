//! Bungie.net client for the Loadout relay.
//!
//! # Components
//!
//! - [`oauth`]: authorize URL, code-for-token exchange, fragment redirect URL
//! - [`platform`]: read-only platform calls with the API key injected
//! - [`client`]: shared connection pool with a per-request timeout

pub mod client;
pub mod error;
pub mod oauth;
pub mod platform;

pub use client::{API_KEY_HEADER, BungieClient};
pub use error::{BungieError, Result};
pub use oauth::{TokenResponse, build_authorization_url, fragment_redirect_url};
pub use platform::{PlatformEndpoint, PlatformResponse};
