//! Configuration for the Loadout relay.
//!
//! - Optional TOML file (`loadout.toml`) for non-secret settings
//! - Vendor credentials from the environment, validated at startup

pub mod discovery;
pub mod error;
pub mod secrets;
pub mod types;

pub use discovery::{LoadedConfig, load_config, load_config_file, load_config_from_dir};
pub use error::{ConfigError, Result};
pub use secrets::{API_KEY_VAR, CLIENT_ID_VAR, CLIENT_SECRET_VAR, Credentials};
pub use types::*;
