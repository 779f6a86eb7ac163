//! Config file discovery.
//!
//! Resolution order:
//! 1. Explicit path (`--config`), which must exist
//! 2. `./loadout.toml`, if present
//! 3. Built-in defaults

use std::path::{Path, PathBuf};

use crate::{ConfigError, LoadoutConfig, Result};

/// Default config filename, looked up in the working directory.
pub const PROJECT_CONFIG_FILE: &str = "loadout.toml";

/// Result of config discovery and loading.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    /// The resolved configuration.
    pub config: LoadoutConfig,
    /// File the config came from, `None` when only defaults were used.
    pub source: Option<PathBuf>,
}

/// Load configuration, preferring `explicit` over the project-local file.
pub fn load_config(explicit: Option<&Path>) -> Result<LoadedConfig> {
    load_config_from_dir(explicit, Path::new("."))
}

/// Same as [`load_config`] but looks for the project-local file in `dir`.
pub fn load_config_from_dir(explicit: Option<&Path>, dir: &Path) -> Result<LoadedConfig> {
    if let Some(path) = explicit {
        return Ok(LoadedConfig {
            config: load_config_file(path)?,
            source: Some(path.to_path_buf()),
        });
    }

    let project_path = dir.join(PROJECT_CONFIG_FILE);
    if project_path.is_file() {
        return Ok(LoadedConfig {
            config: load_config_file(&project_path)?,
            source: Some(project_path),
        });
    }

    Ok(LoadedConfig {
        config: LoadoutConfig::default(),
        source: None,
    })
}

/// Load config from a specific file path (no discovery).
pub fn load_config_file(path: &Path) -> Result<LoadoutConfig> {
    let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
        path: path.display().to_string(),
        source: e,
    })?;
    LoadoutConfig::from_toml(&contents)
}
