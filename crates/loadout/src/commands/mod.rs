//! CLI command handlers.

pub mod check;
pub mod start;

use loadout_config::LoadoutConfig;

/// Shared context for all commands.
#[derive(Debug, Clone)]
pub struct Context {
    /// Configuration resolved from file and defaults.
    pub config: LoadoutConfig,
    /// Verbose output enabled.
    pub verbose: bool,
}
