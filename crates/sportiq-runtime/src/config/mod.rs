//! Runtime configuration: types, layered loading, and errors.
//!
//! Configuration merges four layers, later layers overriding earlier:
//!
//! ```text
//! defaults → ~/.sportiq/config.toml → <project>/.sportiq/config.toml → SPORTIQ_* env
//! ```

mod error;
mod loader;
mod types;

pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use types::{DisablePolicy, HealthConfig, ManagerConfig, RuntimeConfig, SportiqConfig};

use std::path::PathBuf;

/// Project-relative config directory name.
pub const PROJECT_CONFIG_DIR: &str = ".sportiq";

/// Config file name inside a config directory.
pub const PROJECT_CONFIG_FILE: &str = "config.toml";

/// Returns the default global config path (`~/.sportiq/config.toml`).
#[must_use]
pub fn default_config_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(PROJECT_CONFIG_DIR)
        .join(PROJECT_CONFIG_FILE)
}
