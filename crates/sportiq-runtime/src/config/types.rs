//! Configuration types.
//!
//! All types implement [`Default`] for compile-time fallback values.

use serde::{Deserialize, Serialize};

/// Main configuration structure.
///
/// This is the unified configuration after merging all layers.
///
/// # Serialization
///
/// Serializes to TOML for file storage. Every field carries
/// `#[serde(default)]`, so partial config files are valid.
///
/// # Example
///
/// ```
/// use sportiq_runtime::config::SportiqConfig;
///
/// let config = SportiqConfig::default();
/// assert!(!config.debug);
/// assert_eq!(config.runtime.load_timeout_ms, 5_000);
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SportiqConfig {
    /// Enable debug mode (verbose logging, diagnostics).
    pub debug: bool,

    /// Runtime core configuration.
    pub runtime: RuntimeConfig,

    /// Health monitoring configuration.
    pub health: HealthConfig,

    /// Layer manager configuration.
    pub manager: ManagerConfig,
}

impl SportiqConfig {
    /// Creates a new config with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Serializes to TOML string.
    ///
    /// # Errors
    ///
    /// Returns error if serialization fails.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Deserializes from TOML string.
    ///
    /// # Errors
    ///
    /// Returns error if deserialization fails.
    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(toml_str)
    }

    /// Merges another config into this one.
    ///
    /// Values from `other` override values in `self` only if they
    /// differ from the default. This enables layered configuration.
    pub fn merge(&mut self, other: &Self) {
        let default = Self::default();

        if other.debug != default.debug {
            self.debug = other.debug;
        }

        self.runtime.merge(&other.runtime);
        self.health.merge(&other.health);
        self.manager.merge(&other.manager);
    }
}

/// Runtime core configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Maximum entries retained in the runtime error log.
    ///
    /// Older entries are dropped once the cap is reached.
    pub error_log_cap: usize,

    /// Bound on a single layer load (config read + init), in milliseconds.
    pub load_timeout_ms: u64,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            error_log_cap: 256,
            load_timeout_ms: 5_000,
        }
    }
}

impl RuntimeConfig {
    fn merge(&mut self, other: &Self) {
        let default = Self::default();

        if other.error_log_cap != default.error_log_cap {
            self.error_log_cap = other.error_log_cap;
        }
        if other.load_timeout_ms != default.load_timeout_ms {
            self.load_timeout_ms = other.load_timeout_ms;
        }
    }
}

/// Health monitoring configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct HealthConfig {
    /// Interval between health polls in milliseconds.
    pub poll_interval_ms: u64,
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 5_000,
        }
    }
}

impl HealthConfig {
    fn merge(&mut self, other: &Self) {
        let default = Self::default();

        if other.poll_interval_ms != default.poll_interval_ms {
            self.poll_interval_ms = other.poll_interval_ms;
        }
    }
}

/// What `disable()` does when the target still has active dependents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisablePolicy {
    /// Allow the disable and log a warning naming the dependents.
    #[default]
    Warn,
    /// Disable the dependents transitively as well.
    Cascade,
}

/// Layer manager configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ManagerConfig {
    /// Policy applied when disabling a layer with active dependents.
    pub disable_policy: DisablePolicy,
}

impl ManagerConfig {
    fn merge(&mut self, other: &Self) {
        let default = Self::default();

        if other.disable_policy != default.disable_policy {
            self.disable_policy = other.disable_policy;
        }
    }
}
