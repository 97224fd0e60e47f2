//! Dependency-satisfaction reporting.
//!
//! When the layer manager checks whether a layer may be enabled, it
//! evaluates **all** declared dependencies rather than stopping at the
//! first gap, so callers can surface every problem at once.

use crate::LayerId;
use serde::{Deserialize, Serialize};

/// Why a declared dependency is not satisfied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MissingReason {
    /// The dependency id is not present in the registry at all.
    NotRegistered,

    /// The dependency is registered but disabled.
    Disabled,

    /// The dependency is registered and enabled but not currently active.
    NotActive,
}

impl std::fmt::Display for MissingReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotRegistered => write!(f, "not-registered"),
            Self::Disabled => write!(f, "disabled"),
            Self::NotActive => write!(f, "not-active"),
        }
    }
}

/// One unsatisfied dependency and the reason it is unsatisfied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissingDependency {
    /// The dependency's layer id.
    pub id: LayerId,
    /// Why it does not satisfy the dependent layer.
    pub reason: MissingReason,
}

/// Result of a full dependency-satisfaction check for one layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyReport {
    /// `true` when every declared dependency is registered, enabled, and active.
    pub satisfied: bool,
    /// Every unsatisfied dependency, in declaration order.
    pub missing: Vec<MissingDependency>,
}

impl DependencyReport {
    /// A report with no gaps.
    #[must_use]
    pub fn satisfied() -> Self {
        Self {
            satisfied: true,
            missing: Vec::new(),
        }
    }

    /// A report built from the collected gaps.
    #[must_use]
    pub fn with_missing(missing: Vec<MissingDependency>) -> Self {
        Self {
            satisfied: missing.is_empty(),
            missing,
        }
    }
}
