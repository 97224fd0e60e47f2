//! Per-layer status tracking.
//!
//! Each registered layer carries its own status, tracked by the layer
//! manager. This is a separate state machine from the runtime lifecycle
//! stage: the stage governs the whole activation run, a [`LayerStatus`]
//! governs one layer.
//!
//! # Status Lifecycle
//!
//! ```text
//! Unknown → Active ⇄ Inactive
//!     │        │
//!     └──────→ Failed (sticky until re-enabled)
//! ```

use serde::{Deserialize, Serialize};

/// Execution status of a single registered layer.
///
/// | Status | Meaning |
/// |--------|---------|
/// | `Unknown` | Registered but never health-checked |
/// | `Active` | Loaded; all published state keys present |
/// | `Inactive` | Loaded or registered but state keys missing |
/// | `Failed` | Initialization or load failed |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayerStatus {
    /// Layer is registered but its health has never been derived.
    #[default]
    Unknown,

    /// Layer is loaded and healthy.
    Active,

    /// Layer is present but currently unhealthy or disabled.
    Inactive,

    /// Layer failed to load or initialize.
    ///
    /// Sticky: health polling does not clear it; only re-enabling does.
    Failed,
}

impl LayerStatus {
    /// Returns `true` if the layer is healthy and usable as a dependency.
    #[must_use]
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Active)
    }

    /// Returns `true` if the layer reached a failure state.
    #[must_use]
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed)
    }
}

impl std::fmt::Display for LayerStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unknown => write!(f, "unknown"),
            Self::Active => write!(f, "active"),
            Self::Inactive => write!(f, "inactive"),
            Self::Failed => write!(f, "failed"),
        }
    }
}
