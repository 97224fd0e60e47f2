//! Layer identifier type.
//!
//! Layer ids are declared as plain strings in the manifest. Internally each
//! id also carries a deterministic UUID v5 derived from the string, so ids
//! compare and hash consistently across processes and machines.

use serde::{Deserialize, Serialize};
use uuid::{uuid, Uuid};

/// SPORTIQ namespace UUID for deterministic UUID v5 generation.
const SPORTIQ_NAMESPACE: Uuid = uuid!("7f1c2ab4-5d0e-4b7a-9c3f-8e21d6a0b543");

/// Identifier for a layer in the SPORTIQ runtime.
///
/// A layer is a named feature unit activated by the orchestrator, e.g.
/// `comment-widgets`, `seo-meta`, or `analytics-collector`.
///
/// # UUID Strategy
///
/// The UUID is always derived from the name via UUID v5 (SHA-1 based), so:
///
/// - Same name always produces the same UUID
/// - Ids survive serialization as plain strings (manifest compatibility)
/// - Comparison and hashing are stable across processes
///
/// # Example
///
/// ```
/// use sportiq_types::LayerId;
///
/// let a = LayerId::new("seo-meta");
/// let b = LayerId::new("seo-meta");
/// assert_eq!(a, b);
/// assert_eq!(a.as_str(), "seo-meta");
/// assert_eq!(a.uuid(), b.uuid());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct LayerId {
    name: String,
    uuid: Uuid,
}

impl LayerId {
    /// Creates a [`LayerId`] from a manifest id string.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let uuid = Uuid::new_v5(&SPORTIQ_NAMESPACE, name.as_bytes());
        Self { name, uuid }
    }

    /// Returns the manifest-facing id string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.name
    }

    /// Returns the deterministic UUID for this id.
    #[must_use]
    pub fn uuid(&self) -> Uuid {
        self.uuid
    }
}

impl From<String> for LayerId {
    fn from(name: String) -> Self {
        Self::new(name)
    }
}

impl From<&str> for LayerId {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<LayerId> for String {
    fn from(id: LayerId) -> Self {
        id.name
    }
}

impl std::fmt::Display for LayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}
