//! Layer descriptor: the manifest's view of one layer.

use serde::{Deserialize, Serialize};
use sportiq_types::LayerId;
use std::path::PathBuf;

fn default_enabled() -> bool {
    true
}

/// Metadata for one orchestrated layer, parsed from the manifest.
///
/// # Invariants
///
/// - `id` is unique across the whole registry (enforced by manifest
///   validation and again at registration).
/// - Every id in `dependencies` must resolve to another known descriptor,
///   or be flagged missing by the graph/manager.
///
/// # Example manifest entry
///
/// ```json
/// {
///   "id": "comment-widgets",
///   "name": "Comment Widgets",
///   "entry": "comments",
///   "dependencies": ["session"],
///   "config": "configs/comments.json",
///   "category": "engagement",
///   "provides": ["comments:ready"]
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerDescriptor {
    /// Unique layer id.
    pub id: LayerId,

    /// Human-readable name.
    pub name: String,

    /// Factory key resolved against the layer factory registry.
    pub entry: String,

    /// Ids of layers this layer depends on.
    #[serde(default)]
    pub dependencies: Vec<LayerId>,

    /// Optional path to a per-layer JSON config document.
    ///
    /// Absence of the file at load time is non-fatal; the layer gets `{}`.
    #[serde(default)]
    pub config: Option<PathBuf>,

    /// Whether the layer participates in activation. Defaults to `true`.
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Free-form grouping label (e.g. "engagement", "seo", "analytics").
    #[serde(default)]
    pub category: String,

    /// State keys the layer publishes once active.
    ///
    /// Health polling derives active/inactive from the presence of these
    /// keys in the runtime state map.
    #[serde(default)]
    pub provides: Vec<String>,
}

impl LayerDescriptor {
    /// Creates a minimal descriptor; builder methods fill in the rest.
    #[must_use]
    pub fn new(id: impl Into<LayerId>, name: impl Into<String>, entry: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            entry: entry.into(),
            dependencies: Vec::new(),
            config: None,
            enabled: true,
            category: String::new(),
            provides: Vec::new(),
        }
    }

    /// Adds a dependency.
    #[must_use]
    pub fn with_dependency(mut self, id: impl Into<LayerId>) -> Self {
        self.dependencies.push(id.into());
        self
    }

    /// Sets the per-layer config path.
    #[must_use]
    pub fn with_config(mut self, path: impl Into<PathBuf>) -> Self {
        self.config = Some(path.into());
        self
    }

    /// Sets the category label.
    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    /// Declares a published state key.
    #[must_use]
    pub fn with_provides(mut self, key: impl Into<String>) -> Self {
        self.provides.push(key.into());
        self
    }

    /// Marks the layer disabled.
    #[must_use]
    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn descriptor_builder() {
        let desc = LayerDescriptor::new("comments", "Comment Widgets", "comments")
            .with_dependency("session")
            .with_config("configs/comments.json")
            .with_category("engagement")
            .with_provides("comments:ready");

        assert_eq!(desc.id.as_str(), "comments");
        assert_eq!(desc.dependencies.len(), 1);
        assert!(desc.enabled);
        assert_eq!(desc.provides, vec!["comments:ready"]);
    }

    #[test]
    fn descriptor_deserializes_with_defaults() {
        let json = r#"{"id": "seo", "name": "SEO Meta", "entry": "seo"}"#;
        let desc: LayerDescriptor = serde_json::from_str(json).unwrap();
        assert!(desc.enabled);
        assert!(desc.dependencies.is_empty());
        assert!(desc.config.is_none());
        assert!(desc.provides.is_empty());
    }

    #[test]
    fn descriptor_disabled() {
        let desc = LayerDescriptor::new("ticker", "Ticker", "ticker").disabled();
        assert!(!desc.enabled);
    }
}
