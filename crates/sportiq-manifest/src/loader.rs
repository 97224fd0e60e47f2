//! Idempotent, coalesced manifest loading.

use crate::{validate, ManifestDoc, ManifestError, ValidatedManifest};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::{debug, info};

/// Loads and caches a validated layer manifest.
///
/// The first `load()` reads and validates the file; every later call
/// returns the cached result without touching the filesystem. Concurrent
/// callers during the first load all await the same in-flight read rather
/// than racing their own.
///
/// # Example
///
/// ```no_run
/// use sportiq_manifest::ManifestLoader;
///
/// # async fn demo() -> Result<(), sportiq_manifest::ManifestError> {
/// let loader = ManifestLoader::new("layers-manifest.json");
/// let manifest = loader.load().await?;
/// for layer in manifest.all_layers() {
///     println!("{}", layer.id);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct ManifestLoader {
    path: PathBuf,
    cache: OnceCell<Arc<ValidatedManifest>>,
}

impl ManifestLoader {
    /// Creates a loader for the manifest at `path`. Nothing is read until
    /// the first `load()`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            cache: OnceCell::new(),
        }
    }

    /// The manifest path this loader reads from.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the manifest, reading the file at most once.
    ///
    /// # Errors
    ///
    /// Returns [`ManifestError`] if the file cannot be read, is not valid
    /// JSON, or fails structural validation. A failed load is not cached;
    /// the next call retries.
    pub async fn load(&self) -> Result<Arc<ValidatedManifest>, ManifestError> {
        self.cache
            .get_or_try_init(|| async {
                let manifest = read_and_validate(&self.path).await?;
                info!(
                    path = %self.path.display(),
                    version = manifest.version(),
                    active = manifest.all_layers().len(),
                    staged = manifest.now_activating().len(),
                    "manifest loaded"
                );
                Ok(Arc::new(manifest))
            })
            .await
            .cloned()
    }

    /// Returns the cached manifest, if a load has completed.
    #[must_use]
    pub fn loaded(&self) -> Option<Arc<ValidatedManifest>> {
        self.cache.get().cloned()
    }
}

async fn read_and_validate(path: &Path) -> Result<ValidatedManifest, ManifestError> {
    debug!(path = %path.display(), "reading manifest");
    let text = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| ManifestError::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;

    let value: serde_json::Value = serde_json::from_str(&text)?;
    validate(&value)?;

    let doc: ManifestDoc = serde_json::from_value(value)?;
    Ok(ValidatedManifest::new(doc))
}
