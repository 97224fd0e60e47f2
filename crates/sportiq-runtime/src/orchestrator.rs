//! Layer orchestrator: sequential, fault-isolated activation.
//!
//! # Activation pipeline
//!
//! ```text
//! manifest ──► register ──► toposort ──► for each layer, in order:
//!
//!   BeforeLoad hooks
//!        │
//!   factory construction (manifest `entry` → LayerFactories)
//!        │
//!   OnLoad hooks
//!        │
//!   config fetch + init          ← bounded by load_timeout_ms
//!        │
//!   AfterLoad hooks ── ok ──► status Active
//!        │
//!      error ──► OnError hooks + error log + status Failed, run continues
//! ```
//!
//! # Coalescing
//!
//! `load_layer` keeps one `OnceCell` per layer id: concurrent callers for
//! the same id await the same in-flight load, and a completed outcome is
//! returned without re-running init. A layer initializes at most once per
//! runtime, no matter how many paths request it.

use crate::config::SportiqConfig;
use crate::core::RuntimeCore;
use crate::error::LoadError;
use crate::factory::LayerFactories;
use crate::hooks::{HookPayload, HookRegistry};
use crate::manager::transition_status;
use crate::registry::SharedRegistry;
use serde_json::{json, Value};
use sportiq_event::LoadPhase;
use sportiq_graph::CycleReport;
use sportiq_layer::{LayerContext, LayerDescriptor, RuntimeHandle};
use sportiq_manifest::{ManifestError, ManifestLoader};
use sportiq_types::{ErrorCode, LayerId, LayerStatus};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, OnceCell};
use tracing::{debug, info, warn};

/// Outcome of one layer load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The layer initialized and is active.
    Loaded,
    /// The layer is disabled in the manifest and was not loaded.
    Skipped,
    /// The load failed; the error is already in the runtime error log.
    Failed {
        /// Stable error code of the failure.
        code: &'static str,
        /// Human-readable failure message.
        message: String,
    },
}

impl LoadOutcome {
    fn from_error(err: &LoadError) -> Self {
        Self::Failed {
            code: err.code(),
            message: err.to_string(),
        }
    }
}

/// Per-layer summary returned by [`Orchestrator::activate_all`].
#[derive(Debug)]
pub struct ActivationReport {
    /// Outcome per layer, in activation order.
    pub outcomes: Vec<(LayerId, LoadOutcome)>,
    /// Dependency cycles found during ordering; members were not loaded.
    pub cycles: Vec<CycleReport>,
}

impl ActivationReport {
    /// Number of successfully loaded layers.
    #[must_use]
    pub fn loaded(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|(_, o)| *o == LoadOutcome::Loaded)
            .count()
    }

    /// Number of failed layers (cycles excluded; see `cycles`).
    #[must_use]
    pub fn failed(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|(_, o)| matches!(o, LoadOutcome::Failed { .. }))
            .count()
    }

    /// Returns `true` if every non-skipped layer loaded and no cycles
    /// were found.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.failed() == 0 && self.cycles.is_empty()
    }
}

/// Drives manifest-declared layers through their load sequence.
pub struct Orchestrator {
    core: Arc<RuntimeCore>,
    registry: SharedRegistry,
    factories: Arc<LayerFactories>,
    loader: ManifestLoader,
    hooks: HookRegistry<LoadPhase>,
    loads: Mutex<HashMap<LayerId, Arc<OnceCell<LoadOutcome>>>>,
    load_timeout: Duration,
}

impl Orchestrator {
    /// Creates an orchestrator over the shared core and registry.
    #[must_use]
    pub fn new(
        core: Arc<RuntimeCore>,
        registry: SharedRegistry,
        factories: Arc<LayerFactories>,
        loader: ManifestLoader,
        config: &SportiqConfig,
    ) -> Self {
        Self {
            core,
            registry,
            factories,
            loader,
            hooks: HookRegistry::new(),
            loads: Mutex::new(HashMap::new()),
            load_timeout: Duration::from_millis(config.runtime.load_timeout_ms),
        }
    }

    /// Registers a load hook at `phase`. Hooks run in registration order
    /// around every layer load; a failing hook is logged, never fatal.
    pub fn on<F>(&self, phase: LoadPhase, name: impl Into<String>, callback: F)
    where
        F: Fn(&HookPayload) -> Result<(), String> + Send + Sync + 'static,
    {
        self.hooks.on(phase, name, callback);
    }

    /// Loads the manifest and activates every enabled layer sequentially
    /// in dependency order.
    ///
    /// A failed layer is marked `Failed` and the run continues; cyclic
    /// layers are marked `Failed` without being loaded. The run order is
    /// the graph's topological order, with ties resolved by manifest
    /// declaration order.
    ///
    /// # Errors
    ///
    /// Returns [`ManifestError`] only when the manifest itself cannot be
    /// loaded; per-layer failures are reported in the
    /// [`ActivationReport`].
    pub async fn activate_all(&self) -> Result<ActivationReport, ManifestError> {
        let manifest = match self.loader.load().await {
            Ok(manifest) => manifest,
            Err(err) => {
                self.core
                    .log_error(&err.to_string(), "orchestrator:manifest");
                return Err(err);
            }
        };

        self.register_descriptors(manifest.all_layers());

        let sorted = {
            let registry = self.registry.read().expect("lock poisoned");
            registry.graph().resolve_order()
        };

        for cycle in &sorted.cycles {
            let members: Vec<&str> = cycle.members.iter().map(LayerId::as_str).collect();
            self.core.log_error(
                &format!("dependency cycle: {}", members.join(" -> ")),
                "orchestrator:graph",
            );
            for member in &cycle.members {
                transition_status(&self.core, &self.registry, member, LayerStatus::Failed);
            }
        }

        let mut outcomes = Vec::with_capacity(sorted.order.len());
        for id in &sorted.order {
            let outcome = self.load_layer(id).await;
            outcomes.push((id.clone(), outcome));
        }

        let report = ActivationReport {
            outcomes,
            cycles: sorted.cycles,
        };
        info!(
            loaded = report.loaded(),
            failed = report.failed(),
            cycles = report.cycles.len(),
            "activation complete"
        );
        Ok(report)
    }

    /// Loads a single layer, coalescing concurrent requests.
    ///
    /// The first caller for an id performs the load; everyone else awaits
    /// that same load and shares its outcome. Later calls return the
    /// cached outcome immediately. A disabled layer is skipped without
    /// caching anything — a skip is not a load — so it loads normally
    /// once re-enabled.
    pub async fn load_layer(&self, id: &LayerId) -> LoadOutcome {
        let enabled = {
            let registry = self.registry.read().expect("lock poisoned");
            registry.get(id).map(|d| d.enabled)
        };
        match enabled {
            None => return self.fail(id, &LoadError::UnknownLayer(id.clone())),
            Some(false) => {
                debug!(layer = %id, "layer disabled, skipping");
                transition_status(&self.core, &self.registry, id, LayerStatus::Inactive);
                return LoadOutcome::Skipped;
            }
            Some(true) => {}
        }

        let cell = {
            let mut loads = self.loads.lock().await;
            loads.entry(id.clone()).or_default().clone()
        };

        cell.get_or_init(|| self.perform_load(id)).await.clone()
    }

    fn register_descriptors(&self, descriptors: &[LayerDescriptor]) {
        let mut registry = self.registry.write().expect("lock poisoned");
        for desc in descriptors {
            if registry.contains(&desc.id) {
                continue;
            }
            let status = crate::manager::initial_status(&self.core, desc);
            // Cannot collide: checked above while holding the write lock
            if registry.register(desc.clone(), status).is_ok() {
                self.core.publish(sportiq_event::RuntimeEvent::LayerRegistered {
                    id: desc.id.clone(),
                });
            }
        }
    }

    async fn perform_load(&self, id: &LayerId) -> LoadOutcome {
        let descriptor = {
            let registry = self.registry.read().expect("lock poisoned");
            registry.get(id).cloned()
        };
        let Some(descriptor) = descriptor else {
            return self.fail(id, &LoadError::UnknownLayer(id.clone()));
        };

        debug!(layer = %id, entry = %descriptor.entry, "loading layer");
        self.dispatch(LoadPhase::BeforeLoad, HookPayload::for_layer(id));

        let Some(mut layer) = self.factories.create(&descriptor.entry) else {
            return self.fail(
                id,
                &LoadError::UnknownEntry {
                    id: id.clone(),
                    entry: descriptor.entry.clone(),
                },
            );
        };

        self.dispatch(LoadPhase::OnLoad, HookPayload::for_layer(id));

        // `init` is synchronous, so it runs on the blocking pool; the
        // timeout abandons a stalled layer instead of waiting it out.
        let core = self.core.clone();
        let init = tokio::time::timeout(self.load_timeout, async {
            let config = self.read_layer_config(&descriptor).await;
            tokio::task::spawn_blocking(move || {
                let mut ctx = LayerContext::new(core.as_ref(), config);
                layer.init(&mut ctx)
            })
            .await
        })
        .await;

        match init {
            Err(_) => self.fail(
                id,
                &LoadError::Timeout {
                    id: id.clone(),
                    timeout_ms: self.load_timeout.as_millis() as u64,
                },
            ),
            Ok(Err(join_err)) => self.fail(
                id,
                &LoadError::InitFailed {
                    id: id.clone(),
                    message: join_err.to_string(),
                },
            ),
            Ok(Ok(Err(layer_err))) => self.fail(
                id,
                &LoadError::InitFailed {
                    id: id.clone(),
                    message: layer_err.to_string(),
                },
            ),
            Ok(Ok(Ok(()))) => {
                self.dispatch(LoadPhase::AfterLoad, HookPayload::for_layer(id));
                transition_status(&self.core, &self.registry, id, LayerStatus::Active);
                info!(layer = %id, "layer active");
                LoadOutcome::Loaded
            }
        }
    }

    /// Reads the per-layer config document. A missing or unreadable file
    /// yields `{}`; layers must cope with empty config.
    async fn read_layer_config(&self, descriptor: &LayerDescriptor) -> Value {
        let Some(ref rel) = descriptor.config else {
            return json!({});
        };

        let path = match self.loader.path().parent() {
            Some(base) => base.join(rel),
            None => rel.clone(),
        };

        match tokio::fs::read_to_string(&path).await {
            Ok(text) => match serde_json::from_str(&text) {
                Ok(value) => value,
                Err(err) => {
                    self.core.log_error_with_context(
                        &format!("invalid layer config: {err}"),
                        descriptor.id.as_str(),
                        &path.display().to_string(),
                    );
                    json!({})
                }
            },
            Err(err) => {
                debug!(
                    layer = %descriptor.id,
                    path = %path.display(),
                    %err,
                    "layer config unavailable, using empty"
                );
                json!({})
            }
        }
    }

    fn dispatch(&self, phase: LoadPhase, payload: HookPayload) {
        for failure in self.hooks.dispatch(&phase, &payload) {
            self.core
                .log_error(&failure.message, &format!("load-hook:{}", failure.hook));
        }
    }

    fn fail(&self, id: &LayerId, err: &LoadError) -> LoadOutcome {
        warn!(layer = %id, error = %err, "layer load failed");
        self.dispatch(
            LoadPhase::OnError,
            HookPayload::for_layer(id).with_detail(err.to_string()),
        );
        self.core
            .log_error_with_context(&err.to_string(), id.as_str(), err.code());
        transition_status(&self.core, &self.registry, id, LayerStatus::Failed);
        LoadOutcome::from_error(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::LayerRegistry;
    use sportiq_layer::testing::{CountingLayer, FailingLayer, PublishingLayer};
    use std::io::Write;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn manifest_file(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    fn orchestrator(
        manifest: &tempfile::NamedTempFile,
        factories: LayerFactories,
    ) -> Orchestrator {
        Orchestrator::new(
            Arc::new(RuntimeCore::default()),
            LayerRegistry::shared(),
            Arc::new(factories),
            ManifestLoader::new(manifest.path()),
            &SportiqConfig::default(),
        )
    }

    fn publishing(entry: &str, id: &str) -> impl Fn() -> sportiq_layer::BoxedLayer {
        let id = id.to_string();
        let key = format!("{entry}:ready");
        move || Box::new(PublishingLayer::new(id.clone(), vec![key.clone()]))
    }

    #[tokio::test]
    async fn activates_in_dependency_order() {
        let file = manifest_file(
            r#"{
                "manifest_version": "1.0",
                "layers": {
                    "active": [
                        {"id": "b", "name": "B", "entry": "b", "dependencies": ["a"]},
                        {"id": "a", "name": "A", "entry": "a"}
                    ]
                }
            }"#,
        );
        let factories = LayerFactories::new()
            .with("a", publishing("a", "a"))
            .with("b", publishing("b", "b"));
        let orch = orchestrator(&file, factories);

        let report = orch.activate_all().await.unwrap();

        let order: Vec<&str> = report
            .outcomes
            .iter()
            .map(|(id, _)| id.as_str())
            .collect();
        assert_eq!(order, vec!["a", "b"]);
        assert!(report.is_clean());
        assert_eq!(report.loaded(), 2);
    }

    #[tokio::test]
    async fn partial_failure_is_isolated() {
        let file = manifest_file(
            r#"{
                "manifest_version": "1.0",
                "layers": {
                    "active": [
                        {"id": "a", "name": "A", "entry": "a"},
                        {"id": "b", "name": "B", "entry": "broken"},
                        {"id": "c", "name": "C", "entry": "c"}
                    ]
                }
            }"#,
        );
        let factories = LayerFactories::new()
            .with("a", publishing("a", "a"))
            .with("broken", || {
                Box::new(FailingLayer::new("b", "backend unreachable"))
            })
            .with("c", publishing("c", "c"));
        let orch = orchestrator(&file, factories);

        let report = orch.activate_all().await.unwrap();

        assert_eq!(report.loaded(), 2);
        assert_eq!(report.failed(), 1);

        let registry = orch.registry.read().unwrap();
        assert_eq!(registry.status(&LayerId::new("a")), LayerStatus::Active);
        assert_eq!(registry.status(&LayerId::new("b")), LayerStatus::Failed);
        assert_eq!(registry.status(&LayerId::new("c")), LayerStatus::Active);
        drop(registry);

        // The failure landed in the error log
        let errors = orch.core.errors();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.contains("backend unreachable"));
    }

    #[tokio::test]
    async fn concurrent_loads_initialize_once() {
        let file = manifest_file(
            r#"{
                "manifest_version": "1.0",
                "layers": {
                    "active": [{"id": "ticker", "name": "Ticker", "entry": "ticker"}]
                }
            }"#,
        );
        let counter = Arc::new(AtomicUsize::new(0));
        let factory_counter = counter.clone();
        let factories = LayerFactories::new().with("ticker", move || {
            Box::new(CountingLayer::with_counter("ticker", factory_counter.clone()))
        });
        let orch = Arc::new(orchestrator(&file, factories));

        // Ensure descriptors are registered before racing load_layer.
        orch.activate_all().await.unwrap();

        let id = LayerId::new("ticker");
        let a = tokio::spawn({
            let orch = orch.clone();
            let id = id.clone();
            async move { orch.load_layer(&id).await }
        });
        let b = tokio::spawn({
            let orch = orch.clone();
            let id = id.clone();
            async move { orch.load_layer(&id).await }
        });

        assert_eq!(a.await.unwrap(), LoadOutcome::Loaded);
        assert_eq!(b.await.unwrap(), LoadOutcome::Loaded);
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn unknown_entry_fails_layer() {
        let file = manifest_file(
            r#"{
                "manifest_version": "1.0",
                "layers": {
                    "active": [{"id": "x", "name": "X", "entry": "ghost"}]
                }
            }"#,
        );
        let orch = orchestrator(&file, LayerFactories::new());

        let report = orch.activate_all().await.unwrap();
        match &report.outcomes[0].1 {
            LoadOutcome::Failed { code, .. } => assert_eq!(*code, "LOAD_UNKNOWN_ENTRY"),
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[tokio::test]
    async fn disabled_layer_skipped() {
        let file = manifest_file(
            r#"{
                "manifest_version": "1.0",
                "layers": {
                    "active": [
                        {"id": "ads", "name": "Ads", "entry": "ads", "enabled": false}
                    ]
                }
            }"#,
        );
        let invoked = Arc::new(AtomicUsize::new(0));
        let factory_counter = invoked.clone();
        let factories = LayerFactories::new().with("ads", move || {
            factory_counter.fetch_add(1, Ordering::SeqCst);
            Box::new(PublishingLayer::new("ads", Vec::new()))
        });
        let orch = orchestrator(&file, factories);

        let report = orch.activate_all().await.unwrap();
        assert_eq!(report.outcomes[0].1, LoadOutcome::Skipped);
        assert_eq!(invoked.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn reenabled_layer_loads_after_skip() {
        let file = manifest_file(
            r#"{
                "manifest_version": "1.0",
                "layers": {
                    "active": [
                        {"id": "ads", "name": "Ads", "entry": "ads", "enabled": false}
                    ]
                }
            }"#,
        );
        let counter = Arc::new(AtomicUsize::new(0));
        let factory_counter = counter.clone();
        let factories = LayerFactories::new().with("ads", move || {
            Box::new(CountingLayer::with_counter("ads", factory_counter.clone()))
        });
        let orch = orchestrator(&file, factories);

        let id = LayerId::new("ads");
        let report = orch.activate_all().await.unwrap();
        assert_eq!(report.outcomes[0].1, LoadOutcome::Skipped);
        assert_eq!(orch.load_layer(&id).await, LoadOutcome::Skipped);
        assert_eq!(counter.load(Ordering::SeqCst), 0);

        let manager = crate::manager::LayerManager::new(
            orch.core.clone(),
            orch.registry.clone(),
            &SportiqConfig::default(),
        );
        assert!(manager.enable(&id));

        assert_eq!(orch.load_layer(&id).await, LoadOutcome::Loaded);
        assert_eq!(counter.load(Ordering::SeqCst), 1);
        assert_eq!(
            orch.registry.read().unwrap().status(&id),
            LayerStatus::Active
        );
    }

    struct StalledLayer {
        id: LayerId,
        hold: Duration,
    }

    impl sportiq_layer::Layer for StalledLayer {
        fn id(&self) -> &LayerId {
            &self.id
        }

        fn init(
            &mut self,
            _ctx: &mut LayerContext<'_>,
        ) -> Result<(), sportiq_layer::LayerError> {
            std::thread::sleep(self.hold);
            Ok(())
        }
    }

    #[tokio::test]
    async fn stalled_init_times_out() {
        let file = manifest_file(
            r#"{
                "manifest_version": "1.0",
                "layers": {
                    "active": [{"id": "replays", "name": "Replays", "entry": "replays"}]
                }
            }"#,
        );
        let factories = LayerFactories::new().with("replays", || {
            Box::new(StalledLayer {
                id: LayerId::new("replays"),
                hold: Duration::from_millis(400),
            })
        });
        let config = SportiqConfig {
            runtime: crate::config::RuntimeConfig {
                load_timeout_ms: 50,
                ..Default::default()
            },
            ..Default::default()
        };
        let orch = Orchestrator::new(
            Arc::new(RuntimeCore::default()),
            LayerRegistry::shared(),
            Arc::new(factories),
            ManifestLoader::new(file.path()),
            &config,
        );

        let report = orch.activate_all().await.unwrap();
        match &report.outcomes[0].1 {
            LoadOutcome::Failed { code, .. } => assert_eq!(*code, "LOAD_TIMEOUT"),
            other => panic!("unexpected outcome: {other:?}"),
        }
        assert_eq!(
            orch.registry.read().unwrap().status(&LayerId::new("replays")),
            LayerStatus::Failed
        );
    }

    #[tokio::test]
    async fn cycle_members_fail_remainder_loads() {
        let file = manifest_file(
            r#"{
                "manifest_version": "1.0",
                "layers": {
                    "active": [
                        {"id": "a", "name": "A", "entry": "a", "dependencies": ["b"]},
                        {"id": "b", "name": "B", "entry": "b", "dependencies": ["a"]},
                        {"id": "c", "name": "C", "entry": "c"}
                    ]
                }
            }"#,
        );
        let factories = LayerFactories::new()
            .with("a", publishing("a", "a"))
            .with("b", publishing("b", "b"))
            .with("c", publishing("c", "c"));
        let orch = orchestrator(&file, factories);

        let report = orch.activate_all().await.unwrap();

        assert_eq!(report.cycles.len(), 1);
        assert_eq!(report.loaded(), 1);

        let registry = orch.registry.read().unwrap();
        assert_eq!(registry.status(&LayerId::new("a")), LayerStatus::Failed);
        assert_eq!(registry.status(&LayerId::new("b")), LayerStatus::Failed);
        assert_eq!(registry.status(&LayerId::new("c")), LayerStatus::Active);
    }

    #[tokio::test]
    async fn load_hooks_run_around_load() {
        let file = manifest_file(
            r#"{
                "manifest_version": "1.0",
                "layers": {
                    "active": [{"id": "a", "name": "A", "entry": "a"}]
                }
            }"#,
        );
        let factories = LayerFactories::new().with("a", publishing("a", "a"));
        let orch = orchestrator(&file, factories);

        let phases = Arc::new(std::sync::Mutex::new(Vec::new()));
        for phase in [LoadPhase::BeforeLoad, LoadPhase::OnLoad, LoadPhase::AfterLoad] {
            let phases = phases.clone();
            orch.on(phase, "trace", move |_| {
                phases.lock().unwrap().push(phase);
                Ok(())
            });
        }

        orch.activate_all().await.unwrap();
        assert_eq!(
            *phases.lock().unwrap(),
            vec![LoadPhase::BeforeLoad, LoadPhase::OnLoad, LoadPhase::AfterLoad]
        );
    }

    #[tokio::test]
    async fn on_error_hook_sees_failure() {
        let file = manifest_file(
            r#"{
                "manifest_version": "1.0",
                "layers": {
                    "active": [{"id": "b", "name": "B", "entry": "broken"}]
                }
            }"#,
        );
        let factories = LayerFactories::new().with("broken", || {
            Box::new(FailingLayer::new("b", "backend unreachable"))
        });
        let orch = orchestrator(&file, factories);

        let seen = Arc::new(std::sync::Mutex::new(None));
        let sink = seen.clone();
        orch.on(LoadPhase::OnError, "capture", move |payload| {
            *sink.lock().unwrap() = payload.detail.clone();
            Ok(())
        });

        orch.activate_all().await.unwrap();
        let detail = seen.lock().unwrap().clone().unwrap();
        assert!(detail.contains("backend unreachable"));
    }

    #[tokio::test]
    async fn missing_layer_config_is_nonfatal() {
        let file = manifest_file(
            r#"{
                "manifest_version": "1.0",
                "layers": {
                    "active": [
                        {"id": "a", "name": "A", "entry": "a",
                         "config": "configs/does-not-exist.json"}
                    ]
                }
            }"#,
        );
        let factories = LayerFactories::new().with("a", publishing("a", "a"));
        let orch = orchestrator(&file, factories);

        let report = orch.activate_all().await.unwrap();
        assert_eq!(report.outcomes[0].1, LoadOutcome::Loaded);
    }

    #[tokio::test]
    async fn manifest_failure_is_fatal_and_logged() {
        let dir = tempfile::tempdir().unwrap();
        let orch = Orchestrator::new(
            Arc::new(RuntimeCore::default()),
            LayerRegistry::shared(),
            Arc::new(LayerFactories::new()),
            ManifestLoader::new(dir.path().join("missing.json")),
            &SportiqConfig::default(),
        );

        assert!(orch.activate_all().await.is_err());
        assert_eq!(orch.core.error_count(), 1);
    }
}
