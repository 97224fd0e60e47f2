//! Runtime core: lifecycle stages, shared state, events, and the error
//! boundary.
//!
//! # Lifecycle
//!
//! ```text
//! Pending ──boot()──► Booting ──► Initializing ──(host ready)──► Ready
//!                                                                  │
//!                                                destroy() ──► Destroyed
//! ```
//!
//! The transition into `Ready` is the one genuine suspension point: when
//! the host has not signalled readiness yet, `boot()` awaits the readiness
//! watch channel. Everything else is synchronous.
//!
//! # Error boundary
//!
//! All failures — stage hook errors, layer load errors, anything routed
//! through [`RuntimeCore::log_error`] — land in a capped in-memory log and
//! are broadcast as [`RuntimeEvent::Error`]. Nothing re-throws; the portal
//! host keeps running no matter what a layer does.
//!
//! # Ownership
//!
//! The core is constructed once and shared as `Arc<RuntimeCore>`. There is
//! no global singleton; everything that needs the core receives it.

use crate::config::RuntimeConfig;
use crate::hooks::{HookPayload, HookRegistry};
use serde_json::Value;
use sportiq_event::{ErrorRecord, RuntimeEvent, Stage, StateChange};
use sportiq_layer::RuntimeHandle;
use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, RwLock};
use tokio::sync::{broadcast, watch};
use tracing::{debug, info, warn};

/// Broadcast channel capacity for runtime events.
const EVENT_CHANNEL_CAPACITY: usize = 256;

/// The shared runtime core.
pub struct RuntimeCore {
    stage: RwLock<Stage>,
    state: RwLock<HashMap<String, Value>>,
    errors: Mutex<VecDeque<ErrorRecord>>,
    error_log_cap: usize,
    events: broadcast::Sender<RuntimeEvent>,
    ready_tx: watch::Sender<bool>,
    stage_hooks: HookRegistry<Stage>,
}

impl RuntimeCore {
    /// Creates a core in the `Pending` stage.
    #[must_use]
    pub fn new(config: &RuntimeConfig) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        let (ready_tx, _) = watch::channel(false);
        Self {
            stage: RwLock::new(Stage::Pending),
            state: RwLock::new(HashMap::new()),
            errors: Mutex::new(VecDeque::new()),
            error_log_cap: config.error_log_cap,
            events,
            ready_tx,
            stage_hooks: HookRegistry::new(),
        }
    }

    /// Current lifecycle stage.
    #[must_use]
    pub fn stage(&self) -> Stage {
        *self.stage.read().expect("lock poisoned")
    }

    /// Subscribes to the runtime event bus.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<RuntimeEvent> {
        self.events.subscribe()
    }

    /// Broadcasts an event. Fire-and-forget: no receivers is not an error.
    pub fn publish(&self, event: RuntimeEvent) {
        let _ = self.events.send(event);
    }

    /// Registers a stage hook. Hooks run when the runtime enters `stage`,
    /// in registration order; a failing hook is logged and skipped.
    pub fn on_stage<F>(&self, stage: Stage, name: impl Into<String>, callback: F)
    where
        F: Fn(&HookPayload) -> Result<(), String> + Send + Sync + 'static,
    {
        self.stage_hooks.on(stage, name, callback);
    }

    /// Signals that the host page is ready for layer activation.
    ///
    /// Idempotent; a `boot()` awaiting readiness resumes.
    pub fn host_ready(&self) {
        let _ = self.ready_tx.send(true);
    }

    /// Runs the boot sequence: `Pending → Booting → Initializing → Ready`.
    ///
    /// Waits for [`host_ready`](Self::host_ready) before entering `Ready`
    /// unless the host already signalled. Calling `boot()` in any stage
    /// other than `Pending` is a logged no-op.
    pub async fn boot(&self) {
        // Check and claim under one write lock so racing boots cannot
        // both pass the Pending check.
        {
            let mut stage = self.stage.write().expect("lock poisoned");
            if *stage != Stage::Pending {
                warn!(stage = %stage, "boot called outside Pending, ignoring");
                return;
            }
            *stage = Stage::Booting;
        }
        self.announce_stage(Stage::Booting);
        self.enter_stage(Stage::Initializing);

        let mut ready = self.ready_tx.subscribe();
        while !*ready.borrow() {
            debug!("awaiting host readiness");
            if ready.changed().await.is_err() {
                return;
            }
        }

        self.enter_stage(Stage::Ready);
        self.publish(RuntimeEvent::Ready);
        info!("runtime ready");
    }

    /// Enters the terminal `Destroyed` stage.
    pub fn destroy(&self) {
        self.enter_stage(Stage::Destroyed);
    }

    fn enter_stage(&self, next: Stage) {
        {
            let mut stage = self.stage.write().expect("lock poisoned");
            *stage = next;
        }
        self.announce_stage(next);
    }

    fn announce_stage(&self, next: Stage) {
        debug!(stage = %next, "stage entered");
        self.publish(RuntimeEvent::StageChanged { stage: next });

        for failure in self
            .stage_hooks
            .dispatch(&next, &HookPayload::default().with_detail(next.to_string()))
        {
            self.log_error(&failure.message, &format!("stage-hook:{}", failure.hook));
        }
    }

    /// Removes a key from the state map. Publishes a null `StateChange`
    /// so subscribers observe the retraction.
    pub fn remove_state(&self, key: &str) {
        let removed = {
            let mut state = self.state.write().expect("lock poisoned");
            state.remove(key)
        };
        if removed.is_some() {
            self.publish(RuntimeEvent::StateChange(StateChange::new(key, Value::Null)));
        }
    }

    /// Returns `true` if `key` is present in the state map.
    #[must_use]
    pub fn has_state(&self, key: &str) -> bool {
        self.state.read().expect("lock poisoned").contains_key(key)
    }

    /// Snapshot of the error log, oldest first.
    #[must_use]
    pub fn errors(&self) -> Vec<ErrorRecord> {
        self.errors
            .lock()
            .expect("lock poisoned")
            .iter()
            .cloned()
            .collect()
    }

    /// Number of retained error records.
    #[must_use]
    pub fn error_count(&self) -> usize {
        self.errors.lock().expect("lock poisoned").len()
    }

    fn push_error(&self, record: ErrorRecord) {
        {
            let mut errors = self.errors.lock().expect("lock poisoned");
            if errors.len() >= self.error_log_cap {
                errors.pop_front();
            }
            errors.push_back(record.clone());
        }
        warn!(source = %record.source, message = %record.message, "runtime error");
        self.publish(RuntimeEvent::Error(record));
    }

    /// Records an error with extra context text.
    pub fn log_error_with_context(&self, message: &str, source: &str, context: &str) {
        self.push_error(ErrorRecord::new(message, source).with_context(context));
    }

    /// Funnels a fallible result into the error boundary.
    ///
    /// The error, if any, is logged and swallowed; callers get the success
    /// value or `None` and carry on either way.
    pub fn capture<T, E: std::fmt::Display>(&self, result: Result<T, E>, source: &str) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(err) => {
                self.push_error(ErrorRecord::new(err.to_string(), source));
                None
            }
        }
    }
}

impl Default for RuntimeCore {
    fn default() -> Self {
        Self::new(&RuntimeConfig::default())
    }
}

impl RuntimeHandle for RuntimeCore {
    fn set_state(&self, key: &str, value: Value) {
        {
            let mut state = self.state.write().expect("lock poisoned");
            state.insert(key.to_string(), value.clone());
        }
        self.publish(RuntimeEvent::StateChange(StateChange::new(key, value)));
    }

    fn get_state(&self, key: &str) -> Option<Value> {
        self.state.read().expect("lock poisoned").get(key).cloned()
    }

    fn log_error(&self, message: &str, source: &str) {
        self.push_error(ErrorRecord::new(message, source));
    }
}
