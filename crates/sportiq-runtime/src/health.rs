//! Periodic layer health monitoring.
//!
//! A layer's health is derived from the state keys it declares in
//! `provides`: all keys present means active, any key missing means
//! inactive. Polling is edge-triggered — an unchanged status produces no
//! event, so subscribers only see transitions.
//!
//! The monitor is an explicit task with an explicit stop: [`spawn`]
//! returns a [`HealthHandle`] whose `stop()` shuts the loop down and
//! awaits it. Nothing keeps ticking after the handle is dropped via
//! `stop`.
//!
//! `Failed` is sticky: a layer the orchestrator failed stays failed until
//! it is explicitly re-enabled, no matter what its state keys say.
//!
//! [`spawn`]: HealthMonitor::spawn

use crate::config::SportiqConfig;
use crate::core::RuntimeCore;
use crate::manager::transition_status;
use crate::registry::SharedRegistry;
use sportiq_types::{LayerId, LayerStatus};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::debug;

/// Handle to a running health monitor.
pub struct HealthHandle {
    shutdown: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl HealthHandle {
    /// Stops the poll loop and waits for it to finish.
    pub async fn stop(self) {
        let _ = self.shutdown.send(true);
        let _ = self.task.await;
    }
}

/// Derives layer statuses from published state keys on a fixed interval.
pub struct HealthMonitor {
    core: Arc<RuntimeCore>,
    registry: SharedRegistry,
    interval: Duration,
}

impl HealthMonitor {
    /// Creates a monitor over the shared core and registry.
    #[must_use]
    pub fn new(core: Arc<RuntimeCore>, registry: SharedRegistry, config: &SportiqConfig) -> Self {
        Self {
            core,
            registry,
            interval: Duration::from_millis(config.health.poll_interval_ms),
        }
    }

    /// Runs one deterministic poll over all registered layers.
    ///
    /// Skipped: layers without `provides` keys (health is unknowable),
    /// disabled layers, and layers in the sticky `Failed` status.
    pub fn poll_once(&self) {
        let snapshot: Vec<(LayerId, Vec<String>)> = {
            let registry = self.registry.read().expect("lock poisoned");
            registry
                .descriptors()
                .iter()
                .filter(|d| d.enabled && !d.provides.is_empty())
                .filter(|d| registry.status(&d.id) != LayerStatus::Failed)
                .map(|d| (d.id.clone(), d.provides.clone()))
                .collect()
        };

        for (id, provides) in snapshot {
            let healthy = provides.iter().all(|key| self.core.has_state(key));
            let status = if healthy {
                LayerStatus::Active
            } else {
                LayerStatus::Inactive
            };
            transition_status(&self.core, &self.registry, &id, status);
        }
    }

    /// Runs the poll loop until `shutdown` flips to `true`.
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        loop {
            tokio::select! {
                _ = ticker.tick() => self.poll_once(),
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }
        debug!("health monitor stopped");
    }

    /// Spawns the poll loop on the current runtime.
    #[must_use]
    pub fn spawn(self) -> HealthHandle {
        let (shutdown, receiver) = watch::channel(false);
        let task = tokio::spawn(self.run(receiver));
        HealthHandle { shutdown, task }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::LayerRegistry;
    use serde_json::json;
    use sportiq_event::RuntimeEvent;
    use sportiq_layer::{LayerDescriptor, RuntimeHandle};

    fn setup() -> (Arc<RuntimeCore>, SharedRegistry, HealthMonitor) {
        let core = Arc::new(RuntimeCore::default());
        let registry = LayerRegistry::shared();
        let monitor = HealthMonitor::new(core.clone(), registry.clone(), &SportiqConfig::default());
        (core, registry, monitor)
    }

    fn register(registry: &SharedRegistry, desc: LayerDescriptor, status: LayerStatus) {
        registry
            .write()
            .unwrap()
            .register(desc, status)
            .unwrap();
    }

    fn drain_status_events(
        events: &mut tokio::sync::broadcast::Receiver<RuntimeEvent>,
    ) -> Vec<(LayerId, LayerStatus)> {
        let mut seen = Vec::new();
        while let Ok(event) = events.try_recv() {
            if let RuntimeEvent::LayerStatusChanged { id, to, .. } = event {
                seen.push((id, to));
            }
        }
        seen
    }

    #[test]
    fn poll_derives_active_from_state_keys() {
        let (core, registry, monitor) = setup();
        register(
            &registry,
            LayerDescriptor::new("ticker", "Ticker", "ticker").with_provides("ticker:ready"),
            LayerStatus::Inactive,
        );
        let mut events = core.subscribe();

        core.set_state("ticker:ready", json!(true));
        monitor.poll_once();

        assert_eq!(
            registry.read().unwrap().status(&LayerId::new("ticker")),
            LayerStatus::Active
        );
        let transitions = drain_status_events(&mut events);
        assert_eq!(
            transitions,
            vec![(LayerId::new("ticker"), LayerStatus::Active)]
        );
    }

    #[test]
    fn repeated_polls_emit_no_duplicate_events() {
        let (core, registry, monitor) = setup();
        register(
            &registry,
            LayerDescriptor::new("ticker", "Ticker", "ticker").with_provides("ticker:ready"),
            LayerStatus::Inactive,
        );
        core.set_state("ticker:ready", json!(true));

        monitor.poll_once();
        let mut events = core.subscribe();
        monitor.poll_once();
        monitor.poll_once();

        assert!(drain_status_events(&mut events).is_empty());
    }

    #[test]
    fn key_retraction_flips_to_inactive() {
        let (core, registry, monitor) = setup();
        register(
            &registry,
            LayerDescriptor::new("ticker", "Ticker", "ticker").with_provides("ticker:ready"),
            LayerStatus::Inactive,
        );
        core.set_state("ticker:ready", json!(true));
        monitor.poll_once();

        core.remove_state("ticker:ready");
        monitor.poll_once();

        assert_eq!(
            registry.read().unwrap().status(&LayerId::new("ticker")),
            LayerStatus::Inactive
        );
    }

    #[test]
    fn failed_status_is_sticky() {
        let (core, registry, monitor) = setup();
        register(
            &registry,
            LayerDescriptor::new("broken", "Broken", "broken").with_provides("broken:ready"),
            LayerStatus::Failed,
        );
        // Keys present, but a failed layer is not resurrected by polling
        core.set_state("broken:ready", json!(true));
        monitor.poll_once();

        assert_eq!(
            registry.read().unwrap().status(&LayerId::new("broken")),
            LayerStatus::Failed
        );
    }

    #[test]
    fn disabled_and_keyless_layers_skipped() {
        let (core, registry, monitor) = setup();
        register(
            &registry,
            LayerDescriptor::new("ads", "Ads", "ads")
                .with_provides("ads:ready")
                .disabled(),
            LayerStatus::Inactive,
        );
        register(
            &registry,
            LayerDescriptor::new("seo", "SEO", "seo"),
            LayerStatus::Unknown,
        );
        core.set_state("ads:ready", json!(true));

        monitor.poll_once();

        let reg = registry.read().unwrap();
        assert_eq!(reg.status(&LayerId::new("ads")), LayerStatus::Inactive);
        assert_eq!(reg.status(&LayerId::new("seo")), LayerStatus::Unknown);
    }

    #[tokio::test(start_paused = true)]
    async fn run_loop_polls_and_stops() {
        let (core, registry, monitor) = setup();
        register(
            &registry,
            LayerDescriptor::new("ticker", "Ticker", "ticker").with_provides("ticker:ready"),
            LayerStatus::Inactive,
        );
        core.set_state("ticker:ready", json!(true));

        let handle = monitor.spawn();
        // Paused clock: advancing past one interval guarantees a tick ran.
        tokio::time::sleep(Duration::from_millis(5_100)).await;
        handle.stop().await;

        assert_eq!(
            registry.read().unwrap().status(&LayerId::new("ticker")),
            LayerStatus::Active
        );
    }
}
