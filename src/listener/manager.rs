//! Listener registry and event fan-out
//!
//! Every listener registered when an event is published receives that
//! event exactly once. Each delivery runs on its own task, so a slow,
//! failing or panicking listener cannot hold up or break the others.

use super::event::OpenLineageRunEvent;
use super::traits::OpenLineageListener;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::Arc;
use std::time::Duration;

pub const DEFAULT_DELIVERY_TIMEOUT: Duration = Duration::from_secs(30);

/// Why one listener did not take an event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureReason {
    Failed(String),
    Panicked,
    TimedOut,
}

impl std::fmt::Display for FailureReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Failed(e) => write!(f, "failed: {}", e),
            Self::Panicked => f.write_str("panicked"),
            Self::TimedOut => f.write_str("timed out"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryFailure {
    pub listener: String,
    pub reason: FailureReason,
}

/// Outcome of one publish call
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PublishReport {
    /// Listeners in the snapshot the event was handed to
    pub listeners_notified: usize,
    pub failures: Vec<DeliveryFailure>,
}

impl PublishReport {
    pub fn delivered(&self) -> usize {
        self.listeners_notified - self.failures.len()
    }

    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Registry of in-process listeners, keyed by listener identity.
pub struct OpenLineageListenerManager {
    listeners: DashMap<usize, Arc<dyn OpenLineageListener>>,
    delivery_timeout: Duration,
}

fn identity(listener: &Arc<dyn OpenLineageListener>) -> usize {
    Arc::as_ptr(listener) as *const () as usize
}

impl OpenLineageListenerManager {
    pub fn new() -> Self {
        Self {
            listeners: DashMap::new(),
            delivery_timeout: DEFAULT_DELIVERY_TIMEOUT,
        }
    }

    /// Bound on how long one publish waits for its listeners
    pub fn with_delivery_timeout(mut self, timeout: Duration) -> Self {
        self.delivery_timeout = timeout;
        self
    }

    /// Register a listener. Registering the same listener again is a no-op;
    /// returns whether it was newly added.
    pub fn register(&self, listener: Arc<dyn OpenLineageListener>) -> bool {
        match self.listeners.entry(identity(&listener)) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                tracing::debug!(listener = listener.listener_name(), "Registered open lineage listener");
                slot.insert(listener);
                true
            }
        }
    }

    /// Returns whether the listener was registered.
    pub fn unregister(&self, listener: &Arc<dyn OpenLineageListener>) -> bool {
        let removed = self.listeners.remove(&identity(listener)).is_some();
        if removed {
            tracing::debug!(listener = listener.listener_name(), "Unregistered open lineage listener");
        }
        removed
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Publish an event that has not been parsed. Listeners receive only
    /// the raw form.
    pub async fn publish_raw(&self, raw_event: &str) -> PublishReport {
        self.deliver(None, raw_event.to_string()).await
    }

    /// Publish a parsed event. Listeners also receive its JSON form.
    pub async fn publish(&self, event: OpenLineageRunEvent) -> PublishReport {
        let raw = event.to_json().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Could not serialize open lineage event; raw form omitted");
            String::new()
        });
        self.deliver(Some(event), raw).await
    }

    async fn deliver(&self, event: Option<OpenLineageRunEvent>, raw: String) -> PublishReport {
        // Clone out of the map so no shard lock is held while listeners run.
        let snapshot: Vec<Arc<dyn OpenLineageListener>> = self
            .listeners
            .iter()
            .map(|entry| entry.value().clone())
            .collect();

        if snapshot.is_empty() {
            tracing::debug!("No open lineage listeners registered; event dropped");
            return PublishReport::default();
        }

        let event = Arc::new(event);
        let raw: Arc<str> = Arc::from(raw);
        let deadline = tokio::time::Instant::now() + self.delivery_timeout;

        let deliveries: Vec<_> = snapshot
            .into_iter()
            .map(|listener| {
                let name = listener.listener_name().to_string();
                let event = event.clone();
                let raw = raw.clone();
                let handle = tokio::spawn(async move {
                    listener
                        .process_open_lineage_run_event((*event).as_ref(), &raw)
                        .await
                });
                (name, handle)
            })
            .collect();

        let mut report = PublishReport {
            listeners_notified: deliveries.len(),
            failures: Vec::new(),
        };

        for (name, mut handle) in deliveries {
            let reason = match tokio::time::timeout_at(deadline, &mut handle).await {
                Ok(Ok(Ok(()))) => continue,
                Ok(Ok(Err(e))) => FailureReason::Failed(e.to_string()),
                Ok(Err(join_error)) if join_error.is_panic() => FailureReason::Panicked,
                Ok(Err(join_error)) => FailureReason::Failed(join_error.to_string()),
                // Dropping the handle detaches the still-running delivery.
                Err(_) => FailureReason::TimedOut,
            };
            tracing::warn!(listener = %name, reason = %reason, "Open lineage event delivery failed");
            report.failures.push(DeliveryFailure {
                listener: name,
                reason,
            });
        }

        report
    }
}

impl Default for OpenLineageListenerManager {
    fn default() -> Self {
        Self::new()
    }
}
