//! Lineage integrator context
//!
//! One context per connector instance. It carries the caller's identity,
//! forwards it with every store call, and owns the listener registry
//! used to relay OpenLineage events.

mod config;
mod identity;
mod report;

pub use config::{ConfigError, ConnectorConfig, PermittedSynchronization};
pub use identity::{AttributionContext, CallAttribution, ExternalSourceIdentity};
pub use report::IntegrationReport;

use crate::error::{LineageError, LineageResult};
use crate::graph::Paging;
use crate::listener::{
    OpenLineageListener, OpenLineageListenerManager, OpenLineageRunEvent, PublishReport,
};
use crate::store::MetadataStore;
use chrono::{DateTime, Utc};
use report::ReportBuilder;
use std::sync::{Arc, Mutex, PoisonError};

/// tracing target for audit events
pub const AUDIT_TARGET: &str = "audit";

/// The surface a lineage integration connector works through.
///
/// All methods take `&self`; share the context across threads with `Arc`.
pub struct LineageIntegratorContext {
    config: ConnectorConfig,
    attribution: AttributionContext,
    store: Arc<dyn MetadataStore>,
    listeners: OpenLineageListenerManager,
    report: Option<Mutex<ReportBuilder>>,
}

impl LineageIntegratorContext {
    pub fn new(config: ConnectorConfig, store: Arc<dyn MetadataStore>) -> LineageResult<Self> {
        config
            .validate()
            .map_err(|e| LineageError::invalid("config", e.to_string()))?;
        let attribution = AttributionContext::new(
            config.user_id.clone(),
            ExternalSourceIdentity::new(
                config.external_source_guid.clone(),
                config.external_source_name.clone(),
            ),
        )?;
        let listeners =
            OpenLineageListenerManager::new().with_delivery_timeout(config.listener_timeout());
        let report = config
            .generate_integration_report
            .then(|| Mutex::new(ReportBuilder::new()));

        tracing::info!(
            target: AUDIT_TARGET,
            connector = %config.connector_name,
            user_id = %config.user_id,
            external_source = %attribution.external_source(),
            "Lineage integrator context created"
        );

        Ok(Self {
            config,
            attribution,
            store,
            listeners,
            report,
        })
    }

    pub fn config(&self) -> &ConnectorConfig {
        &self.config
    }

    pub fn user_id(&self) -> &str {
        self.attribution.user_id()
    }

    pub fn external_source(&self) -> &ExternalSourceIdentity {
        self.attribution.external_source()
    }

    pub fn for_lineage(&self) -> bool {
        self.attribution.for_lineage()
    }

    /// Include archived (memento) elements in results from now on
    pub fn set_for_lineage(&self, for_lineage: bool) {
        self.attribution.set_for_lineage(for_lineage);
    }

    pub fn for_duplicate_processing(&self) -> bool {
        self.attribution.for_duplicate_processing()
    }

    /// Let the store skip its duplicate checks from now on
    pub fn set_for_duplicate_processing(&self, for_duplicate_processing: bool) {
        self.attribution
            .set_for_duplicate_processing(for_duplicate_processing);
    }

    // === Open lineage ===

    pub fn register_listener(&self, listener: Arc<dyn OpenLineageListener>) -> bool {
        self.listeners.register(listener)
    }

    pub fn unregister_listener(&self, listener: &Arc<dyn OpenLineageListener>) -> bool {
        self.listeners.unregister(listener)
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.listener_count()
    }

    pub async fn publish_raw_open_lineage_run_event(&self, raw_event: &str) -> PublishReport {
        self.listeners.publish_raw(raw_event).await
    }

    pub async fn publish_open_lineage_run_event(&self, event: OpenLineageRunEvent) -> PublishReport {
        self.listeners.publish(event).await
    }

    // === Integration report ===

    /// Drain what this context changed since the last call. `None` when
    /// reporting is switched off.
    pub fn take_integration_report(&self) -> Option<IntegrationReport> {
        self.report.as_ref().map(|builder| {
            builder.lock().unwrap_or_else(PoisonError::into_inner).take(
                &self.config.connector_id,
                &self.config.connector_name,
                &self.config.server_name,
            )
        })
    }

    // === Crate-internal plumbing for the façade ===

    pub(crate) fn attribution(&self, effective_time: Option<DateTime<Utc>>) -> CallAttribution {
        self.attribution.attribution(effective_time)
    }

    pub(crate) fn store(&self) -> &dyn MetadataStore {
        self.store.as_ref()
    }

    pub(crate) fn check_write_permitted(&self, operation: &str) -> LineageResult<()> {
        if self.config.permitted_synchronization.allows_store_updates() {
            return Ok(());
        }
        tracing::warn!(
            target: AUDIT_TARGET,
            connector = %self.config.connector_name,
            operation,
            "Update rejected: connector only synchronizes to the third party"
        );
        Err(LineageError::not_authorized(
            self.user_id(),
            format!(
                "{} is not permitted; connector {} only synchronizes to the third party",
                operation, self.config.connector_name
            ),
        ))
    }

    pub(crate) fn resolve_paging(&self, paging: Paging) -> LineageResult<Paging> {
        paging.resolve(self.config.max_page_size)
    }

    fn with_report(&self, update: impl FnOnce(&mut ReportBuilder)) {
        if let Some(builder) = &self.report {
            let mut guard = builder.lock().unwrap_or_else(PoisonError::into_inner);
            update(&mut *guard);
        }
    }

    pub(crate) fn record_created(&self, guid: &str) {
        self.with_report(|r| r.created(guid));
    }

    pub(crate) fn record_updated(&self, guid: &str) {
        self.with_report(|r| r.updated(guid));
    }

    pub(crate) fn record_deleted(&self, guid: &str) {
        self.with_report(|r| r.deleted(guid));
    }
}

impl std::fmt::Debug for LineageIntegratorContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LineageIntegratorContext")
            .field("connector", &self.config.connector_name)
            .field("attribution", &self.attribution)
            .field("listeners", &self.listeners.listener_count())
            .finish()
    }
}
