//! Listener contract

use super::event::OpenLineageRunEvent;
use async_trait::async_trait;
use thiserror::Error;

/// Errors a listener may report for one event.
///
/// These never reach the publisher; the manager logs them and lists them
/// in the publish report.
#[derive(Debug, Error)]
pub enum ListenerError {
    #[error("event rejected: {0}")]
    Rejected(String),

    #[error("processing failed: {0}")]
    Failed(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// In-process consumer of OpenLineage run events.
///
/// `event` is `None` when the publisher only had the raw JSON.
#[async_trait]
pub trait OpenLineageListener: Send + Sync {
    /// Name used in logs and publish reports
    fn listener_name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    async fn process_open_lineage_run_event(
        &self,
        event: Option<&OpenLineageRunEvent>,
        raw_event: &str,
    ) -> Result<(), ListenerError>;
}
