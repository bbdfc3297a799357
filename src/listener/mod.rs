//! OpenLineage listener fan-out
//!
//! Connectors publish OpenLineage run events; every registered in-process
//! listener receives them.

mod event;
mod manager;
mod traits;

pub use event::{
    Facets, OpenLineageDataset, OpenLineageJob, OpenLineageRun, OpenLineageRunEvent,
    RunEventType, DEFAULT_SCHEMA_URL,
};
pub use manager::{
    DeliveryFailure, FailureReason, OpenLineageListenerManager, PublishReport,
    DEFAULT_DELIVERY_TIMEOUT,
};
pub use traits::{ListenerError, OpenLineageListener};
