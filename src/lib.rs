//! Lineage Integrator: an integration context for lineage connectors
//!
//! External tools (ETL engines, schedulers, catalog scanners) use a
//! [`LineageIntegratorContext`] to report lineage into a metadata store
//! and to relay OpenLineage run events to in-process listeners.
//!
//! # Core Concepts
//!
//! - **Elements**: assets, schema types and attributes, processes and ports
//! - **Relationships**: data flow, control flow, process calls, lineage
//!   mappings and the structural links between elements
//! - **Attribution**: every store call carries the caller, its external
//!   source and the session's lineage and duplicate-processing flags
//! - **Listeners**: OpenLineage events fan out to every registered listener
//!
//! # Example
//!
//! ```
//! use lineage_integrator::{
//!     ConnectorConfig, InMemoryMetadataStore, LineageIntegratorContext, ProcessProperties,
//!     ElementStatus,
//! };
//! use std::sync::Arc;
//!
//! let config = ConnectorConfig::new("airflow-lineage", "airflow-npa", "src-guid", "airflow@prod");
//! let ctx = LineageIntegratorContext::new(config, Arc::new(InMemoryMetadataStore::new())).unwrap();
//! let guid = ctx
//!     .create_process(true, ElementStatus::Active, None, ProcessProperties::new("etl.load_orders"))
//!     .unwrap();
//! assert!(ctx.get_process_by_guid(&guid, None).is_ok());
//! ```

mod api;
pub mod connector;
pub mod context;
pub mod error;
pub mod graph;
pub mod listener;
pub mod store;

pub use connector::ContextSlot;
pub use context::{
    AttributionContext, CallAttribution, ConfigError, ConnectorConfig, ExternalSourceIdentity,
    IntegrationReport, LineageIntegratorContext, PermittedSynchronization, AUDIT_TARGET,
};
pub use error::{LineageError, LineageResult};
pub use graph::{
    AssetProperties, AssetRelationshipProperties, Classification, ClassificationKind,
    ControlFlowProperties, EffectiveWindow, ElementId, ElementKind, ElementProperties,
    ElementStatus, ExternalIdentifierProperties, FlowProperties, KeyPattern, LineageElement,
    LineageRelationship, Paging, PortProperties, PortType, ProcessContainmentProperties,
    ProcessContainmentType, ProcessProperties, PropertyValue, RelatedElement, RelationshipId,
    RelationshipKind, RelationshipProperties, SchemaAttributeProperties, SchemaTypeProperties,
    TemplateProperties,
};
pub use listener::{
    ListenerError, OpenLineageListener, OpenLineageListenerManager, OpenLineageRunEvent,
    PublishReport,
};
pub use store::{InMemoryMetadataStore, MetadataStore, StoreError};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
