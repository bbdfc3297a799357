//! Metadata store seam
//!
//! The integration context talks to the remote metadata server through the
//! `MetadataStore` trait. `InMemoryMetadataStore` applies the same rules
//! locally for tests and demos.

mod memory;
mod traits;

pub use memory::{InMemoryMetadataStore, RecordedCall};
pub use traits::{
    MetadataStore, NewElement, NewElementFromTemplate, NewRelationship, RelationshipSetup,
    StoreError, StoreResult,
};
