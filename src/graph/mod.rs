//! Lineage graph vocabulary: elements, relationships and their properties

mod classification;
mod element;
mod external;
pub mod merge;
mod paging;
mod relationship;
mod temporal;
mod value;

pub use classification::{Classification, ClassificationKind, KeyPattern};
pub use element::{
    AssetProperties, ElementId, ElementKind, ElementProperties, ElementStatus, HasEffectiveWindow,
    HasQualifiedName, LineageElement, PortProperties, PortType, ProcessProperties,
    SchemaAttributeProperties, SchemaTypeProperties, TemplateProperties,
};
pub use external::ExternalIdentifierProperties;
pub use paging::Paging;
pub use relationship::{
    AssetRelationshipProperties, ControlFlowProperties, FlowProperties, LineageRelationship,
    ProcessContainmentProperties, ProcessContainmentType, RelatedElement, RelationshipEnd,
    RelationshipId, RelationshipKind, RelationshipProperties,
};
pub use temporal::EffectiveWindow;
pub use value::{Properties, PropertyValue};
