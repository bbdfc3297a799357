//! Metadata store contract consumed by the integration context

use crate::context::CallAttribution;
use crate::graph::{
    Classification, ClassificationKind, ElementId, ElementKind, ElementProperties, ElementStatus,
    ExternalIdentifierProperties, LineageElement, LineageRelationship, Paging, RelatedElement,
    RelationshipEnd, RelationshipId, RelationshipKind, RelationshipProperties, TemplateProperties,
};
use thiserror::Error;

/// Errors reported by a metadata store
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("{parameter} {guid} not found")]
    NotFound { parameter: String, guid: String },

    #[error("invalid request for '{parameter}': {reason}")]
    InvalidRequest { parameter: String, reason: String },

    #[error("user '{user_id}' not authorized: {reason}")]
    NotAuthorized { user_id: String, reason: String },

    #[error("metadata store unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    pub fn not_found(parameter: impl Into<String>, guid: impl std::fmt::Display) -> Self {
        Self::NotFound {
            parameter: parameter.into(),
            guid: guid.to_string(),
        }
    }

    pub fn invalid(parameter: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidRequest {
            parameter: parameter.into(),
            reason: reason.into(),
        }
    }
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// A new element to create
#[derive(Debug, Clone)]
pub struct NewElement {
    pub properties: ElementProperties,
    /// Record the calling source as the element's home
    pub is_home: bool,
    /// Element the new one is anchored to
    pub anchor: Option<ElementId>,
    pub external_identifier: Option<ExternalIdentifierProperties>,
    pub status: ElementStatus,
    pub zone_membership: Vec<String>,
}

impl NewElement {
    pub fn new(properties: impl Into<ElementProperties>, is_home: bool) -> Self {
        Self {
            properties: properties.into(),
            is_home,
            anchor: None,
            external_identifier: None,
            status: ElementStatus::default(),
            zone_membership: Vec::new(),
        }
    }

    pub fn with_anchor(mut self, anchor: ElementId) -> Self {
        self.anchor = Some(anchor);
        self
    }

    pub fn with_external_identifier(mut self, identifier: Option<ExternalIdentifierProperties>) -> Self {
        self.external_identifier = identifier;
        self
    }

    pub fn with_status(mut self, status: ElementStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_zones(mut self, zones: Vec<String>) -> Self {
        self.zone_membership = zones;
        self
    }
}

/// A new element copied from an existing one of the same kind
#[derive(Debug, Clone)]
pub struct NewElementFromTemplate {
    pub kind: ElementKind,
    pub template_guid: ElementId,
    pub overrides: TemplateProperties,
    pub is_home: bool,
    pub anchor: Option<ElementId>,
    pub external_identifier: Option<ExternalIdentifierProperties>,
    /// Zone membership for the copy; `None` keeps the template's zones
    pub zone_membership: Option<Vec<String>>,
}

/// A new relationship to set up
#[derive(Debug, Clone)]
pub struct NewRelationship {
    pub end_one: ElementId,
    pub end_two: ElementId,
    pub properties: RelationshipProperties,
    pub is_home: bool,
}

impl NewRelationship {
    pub fn new(
        end_one: &ElementId,
        end_two: &ElementId,
        properties: RelationshipProperties,
        is_home: bool,
    ) -> Self {
        Self {
            end_one: end_one.clone(),
            end_two: end_two.clone(),
            properties,
            is_home,
        }
    }
}

/// Outcome of setting up a relationship
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationshipSetup {
    pub guid: RelationshipId,
    /// False when an existing edge was reused and its properties replaced
    pub created: bool,
}

/// Remote metadata store as seen by the integration context.
///
/// Every call carries the caller's attribution, built at call time.
/// Implementations must be thread-safe (Send + Sync); the context shares
/// one store across all threads without an ordering lock.
pub trait MetadataStore: Send + Sync {
    // === Elements ===

    fn create_element(&self, call: &CallAttribution, element: NewElement) -> StoreResult<ElementId>;

    fn create_element_from_template(
        &self,
        call: &CallAttribution,
        request: NewElementFromTemplate,
    ) -> StoreResult<ElementId>;

    /// Merge (`is_merge_update`) or replace the element's properties
    fn update_element(
        &self,
        call: &CallAttribution,
        kind: ElementKind,
        guid: &ElementId,
        is_merge_update: bool,
        properties: ElementProperties,
    ) -> StoreResult<()>;

    fn update_element_status(
        &self,
        call: &CallAttribution,
        kind: ElementKind,
        guid: &ElementId,
        status: ElementStatus,
    ) -> StoreResult<()>;

    fn set_zone_membership(
        &self,
        call: &CallAttribution,
        kind: ElementKind,
        guid: &ElementId,
        zones: Vec<String>,
    ) -> StoreResult<()>;

    /// Remove the element, everything anchored to it and every
    /// relationship attached to a removed element. Returns the removed
    /// element guids.
    fn remove_element(
        &self,
        call: &CallAttribution,
        kind: ElementKind,
        guid: &ElementId,
    ) -> StoreResult<Vec<ElementId>>;

    fn set_classification(
        &self,
        call: &CallAttribution,
        guid: &ElementId,
        classification: Classification,
    ) -> StoreResult<()>;

    fn clear_classification(
        &self,
        call: &CallAttribution,
        guid: &ElementId,
        kind: ClassificationKind,
    ) -> StoreResult<()>;

    /// Elements whose qualified name, display name or description fully
    /// matches `search_regex`
    fn find_elements(
        &self,
        call: &CallAttribution,
        kind: ElementKind,
        search_regex: &str,
        paging: Paging,
    ) -> StoreResult<Vec<LineageElement>>;

    /// Elements whose qualified name or display name equals `name`
    fn get_elements_by_name(
        &self,
        call: &CallAttribution,
        kind: ElementKind,
        name: &str,
        paging: Paging,
    ) -> StoreResult<Vec<LineageElement>>;

    fn get_element(
        &self,
        call: &CallAttribution,
        kind: ElementKind,
        guid: &ElementId,
    ) -> StoreResult<LineageElement>;

    fn get_anchored_elements(
        &self,
        call: &CallAttribution,
        anchor: &ElementId,
        kind: ElementKind,
        paging: Paging,
    ) -> StoreResult<Vec<LineageElement>>;

    /// The element bound to `external_identifier` for the calling source
    fn resolve_external_identifier(
        &self,
        call: &CallAttribution,
        kind: ElementKind,
        external_identifier: &str,
    ) -> StoreResult<Option<ElementId>>;

    // === Relationships ===

    /// Link two elements. Unless the caller is duplicate processing, an
    /// edge with the same kind, ends and qualifier is reused and takes the
    /// supplied properties.
    fn setup_relationship(
        &self,
        call: &CallAttribution,
        relationship: NewRelationship,
    ) -> StoreResult<RelationshipSetup>;

    fn update_relationship(
        &self,
        call: &CallAttribution,
        kind: RelationshipKind,
        guid: &RelationshipId,
        is_merge_update: bool,
        properties: RelationshipProperties,
    ) -> StoreResult<()>;

    /// Remove every relationship of `kind` from `end_one` to `end_two`.
    /// Returns the removed relationship guids.
    fn clear_relationship(
        &self,
        call: &CallAttribution,
        kind: RelationshipKind,
        end_one: &ElementId,
        end_two: &ElementId,
    ) -> StoreResult<Vec<RelationshipId>>;

    fn clear_relationship_by_guid(
        &self,
        call: &CallAttribution,
        kind: RelationshipKind,
        guid: &RelationshipId,
    ) -> StoreResult<()>;

    fn get_relationships(
        &self,
        call: &CallAttribution,
        kind: RelationshipKind,
        end_one: &ElementId,
        end_two: &ElementId,
    ) -> StoreResult<Vec<LineageRelationship>>;

    /// Follow relationships of `kind` away from `from`, starting at the
    /// given end.
    fn get_related_elements(
        &self,
        call: &CallAttribution,
        kind: RelationshipKind,
        from: &ElementId,
        start: RelationshipEnd,
        paging: Paging,
    ) -> StoreResult<Vec<RelatedElement>>;
}
