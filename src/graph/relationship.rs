//! Directed lineage edges between elements

use super::element::{ElementId, ElementKind, HasEffectiveWindow, LineageElement};
use super::temporal::EffectiveWindow;
use super::value::Properties;
use crate::context::ExternalSourceIdentity;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Store-issued unique identifier for a relationship
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RelationshipId(String);

impl RelationshipId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn from_string(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for RelationshipId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RelationshipId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for RelationshipId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Which end of a relationship a lookup starts from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelationshipEnd {
    /// Start at end one, return the elements at end two
    One,
    /// Start at end two, return the elements at end one
    Two,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RelationshipKind {
    DataFlow,
    ControlFlow,
    ProcessCall,
    LineageMapping,
    ProcessContainment,
    PortDelegation,
    ProcessPort,
    SchemaTypeParent,
    AssetRelationship,
}

impl RelationshipKind {
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::DataFlow => "DataFlow",
            Self::ControlFlow => "ControlFlow",
            Self::ProcessCall => "ProcessCall",
            Self::LineageMapping => "LineageMapping",
            Self::ProcessContainment => "ProcessHierarchy",
            Self::PortDelegation => "PortDelegation",
            Self::ProcessPort => "ProcessPort",
            Self::SchemaTypeParent => "SchemaTypeParent",
            Self::AssetRelationship => "AssetRelationship",
        }
    }

    /// Kinds that may link the same two elements more than once,
    /// distinguished by qualified name.
    pub fn is_multi_instance(&self) -> bool {
        matches!(self, Self::DataFlow | Self::ControlFlow | Self::ProcessCall)
    }

    /// Whether `end_one -> end_two` is a legal pairing for this kind.
    pub fn accepts_ends(&self, end_one: ElementKind, end_two: ElementKind) -> bool {
        use ElementKind::*;
        match self {
            Self::DataFlow | Self::ControlFlow | Self::ProcessCall | Self::LineageMapping => true,
            Self::ProcessContainment => end_one == Process && end_two == Process,
            Self::PortDelegation => end_one == Port && end_two == Port,
            Self::ProcessPort => end_one == Process && end_two == Port,
            Self::SchemaTypeParent => end_one != SchemaType && end_two == SchemaType,
            Self::AssetRelationship => end_one == Asset && end_two == Asset,
        }
    }
}

impl std::fmt::Display for RelationshipKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.type_name())
    }
}

/// Properties shared by data flows, process calls and lineage mappings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FlowProperties {
    /// Distinguishes several flows between the same two elements
    pub qualified_name: Option<String>,
    pub description: Option<String>,
    pub formula: Option<String>,
    pub formula_type: Option<String>,
    #[serde(default)]
    pub effective: EffectiveWindow,
}

impl FlowProperties {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn named(qualified_name: impl Into<String>) -> Self {
        Self {
            qualified_name: Some(qualified_name.into()),
            ..Default::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_formula(mut self, formula: impl Into<String>) -> Self {
        self.formula = Some(formula.into());
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ControlFlowProperties {
    pub qualified_name: Option<String>,
    pub description: Option<String>,
    pub guard: Option<String>,
    pub mandatory_guard: Option<bool>,
    #[serde(default)]
    pub effective: EffectiveWindow,
}

impl ControlFlowProperties {
    pub fn named(qualified_name: impl Into<String>) -> Self {
        Self {
            qualified_name: Some(qualified_name.into()),
            ..Default::default()
        }
    }

    pub fn with_guard(mut self, guard: impl Into<String>, mandatory: bool) -> Self {
        self.guard = Some(guard.into());
        self.mandatory_guard = Some(mandatory);
        self
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProcessContainmentType {
    #[default]
    Owned,
    Used,
    Other,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProcessContainmentProperties {
    pub containment_type: Option<ProcessContainmentType>,
    #[serde(default)]
    pub effective: EffectiveWindow,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AssetRelationshipProperties {
    /// Open metadata relationship type, e.g. "DataContentForDataSet"
    pub relationship_type: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub additional_properties: Properties,
    #[serde(default)]
    pub effective: EffectiveWindow,
}

impl HasEffectiveWindow for FlowProperties {
    fn effective_window(&self) -> &EffectiveWindow {
        &self.effective
    }
}

impl HasEffectiveWindow for ControlFlowProperties {
    fn effective_window(&self) -> &EffectiveWindow {
        &self.effective
    }
}

impl HasEffectiveWindow for ProcessContainmentProperties {
    fn effective_window(&self) -> &EffectiveWindow {
        &self.effective
    }
}

impl HasEffectiveWindow for AssetRelationshipProperties {
    fn effective_window(&self) -> &EffectiveWindow {
        &self.effective
    }
}

/// Kind-specific relationship properties, tagged by an explicit `kind` field.
///
/// Port delegation, process ports and schema type parents carry nothing
/// beyond their effective window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum RelationshipProperties {
    DataFlow(FlowProperties),
    ControlFlow(ControlFlowProperties),
    ProcessCall(FlowProperties),
    LineageMapping(FlowProperties),
    ProcessContainment(ProcessContainmentProperties),
    PortDelegation(EffectiveWindow),
    ProcessPort(EffectiveWindow),
    SchemaTypeParent(EffectiveWindow),
    AssetRelationship(AssetRelationshipProperties),
}

impl RelationshipProperties {
    pub fn kind(&self) -> RelationshipKind {
        match self {
            Self::DataFlow(_) => RelationshipKind::DataFlow,
            Self::ControlFlow(_) => RelationshipKind::ControlFlow,
            Self::ProcessCall(_) => RelationshipKind::ProcessCall,
            Self::LineageMapping(_) => RelationshipKind::LineageMapping,
            Self::ProcessContainment(_) => RelationshipKind::ProcessContainment,
            Self::PortDelegation(_) => RelationshipKind::PortDelegation,
            Self::ProcessPort(_) => RelationshipKind::ProcessPort,
            Self::SchemaTypeParent(_) => RelationshipKind::SchemaTypeParent,
            Self::AssetRelationship(_) => RelationshipKind::AssetRelationship,
        }
    }

    /// The value that tells two relationships of the same kind between the
    /// same elements apart.
    pub fn qualifier(&self) -> Option<&str> {
        match self {
            Self::DataFlow(p) | Self::ProcessCall(p) | Self::LineageMapping(p) => {
                p.qualified_name.as_deref()
            }
            Self::ControlFlow(p) => p.qualified_name.as_deref(),
            Self::AssetRelationship(p) => p.relationship_type.as_deref(),
            _ => None,
        }
    }
}

impl HasEffectiveWindow for RelationshipProperties {
    fn effective_window(&self) -> &EffectiveWindow {
        match self {
            Self::DataFlow(p) | Self::ProcessCall(p) | Self::LineageMapping(p) => &p.effective,
            Self::ControlFlow(p) => &p.effective,
            Self::ProcessContainment(p) => &p.effective,
            Self::PortDelegation(w) | Self::ProcessPort(w) | Self::SchemaTypeParent(w) => w,
            Self::AssetRelationship(p) => &p.effective,
        }
    }
}

/// A relationship as returned by the store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineageRelationship {
    pub guid: RelationshipId,
    pub end_one: ElementId,
    pub end_two: ElementId,
    pub properties: RelationshipProperties,
    pub home: Option<ExternalSourceIdentity>,
    pub version: u64,
    pub created_by: String,
    pub create_time: DateTime<Utc>,
}

impl LineageRelationship {
    pub fn kind(&self) -> RelationshipKind {
        self.properties.kind()
    }

    pub fn is_effective_at(&self, at: Option<DateTime<Utc>>) -> bool {
        self.properties.effective_window().contains(at)
    }

    /// The end opposite to `from`
    pub fn other_end(&self, from: RelationshipEnd) -> &ElementId {
        match from {
            RelationshipEnd::One => &self.end_two,
            RelationshipEnd::Two => &self.end_one,
        }
    }
}

/// An element reached by following a relationship
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelatedElement {
    pub relationship: LineageRelationship,
    pub element: LineageElement,
}
