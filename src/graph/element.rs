//! Lineage graph nodes: assets, schema elements, processes and ports

use super::classification::{Classification, ClassificationKind};
use super::temporal::EffectiveWindow;
use super::value::Properties;
use crate::context::ExternalSourceIdentity;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Store-issued unique identifier for an element
///
/// Serializes as a plain string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementId(String);

impl ElementId {
    /// Create a new random ElementId (UUID-based)
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

impl Default for ElementId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ElementId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ElementId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for ElementId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// The node kinds managed by the lineage façade
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ElementKind {
    Asset,
    SchemaType,
    SchemaAttribute,
    Process,
    Port,
}

impl ElementKind {
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Asset => "Asset",
            Self::SchemaType => "SchemaType",
            Self::SchemaAttribute => "SchemaAttribute",
            Self::Process => "Process",
            Self::Port => "Port",
        }
    }

    /// Name of the guid parameter used in error messages
    pub fn guid_parameter(&self) -> &'static str {
        match self {
            Self::Asset => "asset_guid",
            Self::SchemaType => "schema_type_guid",
            Self::SchemaAttribute => "schema_attribute_guid",
            Self::Process => "process_guid",
            Self::Port => "port_guid",
        }
    }

    /// Whether elements of this kind take part in zone-based publishing
    pub fn is_zoned(&self) -> bool {
        matches!(self, Self::Asset | Self::Process)
    }
}

impl std::fmt::Display for ElementKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.type_name())
    }
}

/// Lifecycle status of an element
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ElementStatus {
    Draft,
    Proposed,
    Approved,
    #[default]
    Active,
    Disabled,
    Deprecated,
    Other,
}

/// Elements that carry a unique qualified name
pub trait HasQualifiedName {
    fn qualified_name(&self) -> Option<&str>;
}

/// Elements and relationships that carry an effective-time window
pub trait HasEffectiveWindow {
    fn effective_window(&self) -> &EffectiveWindow;
}

macro_rules! impl_capabilities {
    ($($ty:ty),* $(,)?) => {
        $(
            impl HasQualifiedName for $ty {
                fn qualified_name(&self) -> Option<&str> {
                    self.qualified_name.as_deref()
                }
            }

            impl HasEffectiveWindow for $ty {
                fn effective_window(&self) -> &EffectiveWindow {
                    &self.effective
                }
            }
        )*
    };
}

/// Properties of a data asset (file, table, topic, ...)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AssetProperties {
    pub qualified_name: Option<String>,
    pub display_name: Option<String>,
    pub description: Option<String>,
    /// Open metadata subtype, e.g. "DataFile" or "RelationalTable"
    pub type_name: Option<String>,
    #[serde(default)]
    pub additional_properties: Properties,
    #[serde(default)]
    pub effective: EffectiveWindow,
}

impl AssetProperties {
    pub fn new(qualified_name: impl Into<String>) -> Self {
        Self {
            qualified_name: Some(qualified_name.into()),
            ..Default::default()
        }
    }

    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_type_name(mut self, type_name: impl Into<String>) -> Self {
        self.type_name = Some(type_name.into());
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SchemaTypeProperties {
    pub qualified_name: Option<String>,
    pub display_name: Option<String>,
    pub description: Option<String>,
    /// e.g. "TabularSchemaType", "StructSchemaType"
    pub type_name: Option<String>,
    pub version_number: Option<String>,
    pub author: Option<String>,
    pub usage: Option<String>,
    pub encoding_standard: Option<String>,
    pub namespace: Option<String>,
    pub is_deprecated: Option<bool>,
    #[serde(default)]
    pub additional_properties: Properties,
    #[serde(default)]
    pub effective: EffectiveWindow,
}

impl SchemaTypeProperties {
    pub fn new(qualified_name: impl Into<String>) -> Self {
        Self {
            qualified_name: Some(qualified_name.into()),
            ..Default::default()
        }
    }

    pub fn with_type_name(mut self, type_name: impl Into<String>) -> Self {
        self.type_name = Some(type_name.into());
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SchemaAttributeProperties {
    pub qualified_name: Option<String>,
    pub display_name: Option<String>,
    pub description: Option<String>,
    pub element_position: Option<u32>,
    pub min_cardinality: Option<u32>,
    pub max_cardinality: Option<u32>,
    pub data_type: Option<String>,
    pub default_value: Option<String>,
    pub is_nullable: Option<bool>,
    #[serde(default)]
    pub additional_properties: Properties,
    #[serde(default)]
    pub effective: EffectiveWindow,
}

impl SchemaAttributeProperties {
    pub fn new(qualified_name: impl Into<String>) -> Self {
        Self {
            qualified_name: Some(qualified_name.into()),
            ..Default::default()
        }
    }

    pub fn with_data_type(mut self, data_type: impl Into<String>) -> Self {
        self.data_type = Some(data_type.into());
        self
    }

    pub fn at_position(mut self, position: u32) -> Self {
        self.element_position = Some(position);
        self
    }
}

/// Properties of a process: a job, a step, a stored procedure, ...
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProcessProperties {
    pub qualified_name: Option<String>,
    pub technical_name: Option<String>,
    pub technical_description: Option<String>,
    pub display_name: Option<String>,
    pub description: Option<String>,
    pub formula: Option<String>,
    pub formula_type: Option<String>,
    pub implementation_language: Option<String>,
    /// e.g. "DeployedSoftwareComponent"
    pub type_name: Option<String>,
    #[serde(default)]
    pub additional_properties: Properties,
    #[serde(default)]
    pub effective: EffectiveWindow,
}

impl ProcessProperties {
    pub fn new(qualified_name: impl Into<String>) -> Self {
        Self {
            qualified_name: Some(qualified_name.into()),
            ..Default::default()
        }
    }

    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Direction of data through a port
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PortType {
    InIn,
    OutIn,
    InOut,
    OutOut,
    Other,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PortProperties {
    pub qualified_name: Option<String>,
    pub display_name: Option<String>,
    pub description: Option<String>,
    pub port_type: Option<PortType>,
    #[serde(default)]
    pub additional_properties: Properties,
    #[serde(default)]
    pub effective: EffectiveWindow,
}

impl PortProperties {
    pub fn new(qualified_name: impl Into<String>) -> Self {
        Self {
            qualified_name: Some(qualified_name.into()),
            ..Default::default()
        }
    }

    pub fn with_port_type(mut self, port_type: PortType) -> Self {
        self.port_type = Some(port_type);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

impl_capabilities!(
    AssetProperties,
    SchemaTypeProperties,
    SchemaAttributeProperties,
    ProcessProperties,
    PortProperties,
);

/// Kind-specific element properties, tagged by an explicit `kind` field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum ElementProperties {
    Asset(AssetProperties),
    SchemaType(SchemaTypeProperties),
    SchemaAttribute(SchemaAttributeProperties),
    Process(ProcessProperties),
    Port(PortProperties),
}

impl ElementProperties {
    pub fn kind(&self) -> ElementKind {
        match self {
            Self::Asset(_) => ElementKind::Asset,
            Self::SchemaType(_) => ElementKind::SchemaType,
            Self::SchemaAttribute(_) => ElementKind::SchemaAttribute,
            Self::Process(_) => ElementKind::Process,
            Self::Port(_) => ElementKind::Port,
        }
    }

    fn capabilities(&self) -> (&dyn HasQualifiedName, &dyn HasEffectiveWindow) {
        match self {
            Self::Asset(p) => (p, p),
            Self::SchemaType(p) => (p, p),
            Self::SchemaAttribute(p) => (p, p),
            Self::Process(p) => (p, p),
            Self::Port(p) => (p, p),
        }
    }

    pub fn display_name(&self) -> Option<&str> {
        match self {
            Self::Asset(p) => p.display_name.as_deref(),
            Self::SchemaType(p) => p.display_name.as_deref(),
            Self::SchemaAttribute(p) => p.display_name.as_deref(),
            Self::Process(p) => p.display_name.as_deref(),
            Self::Port(p) => p.display_name.as_deref(),
        }
    }

    pub fn description(&self) -> Option<&str> {
        match self {
            Self::Asset(p) => p.description.as_deref(),
            Self::SchemaType(p) => p.description.as_deref(),
            Self::SchemaAttribute(p) => p.description.as_deref(),
            Self::Process(p) => p.description.as_deref(),
            Self::Port(p) => p.description.as_deref(),
        }
    }

    /// The string fields a regex search is matched against
    pub fn searchable_text(&self) -> Vec<&str> {
        [self.qualified_name(), self.display_name(), self.description()]
            .into_iter()
            .flatten()
            .collect()
    }
}

impl HasQualifiedName for ElementProperties {
    fn qualified_name(&self) -> Option<&str> {
        self.capabilities().0.qualified_name()
    }
}

impl HasEffectiveWindow for ElementProperties {
    fn effective_window(&self) -> &EffectiveWindow {
        self.capabilities().1.effective_window()
    }
}

impl From<AssetProperties> for ElementProperties {
    fn from(p: AssetProperties) -> Self {
        Self::Asset(p)
    }
}

impl From<SchemaTypeProperties> for ElementProperties {
    fn from(p: SchemaTypeProperties) -> Self {
        Self::SchemaType(p)
    }
}

impl From<SchemaAttributeProperties> for ElementProperties {
    fn from(p: SchemaAttributeProperties) -> Self {
        Self::SchemaAttribute(p)
    }
}

impl From<ProcessProperties> for ElementProperties {
    fn from(p: ProcessProperties) -> Self {
        Self::Process(p)
    }
}

impl From<PortProperties> for ElementProperties {
    fn from(p: PortProperties) -> Self {
        Self::Port(p)
    }
}

/// Overrides applied when an element is copied from a template
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TemplateProperties {
    pub qualified_name: Option<String>,
    pub display_name: Option<String>,
    pub description: Option<String>,
}

impl TemplateProperties {
    pub fn new(qualified_name: impl Into<String>) -> Self {
        Self {
            qualified_name: Some(qualified_name.into()),
            ..Default::default()
        }
    }

    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// A lineage element as returned by the store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineageElement {
    pub guid: ElementId,
    pub properties: ElementProperties,
    pub status: ElementStatus,
    pub zone_membership: Vec<String>,
    pub classifications: BTreeMap<ClassificationKind, Classification>,
    /// Element this one is anchored to (removed along with it)
    pub anchor: Option<ElementId>,
    /// External source with exclusive update rights, if any
    pub home: Option<ExternalSourceIdentity>,
    pub version: u64,
    pub created_by: String,
    pub create_time: DateTime<Utc>,
    pub updated_by: Option<String>,
    pub update_time: Option<DateTime<Utc>>,
}

impl LineageElement {
    pub fn kind(&self) -> ElementKind {
        self.properties.kind()
    }

    pub fn qualified_name(&self) -> Option<&str> {
        self.properties.qualified_name()
    }

    pub fn has_classification(&self, kind: ClassificationKind) -> bool {
        self.classifications.contains_key(&kind)
    }

    /// Soft-deleted elements are only visible to lineage queries
    pub fn is_memento(&self) -> bool {
        self.has_classification(ClassificationKind::Memento)
    }

    pub fn is_effective_at(&self, at: Option<DateTime<Utc>>) -> bool {
        self.properties.effective_window().contains(at)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn element_properties_are_tagged_by_kind() {
        let props: ElementProperties = ProcessProperties::new("etl.load_orders").into();
        let json = serde_json::to_value(&props).unwrap();
        assert_eq!(json["kind"], "Process");
        assert_eq!(json["qualified_name"], "etl.load_orders");

        let back: ElementProperties = serde_json::from_value(json).unwrap();
        assert_eq!(back.kind(), ElementKind::Process);
    }

    #[test]
    fn searchable_text_skips_missing_fields() {
        let props: ElementProperties = AssetProperties::new("orders.csv")
            .with_description("daily extract")
            .into();
        assert_eq!(props.searchable_text(), vec!["orders.csv", "daily extract"]);
    }

    #[test]
    fn element_id_serializes_as_string() {
        let id = ElementId::from_string("guid-1");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"guid-1\"");
    }
}
