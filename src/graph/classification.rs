//! Classifications: narrow tags attached to an element
//!
//! Each classification is set or cleared as a unit. The memento
//! classification is the soft-delete marker.

use super::element::ElementKind;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// How a key value was assigned
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum KeyPattern {
    #[default]
    LocalKey,
    RecycledKey,
    NaturalKey,
    MirrorKey,
    AggregateKey,
    CallersKey,
    StableKey,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ClassificationKind {
    ReferenceData,
    BusinessSignificant,
    CalculatedValue,
    PrimaryKey,
    Memento,
    Incomplete,
}

impl ClassificationKind {
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::ReferenceData => "ReferenceData",
            Self::BusinessSignificant => "BusinessSignificant",
            Self::CalculatedValue => "CalculatedValue",
            Self::PrimaryKey => "PrimaryKey",
            Self::Memento => "Memento",
            Self::Incomplete => "Incomplete",
        }
    }

    /// Whether the classification may be attached to elements of `kind`.
    pub fn applies_to(&self, kind: ElementKind) -> bool {
        match self {
            Self::ReferenceData => matches!(
                kind,
                ElementKind::Asset | ElementKind::SchemaType | ElementKind::SchemaAttribute
            ),
            Self::CalculatedValue | Self::PrimaryKey => kind == ElementKind::SchemaAttribute,
            Self::Incomplete => matches!(kind, ElementKind::Process | ElementKind::Asset),
            Self::BusinessSignificant | Self::Memento => true,
        }
    }
}

impl std::fmt::Display for ClassificationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.type_name())
    }
}

/// A classification together with its properties.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "classification")]
pub enum Classification {
    ReferenceData,
    BusinessSignificant {
        description: Option<String>,
        scope: Option<String>,
        business_capability_guid: Option<String>,
    },
    CalculatedValue {
        formula: Option<String>,
    },
    PrimaryKey {
        name: Option<String>,
        key_pattern: KeyPattern,
    },
    Memento {
        archive_date: DateTime<Utc>,
        archive_user: String,
        archive_process: Option<String>,
    },
    Incomplete {
        notes: Option<String>,
    },
}

impl Classification {
    pub fn kind(&self) -> ClassificationKind {
        match self {
            Self::ReferenceData => ClassificationKind::ReferenceData,
            Self::BusinessSignificant { .. } => ClassificationKind::BusinessSignificant,
            Self::CalculatedValue { .. } => ClassificationKind::CalculatedValue,
            Self::PrimaryKey { .. } => ClassificationKind::PrimaryKey,
            Self::Memento { .. } => ClassificationKind::Memento,
            Self::Incomplete { .. } => ClassificationKind::Incomplete,
        }
    }
}
