//! External identifiers binding an element to the caller's own id space

use super::classification::KeyPattern;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExternalIdentifierProperties {
    pub external_identifier: String,
    pub external_identifier_name: Option<String>,
    pub external_identifier_usage: Option<String>,
    pub external_identifier_source: Option<String>,
    #[serde(default)]
    pub key_pattern: KeyPattern,
    pub external_instance_created_by: Option<String>,
    pub external_instance_creation_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub mapping_properties: HashMap<String, String>,
}

impl ExternalIdentifierProperties {
    pub fn new(external_identifier: impl Into<String>) -> Self {
        Self {
            external_identifier: external_identifier.into(),
            ..Default::default()
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.external_identifier_name = Some(name.into());
        self
    }

    pub fn with_key_pattern(mut self, key_pattern: KeyPattern) -> Self {
        self.key_pattern = key_pattern;
        self
    }
}
