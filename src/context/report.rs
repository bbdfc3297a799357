//! Integration report: what a connector changed in the metadata store

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Elements and relationships created, updated and deleted through one
/// context since the last report was taken.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntegrationReport {
    pub connector_id: String,
    pub connector_name: String,
    pub server_name: String,
    pub refresh_start: DateTime<Utc>,
    pub refresh_completion: DateTime<Utc>,
    pub created_elements: Vec<String>,
    pub updated_elements: Vec<String>,
    pub deleted_elements: Vec<String>,
}

impl IntegrationReport {
    pub fn is_empty(&self) -> bool {
        self.created_elements.is_empty()
            && self.updated_elements.is_empty()
            && self.deleted_elements.is_empty()
    }
}

#[derive(Debug)]
pub(crate) struct ReportBuilder {
    refresh_start: DateTime<Utc>,
    created: Vec<String>,
    updated: Vec<String>,
    deleted: Vec<String>,
}

impl ReportBuilder {
    pub(crate) fn new() -> Self {
        Self {
            refresh_start: Utc::now(),
            created: Vec::new(),
            updated: Vec::new(),
            deleted: Vec::new(),
        }
    }

    pub(crate) fn created(&mut self, guid: &str) {
        if !self.created.iter().any(|g| g == guid) {
            self.created.push(guid.to_string());
        }
    }

    /// Updates to something created in the same period are not repeated.
    pub(crate) fn updated(&mut self, guid: &str) {
        if !self.created.iter().any(|g| g == guid) && !self.updated.iter().any(|g| g == guid) {
            self.updated.push(guid.to_string());
        }
    }

    pub(crate) fn deleted(&mut self, guid: &str) {
        self.deleted.push(guid.to_string());
    }

    /// Produce the report and start a new period.
    pub(crate) fn take(
        &mut self,
        connector_id: &str,
        connector_name: &str,
        server_name: &str,
    ) -> IntegrationReport {
        let finished = std::mem::replace(self, Self::new());
        IntegrationReport {
            connector_id: connector_id.to_string(),
            connector_name: connector_name.to_string(),
            server_name: server_name.to_string(),
            refresh_start: finished.refresh_start,
            refresh_completion: Utc::now(),
            created_elements: finished.created,
            updated_elements: finished.updated,
            deleted_elements: finished.deleted,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn updates_after_create_are_folded() {
        let mut builder = ReportBuilder::new();
        builder.created("a");
        builder.updated("a");
        builder.updated("b");
        builder.updated("b");
        builder.deleted("c");

        let report = builder.take("c-1", "lineage", "server");
        assert_eq!(report.created_elements, vec!["a"]);
        assert_eq!(report.updated_elements, vec!["b"]);
        assert_eq!(report.deleted_elements, vec!["c"]);
    }

    #[test]
    fn a_guid_is_listed_as_created_once() {
        let mut builder = ReportBuilder::new();
        builder.created("edge");
        builder.created("edge");
        builder.updated("edge");

        let report = builder.take("c-1", "lineage", "server");
        assert_eq!(report.created_elements, vec!["edge"]);
        assert!(report.updated_elements.is_empty());
    }

    #[test]
    fn take_starts_a_new_period() {
        let mut builder = ReportBuilder::new();
        builder.created("a");
        let _ = builder.take("c-1", "lineage", "server");
        let second = builder.take("c-1", "lineage", "server");
        assert!(second.is_empty());
    }
}
