//! OpenLineage run event payload
//!
//! Only the envelope is typed. Facets stay open JSON maps so producers can
//! attach whatever facets they like without this crate knowing about them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub type Facets = serde_json::Map<String, serde_json::Value>;

pub const DEFAULT_SCHEMA_URL: &str =
    "https://openlineage.io/spec/2-0-2/OpenLineage.json#/$defs/RunEvent";

fn default_schema_url() -> String {
    DEFAULT_SCHEMA_URL.to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RunEventType {
    Start,
    Running,
    Complete,
    Abort,
    Fail,
    Other,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpenLineageRun {
    #[serde(rename = "runId")]
    pub run_id: String,
    #[serde(default, skip_serializing_if = "Facets::is_empty")]
    pub facets: Facets,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpenLineageJob {
    pub namespace: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Facets::is_empty")]
    pub facets: Facets,
}

/// A dataset read or written by a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpenLineageDataset {
    pub namespace: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Facets::is_empty")]
    pub facets: Facets,
}

impl OpenLineageDataset {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
            facets: Facets::new(),
        }
    }
}

/// One state change of a job run, as defined by the OpenLineage standard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenLineageRunEvent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_type: Option<RunEventType>,
    pub event_time: DateTime<Utc>,
    pub producer: String,
    #[serde(rename = "schemaURL", default = "default_schema_url")]
    pub schema_url: String,
    pub run: OpenLineageRun,
    pub job: OpenLineageJob,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub inputs: Vec<OpenLineageDataset>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub outputs: Vec<OpenLineageDataset>,
}

impl OpenLineageRunEvent {
    /// A new event for a fresh run of `namespace/name`, stamped now
    pub fn new(
        event_type: RunEventType,
        namespace: impl Into<String>,
        name: impl Into<String>,
        producer: impl Into<String>,
    ) -> Self {
        Self {
            event_type: Some(event_type),
            event_time: Utc::now(),
            producer: producer.into(),
            schema_url: default_schema_url(),
            run: OpenLineageRun {
                run_id: uuid::Uuid::new_v4().to_string(),
                facets: Facets::new(),
            },
            job: OpenLineageJob {
                namespace: namespace.into(),
                name: name.into(),
                facets: Facets::new(),
            },
            inputs: Vec::new(),
            outputs: Vec::new(),
        }
    }

    pub fn with_input(mut self, dataset: OpenLineageDataset) -> Self {
        self.inputs.push(dataset);
        self
    }

    pub fn with_output(mut self, dataset: OpenLineageDataset) -> Self {
        self.outputs.push(dataset);
        self
    }

    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RAW: &str = r#"{
        "eventType": "COMPLETE",
        "eventTime": "2024-03-01T10:15:00Z",
        "producer": "https://github.com/apache/airflow",
        "run": {"runId": "3f5e83fa-3480-44ff-99c5-ff943904e5e8"},
        "job": {"namespace": "airflow", "name": "load_orders",
                "facets": {"documentation": {"description": "nightly load"}}},
        "inputs": [{"namespace": "s3://raw", "name": "orders.csv"}],
        "outputs": [{"namespace": "postgres://dw", "name": "public.orders"}]
    }"#;

    #[test]
    fn parses_standard_event() {
        let event = OpenLineageRunEvent::from_json(RAW).unwrap();
        assert_eq!(event.event_type, Some(RunEventType::Complete));
        assert_eq!(event.job.name, "load_orders");
        assert_eq!(event.schema_url, DEFAULT_SCHEMA_URL);
        assert_eq!(event.inputs[0].name, "orders.csv");
        assert!(event.job.facets.contains_key("documentation"));
    }

    #[test]
    fn serializes_with_wire_names() {
        let event = OpenLineageRunEvent::new(RunEventType::Start, "airflow", "load", "test");
        let json: serde_json::Value = serde_json::from_str(&event.to_json().unwrap()).unwrap();
        assert_eq!(json["eventType"], "START");
        assert!(json["run"]["runId"].is_string());
        assert!(json["schemaURL"].is_string());
        assert!(json.get("inputs").is_none());
    }

    #[test]
    fn rejects_missing_job() {
        let raw = r#"{"eventTime": "2024-03-01T10:15:00Z", "producer": "x", "run": {"runId": "r"}}"#;
        assert!(OpenLineageRunEvent::from_json(raw).is_err());
    }
}
