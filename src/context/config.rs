//! Connector configuration supplied at context construction

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Which way metadata may flow between the third-party tool and the store
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PermittedSynchronization {
    /// Only into the metadata store
    FromThirdParty,
    /// Only out of the metadata store; the context may not mutate
    ToThirdParty,
    #[default]
    BothDirections,
}

impl PermittedSynchronization {
    pub fn allows_store_updates(&self) -> bool {
        !matches!(self, Self::ToThirdParty)
    }
}

fn default_max_page_size() -> usize {
    1000
}

fn default_publish_zones() -> Vec<String> {
    vec!["data-lake".to_string()]
}

fn default_zones() -> Vec<String> {
    vec!["quarantine".to_string()]
}

fn default_listener_timeout_secs() -> u64 {
    30
}

/// Everything a lineage integration context needs to know about its
/// connector.
///
/// ```yaml
/// connector_id: 7d1a...
/// connector_name: airflow-lineage
/// user_id: airflow-npa
/// server_name: integration-daemon-1
/// external_source_guid: 0b4c...
/// external_source_name: airflow@prod
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectorConfig {
    pub connector_id: String,
    pub connector_name: String,
    pub user_id: String,
    #[serde(default)]
    pub server_name: String,
    #[serde(default = "default_max_page_size")]
    pub max_page_size: usize,
    #[serde(default)]
    pub generate_integration_report: bool,
    #[serde(default)]
    pub permitted_synchronization: PermittedSynchronization,
    pub external_source_guid: String,
    pub external_source_name: String,
    #[serde(default = "default_publish_zones")]
    pub publish_zones: Vec<String>,
    #[serde(default = "default_zones")]
    pub default_zones: Vec<String>,
    #[serde(default = "default_listener_timeout_secs")]
    pub listener_timeout_secs: u64,
}

impl ConnectorConfig {
    pub fn new(
        connector_name: impl Into<String>,
        user_id: impl Into<String>,
        external_source_guid: impl Into<String>,
        external_source_name: impl Into<String>,
    ) -> Self {
        Self {
            connector_id: uuid::Uuid::new_v4().to_string(),
            connector_name: connector_name.into(),
            user_id: user_id.into(),
            server_name: String::new(),
            max_page_size: default_max_page_size(),
            generate_integration_report: false,
            permitted_synchronization: PermittedSynchronization::default(),
            external_source_guid: external_source_guid.into(),
            external_source_name: external_source_name.into(),
            publish_zones: default_publish_zones(),
            default_zones: default_zones(),
            listener_timeout_secs: default_listener_timeout_secs(),
        }
    }

    pub fn with_server_name(mut self, server_name: impl Into<String>) -> Self {
        self.server_name = server_name.into();
        self
    }

    pub fn with_max_page_size(mut self, max_page_size: usize) -> Self {
        self.max_page_size = max_page_size;
        self
    }

    pub fn with_integration_report(mut self, enabled: bool) -> Self {
        self.generate_integration_report = enabled;
        self
    }

    pub fn with_permitted_synchronization(mut self, direction: PermittedSynchronization) -> Self {
        self.permitted_synchronization = direction;
        self
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let required = [
            ("connector_name", &self.connector_name),
            ("user_id", &self.user_id),
            ("external_source_guid", &self.external_source_guid),
            ("external_source_name", &self.external_source_name),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(ConfigError::Invalid(format!("{} must not be empty", field)));
            }
        }
        if self.max_page_size == 0 {
            return Err(ConfigError::Invalid("max_page_size must be positive".into()));
        }
        if self.listener_timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "listener_timeout_secs must be positive".into(),
            ));
        }
        Ok(())
    }

    pub fn listener_timeout(&self) -> Duration {
        Duration::from_secs(self.listener_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const MINIMAL: &str = r#"
connector_id: c-1
connector_name: airflow-lineage
user_id: airflow-npa
external_source_guid: src-1
external_source_name: airflow@prod
"#;

    #[test]
    fn minimal_yaml_gets_defaults() {
        let config = ConnectorConfig::from_yaml_str(MINIMAL).unwrap();
        assert_eq!(config.max_page_size, 1000);
        assert!(!config.generate_integration_report);
        assert_eq!(
            config.permitted_synchronization,
            PermittedSynchronization::BothDirections
        );
        assert_eq!(config.publish_zones, vec!["data-lake".to_string()]);
        assert_eq!(config.listener_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn direction_parses_snake_case() {
        let yaml = format!("{}permitted_synchronization: to_third_party\n", MINIMAL);
        let config = ConnectorConfig::from_yaml_str(&yaml).unwrap();
        assert!(!config.permitted_synchronization.allows_store_updates());
    }

    #[test]
    fn blank_source_is_rejected() {
        let yaml = MINIMAL.replace("src-1", "\"\"");
        let err = ConnectorConfig::from_yaml_str(&yaml).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(MINIMAL.as_bytes()).unwrap();
        let config = ConnectorConfig::from_yaml_file(file.path()).unwrap();
        assert_eq!(config.connector_name, "airflow-lineage");
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = ConnectorConfig::from_yaml_file("/nonexistent/connector.yaml").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
