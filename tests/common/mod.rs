//! Common test utilities for the lineage integrator scenario tests
//!
//! Each test binary uses a different subset of these helpers.
#![allow(dead_code)]

pub mod listeners;

pub use listeners::{FailingListener, PanickingListener, RecordingListener, SlowListener};

use lineage_integrator::{ConnectorConfig, InMemoryMetadataStore, LineageIntegratorContext};
use std::sync::Arc;

pub const SOURCE_A: (&str, &str) = ("9c2e5b8a-source-a", "airflow@prod");
pub const SOURCE_B: (&str, &str) = ("41f07d3e-source-b", "dbt@prod");

pub fn config_for(source: (&str, &str)) -> ConnectorConfig {
    ConnectorConfig::new("lineage-test", "etl-npa", source.0, source.1)
        .with_server_name("test-server")
}

/// A context on a fresh in-memory store, plus the store for inspection
pub struct Fixture {
    pub store: Arc<InMemoryMetadataStore>,
    pub ctx: LineageIntegratorContext,
}

impl Fixture {
    pub fn new() -> Self {
        Self::with_config(config_for(SOURCE_A))
    }

    pub fn with_config(config: ConnectorConfig) -> Self {
        let store = Arc::new(InMemoryMetadataStore::new());
        let ctx = LineageIntegratorContext::new(config, store.clone()).unwrap();
        Self { store, ctx }
    }

    /// Another context on the same store, acting for a different source
    pub fn other_source(&self, source: (&str, &str)) -> LineageIntegratorContext {
        LineageIntegratorContext::new(config_for(source), self.store.clone()).unwrap()
    }
}
