//! Listener doubles for fan-out tests

use async_trait::async_trait;
use lineage_integrator::{ListenerError, OpenLineageListener, OpenLineageRunEvent};
use std::sync::Mutex;
use std::time::Duration;

/// What a recording listener saw for one delivery
#[derive(Debug, Clone, PartialEq)]
pub struct Received {
    pub job_name: Option<String>,
    pub raw: String,
}

pub struct RecordingListener {
    name: String,
    received: Mutex<Vec<Received>>,
}

impl RecordingListener {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            received: Mutex::new(Vec::new()),
        }
    }

    pub fn received(&self) -> Vec<Received> {
        self.received.lock().unwrap().clone()
    }

    pub fn count(&self) -> usize {
        self.received.lock().unwrap().len()
    }
}

#[async_trait]
impl OpenLineageListener for RecordingListener {
    fn listener_name(&self) -> &str {
        &self.name
    }

    async fn process_open_lineage_run_event(
        &self,
        event: Option<&OpenLineageRunEvent>,
        raw_event: &str,
    ) -> Result<(), ListenerError> {
        self.received.lock().unwrap().push(Received {
            job_name: event.map(|e| e.job.name.clone()),
            raw: raw_event.to_string(),
        });
        Ok(())
    }
}

pub struct FailingListener;

#[async_trait]
impl OpenLineageListener for FailingListener {
    fn listener_name(&self) -> &str {
        "failing"
    }

    async fn process_open_lineage_run_event(
        &self,
        _event: Option<&OpenLineageRunEvent>,
        _raw_event: &str,
    ) -> Result<(), ListenerError> {
        Err(ListenerError::Rejected("downstream catalog refused the event".into()))
    }
}

pub struct PanickingListener;

#[async_trait]
impl OpenLineageListener for PanickingListener {
    fn listener_name(&self) -> &str {
        "panicking"
    }

    async fn process_open_lineage_run_event(
        &self,
        _event: Option<&OpenLineageRunEvent>,
        _raw_event: &str,
    ) -> Result<(), ListenerError> {
        panic!("listener bug");
    }
}

pub struct SlowListener(pub Duration);

#[async_trait]
impl OpenLineageListener for SlowListener {
    fn listener_name(&self) -> &str {
        "slow"
    }

    async fn process_open_lineage_run_event(
        &self,
        _event: Option<&OpenLineageRunEvent>,
        _raw_event: &str,
    ) -> Result<(), ListenerError> {
        tokio::time::sleep(self.0).await;
        Ok(())
    }
}
