//! Holder for a connector's integration context
//!
//! The outer connector lifecycle establishes the context some time after
//! the connector object exists. Until then, and after the context is
//! cleared, every operation fails with `MissingContext` and leaves an
//! audit record.

use crate::context::{LineageIntegratorContext, AUDIT_TARGET};
use crate::error::{LineageError, LineageResult};
use std::sync::{Arc, PoisonError, RwLock};

pub struct ContextSlot {
    connector_name: String,
    context: RwLock<Option<Arc<LineageIntegratorContext>>>,
}

impl ContextSlot {
    pub fn new(connector_name: impl Into<String>) -> Self {
        Self {
            connector_name: connector_name.into(),
            context: RwLock::new(None),
        }
    }

    pub fn connector_name(&self) -> &str {
        &self.connector_name
    }

    /// Install the context, replacing any previous one.
    pub fn establish(&self, context: Arc<LineageIntegratorContext>) {
        *self.context.write().unwrap_or_else(PoisonError::into_inner) = Some(context);
        tracing::info!(
            target: AUDIT_TARGET,
            connector = %self.connector_name,
            "Integration context established"
        );
    }

    /// Drop the context, e.g. when the connector is disconnected.
    pub fn clear(&self) -> Option<Arc<LineageIntegratorContext>> {
        self.context
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }

    pub fn is_established(&self) -> bool {
        self.context
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// The current context, for use by `method`.
    pub fn context(&self, method: &str) -> LineageResult<Arc<LineageIntegratorContext>> {
        let guard = self.context.read().unwrap_or_else(PoisonError::into_inner);
        match guard.as_ref() {
            Some(context) => Ok(Arc::clone(context)),
            None => {
                tracing::error!(
                    target: AUDIT_TARGET,
                    connector = %self.connector_name,
                    method,
                    "Integration context called before it was established"
                );
                Err(LineageError::MissingContext(format!(
                    "connector {} has no integration context for {}",
                    self.connector_name, method
                )))
            }
        }
    }
}

impl std::fmt::Debug for ContextSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContextSlot")
            .field("connector_name", &self.connector_name)
            .field("established", &self.is_established())
            .finish()
    }
}
