//! Caller identity and per-call attribution

use crate::error::{LineageError, LineageResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};

/// The asset manager or tool on whose behalf calls are made.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExternalSourceIdentity {
    pub guid: String,
    pub qualified_name: String,
}

impl ExternalSourceIdentity {
    pub fn new(guid: impl Into<String>, qualified_name: impl Into<String>) -> Self {
        Self {
            guid: guid.into(),
            qualified_name: qualified_name.into(),
        }
    }
}

impl std::fmt::Display for ExternalSourceIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.qualified_name, self.guid)
    }
}

/// The cross-cutting parameters forwarded with every store call.
///
/// Built fresh for each call so the flags reflect their value at call time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallAttribution {
    pub user_id: String,
    pub external_source: ExternalSourceIdentity,
    pub for_lineage: bool,
    pub for_duplicate_processing: bool,
    pub effective_time: Option<DateTime<Utc>>,
}

/// Who is calling, for which source, and how results should be filtered.
///
/// `for_lineage` and `for_duplicate_processing` are session-scoped
/// settings. They may be flipped from any thread; a flip is seen by the
/// next call that builds a [`CallAttribution`].
#[derive(Debug)]
pub struct AttributionContext {
    user_id: String,
    external_source: ExternalSourceIdentity,
    for_lineage: AtomicBool,
    for_duplicate_processing: AtomicBool,
}

impl AttributionContext {
    pub fn new(
        user_id: impl Into<String>,
        external_source: ExternalSourceIdentity,
    ) -> LineageResult<Self> {
        let user_id = user_id.into();
        if user_id.trim().is_empty() {
            return Err(LineageError::invalid("user_id", "must not be empty"));
        }
        if external_source.guid.trim().is_empty() {
            return Err(LineageError::invalid("external_source_guid", "must not be empty"));
        }
        if external_source.qualified_name.trim().is_empty() {
            return Err(LineageError::invalid("external_source_name", "must not be empty"));
        }
        Ok(Self {
            user_id,
            external_source,
            for_lineage: AtomicBool::new(false),
            for_duplicate_processing: AtomicBool::new(false),
        })
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn external_source(&self) -> &ExternalSourceIdentity {
        &self.external_source
    }

    pub fn for_lineage(&self) -> bool {
        self.for_lineage.load(Ordering::SeqCst)
    }

    pub fn set_for_lineage(&self, for_lineage: bool) {
        self.for_lineage.store(for_lineage, Ordering::SeqCst);
    }

    pub fn for_duplicate_processing(&self) -> bool {
        self.for_duplicate_processing.load(Ordering::SeqCst)
    }

    pub fn set_for_duplicate_processing(&self, for_duplicate_processing: bool) {
        self.for_duplicate_processing
            .store(for_duplicate_processing, Ordering::SeqCst);
    }

    /// Snapshot the attribution for one call.
    pub fn attribution(&self, effective_time: Option<DateTime<Utc>>) -> CallAttribution {
        CallAttribution {
            user_id: self.user_id.clone(),
            external_source: self.external_source.clone(),
            for_lineage: self.for_lineage(),
            for_duplicate_processing: self.for_duplicate_processing(),
            effective_time,
        }
    }
}
