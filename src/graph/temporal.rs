//! Effective-time windows for elements and relationships

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The `[effective_from, effective_to)` interval during which an element
/// or relationship is visible to queries.
///
/// A missing `effective_from` means "effective since the epoch"; a missing
/// `effective_to` means "effective indefinitely".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectiveWindow {
    pub effective_from: Option<DateTime<Utc>>,
    pub effective_to: Option<DateTime<Utc>>,
}

impl EffectiveWindow {
    /// A window with no bounds
    pub fn always() -> Self {
        Self::default()
    }

    /// Effective from the given instant onwards
    pub fn starting(from: DateTime<Utc>) -> Self {
        Self {
            effective_from: Some(from),
            effective_to: None,
        }
    }

    /// Effective from `from` (inclusive) until `to` (exclusive)
    pub fn between(from: DateTime<Utc>, to: DateTime<Utc>) -> Self {
        Self {
            effective_from: Some(from),
            effective_to: Some(to),
        }
    }

    /// Whether the window is well formed (`from` strictly before `to`).
    pub fn is_valid(&self) -> bool {
        match (self.effective_from, self.effective_to) {
            (Some(from), Some(to)) => from < to,
            _ => true,
        }
    }

    /// Whether the instant falls inside the window.
    ///
    /// `None` means "any time" and always matches.
    pub fn contains(&self, at: Option<DateTime<Utc>>) -> bool {
        let Some(at) = at else {
            return true;
        };
        if let Some(from) = self.effective_from {
            if at < from {
                return false;
            }
        }
        match self.effective_to {
            Some(to) => at < to,
            None => true,
        }
    }
}
