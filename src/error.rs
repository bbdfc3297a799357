//! Error taxonomy surfaced by the integration context

use crate::store::StoreError;
use thiserror::Error;

/// Errors returned by every façade operation.
///
/// Nothing here is retried by the context; connectors decide their own
/// retry and backoff policy.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LineageError {
    #[error("invalid parameter '{parameter}': {reason}")]
    InvalidParameter { parameter: String, reason: String },

    #[error("user '{user_id}' is not authorized: {reason}")]
    UserNotAuthorized { user_id: String, reason: String },

    #[error("property server error: {0}")]
    PropertyServerError(String),

    #[error("integration context not established: {0}")]
    MissingContext(String),
}

impl LineageError {
    pub fn invalid(parameter: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            parameter: parameter.into(),
            reason: reason.into(),
        }
    }

    pub fn not_authorized(user_id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::UserNotAuthorized {
            user_id: user_id.into(),
            reason: reason.into(),
        }
    }
}

impl From<StoreError> for LineageError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { parameter, guid } => {
                Self::invalid(parameter, format!("no element or relationship with guid {}", guid))
            }
            StoreError::InvalidRequest { parameter, reason } => Self::invalid(parameter, reason),
            StoreError::NotAuthorized { user_id, reason } => Self::not_authorized(user_id, reason),
            StoreError::Unavailable(msg) => Self::PropertyServerError(msg),
        }
    }
}

/// Result type for façade operations
pub type LineageResult<T> = Result<T, LineageError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_errors_map_onto_taxonomy() {
        let err: LineageError = StoreError::NotFound {
            parameter: "asset_guid".into(),
            guid: "abc".into(),
        }
        .into();
        assert!(matches!(err, LineageError::InvalidParameter { ref parameter, .. } if parameter == "asset_guid"));

        let err: LineageError = StoreError::NotAuthorized {
            user_id: "etl".into(),
            reason: "home is elsewhere".into(),
        }
        .into();
        assert!(matches!(err, LineageError::UserNotAuthorized { .. }));

        let err: LineageError = StoreError::Unavailable("connection reset".into()).into();
        assert_eq!(err, LineageError::PropertyServerError("connection reset".into()));
    }

    #[test]
    fn display_names_the_parameter() {
        let err = LineageError::invalid("qualified_name", "must not be empty");
        assert_eq!(
            err.to_string(),
            "invalid parameter 'qualified_name': must not be empty"
        );
    }
}
