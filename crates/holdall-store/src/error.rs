//! Error types for the data-access abstraction layer.
//!
//! This module defines all error types that can occur during store operations.

use holdall_core::RecordError;
use std::fmt;

/// Errors that can occur during store operations.
///
/// Variants carry owned display data rather than source errors so the whole
/// enum is `Clone` and can be copied into the shared last-error slot.
#[derive(Debug, Clone, thiserror::Error)]
pub enum StoreError {
    /// A single-entity lookup found nothing.
    #[error("Entity not found: {kind} ({selector})")]
    NotFound {
        /// The kind tag of the extent that was probed.
        kind: String,
        /// Human-readable description of what was looked up.
        selector: String,
    },

    /// The backend failed to persist a write.
    #[error("Persistence failure: {message}")]
    Persistence {
        /// Description of the write failure.
        message: String,
    },

    /// A query or field descriptor could not be evaluated.
    #[error("Query evaluation failure: {message}")]
    QueryEvaluation {
        /// Description of why the descriptor is not evaluable.
        message: String,
    },

    /// An entity could not be encoded to or decoded from its stored form.
    #[error("Serialization failure: {message}")]
    Serialization {
        /// Description of the codec failure.
        message: String,
    },

    /// The backend could not be reached.
    #[error("Backend unavailable: {message}")]
    Unavailable {
        /// Description of the connectivity failure.
        message: String,
    },
}

impl StoreError {
    /// Creates a `NotFound` error for a key lookup.
    #[must_use]
    pub fn not_found_key(kind: impl Into<String>, key: &holdall_core::Key) -> Self {
        Self::NotFound {
            kind: kind.into(),
            selector: format!("key {key}"),
        }
    }

    /// Creates a `NotFound` error for a field-equality lookup.
    #[must_use]
    pub fn not_found_field(
        kind: impl Into<String>,
        field: &str,
        value: &serde_json::Value,
    ) -> Self {
        Self::NotFound {
            kind: kind.into(),
            selector: format!("field {field} = {value}"),
        }
    }

    /// Creates a `NotFound` error for a query lookup.
    #[must_use]
    pub fn not_found_query(kind: impl Into<String>) -> Self {
        Self::NotFound {
            kind: kind.into(),
            selector: "query".to_string(),
        }
    }

    /// Creates a `NotFound` error for a bare-type probe.
    #[must_use]
    pub fn not_found_any(kind: impl Into<String>) -> Self {
        Self::NotFound {
            kind: kind.into(),
            selector: "any".to_string(),
        }
    }

    /// Creates a new `Persistence` error.
    #[must_use]
    pub fn persistence(message: impl Into<String>) -> Self {
        Self::Persistence {
            message: message.into(),
        }
    }

    /// Creates a new `QueryEvaluation` error.
    #[must_use]
    pub fn query_evaluation(message: impl Into<String>) -> Self {
        Self::QueryEvaluation {
            message: message.into(),
        }
    }

    /// Creates a new `Serialization` error.
    #[must_use]
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization {
            message: message.into(),
        }
    }

    /// Creates a new `Unavailable` error.
    #[must_use]
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    /// Returns `true` if this is a not found error.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Returns `true` if this is a persistence error.
    #[must_use]
    pub fn is_persistence(&self) -> bool {
        matches!(self, Self::Persistence { .. })
    }

    /// Returns `true` if this is a query evaluation error.
    #[must_use]
    pub fn is_query_evaluation(&self) -> bool {
        matches!(self, Self::QueryEvaluation { .. })
    }

    /// Returns the error category for logging/monitoring purposes.
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::NotFound { .. } => ErrorCategory::NotFound,
            Self::Persistence { .. } => ErrorCategory::Persistence,
            Self::QueryEvaluation { .. } => ErrorCategory::Query,
            Self::Serialization { .. } => ErrorCategory::Serialization,
            Self::Unavailable { .. } => ErrorCategory::Infrastructure,
        }
    }
}

impl From<RecordError> for StoreError {
    fn from(error: RecordError) -> Self {
        Self::Serialization {
            message: error.to_string(),
        }
    }
}

/// Categories of store errors for logging and monitoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Entity not found.
    NotFound,
    /// Backend write failure.
    Persistence,
    /// Query or field descriptor failure.
    Query,
    /// Entity codec failure.
    Serialization,
    /// Infrastructure/connectivity failure.
    Infrastructure,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "not_found"),
            Self::Persistence => write!(f, "persistence"),
            Self::Query => write!(f, "query"),
            Self::Serialization => write!(f, "serialization"),
            Self::Infrastructure => write!(f, "infrastructure"),
        }
    }
}
