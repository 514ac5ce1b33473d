//! Error types for Refboard store operations

use crate::{EntityId, EntityKind};
use thiserror::Error;

/// Validation errors raised when a record would violate its invariants.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Required field missing: {field}")]
    RequiredFieldMissing { field: String },

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("Duplicate {kind} id {id}")]
    DuplicateId { kind: EntityKind, id: EntityId },
}

impl ValidationError {
    pub fn missing(field: impl Into<String>) -> Self {
        ValidationError::RequiredFieldMissing {
            field: field.into(),
        }
    }

    pub fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ValidationError::InvalidValue {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Errors surfaced by entity stores to the coordination layer.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("{} not found: id {id}", .kind.label())]
    NotFound { kind: EntityKind, id: EntityId },

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl StoreError {
    pub fn not_found(kind: EntityKind, id: EntityId) -> Self {
        StoreError::NotFound { kind, id }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }
}

/// Result type alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_display() {
        let err = StoreError::not_found(EntityKind::User, EntityId::new(9));
        assert_eq!(err.to_string(), "User not found: id 9");
        assert!(err.is_not_found());
    }

    #[test]
    fn test_validation_converts_into_store_error() {
        let err: StoreError = ValidationError::missing("email").into();
        assert!(!err.is_not_found());
        assert!(err.to_string().contains("Required field missing: email"));
    }

    #[test]
    fn test_invalid_value_display() {
        let err = ValidationError::invalid("email", "must contain '@'");
        assert_eq!(err.to_string(), "Invalid value for email: must contain '@'");
    }
}
