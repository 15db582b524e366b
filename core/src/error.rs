//! Common error types for flashlab.

use thiserror::Error;

/// Errors raised while reading attribute snapshots.
#[derive(Debug, Error, PartialEq)]
pub enum CoreError {
    /// Attribute not found.
    #[error("attribute not found: {attr} on {owner}")]
    AttributeNotFound { owner: String, attr: String },

    /// Type mismatch in attribute.
    #[error("type mismatch for {attr}: expected {expected}, got {actual}")]
    TypeMismatch {
        attr: String,
        expected: &'static str,
        actual: &'static str,
    },

    /// No snapshot recorded for a participant.
    #[error("no snapshot for participant {0}")]
    UnknownParticipant(crate::ParticipantId),
}

impl CoreError {
    pub fn attribute_not_found(owner: impl Into<String>, attr: impl Into<String>) -> Self {
        Self::AttributeNotFound {
            owner: owner.into(),
            attr: attr.into(),
        }
    }

    pub fn type_mismatch(attr: impl Into<String>, expected: &'static str, actual: &'static str) -> Self {
        Self::TypeMismatch {
            attr: attr.into(),
            expected,
            actual,
        }
    }
}

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;
