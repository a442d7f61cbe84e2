//! Domain error model.

use thiserror::Error;

pub type DomainResult<T> = Result<T, DomainError>;

/// Rule violations in catalog, count and settings data.
///
/// Storage and configuration failures have their own error types and wrap
/// this one.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Rejected input value (negative count, empty name, bad cutoff time).
    #[error("validation failed: {0}")]
    Validation(String),

    /// Records that contradict each other, e.g. a variant attached to the
    /// wrong product.
    #[error("invariant violated: {0}")]
    InvariantViolation(String),

    /// The same id registered twice.
    #[error("duplicate {kind}: {id}")]
    Duplicate { kind: &'static str, id: String },

    #[error("invalid identifier: {0}")]
    InvalidId(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invariant(msg: impl Into<String>) -> Self {
        Self::InvariantViolation(msg.into())
    }

    pub fn duplicate(kind: &'static str, id: impl core::fmt::Display) -> Self {
        Self::Duplicate {
            kind,
            id: id.to_string(),
        }
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }
}
