//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Keep this focused on structural failures of domain values. Storage and
/// service concerns have their own error types and translate from this one.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A single field value violates its invariant (blank name, negative price, ...).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The entity as a whole is not complete enough for the requested step.
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// An identifier value was rejected (zero or negative).
    #[error("invalid identifier: {0}")]
    InvalidId(String),
}

impl DomainError {
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    pub fn invalid_state(msg: impl Into<String>) -> Self {
        Self::InvalidState(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }
}
