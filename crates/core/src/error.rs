//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Only deterministic rule failures live here. Network and document-store
/// failures are surfaced by the collaborators that produce them.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Input rejected by a rule (e.g. module index past the end of a course).
    #[error("validation failed: {0}")]
    Validation(String),

    /// A document identifier was empty or malformed.
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// The operation clashes with existing data (e.g. duplicate enrollment).
    #[error("conflict: {0}")]
    Conflict(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }
}
