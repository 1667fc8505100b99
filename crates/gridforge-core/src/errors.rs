//! Error types for gridforge-core.
//!
//! Errors are grouped by how callers react to them:
//! - `Validation` blocks a mutation and is surfaced to the user verbatim
//! - `InvalidArgument` is a programming/contract error at an API boundary
//! - `Invariant` signals internal state that should be impossible
//! - `Serialization` wraps encode/decode failures
//!
//! Value coercion never produces an error: malformed input resolves to the
//! field's default so editing stays recoverable.

use thiserror::Error;

/// Result alias used throughout the core crate.
pub type GridforgeResult<T> = Result<T, GridforgeError>;

#[derive(Debug, Error)]
pub enum GridforgeError {
    /// A user-facing validation failure. The message is shown verbatim.
    #[error("{0}")]
    Validation(String),

    /// A malformed argument at an API boundary.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// An internal invariant was violated.
    #[error("invariant violated: {0}")]
    Invariant(String),

    /// Encoding or decoding failed.
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl GridforgeError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    pub fn invariant(msg: impl Into<String>) -> Self {
        Self::Invariant(msg.into())
    }

    pub fn serialization(msg: impl Into<String>) -> Self {
        Self::Serialization(msg.into())
    }

    /// Returns true for failures a user can correct in the editor.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}
