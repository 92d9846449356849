//! Error types and result types for rule-tree conversions.
//!
//! Every conversion is a pure transform, so errors are surfaced immediately
//! to the caller. Use [`RuleFilterResult<T>`] as the return type for fallible
//! operations.

use serde_json::Error as SerdeJsonError;
use thiserror::Error;

/// Represents all possible errors that can occur while converting between
/// rule trees and dialect filters.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RuleFilterError {
    /// The input is structurally malformed: an unsupported logical condition,
    /// an ambiguous multi-key filter object, or a field condition whose shape
    /// matches no known operator.
    #[error("Format error: {0}")]
    Format(String),
    /// An operator name or dialect operator key has no entry in the
    /// operator tables or the operator registry.
    #[error("Unknown operator: {0}")]
    UnknownOperator(String),
    /// Serialization/deserialization error when converting to or from JSON.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl RuleFilterError {
    /// Creates a [`RuleFilterError::Format`] error.
    pub fn format(message: impl Into<String>) -> Self {
        RuleFilterError::Format(message.into())
    }

    /// Creates a [`RuleFilterError::UnknownOperator`] error.
    pub fn unknown_operator(message: impl Into<String>) -> Self {
        RuleFilterError::UnknownOperator(message.into())
    }
}

/// A specialized `Result` type for rule-tree conversions.
///
/// This type alias is used throughout the workspace to indicate operations
/// that may fail with a [`RuleFilterError`].
pub type RuleFilterResult<T> = Result<T, RuleFilterError>;

impl From<SerdeJsonError> for RuleFilterError {
    fn from(err: SerdeJsonError) -> Self {
        RuleFilterError::Serialization(err.to_string())
    }
}
