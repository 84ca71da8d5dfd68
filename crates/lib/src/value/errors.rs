//! Error types for value conversions.

use thiserror::Error;

/// Structured error types for reading typed data out of the state tree.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ValueError {
    /// The value has a different type than requested
    #[error("Value type mismatch: expected {expected}, found {actual}")]
    TypeMismatch {
        expected: &'static str,
        actual: &'static str,
    },

    /// Converting between a value and a serde type failed
    #[error("Value serialization failed: {reason}")]
    SerializationFailed { reason: String },
}

impl ValueError {
    /// Check if this error is related to type mismatches
    pub fn is_type_error(&self) -> bool {
        matches!(self, ValueError::TypeMismatch { .. })
    }

    /// Check if this error is related to serialization
    pub fn is_serialization_error(&self) -> bool {
        matches!(self, ValueError::SerializationFailed { .. })
    }
}

// Conversion from ValueError to the main Error type
impl From<ValueError> for crate::Error {
    fn from(err: ValueError) -> Self {
        crate::Error::Value(err)
    }
}
