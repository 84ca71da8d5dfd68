//! Error types for draft operations.
//!
//! A failing draft operation leaves the draft exactly as it was before the
//! call, so a mutator may recover from these errors and keep going.

use thiserror::Error;

/// Structured error types for writes through a [`Draft`](super::Draft).
#[non_exhaustive]
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DraftError {
    /// The node on the path has the wrong type for the operation
    #[error("Cannot {operation} at '{path}': expected {expected}, found {actual}")]
    TypeMismatch {
        operation: &'static str,
        path: String,
        expected: &'static str,
        actual: &'static str,
    },

    /// A list index is past the end of the list
    #[error("Cannot {operation} at '{path}': index {index} out of bounds for length {len}")]
    IndexOutOfBounds {
        operation: &'static str,
        path: String,
        index: usize,
        len: usize,
    },

    /// The operation needs an existing node and the path does not resolve
    #[error("Cannot {operation} at '{path}': nothing there")]
    NotFound {
        operation: &'static str,
        path: String,
    },

    /// The path cannot be used for this operation at all
    #[error("Invalid path '{path}': {reason}")]
    InvalidPath { path: String, reason: String },
}

impl DraftError {
    /// Check if this error is related to type mismatches
    pub fn is_type_error(&self) -> bool {
        matches!(self, DraftError::TypeMismatch { .. })
    }

    /// Check if this error reports a missing node
    pub fn is_not_found(&self) -> bool {
        matches!(self, DraftError::NotFound { .. })
    }

    /// Check if this error is an out-of-bounds list index
    pub fn is_out_of_bounds(&self) -> bool {
        matches!(self, DraftError::IndexOutOfBounds { .. })
    }

    /// Get the path the failing operation was applied to
    pub fn path(&self) -> &str {
        match self {
            DraftError::TypeMismatch { path, .. }
            | DraftError::IndexOutOfBounds { path, .. }
            | DraftError::NotFound { path, .. }
            | DraftError::InvalidPath { path, .. } => path,
        }
    }
}

// Conversion from DraftError to the main Error type
impl From<DraftError> for crate::Error {
    fn from(err: DraftError) -> Self {
        crate::Error::Draft(err)
    }
}
