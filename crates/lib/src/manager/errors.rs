//! Error types for store mutations.

use thiserror::Error;

/// Structured errors reported by [`StateManager`](super::StateManager) mutations.
///
/// A failed mutation leaves the live tree, the history and the subscribers
/// exactly as they were.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum MutationError {
    /// A mutation was started while another one on the same store was running
    #[error("Reentrant {operation}: the store is already applying an update")]
    Reentrant { operation: &'static str },

    /// The update function returned an error
    #[error("Update failed: {source}")]
    Failed {
        #[source]
        source: Box<crate::Error>,
    },

    /// Returned by an update function to veto its own update
    ///
    /// The store never raises this itself; it reaches the caller wrapped in
    /// [`Failed`](MutationError::Failed) like any other mutator error.
    #[error("Update rejected: {reason}")]
    Rejected { reason: String },
}

impl MutationError {
    /// Check if this error reports a reentrant call
    pub fn is_reentrant(&self) -> bool {
        matches!(self, MutationError::Reentrant { .. })
    }

    /// Check if the update function itself failed
    pub fn is_failed(&self) -> bool {
        matches!(self, MutationError::Failed { .. })
    }

    /// Get the error the update function returned, if that is what failed
    pub fn root_cause(&self) -> Option<&crate::Error> {
        match self {
            MutationError::Failed { source } => Some(source),
            _ => None,
        }
    }
}

// Conversion from MutationError to the main Error type
impl From<MutationError> for crate::Error {
    fn from(err: MutationError) -> Self {
        crate::Error::Mutation(err)
    }
}
