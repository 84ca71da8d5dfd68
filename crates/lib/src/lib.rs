//!
//! Showstate: the application-wide state container for a timeline-based show editor.
//! This library provides a single mutable store over a generic, dynamically shaped value tree.
//!
//! ## Core Concepts
//!
//! * **Values (`value::Value`)**: The state tree. Ordered maps and lists nest arbitrarily deep and
//!   terminate in scalars or opaque host handles (`value::Handle`) that are shared, never cloned.
//! * **Paths (`path::Path`)**: Dotted strings such as `"project.settings.profiles"` addressing a node.
//!   They are parsed once into typed segments (`path::Segment`).
//! * **Drafts (`draft::Draft`)**: The mutable view handed to an update. Writes copy only the nodes on
//!   the written path; every untouched branch is shared with the previous tree.
//! * **History (`history::History`)**: Two bounded stacks of whole-tree snapshots giving linear undo/redo.
//! * **Subscriptions (`subscription::Subscription`)**: Global and path-scoped listeners that fire only
//!   when the value they watch changed.
//! * **StateManager (`manager::StateManager`)**: The façade composing all of the above.
//!
//! ```
//! use showstate::{StateManager, value::Map};
//!
//! let store = StateManager::new(Map::new().with("count", 0));
//! store.update(|draft| {
//!     draft.set("count", 1)?;
//!     Ok(())
//! })?;
//! assert_eq!(store.get_as::<i64>("count"), Some(1));
//!
//! assert!(store.undo()?);
//! assert_eq!(store.get_as::<i64>("count"), Some(0));
//! # Ok::<(), showstate::Error>(())
//! ```

pub mod draft;
pub mod history;
pub mod manager;
pub mod path;
pub mod subscription;
pub mod value;

/// Re-export the `StateManager` struct for easier access.
pub use history::HistoryInfo;
pub use manager::{StateManager, StoreConfig, UpdateOptions};
pub use subscription::Subscription;
pub use value::Value;

/// Result type used throughout the Showstate library.
pub type Result<T> = std::result::Result<T, Error>;

/// Common error type for the Showstate library.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Structured value conversion errors from the value module
    #[error(transparent)]
    Value(value::ValueError),

    /// Structured draft operation errors from the draft module
    #[error(transparent)]
    Draft(draft::DraftError),

    /// Structured mutation errors from the manager module
    #[error(transparent)]
    Mutation(manager::MutationError),
}

impl Error {
    /// Get the originating module for this error.
    pub fn module(&self) -> &'static str {
        match self {
            Error::Value(_) => "value",
            Error::Draft(_) => "draft",
            Error::Mutation(_) => "manager",
        }
    }

    /// Check if this error is a mutation failure raised by `update()`.
    pub fn is_mutation_error(&self) -> bool {
        matches!(self, Error::Mutation(_))
    }

    /// Check if this error reports a reentrant call into the store.
    pub fn is_reentrant(&self) -> bool {
        match self {
            Error::Mutation(err) => err.is_reentrant(),
            _ => false,
        }
    }

    /// Check if this error is type-related.
    pub fn is_type_error(&self) -> bool {
        match self {
            Error::Value(err) => err.is_type_error(),
            Error::Draft(err) => err.is_type_error(),
            Error::Mutation(err) => err.root_cause().is_some_and(Error::is_type_error),
        }
    }

    /// Check if this error indicates a missing node.
    pub fn is_not_found(&self) -> bool {
        match self {
            Error::Draft(err) => err.is_not_found(),
            Error::Mutation(err) => err.root_cause().is_some_and(Error::is_not_found),
            _ => false,
        }
    }

    /// Check if this error is an out-of-bounds list access.
    pub fn is_out_of_bounds(&self) -> bool {
        match self {
            Error::Draft(err) => err.is_out_of_bounds(),
            Error::Mutation(err) => err.root_cause().is_some_and(Error::is_out_of_bounds),
            _ => false,
        }
    }

    /// Check if this error is a JSON (de)serialization failure.
    pub fn is_serialization_error(&self) -> bool {
        match self {
            Error::Value(err) => err.is_serialization_error(),
            Error::Mutation(err) => err
                .root_cause()
                .is_some_and(Error::is_serialization_error),
            Error::Draft(_) => false,
        }
    }
}
