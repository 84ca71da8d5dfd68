//! StateManager integration tests
//!
//! Tests for committing updates, undo/redo history, failure atomicity and
//! the lifecycle operations of the store.

mod history_tests;
mod lifecycle_tests;
