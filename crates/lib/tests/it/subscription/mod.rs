//! Subscription integration tests
//!
//! Tests for change notification through the store: path precision,
//! ordering, selector listeners and disposal.

mod notify_tests;
