//! Draft integration tests
//!
//! Tests for produce(): structural sharing of untouched branches, no-op
//! detection and the behavior of each write operation at depth.

mod list_tests;
