//! Shared storage integration tests.
//!
//! Tests the ProfileStore interface against all implementations.
//! Each implementation module imports these test functions and runs them.

pub mod profile_store_tests;
