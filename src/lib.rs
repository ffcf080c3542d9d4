//! Solar support - customer-support tooling for a solar panel business.
//!
//! Customer profiles live in a key-value table (DynamoDB in production)
//! whose name is recorded in a parameter store. Support tools look profiles
//! up, update them, estimate panel output and check warranties; tickets go
//! to an issue tracker (Jira).

pub mod config;
pub mod directory;
pub mod model;
pub mod parameters;
pub mod storage;
pub mod support;
pub mod synthetic;
pub mod ticketing;
pub mod utils;
