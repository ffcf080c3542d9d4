//! Mock storage implementations for testing.

mod profile_store;

pub use profile_store::MockProfileStore;
