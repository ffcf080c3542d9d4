//! DynamoDB storage implementations.

mod profile_store;

pub use profile_store::DynamoProfileStore;
