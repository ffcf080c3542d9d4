//! Profile storage.
//!
//! The [`ProfileStore`] trait is the seam between the support tools and
//! the managed key-value table. Implementations:
//!
//! - [`dynamo::DynamoProfileStore`]: DynamoDB (feature `dynamo`)
//! - [`mock::MockProfileStore`]: in-memory, for tests and local demos

mod profile_store;

pub mod mock;

#[cfg(feature = "dynamo")]
pub mod dynamo;

pub use profile_store::{ProfileStore, TableHandle, TableStatus, EMAIL_INDEX};

#[cfg(feature = "dynamo")]
pub use dynamo::DynamoProfileStore;
pub use mock::MockProfileStore;

/// Errors from profile storage backends.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// The named table does not exist.
    #[error("Table not found: {0}")]
    TableNotFound(String),

    /// The backing service rejected or failed the call.
    #[error("{operation} failed: {message}")]
    Backend { operation: &'static str, message: String },

    /// A stored item could not be mapped to or from a profile.
    #[error("Item mapping error: {0}")]
    Mapping(String),
}

impl StorageError {
    pub(crate) fn backend(operation: &'static str, err: impl std::fmt::Display) -> Self {
        StorageError::Backend {
            operation,
            message: err.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, StorageError>;
