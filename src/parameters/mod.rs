//! Named configuration parameters.
//!
//! The active profile table is discovered through a single string
//! parameter. Implementations:
//!
//! - [`ssm::SsmParameterStore`]: AWS Systems Manager Parameter Store
//!   (feature `ssm`)
//! - [`mock::MockParameterStore`]: in-memory, for tests and local demos

use async_trait::async_trait;

pub mod mock;

#[cfg(feature = "ssm")]
pub mod ssm;

pub use mock::MockParameterStore;
#[cfg(feature = "ssm")]
pub use ssm::SsmParameterStore;

/// Name of the parameter holding the active profile table name.
pub const TABLE_NAME_PARAMETER: &str = "solar-customer-table-name";
/// Description written alongside the table-name parameter.
pub const TABLE_NAME_DESCRIPTION: &str = "Solar customer profile table name";

/// Errors from parameter backends.
#[derive(Debug, thiserror::Error)]
pub enum ParameterError {
    #[error("{operation} failed for parameter '{name}': {message}")]
    Backend {
        operation: &'static str,
        name: String,
        message: String,
    },
}

impl ParameterError {
    pub(crate) fn backend(
        operation: &'static str,
        name: &str,
        err: impl std::fmt::Display,
    ) -> Self {
        ParameterError::Backend {
            operation,
            name: name.to_string(),
            message: err.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ParameterError>;

/// Interface for named string parameters.
///
/// Writes overwrite unconditionally: the last writer wins.
#[async_trait]
pub trait ParameterStore: Send + Sync {
    /// Read a parameter. Returns `None` if it does not exist.
    async fn get(&self, name: &str) -> Result<Option<String>>;

    /// Create or overwrite a parameter.
    async fn put(&self, name: &str, value: &str, description: &str) -> Result<()>;

    /// Delete a parameter. Returns `false` if it did not exist.
    async fn delete(&self, name: &str) -> Result<bool>;
}
