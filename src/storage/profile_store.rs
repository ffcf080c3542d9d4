//! ProfileStore trait definition.

use async_trait::async_trait;

use super::Result;
use crate::model::{CustomerProfile, ProfileUpdate};

/// Name of the secondary index on `email`.
pub const EMAIL_INDEX: &str = "EmailIndex";

/// Whether `create_table` made a new table or found one already there.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableStatus {
    Created,
    AlreadyExists,
}

/// Handle to a profile table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableHandle {
    pub name: String,
    pub status: TableStatus,
}

impl TableHandle {
    pub fn new(name: impl Into<String>, status: TableStatus) -> Self {
        Self {
            name: name.into(),
            status,
        }
    }
}

/// Interface for customer profile persistence.
///
/// Every call names the table explicitly; the store itself holds no notion
/// of an "active" table.
///
/// # Keys
///
/// Profiles are keyed by `customer_id`. The `email` attribute carries a
/// secondary index that is not unique.
///
/// # Implementations
///
/// - `DynamoProfileStore`: DynamoDB storage
/// - `MockProfileStore`: In-memory mock for testing
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Create the profile table with its email index.
    ///
    /// Idempotent: an existing table is returned with
    /// [`TableStatus::AlreadyExists`] instead of failing.
    async fn create_table(&self, table: &str) -> Result<TableHandle>;

    /// Delete the profile table.
    ///
    /// Returns `false` if the table did not exist (not an error).
    async fn delete_table(&self, table: &str) -> Result<bool>;

    /// Check whether the table exists.
    async fn table_exists(&self, table: &str) -> Result<bool>;

    /// Write a whole profile, replacing any record with the same id.
    async fn put_profile(&self, table: &str, profile: &CustomerProfile) -> Result<()>;

    /// Point lookup by `customer_id`.
    ///
    /// Returns `None` if no profile has that id.
    async fn get_by_id(&self, table: &str, customer_id: &str) -> Result<Option<CustomerProfile>>;

    /// Lookup through the email index.
    ///
    /// Returns the first match when several profiles share an email. No
    /// ordering among matches is guaranteed.
    async fn get_by_email(&self, table: &str, email: &str) -> Result<Option<CustomerProfile>>;

    /// Merge `changes` into an existing profile and stamp `updated_at`.
    ///
    /// Returns the updated profile, or `None` without writing anything if
    /// the profile does not exist.
    async fn update(
        &self,
        table: &str,
        customer_id: &str,
        changes: &ProfileUpdate,
    ) -> Result<Option<CustomerProfile>>;
}
