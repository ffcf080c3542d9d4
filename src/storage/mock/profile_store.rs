//! Mock ProfileStore implementation for testing.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::model::{timestamp_now, CustomerProfile, ProfileUpdate};
use crate::storage::{ProfileStore, Result, StorageError, TableHandle, TableStatus};

/// Rows of one table, ordered by `customer_id`.
type Table = BTreeMap<String, CustomerProfile>;

/// Mock profile store that keeps tables in memory.
///
/// Email lookups return the match with the lowest `customer_id`.
#[derive(Default)]
pub struct MockProfileStore {
    tables: RwLock<HashMap<String, Table>>,
    fail_on_get: RwLock<bool>,
    fail_on_update: RwLock<bool>,
}

impl MockProfileStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store with `table` already created.
    pub async fn with_table(table: &str) -> Self {
        let store = Self::new();
        store
            .tables
            .write()
            .await
            .insert(table.to_string(), Table::new());
        store
    }

    pub async fn set_fail_on_get(&self, fail: bool) {
        *self.fail_on_get.write().await = fail;
    }

    pub async fn set_fail_on_update(&self, fail: bool) {
        *self.fail_on_update.write().await = fail;
    }

    /// Number of profiles in `table` (0 if the table is absent).
    pub async fn len(&self, table: &str) -> usize {
        self.tables
            .read()
            .await
            .get(table)
            .map(|t| t.len())
            .unwrap_or(0)
    }

    async fn check_get(&self, operation: &'static str) -> Result<()> {
        if *self.fail_on_get.read().await {
            return Err(StorageError::backend(operation, "injected failure"));
        }
        Ok(())
    }
}

#[async_trait]
impl ProfileStore for MockProfileStore {
    async fn create_table(&self, table: &str) -> Result<TableHandle> {
        let mut tables = self.tables.write().await;
        if tables.contains_key(table) {
            return Ok(TableHandle::new(table, TableStatus::AlreadyExists));
        }
        tables.insert(table.to_string(), Table::new());
        Ok(TableHandle::new(table, TableStatus::Created))
    }

    async fn delete_table(&self, table: &str) -> Result<bool> {
        Ok(self.tables.write().await.remove(table).is_some())
    }

    async fn table_exists(&self, table: &str) -> Result<bool> {
        Ok(self.tables.read().await.contains_key(table))
    }

    async fn put_profile(&self, table: &str, profile: &CustomerProfile) -> Result<()> {
        let mut tables = self.tables.write().await;
        let rows = tables
            .get_mut(table)
            .ok_or_else(|| StorageError::TableNotFound(table.to_string()))?;
        rows.insert(profile.customer_id.clone(), profile.clone());
        Ok(())
    }

    async fn get_by_id(&self, table: &str, customer_id: &str) -> Result<Option<CustomerProfile>> {
        self.check_get("get_item").await?;
        let tables = self.tables.read().await;
        let rows = tables
            .get(table)
            .ok_or_else(|| StorageError::TableNotFound(table.to_string()))?;
        Ok(rows.get(customer_id).cloned())
    }

    async fn get_by_email(&self, table: &str, email: &str) -> Result<Option<CustomerProfile>> {
        self.check_get("query").await?;
        let tables = self.tables.read().await;
        let rows = tables
            .get(table)
            .ok_or_else(|| StorageError::TableNotFound(table.to_string()))?;
        Ok(rows.values().find(|p| p.email == email).cloned())
    }

    async fn update(
        &self,
        table: &str,
        customer_id: &str,
        changes: &ProfileUpdate,
    ) -> Result<Option<CustomerProfile>> {
        if *self.fail_on_update.read().await {
            return Err(StorageError::backend("update_item", "injected failure"));
        }
        let mut tables = self.tables.write().await;
        let rows = tables
            .get_mut(table)
            .ok_or_else(|| StorageError::TableNotFound(table.to_string()))?;
        let Some(profile) = rows.get_mut(customer_id) else {
            return Ok(None);
        };
        profile.apply(changes, &timestamp_now());
        Ok(Some(profile.clone()))
    }
}
