//! Profile table lifecycle and the table-name pointer.
//!
//! [`CustomerDirectory`] pairs a [`ProfileStore`] with a [`ParameterStore`]:
//! creating a table records its name in the pointer parameter, deleting it
//! clears the pointer. [`CustomerDirectory::resolve_table_name`] reads the
//! pointer once so the result can be handed to the support tools as a plain
//! value.

use std::fmt;
use std::sync::Arc;

use tracing::{error, info, warn};

use crate::config::ProfilesConfig;
use crate::parameters::{self, ParameterError, ParameterStore, TABLE_NAME_DESCRIPTION};
use crate::storage::{self, ProfileStore, StorageError, TableHandle};
use crate::synthetic;

/// Name of the active profile table.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TableName(String);

impl TableName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TableName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TableName {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// Errors from directory operations that touch both backends.
#[derive(Debug, thiserror::Error)]
pub enum DirectoryError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Parameter error: {0}")]
    Parameter(#[from] ParameterError),
}

/// Outcome of [`CustomerDirectory::delete_table`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cleanup {
    /// The table is gone (deleted now or already absent).
    pub table_cleaned: bool,
    /// The pointer no longer names the table (deleted, absent, or pointing
    /// elsewhere).
    pub pointer_cleaned: bool,
}

impl Cleanup {
    pub fn is_complete(&self) -> bool {
        self.table_cleaned && self.pointer_cleaned
    }
}

/// Table administration over a profile store and a parameter store.
#[derive(Clone)]
pub struct CustomerDirectory {
    store: Arc<dyn ProfileStore>,
    parameters: Arc<dyn ParameterStore>,
    config: ProfilesConfig,
}

impl CustomerDirectory {
    pub fn new(
        store: Arc<dyn ProfileStore>,
        parameters: Arc<dyn ParameterStore>,
        config: ProfilesConfig,
    ) -> Self {
        Self {
            store,
            parameters,
            config,
        }
    }

    fn table_or_default<'a>(&'a self, table: Option<&'a str>) -> &'a str {
        table.unwrap_or(&self.config.default_table_name)
    }

    /// Create the profile table (or reuse an existing one) and point the
    /// table-name parameter at it.
    pub async fn create_table(&self, table: Option<&str>) -> Result<TableHandle, DirectoryError> {
        let table = self.table_or_default(table);

        let handle = self.store.create_table(table).await.map_err(|e| {
            error!(table = %table, error = %e, "Failed to create profile table");
            e
        })?;

        self.set_table_name_pointer(table).await?;
        Ok(handle)
    }

    /// Delete the profile table and clear the pointer if it names it.
    ///
    /// Pointer cleanup is attempted even when the table deletion fails.
    pub async fn delete_table(&self, table: Option<&str>) -> Cleanup {
        let table = self.table_or_default(table);

        let table_cleaned = match self.store.delete_table(table).await {
            Ok(true) => true,
            Ok(false) => {
                info!(table = %table, "Table does not exist, no need to delete");
                true
            }
            Err(e) => {
                error!(table = %table, error = %e, "Error deleting profile table");
                false
            }
        };

        let pointer_cleaned = match self.clear_pointer_if_matches(table).await {
            Ok(()) => true,
            Err(e) => {
                error!(error = %e, "Error cleaning up table-name parameter");
                false
            }
        };

        Cleanup {
            table_cleaned,
            pointer_cleaned,
        }
    }

    async fn clear_pointer_if_matches(&self, table: &str) -> parameters::Result<()> {
        let name = &self.config.table_name_parameter;
        match self.parameters.get(name).await? {
            Some(current) if current == table => {
                if self.parameters.delete(name).await? {
                    info!(parameter = %name, "Table-name parameter deleted");
                } else {
                    info!(parameter = %name, "Table-name parameter already absent");
                }
            }
            Some(current) => {
                info!(
                    parameter = %name,
                    current = %current,
                    "Table-name parameter points at another table, leaving it"
                );
            }
            None => info!(parameter = %name, "Table-name parameter not found"),
        }
        Ok(())
    }

    pub async fn table_exists(&self, table: &str) -> storage::Result<bool> {
        self.store.table_exists(table).await
    }

    /// Current value of the table-name pointer.
    pub async fn get_table_name_pointer(&self) -> parameters::Result<Option<String>> {
        self.parameters.get(&self.config.table_name_parameter).await
    }

    /// Point the table-name parameter at `table`. Last writer wins.
    pub async fn set_table_name_pointer(&self, table: &str) -> parameters::Result<()> {
        self.parameters
            .put(&self.config.table_name_parameter, table, TABLE_NAME_DESCRIPTION)
            .await
            .map_err(|e| {
                error!(table = %table, error = %e, "Failed to write table-name parameter");
                e
            })
    }

    /// Resolve the active table once, falling back to the configured default.
    pub async fn resolve_table_name(&self) -> TableName {
        match self.get_table_name_pointer().await {
            Ok(Some(name)) => {
                info!(table = %name, "Resolved profile table from parameter store");
                TableName::new(name)
            }
            Ok(None) => {
                warn!(
                    table = %self.config.default_table_name,
                    "Table name not found in parameter store, using default"
                );
                TableName::new(self.config.default_table_name.clone())
            }
            Err(e) => {
                warn!(
                    table = %self.config.default_table_name,
                    error = %e,
                    "Could not read table name from parameter store, using default"
                );
                TableName::new(self.config.default_table_name.clone())
            }
        }
    }

    /// Write `count` synthetic profiles to `table`.
    pub async fn seed_profiles(&self, table: Option<&str>, count: usize) -> storage::Result<Vec<String>> {
        let table = self.table_or_default(table);
        synthetic::seed_profiles(self.store.as_ref(), table, count).await
    }
}
