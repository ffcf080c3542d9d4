//! Mock ParameterStore implementation for testing.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{ParameterError, ParameterStore, Result};

/// Mock parameter store that keeps values in memory.
#[derive(Default)]
pub struct MockParameterStore {
    values: RwLock<HashMap<String, String>>,
    fail_all: RwLock<bool>,
}

impl MockParameterStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every call fail, simulating an unreachable service.
    pub async fn set_fail_all(&self, fail: bool) {
        *self.fail_all.write().await = fail;
    }

    async fn check(&self, operation: &'static str, name: &str) -> Result<()> {
        if *self.fail_all.read().await {
            return Err(ParameterError::backend(operation, name, "injected failure"));
        }
        Ok(())
    }
}

#[async_trait]
impl ParameterStore for MockParameterStore {
    async fn get(&self, name: &str) -> Result<Option<String>> {
        self.check("get_parameter", name).await?;
        Ok(self.values.read().await.get(name).cloned())
    }

    async fn put(&self, name: &str, value: &str, _description: &str) -> Result<()> {
        self.check("put_parameter", name).await?;
        self.values
            .write()
            .await
            .insert(name.to_string(), value.to_string());
        Ok(())
    }

    async fn delete(&self, name: &str) -> Result<bool> {
        self.check("delete_parameter", name).await?;
        Ok(self.values.write().await.remove(name).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_put_overwrites() {
        let store = MockParameterStore::new();
        store.put("p", "one", "").await.unwrap();
        store.put("p", "two", "").await.unwrap();
        assert_eq!(store.get("p").await.unwrap().as_deref(), Some("two"));
    }

    #[tokio::test]
    async fn test_delete_missing_returns_false() {
        let store = MockParameterStore::new();
        assert!(!store.delete("p").await.unwrap());
        store.put("p", "v", "").await.unwrap();
        assert!(store.delete("p").await.unwrap());
        assert!(store.get("p").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_fail_all() {
        let store = MockParameterStore::new();
        store.set_fail_all(true).await;
        let err = store.get("p").await.unwrap_err();
        assert!(err.to_string().contains("get_parameter"));
    }
}
