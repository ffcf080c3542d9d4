//! In-memory profile store contract tests.
//!
//! Run with: cargo test --test storage_mock

mod storage;

use solar_support::model::ProfileUpdate;
use solar_support::storage::{MockProfileStore, ProfileStore, StorageError};

#[tokio::test]
async fn test_mock_profile_store() {
    println!("=== Mock ProfileStore Tests ===");

    let store = MockProfileStore::new();

    run_profile_store_tests!(&store, "SolarProfilesTest");

    println!("=== All Mock ProfileStore tests PASSED ===");
}

#[tokio::test]
async fn test_mock_missing_table_errors() {
    let store = MockProfileStore::new();

    assert!(matches!(
        store.get_by_id("Missing", "CUST100").await,
        Err(StorageError::TableNotFound(_))
    ));
    assert!(matches!(
        store.get_by_email("Missing", "a@example.com").await,
        Err(StorageError::TableNotFound(_))
    ));
    assert!(matches!(
        store
            .update("Missing", "CUST100", &ProfileUpdate::new().with_state("Ohio"))
            .await,
        Err(StorageError::TableNotFound(_))
    ));
}

#[tokio::test]
async fn test_mock_email_lookup_prefers_lowest_id() {
    let store = MockProfileStore::with_table("Dupes").await;
    let mut second = storage::profile_store_tests::make_profile("CUST200", "shared@example.com");
    second.name = "Second".to_string();
    let first = storage::profile_store_tests::make_profile("CUST100", "shared@example.com");

    store.put_profile("Dupes", &second).await.unwrap();
    store.put_profile("Dupes", &first).await.unwrap();

    let found = store
        .get_by_email("Dupes", "shared@example.com")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.customer_id, "CUST100");
    assert_eq!(store.len("Dupes").await, 2);
}
