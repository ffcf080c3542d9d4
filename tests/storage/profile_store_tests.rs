//! ProfileStore interface tests.
//!
//! These tests verify the contract of the ProfileStore trait.
//! Each storage implementation should run these tests against a table that
//! does not exist yet.

use solar_support::model::{
    ContactPreference, CustomerProfile, Preferences, ProductType, ProfileUpdate, Purchase,
};
use solar_support::storage::{ProfileStore, TableStatus};

const OLD_TIMESTAMP: &str = "2020-01-01T00:00:00.000000";

/// Create a test profile with fixed, old timestamps.
pub fn make_profile(customer_id: &str, email: &str) -> CustomerProfile {
    CustomerProfile {
        customer_id: customer_id.to_string(),
        name: format!("Test {customer_id}"),
        email: email.to_string(),
        country: "USA".to_string(),
        state: "Texas".to_string(),
        purchase_history: vec![Purchase {
            purchase_id: format!("PUR-{customer_id}"),
            product_name: "SunPower X".to_string(),
            product_type: ProductType::Panel,
            price: 1200.0,
            quantity: 2,
            purchase_date: "2024-03-15T10:30:00.000000".to_string(),
        }],
        preferences: Preferences {
            contact_preference: ContactPreference::Phone,
            newsletter: true,
            maintenance_reminder: false,
        },
        created_at: OLD_TIMESTAMP.to_string(),
        updated_at: OLD_TIMESTAMP.to_string(),
    }
}

// =============================================================================
// Table lifecycle tests
// =============================================================================

pub async fn test_create_table<S: ProfileStore>(store: &S, table: &str) {
    assert!(
        !store.table_exists(table).await.expect("exists should succeed"),
        "table should not exist before creation"
    );

    let handle = store
        .create_table(table)
        .await
        .expect("create should succeed");
    assert_eq!(handle.name, table);
    assert_eq!(handle.status, TableStatus::Created);

    assert!(store.table_exists(table).await.unwrap());
}

pub async fn test_create_table_idempotent<S: ProfileStore>(store: &S, table: &str) {
    let handle = store
        .create_table(table)
        .await
        .expect("second create should succeed");
    assert_eq!(handle.status, TableStatus::AlreadyExists);
}

// =============================================================================
// ProfileStore::get_by_id / get_by_email tests
// =============================================================================

pub async fn test_get_nonexistent<S: ProfileStore>(store: &S, table: &str) {
    let result = store
        .get_by_id(table, "CUST-NONEXISTENT")
        .await
        .expect("get should succeed");
    assert!(result.is_none(), "nonexistent profile should be None");

    let result = store
        .get_by_email(table, "nobody@example.com")
        .await
        .expect("query should succeed");
    assert!(result.is_none(), "unknown email should be None");
}

pub async fn test_put_and_get<S: ProfileStore>(store: &S, table: &str) {
    let profile = make_profile("CUST-PUT", "put@example.com");
    store
        .put_profile(table, &profile)
        .await
        .expect("put should succeed");

    let fetched = store
        .get_by_id(table, "CUST-PUT")
        .await
        .expect("get should succeed")
        .expect("profile should exist");

    assert_eq!(fetched, profile, "should round-trip every field");
}

pub async fn test_get_by_email<S: ProfileStore>(store: &S, table: &str) {
    let profile = make_profile("CUST-EMAIL", "email-lookup@example.com");
    store.put_profile(table, &profile).await.unwrap();

    let fetched = store
        .get_by_email(table, "email-lookup@example.com")
        .await
        .expect("query should succeed")
        .expect("profile should be found by email");

    assert_eq!(fetched.customer_id, "CUST-EMAIL");
}

pub async fn test_put_overwrites<S: ProfileStore>(store: &S, table: &str) {
    let mut profile = make_profile("CUST-OVERWRITE", "overwrite@example.com");
    store.put_profile(table, &profile).await.unwrap();

    profile.name = "Renamed".to_string();
    profile.purchase_history.clear();
    store.put_profile(table, &profile).await.unwrap();

    let fetched = store
        .get_by_id(table, "CUST-OVERWRITE")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(fetched.name, "Renamed");
    assert!(fetched.purchase_history.is_empty());
}

// =============================================================================
// ProfileStore::update tests
// =============================================================================

pub async fn test_update_merges_fields<S: ProfileStore>(store: &S, table: &str) {
    let profile = make_profile("CUST-UPDATE", "update@example.com");
    store.put_profile(table, &profile).await.unwrap();

    let changes = ProfileUpdate::new()
        .with_state("Nevada")
        .with_email("updated@example.com");
    let updated = store
        .update(table, "CUST-UPDATE", &changes)
        .await
        .expect("update should succeed")
        .expect("existing profile should be updated");

    assert_eq!(updated.state, "Nevada");
    assert_eq!(updated.email, "updated@example.com");
    assert_eq!(updated.name, profile.name, "untouched fields are kept");
    assert_eq!(updated.purchase_history, profile.purchase_history);
    assert_eq!(updated.created_at, OLD_TIMESTAMP);
    assert!(
        updated.updated_at.as_str() > OLD_TIMESTAMP,
        "updated_at should move forward"
    );

    let fetched = store
        .get_by_id(table, "CUST-UPDATE")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(fetched, updated, "get should see the update");

    let by_email = store
        .get_by_email(table, "updated@example.com")
        .await
        .unwrap()
        .expect("new email should be queryable");
    assert_eq!(by_email.customer_id, "CUST-UPDATE");
}

pub async fn test_update_nonexistent<S: ProfileStore>(store: &S, table: &str) {
    let changes = ProfileUpdate::new().with_state("Nevada");
    let result = store
        .update(table, "CUST-MISSING", &changes)
        .await
        .expect("update of a missing profile should not error");
    assert!(result.is_none(), "missing profile should return None");

    let fetched = store.get_by_id(table, "CUST-MISSING").await.unwrap();
    assert!(fetched.is_none(), "update must not create a profile");
}

// =============================================================================
// Table deletion tests
// =============================================================================

pub async fn test_delete_table<S: ProfileStore>(store: &S, table: &str) {
    assert!(
        store.delete_table(table).await.expect("delete should succeed"),
        "existing table should be deleted"
    );
    assert!(!store.table_exists(table).await.unwrap());
    assert!(
        !store.delete_table(table).await.expect("delete should succeed"),
        "second delete reports nothing to do"
    );
}

// =============================================================================
// Test runner macro
// =============================================================================

/// Run all ProfileStore interface tests against a store implementation.
///
/// Creates `$table`, exercises it and deletes it again.
#[macro_export]
macro_rules! run_profile_store_tests {
    ($store:expr, $table:expr) => {
        use $crate::storage::profile_store_tests::*;

        // lifecycle
        test_create_table($store, $table).await;
        println!("  test_create_table: PASSED");

        test_create_table_idempotent($store, $table).await;
        println!("  test_create_table_idempotent: PASSED");

        // reads
        test_get_nonexistent($store, $table).await;
        println!("  test_get_nonexistent: PASSED");

        test_put_and_get($store, $table).await;
        println!("  test_put_and_get: PASSED");

        test_get_by_email($store, $table).await;
        println!("  test_get_by_email: PASSED");

        test_put_overwrites($store, $table).await;
        println!("  test_put_overwrites: PASSED");

        // updates
        test_update_merges_fields($store, $table).await;
        println!("  test_update_merges_fields: PASSED");

        test_update_nonexistent($store, $table).await;
        println!("  test_update_nonexistent: PASSED");

        // cleanup
        test_delete_table($store, $table).await;
        println!("  test_delete_table: PASSED");
    };
}
