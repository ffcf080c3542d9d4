//! DynamoDB storage integration tests.
//!
//! Run with: cargo test --test storage_dynamo --features dynamo -- --ignored --nocapture
//!
//! Requires: DYNAMODB_ENDPOINT env var or DynamoDB Local on localhost:8000,
//! plus any AWS credentials (DynamoDB Local accepts dummy ones).
//!
//! Note: Each run uses a uniquely named table and deletes it afterwards.

mod storage;

use chrono::Utc;

use solar_support::config::AwsConfig;
use solar_support::storage::DynamoProfileStore;

fn dynamodb_endpoint() -> String {
    std::env::var("DYNAMODB_ENDPOINT").unwrap_or_else(|_| "http://localhost:8000".to_string())
}

fn test_table() -> String {
    format!("SolarProfilesTest{}", Utc::now().timestamp_millis())
}

#[tokio::test]
#[ignore = "requires DynamoDB Local or AWS credentials"]
async fn test_dynamo_profile_store() {
    println!("=== DynamoDB ProfileStore Tests ===");
    println!("Connecting to: {}", dynamodb_endpoint());

    let table = test_table();
    println!("Using test table: {}", table);

    let aws = AwsConfig::default()
        .with_region("us-east-1")
        .with_endpoint(dynamodb_endpoint());
    let store = DynamoProfileStore::new(&aws).await;

    run_profile_store_tests!(&store, &table);

    println!("=== All DynamoDB ProfileStore tests PASSED ===");
}
