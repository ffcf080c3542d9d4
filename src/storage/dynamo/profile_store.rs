//! DynamoDB ProfileStore implementation.
//!
//! Table schema:
//! - PK: `customer_id` (String)
//! - GSI `EmailIndex`: `email` (String), projection ALL
//! - Billing: PAY_PER_REQUEST
//!
//! Profiles are stored as whole documents; `purchase_history` is a list of
//! maps and `preferences` a map.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use aws_sdk_dynamodb::client::Waiters;
use aws_sdk_dynamodb::types::{
    AttributeDefinition, AttributeValue, BillingMode, GlobalSecondaryIndex, KeySchemaElement,
    KeyType, Projection, ProjectionType, ReturnValue, ScalarAttributeType,
};
use aws_sdk_dynamodb::Client;
use tracing::{debug, info};

use crate::config::AwsConfig;
use crate::model::{timestamp_now, CustomerProfile, ProfileUpdate};
use crate::storage::{
    ProfileStore, Result, StorageError, TableHandle, TableStatus, EMAIL_INDEX,
};

const KEY_ATTR: &str = "customer_id";
const EMAIL_ATTR: &str = "email";
const UPDATED_AT_ATTR: &str = "updated_at";

/// How long to wait for a table to appear or disappear.
const TABLE_WAIT: Duration = Duration::from_secs(300);

type Item = HashMap<String, AttributeValue>;

/// DynamoDB implementation of ProfileStore.
pub struct DynamoProfileStore {
    client: Client,
}

impl DynamoProfileStore {
    /// Create a new DynamoDB profile store.
    ///
    /// Uses the default credential chain; `aws.region` and `aws.endpoint_url`
    /// override the environment (the latter for DynamoDB Local).
    pub async fn new(aws: &AwsConfig) -> Self {
        let sdk_config = aws.load_sdk_config().await;
        let client = Client::new(&sdk_config);

        info!(
            region = ?aws.region,
            endpoint = ?aws.endpoint_url,
            "Connected to DynamoDB for customer profiles"
        );

        Self { client }
    }

    /// Create with explicit client (for testing).
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    fn to_item<T: serde::Serialize>(value: &T) -> Result<Item> {
        serde_dynamo::to_item(value).map_err(|e| StorageError::Mapping(e.to_string()))
    }

    fn from_item(item: Item) -> Result<CustomerProfile> {
        serde_dynamo::from_item(item).map_err(|e| StorageError::Mapping(e.to_string()))
    }

    /// Build the `SET #a = :a, ...` expression for an update.
    ///
    /// Returns the expression with its name and value maps.
    fn update_expression(
        changes: &ProfileUpdate,
        updated_at: String,
    ) -> Result<(String, HashMap<String, String>, Item)> {
        let mut fields = Self::to_item(changes)?;
        fields.insert(UPDATED_AT_ATTR.to_string(), AttributeValue::S(updated_at));

        let mut keys: Vec<&String> = fields.keys().collect();
        keys.sort();

        let assignments: Vec<String> = keys.iter().map(|k| format!("#{k} = :{k}")).collect();
        let names = keys
            .iter()
            .map(|k| (format!("#{k}"), (*k).clone()))
            .collect();
        let values = fields
            .iter()
            .map(|(k, v)| (format!(":{k}"), v.clone()))
            .collect();

        Ok((format!("SET {}", assignments.join(", ")), names, values))
    }
}

#[async_trait]
impl ProfileStore for DynamoProfileStore {
    async fn create_table(&self, table: &str) -> Result<TableHandle> {
        let key = KeySchemaElement::builder()
            .attribute_name(KEY_ATTR)
            .key_type(KeyType::Hash)
            .build()
            .map_err(|e| StorageError::backend("create_table", e))?;
        let email_key = KeySchemaElement::builder()
            .attribute_name(EMAIL_ATTR)
            .key_type(KeyType::Hash)
            .build()
            .map_err(|e| StorageError::backend("create_table", e))?;
        let key_def = AttributeDefinition::builder()
            .attribute_name(KEY_ATTR)
            .attribute_type(ScalarAttributeType::S)
            .build()
            .map_err(|e| StorageError::backend("create_table", e))?;
        let email_def = AttributeDefinition::builder()
            .attribute_name(EMAIL_ATTR)
            .attribute_type(ScalarAttributeType::S)
            .build()
            .map_err(|e| StorageError::backend("create_table", e))?;
        let email_index = GlobalSecondaryIndex::builder()
            .index_name(EMAIL_INDEX)
            .key_schema(email_key)
            .projection(
                Projection::builder()
                    .projection_type(ProjectionType::All)
                    .build(),
            )
            .build()
            .map_err(|e| StorageError::backend("create_table", e))?;

        let result = self
            .client
            .create_table()
            .table_name(table)
            .key_schema(key)
            .attribute_definitions(key_def)
            .attribute_definitions(email_def)
            .global_secondary_indexes(email_index)
            .billing_mode(BillingMode::PayPerRequest)
            .send()
            .await;

        match result {
            Ok(_) => {
                info!(table = %table, "Creating DynamoDB table");
                self.client
                    .wait_until_table_exists()
                    .table_name(table)
                    .wait(TABLE_WAIT)
                    .await
                    .map_err(|e| StorageError::backend("wait_until_table_exists", e))?;
                info!(table = %table, "DynamoDB table created");
                Ok(TableHandle::new(table, TableStatus::Created))
            }
            Err(e)
                if e
                    .as_service_error()
                    .is_some_and(|se| se.is_resource_in_use_exception()) =>
            {
                info!(table = %table, "DynamoDB table already exists, reusing it");
                Ok(TableHandle::new(table, TableStatus::AlreadyExists))
            }
            Err(e) => Err(StorageError::backend("create_table", e)),
        }
    }

    async fn delete_table(&self, table: &str) -> Result<bool> {
        let result = self.client.delete_table().table_name(table).send().await;

        match result {
            Ok(_) => {
                info!(table = %table, "Deleting DynamoDB table");
                self.client
                    .wait_until_table_not_exists()
                    .table_name(table)
                    .wait(TABLE_WAIT)
                    .await
                    .map_err(|e| StorageError::backend("wait_until_table_not_exists", e))?;
                info!(table = %table, "DynamoDB table deleted");
                Ok(true)
            }
            Err(e)
                if e
                    .as_service_error()
                    .is_some_and(|se| se.is_resource_not_found_exception()) =>
            {
                debug!(table = %table, "DynamoDB table does not exist, nothing to delete");
                Ok(false)
            }
            Err(e) => Err(StorageError::backend("delete_table", e)),
        }
    }

    async fn table_exists(&self, table: &str) -> Result<bool> {
        match self.client.describe_table().table_name(table).send().await {
            Ok(_) => Ok(true),
            Err(e)
                if e
                    .as_service_error()
                    .is_some_and(|se| se.is_resource_not_found_exception()) =>
            {
                Ok(false)
            }
            Err(e) => Err(StorageError::backend("describe_table", e)),
        }
    }

    async fn put_profile(&self, table: &str, profile: &CustomerProfile) -> Result<()> {
        let item = Self::to_item(profile)?;

        self.client
            .put_item()
            .table_name(table)
            .set_item(Some(item))
            .send()
            .await
            .map_err(|e| StorageError::backend("put_item", e))?;

        debug!(
            table = %table,
            customer_id = %profile.customer_id,
            "Stored customer profile"
        );
        Ok(())
    }

    async fn get_by_id(&self, table: &str, customer_id: &str) -> Result<Option<CustomerProfile>> {
        let result = self
            .client
            .get_item()
            .table_name(table)
            .key(KEY_ATTR, AttributeValue::S(customer_id.to_string()))
            .send()
            .await
            .map_err(|e| StorageError::backend("get_item", e))?;

        match result.item {
            Some(item) => {
                debug!(table = %table, customer_id = %customer_id, "Retrieved customer profile");
                Self::from_item(item).map(Some)
            }
            None => Ok(None),
        }
    }

    async fn get_by_email(&self, table: &str, email: &str) -> Result<Option<CustomerProfile>> {
        let result = self
            .client
            .query()
            .table_name(table)
            .index_name(EMAIL_INDEX)
            .key_condition_expression("#email = :email")
            .expression_attribute_names("#email", EMAIL_ATTR)
            .expression_attribute_values(":email", AttributeValue::S(email.to_string()))
            .send()
            .await
            .map_err(|e| StorageError::backend("query", e))?;

        let items = result.items.unwrap_or_default();
        if items.len() > 1 {
            debug!(
                table = %table,
                matches = items.len(),
                "Multiple profiles share an email, returning the first"
            );
        }

        items.into_iter().next().map(Self::from_item).transpose()
    }

    async fn update(
        &self,
        table: &str,
        customer_id: &str,
        changes: &ProfileUpdate,
    ) -> Result<Option<CustomerProfile>> {
        let (expression, names, values) = Self::update_expression(changes, timestamp_now())?;

        let result = self
            .client
            .update_item()
            .table_name(table)
            .key(KEY_ATTR, AttributeValue::S(customer_id.to_string()))
            .update_expression(expression)
            .condition_expression(format!("attribute_exists({KEY_ATTR})"))
            .set_expression_attribute_names(Some(names))
            .set_expression_attribute_values(Some(values))
            .return_values(ReturnValue::AllNew)
            .send()
            .await;

        match result {
            Ok(output) => {
                debug!(table = %table, customer_id = %customer_id, "Updated customer profile");
                output.attributes.map(Self::from_item).transpose()
            }
            Err(e)
                if e
                    .as_service_error()
                    .is_some_and(|se| se.is_conditional_check_failed_exception()) =>
            {
                debug!(table = %table, customer_id = %customer_id, "Customer profile not found for update");
                Ok(None)
            }
            Err(e) => Err(StorageError::backend("update_item", e)),
        }
    }
}
