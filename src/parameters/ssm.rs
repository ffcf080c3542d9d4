//! SSM Parameter Store implementation.

use async_trait::async_trait;
use aws_sdk_ssm::types::ParameterType;
use aws_sdk_ssm::Client;
use tracing::{debug, info};

use super::{ParameterError, ParameterStore, Result};
use crate::config::AwsConfig;

/// AWS Systems Manager Parameter Store backend.
///
/// Values are plain `String` parameters.
pub struct SsmParameterStore {
    client: Client,
}

impl SsmParameterStore {
    /// Create a new SSM parameter store.
    pub async fn new(aws: &AwsConfig) -> Self {
        let sdk_config = aws.load_sdk_config().await;
        let client = Client::new(&sdk_config);

        info!(region = ?aws.region, "Connected to SSM Parameter Store");

        Self { client }
    }

    /// Create with explicit client (for testing).
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ParameterStore for SsmParameterStore {
    async fn get(&self, name: &str) -> Result<Option<String>> {
        match self.client.get_parameter().name(name).send().await {
            Ok(output) => Ok(output.parameter.and_then(|p| p.value)),
            Err(e)
                if e
                    .as_service_error()
                    .is_some_and(|se| se.is_parameter_not_found()) =>
            {
                debug!(parameter = %name, "SSM parameter not found");
                Ok(None)
            }
            Err(e) => Err(ParameterError::backend("get_parameter", name, e)),
        }
    }

    async fn put(&self, name: &str, value: &str, description: &str) -> Result<()> {
        self.client
            .put_parameter()
            .name(name)
            .description(description)
            .value(value)
            .r#type(ParameterType::String)
            .overwrite(true)
            .send()
            .await
            .map_err(|e| ParameterError::backend("put_parameter", name, e))?;

        debug!(parameter = %name, value = %value, "Stored SSM parameter");
        Ok(())
    }

    async fn delete(&self, name: &str) -> Result<bool> {
        match self.client.delete_parameter().name(name).send().await {
            Ok(_) => {
                info!(parameter = %name, "SSM parameter deleted");
                Ok(true)
            }
            Err(e)
                if e
                    .as_service_error()
                    .is_some_and(|se| se.is_parameter_not_found()) =>
            {
                Ok(false)
            }
            Err(e) => Err(ParameterError::backend("delete_parameter", name, e)),
        }
    }
}
