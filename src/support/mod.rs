//! Customer support tools.
//!
//! Each tool fetches (or updates) one profile through a [`ProfileStore`],
//! applies a pure calculation and returns a [`ToolResult`]. Storage failures
//! are logged here and surface as [`ErrorKind::ExternalService`] results.

use std::sync::Arc;

use chrono::{NaiveDateTime, Utc};
use tracing::{error, warn};

use crate::directory::TableName;
use crate::model::{CustomerProfile, ProfileUpdate};
use crate::storage::ProfileStore;

pub mod performance;
mod response;
pub mod warranty;

pub use performance::{PerformanceReport, TimePeriod};
pub use response::{to_response, ErrorKind, ToolError, ToolResult, STATUS_ERROR, STATUS_SUCCESS};
pub use warranty::{WarrantyEntry, WarrantyReport, WarrantyStatus};

pub const MISSING_IDENTIFIER: &str = "Either customer_id or email must be provided";
pub const PROFILE_NOT_FOUND: &str = "Customer profile not found";
pub const UPDATE_FAILED: &str = "Customer profile not found or update failed";
pub const NO_PANELS: &str = "No solar panels found in customer purchase history";
pub const NO_MATCHING_PRODUCTS: &str = "No matching products found in purchase history";

/// How a tool call identifies the customer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CustomerKey<'a> {
    Id(&'a str),
    Email(&'a str),
}

impl<'a> CustomerKey<'a> {
    /// Pick the identifier to use. The id wins when both are given; empty
    /// strings count as absent.
    pub fn from_parts(customer_id: Option<&'a str>, email: Option<&'a str>) -> ToolResult<Self> {
        let present = |s: Option<&'a str>| s.filter(|v| !v.trim().is_empty());
        match (present(customer_id), present(email)) {
            (Some(id), _) => Ok(CustomerKey::Id(id)),
            (None, Some(email)) => Ok(CustomerKey::Email(email)),
            (None, None) => Err(ToolError::validation(MISSING_IDENTIFIER)),
        }
    }
}

/// Support tool functions bound to one profile table.
#[derive(Clone)]
pub struct SupportTools {
    store: Arc<dyn ProfileStore>,
    table: TableName,
}

impl SupportTools {
    pub fn new(store: Arc<dyn ProfileStore>, table: TableName) -> Self {
        Self { store, table }
    }

    pub fn table(&self) -> &TableName {
        &self.table
    }

    /// Look up a profile by id or email.
    pub async fn get_customer_profile(
        &self,
        customer_id: Option<&str>,
        email: Option<&str>,
    ) -> ToolResult<CustomerProfile> {
        let key = CustomerKey::from_parts(customer_id, email)?;
        self.fetch(key).await
    }

    /// Merge `updates` into an existing profile.
    pub async fn update_customer_profile(
        &self,
        customer_id: &str,
        updates: &ProfileUpdate,
    ) -> ToolResult<CustomerProfile> {
        match self
            .store
            .update(self.table.as_str(), customer_id, updates)
            .await
        {
            Ok(Some(profile)) => Ok(profile),
            Ok(None) => {
                warn!(customer_id = %customer_id, "Customer profile not found for update");
                Err(ToolError::not_found(UPDATE_FAILED))
            }
            Err(e) => {
                error!(
                    table = %self.table,
                    customer_id = %customer_id,
                    error = %e,
                    "Error updating customer profile"
                );
                Err(ToolError::external(UPDATE_FAILED))
            }
        }
    }

    /// Estimate production of the customer's panels over `period`.
    pub async fn analyze_solar_system_performance(
        &self,
        customer_id: Option<&str>,
        email: Option<&str>,
        period: TimePeriod,
    ) -> ToolResult<PerformanceReport> {
        let key = CustomerKey::from_parts(customer_id, email)?;
        let profile = self.fetch(key).await?;
        performance::analyze(&profile, period).ok_or_else(|| ToolError::not_found(NO_PANELS))
    }

    /// Warranty status of the customer's purchases as of now.
    pub async fn check_warranty_status(
        &self,
        customer_id: Option<&str>,
        email: Option<&str>,
        product_name: Option<&str>,
    ) -> ToolResult<WarrantyReport> {
        self.check_warranty_status_at(customer_id, email, product_name, Utc::now().naive_utc())
            .await
    }

    /// Warranty status as of `now`.
    pub async fn check_warranty_status_at(
        &self,
        customer_id: Option<&str>,
        email: Option<&str>,
        product_name: Option<&str>,
        now: NaiveDateTime,
    ) -> ToolResult<WarrantyReport> {
        let key = CustomerKey::from_parts(customer_id, email)?;
        let profile = self.fetch(key).await?;

        let filter = product_name.filter(|s| !s.is_empty());
        let products = warranty::matching_purchases(&profile.purchase_history, filter);
        if products.is_empty() {
            return Err(ToolError::not_found(NO_MATCHING_PRODUCTS));
        }

        let warranty_information: Vec<WarrantyEntry> = products
            .into_iter()
            .map(|p| warranty::evaluate(p, now))
            .collect();

        for entry in &warranty_information {
            if let WarrantyEntry::Error(e) = entry {
                warn!(
                    customer_id = %profile.customer_id,
                    product = %e.product_name,
                    "Invalid purchase date in profile"
                );
            }
        }

        Ok(WarrantyReport {
            customer_name: profile.name,
            warranty_information,
        })
    }

    async fn fetch(&self, key: CustomerKey<'_>) -> ToolResult<CustomerProfile> {
        let table = self.table.as_str();
        let result = match key {
            CustomerKey::Id(id) => self.store.get_by_id(table, id).await,
            CustomerKey::Email(email) => self.store.get_by_email(table, email).await,
        };

        match result {
            Ok(Some(profile)) => Ok(profile),
            Ok(None) => Err(ToolError::not_found(PROFILE_NOT_FOUND)),
            Err(e) => {
                error!(table = %table, key = ?key, error = %e, "Error retrieving customer profile");
                Err(ToolError::external(PROFILE_NOT_FOUND))
            }
        }
    }
}
