//! Customer profile records.
//!
//! Profiles are stored as whole documents keyed by `customer_id`. Purchases
//! are embedded in their owning profile and have no identity of their own.
//! Timestamps and purchase dates are kept as the strings the table holds so
//! that a malformed date in one purchase does not make the whole record
//! unreadable.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// Product name reported for purchases stored without one.
pub const UNKNOWN_PRODUCT: &str = "Unknown Product";

/// Format used when writing `created_at` / `updated_at` / purchase dates.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";

/// A customer profile as stored in the profile table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerProfile {
    pub customer_id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub purchase_history: Vec<Purchase>,
    #[serde(default)]
    pub preferences: Preferences,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
}

impl CustomerProfile {
    /// Purchases whose product type is [`ProductType::Panel`].
    pub fn panels(&self) -> impl Iterator<Item = &Purchase> {
        self.purchase_history
            .iter()
            .filter(|p| p.product_type == ProductType::Panel)
    }

    /// Apply a partial update, stamping `updated_at` with `now`.
    pub fn apply(&mut self, update: &ProfileUpdate, now: &str) {
        if let Some(name) = &update.name {
            self.name = name.clone();
        }
        if let Some(email) = &update.email {
            self.email = email.clone();
        }
        if let Some(country) = &update.country {
            self.country = country.clone();
        }
        if let Some(state) = &update.state {
            self.state = state.clone();
        }
        if let Some(history) = &update.purchase_history {
            self.purchase_history = history.clone();
        }
        if let Some(preferences) = &update.preferences {
            self.preferences = preferences.clone();
        }
        self.updated_at = now.to_string();
    }
}

/// A single purchase embedded in a profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Purchase {
    pub purchase_id: String,
    #[serde(default = "unknown_product")]
    pub product_name: String,
    pub product_type: ProductType,
    pub price: f64,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
    #[serde(default)]
    pub purchase_date: String,
}

fn unknown_product() -> String {
    UNKNOWN_PRODUCT.to_string()
}

fn default_quantity() -> u32 {
    1
}

/// Product category of a purchase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductType {
    Panel,
    Battery,
    Inverter,
    Controller,
    #[serde(other)]
    Other,
}

impl ProductType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProductType::Panel => "panel",
            ProductType::Battery => "battery",
            ProductType::Inverter => "inverter",
            ProductType::Controller => "controller",
            ProductType::Other => "other",
        }
    }
}

impl std::fmt::Display for ProductType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How the customer wants to be contacted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContactPreference {
    #[default]
    Email,
    Phone,
}

/// Per-customer preference flags.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    pub contact_preference: ContactPreference,
    pub newsletter: bool,
    pub maintenance_reminder: bool,
}

/// Fields to merge into an existing profile.
///
/// `customer_id` is the table key and cannot be changed; `updated_at` is
/// always stamped by the store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub purchase_history: Option<Vec<Purchase>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preferences: Option<Preferences>,
}

impl ProfileUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_country(mut self, country: impl Into<String>) -> Self {
        self.country = Some(country.into());
        self
    }

    pub fn with_state(mut self, state: impl Into<String>) -> Self {
        self.state = Some(state.into());
        self
    }

    pub fn with_purchase_history(mut self, history: Vec<Purchase>) -> Self {
        self.purchase_history = Some(history);
        self
    }

    pub fn with_preferences(mut self, preferences: Preferences) -> Self {
        self.preferences = Some(preferences);
        self
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Current time formatted for storage.
pub fn timestamp_now() -> String {
    format_timestamp(Utc::now().naive_utc())
}

pub fn format_timestamp(ts: NaiveDateTime) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

/// Parse a stored timestamp.
///
/// Accepts naive ISO-8601 date-times (with or without fractional seconds),
/// RFC 3339 strings with an offset (converted to UTC), and bare dates
/// (midnight).
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(ts) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(ts);
    }
    if let Ok(ts) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f") {
        return Some(ts);
    }
    if let Ok(ts) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M") {
        return Some(ts);
    }
    if let Ok(ts) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M") {
        return Some(ts);
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.naive_utc());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile() -> CustomerProfile {
        CustomerProfile {
            customer_id: "CUST100".to_string(),
            name: "Customer 1".to_string(),
            email: "customer1@example.com".to_string(),
            country: "USA".to_string(),
            state: "California".to_string(),
            purchase_history: vec![Purchase {
                purchase_id: "PUR1000".to_string(),
                product_name: "SunPower X".to_string(),
                product_type: ProductType::Panel,
                price: 1200.0,
                quantity: 1,
                purchase_date: "2024-01-01T00:00:00".to_string(),
            }],
            preferences: Preferences::default(),
            created_at: "2024-01-01T00:00:00.000000".to_string(),
            updated_at: "2024-01-01T00:00:00.000000".to_string(),
        }
    }

    #[test]
    fn test_apply_merges_only_supplied_fields() {
        let mut p = profile();
        let update = ProfileUpdate::new().with_name("Renamed");
        p.apply(&update, "2025-01-01T00:00:00.000000");

        assert_eq!(p.name, "Renamed");
        assert_eq!(p.email, "customer1@example.com");
        assert_eq!(p.purchase_history.len(), 1);
        assert_eq!(p.updated_at, "2025-01-01T00:00:00.000000");
    }

    #[test]
    fn test_unknown_product_type_decodes_as_other() {
        let purchase: Purchase = serde_json::from_value(serde_json::json!({
            "purchase_id": "P1",
            "product_name": "Mounting Kit",
            "product_type": "mounting",
            "price": 99,
        }))
        .unwrap();
        assert_eq!(purchase.product_type, ProductType::Other);
        assert_eq!(purchase.quantity, 1);
        assert_eq!(purchase.purchase_date, "");
    }

    #[test]
    fn test_parse_timestamp_variants() {
        assert!(parse_timestamp("2024-03-01T10:20:30.123456").is_some());
        assert!(parse_timestamp("2024-03-01T10:20:30").is_some());
        assert!(parse_timestamp("2024-03-01T10:20:30+02:00").is_some());
        assert_eq!(
            parse_timestamp("2024-03-01T10:20"),
            NaiveDate::from_ymd_opt(2024, 3, 1).and_then(|d| d.and_hms_opt(10, 20, 0))
        );
        assert_eq!(
            parse_timestamp("2024-03-01 10:20"),
            parse_timestamp("2024-03-01T10:20:00")
        );
        assert!(parse_timestamp("2024-03-01").is_some());
        assert!(parse_timestamp("").is_none());
        assert!(parse_timestamp("not-a-date").is_none());
    }

    #[test]
    fn test_missing_product_name_defaults_to_unknown() {
        let purchase: Purchase = serde_json::from_value(serde_json::json!({
            "purchase_id": "PUR1",
            "product_type": "panel",
            "price": 100.0,
        }))
        .unwrap();
        assert_eq!(purchase.product_name, UNKNOWN_PRODUCT);
        assert_eq!(purchase.quantity, 1);
    }

    #[test]
    fn test_timestamp_now_round_trips_through_parser() {
        let now = timestamp_now();
        assert!(parse_timestamp(&now).is_some());
    }

    #[test]
    fn test_update_serializes_only_present_fields() {
        let update = ProfileUpdate::new().with_state("Texas");
        let json = serde_json::to_value(&update).unwrap();
        assert_eq!(json, serde_json::json!({"state": "Texas"}));
        assert!(ProfileUpdate::new().is_empty());
        assert!(!update.is_empty());
    }
}
