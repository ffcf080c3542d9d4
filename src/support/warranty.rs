//! Warranty status calculator.

use chrono::{Datelike, NaiveDateTime, Timelike};
use serde::Serialize;

use super::performance::round_to;
use crate::model::{parse_timestamp, ProductType, Purchase};

/// Warranty length used when no rule matches.
pub const DEFAULT_WARRANTY_YEARS: u32 = 5;

pub const EXPIRED_CLAIM_TEXT: &str = "Warranty expired";
pub const INVALID_DATE_ERROR: &str =
    "Could not determine warranty status due to invalid purchase date";

const SECONDS_PER_DAY: i64 = 86_400;

/// Warranty length in years for a purchased product.
pub fn warranty_years(purchase: &Purchase) -> u32 {
    let name = purchase.product_name.as_str();
    if name.contains("SunPower X") {
        25
    } else if name.contains("SunPower Y") {
        20
    } else if name.contains("SunPower Double-X") {
        30
    } else if purchase.product_type == ProductType::Inverter {
        10
    } else {
        DEFAULT_WARRANTY_YEARS
    }
}

/// How to file a claim for a product still under warranty.
pub fn claim_process(product_name: &str) -> &'static str {
    if product_name.contains("SunPower") {
        "Submit claim through SunPower warranty portal with serial number. Customer support will arrange inspection within 5-7 business days."
    } else {
        "Contact customer support with product serial number to initiate warranty claim process."
    }
}

/// Warranty details for one purchase.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WarrantyStatus {
    pub product_name: String,
    pub purchase_date: String,
    pub warranty_length_years: u32,
    pub warranty_end_date: String,
    pub warranty_active: bool,
    pub days_remaining: i64,
    pub warranty_percentage_remaining: f64,
    pub warranty_percentage_elapsed: f64,
    pub claim_process: String,
}

/// Per-purchase failure that does not abort the whole report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WarrantyItemError {
    pub product_name: String,
    pub error: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum WarrantyEntry {
    Status(WarrantyStatus),
    Error(WarrantyItemError),
}

impl WarrantyEntry {
    pub fn status(&self) -> Option<&WarrantyStatus> {
        match self {
            WarrantyEntry::Status(s) => Some(s),
            WarrantyEntry::Error(_) => None,
        }
    }
}

/// Result of a warranty check.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WarrantyReport {
    pub customer_name: String,
    pub warranty_information: Vec<WarrantyEntry>,
}

/// Purchases whose name contains `filter`, ignoring case. `None` keeps all.
pub fn matching_purchases<'a>(purchases: &'a [Purchase], filter: Option<&str>) -> Vec<&'a Purchase> {
    match filter.map(str::to_lowercase) {
        Some(needle) => purchases
            .iter()
            .filter(|p| p.product_name.to_lowercase().contains(&needle))
            .collect(),
        None => purchases.iter().collect(),
    }
}

/// Compute warranty status for `purchase` as of `now`.
pub fn evaluate(purchase: &Purchase, now: NaiveDateTime) -> WarrantyEntry {
    let product_name = purchase.product_name.clone();

    let years = warranty_years(purchase);
    let end = parse_timestamp(&purchase.purchase_date).and_then(|start| add_years(start, years));
    let Some(end) = end else {
        return WarrantyEntry::Error(WarrantyItemError {
            product_name,
            error: INVALID_DATE_ERROR.to_string(),
        });
    };

    let days_remaining = (end - now).num_seconds().div_euclid(SECONDS_PER_DAY).max(0);
    let warranty_active = days_remaining > 0;
    let total_days = f64::from(years) * 365.0;
    let remaining_pct = days_remaining as f64 / total_days * 100.0;

    WarrantyEntry::Status(WarrantyStatus {
        claim_process: if warranty_active {
            claim_process(&product_name).to_string()
        } else {
            EXPIRED_CLAIM_TEXT.to_string()
        },
        product_name,
        purchase_date: purchase.purchase_date.clone(),
        warranty_length_years: years,
        warranty_end_date: iso_format(end),
        warranty_active,
        days_remaining,
        warranty_percentage_remaining: round_to(remaining_pct, 1),
        warranty_percentage_elapsed: round_to((100.0 - remaining_pct).clamp(0.0, 100.0), 1),
    })
}

/// Same calendar date `years` later; 29 February lands on 28 February when
/// the target year is not a leap year.
fn add_years(start: NaiveDateTime, years: u32) -> Option<NaiveDateTime> {
    let year = start.year().checked_add(i32::try_from(years).ok()?)?;
    start
        .with_year(year)
        .or_else(|| start.with_day(28).and_then(|d| d.with_year(year)))
}

fn iso_format(ts: NaiveDateTime) -> String {
    if ts.nanosecond() == 0 {
        ts.format("%Y-%m-%dT%H:%M:%S").to_string()
    } else {
        ts.format("%Y-%m-%dT%H:%M:%S%.6f").to_string()
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, NaiveDate};

    use super::*;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 6, 1)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap()
    }

    fn purchase(name: &str, product_type: ProductType, date: &str) -> Purchase {
        Purchase {
            purchase_id: "PUR1".to_string(),
            product_name: name.to_string(),
            product_type,
            price: 100.0,
            quantity: 1,
            purchase_date: date.to_string(),
        }
    }

    #[test]
    fn test_warranty_year_rules() {
        let date = "2024-01-01T00:00:00";
        assert_eq!(warranty_years(&purchase("SunPower X", ProductType::Panel, date)), 25);
        assert_eq!(warranty_years(&purchase("SunPower Y", ProductType::Panel, date)), 20);
        assert_eq!(
            warranty_years(&purchase("SunPower Double-X", ProductType::Panel, date)),
            30
        );
        assert_eq!(
            warranty_years(&purchase("SolarInverter X1", ProductType::Inverter, date)),
            10
        );
        assert_eq!(
            warranty_years(&purchase("PowerWall Battery", ProductType::Battery, date)),
            5
        );
    }

    #[test]
    fn test_expired_warranty_reports_zero_days() {
        let bought = now() - Duration::days(26 * 365 + 7);
        let p = purchase(
            "SunPower X",
            ProductType::Panel,
            &bought.format("%Y-%m-%dT%H:%M:%S").to_string(),
        );

        let entry = evaluate(&p, now());
        let status = entry.status().unwrap();
        assert!(!status.warranty_active);
        assert_eq!(status.days_remaining, 0);
        assert_eq!(status.warranty_percentage_remaining, 0.0);
        assert_eq!(status.warranty_percentage_elapsed, 100.0);
        assert_eq!(status.claim_process, EXPIRED_CLAIM_TEXT);
    }

    #[test]
    fn test_active_warranty() {
        let p = purchase("SunPower Y", ProductType::Panel, "2025-01-15T00:00:00");
        let status = evaluate(&p, now()).status().cloned().unwrap();

        assert!(status.warranty_active);
        assert_eq!(status.warranty_end_date, "2045-01-15T00:00:00");
        assert!(status.days_remaining > 7000);
        assert!(status.warranty_percentage_remaining > 95.0);
        assert!(status.claim_process.starts_with("Submit claim through SunPower"));
    }

    #[test]
    fn test_generic_claim_text_for_other_brands() {
        let p = purchase("PowerWall Battery", ProductType::Battery, "2025-01-15");
        let status = evaluate(&p, now()).status().cloned().unwrap();
        assert!(status.claim_process.starts_with("Contact customer support"));
    }

    #[test]
    fn test_invalid_date_yields_item_error() {
        let p = purchase("SunPower X", ProductType::Panel, "last tuesday");
        match evaluate(&p, now()) {
            WarrantyEntry::Error(e) => {
                assert_eq!(e.product_name, "SunPower X");
                assert_eq!(e.error, INVALID_DATE_ERROR);
            }
            other => panic!("expected item error, got {other:?}"),
        }
    }

    #[test]
    fn test_minute_precision_purchase_date() {
        let p = purchase("SunPower Y", ProductType::Panel, "2024-03-01T10:20");
        let status = evaluate(&p, now()).status().cloned().unwrap();
        assert!(status.warranty_active);
        assert_eq!(status.warranty_end_date, "2044-03-01T10:20:00");
    }

    #[test]
    fn test_empty_product_name_is_reported_as_stored() {
        let p = purchase("", ProductType::Battery, "2024-03-01T10:20:00");
        let status = evaluate(&p, now()).status().cloned().unwrap();
        assert_eq!(status.product_name, "");
        assert_eq!(status.warranty_length_years, DEFAULT_WARRANTY_YEARS);
    }

    #[test]
    fn test_leap_day_purchase_clamps_to_feb_28() {
        let p = purchase("Charge Kit", ProductType::Controller, "2024-02-29T10:00:00");
        let status = evaluate(&p, now()).status().cloned().unwrap();
        assert_eq!(status.warranty_end_date, "2029-02-28T10:00:00");
    }

    #[test]
    fn test_days_remaining_never_negative() {
        for date in ["1990-01-01", "2000-06-01T00:00:00", "2025-05-31T23:59:59"] {
            let p = purchase("Widget", ProductType::Other, date);
            let status = evaluate(&p, now()).status().cloned().unwrap();
            assert!(status.days_remaining >= 0);
            if status.days_remaining == 0 {
                assert!(!status.warranty_active);
            }
        }
    }

    #[test]
    fn test_matching_purchases_is_case_insensitive() {
        let purchases = vec![
            purchase("SunPower X", ProductType::Panel, "2024-01-01"),
            purchase("PowerWall Battery", ProductType::Battery, "2024-01-01"),
        ];
        assert_eq!(matching_purchases(&purchases, Some("sunpower")).len(), 1);
        assert_eq!(matching_purchases(&purchases, None).len(), 2);
        assert!(matching_purchases(&purchases, Some("inverter")).is_empty());
    }
}
