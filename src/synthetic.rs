//! Synthetic customer profiles for demos.
//!
//! Every field is a deterministic function of the profile index; only the
//! year of purchase dates and the timestamps come from the clock.

use chrono::{Datelike, NaiveDate, NaiveDateTime, Utc};
use tracing::info;

use crate::model::{
    format_timestamp, ContactPreference, CustomerProfile, Preferences, ProductType, Purchase,
};
use crate::storage::{ProfileStore, Result};

pub const COUNTRIES: [&str; 5] = ["USA", "Canada", "Australia", "UK", "Germany"];

/// States (or regions) per country, indexed like [`COUNTRIES`].
pub fn states(country: &str) -> &'static [&'static str] {
    match country {
        "USA" => &["California", "Texas", "New York", "Florida", "Washington"],
        "Canada" => &["Ontario", "Quebec", "British Columbia", "Alberta"],
        "Australia" => &["New South Wales", "Victoria", "Queensland"],
        "UK" => &["England", "Scotland", "Wales"],
        "Germany" => &["Bavaria", "Berlin", "Hesse"],
        _ => &[],
    }
}

/// Entry of the demo product catalog.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CatalogProduct {
    pub name: &'static str,
    pub price: f64,
    pub product_type: ProductType,
}

pub const CATALOG: [CatalogProduct; 6] = [
    CatalogProduct {
        name: "SunPower X",
        price: 1200.0,
        product_type: ProductType::Panel,
    },
    CatalogProduct {
        name: "SunPower Y",
        price: 800.0,
        product_type: ProductType::Panel,
    },
    CatalogProduct {
        name: "SunPower Double-X",
        price: 1600.0,
        product_type: ProductType::Panel,
    },
    CatalogProduct {
        name: "PowerWall Battery",
        price: 5000.0,
        product_type: ProductType::Battery,
    },
    CatalogProduct {
        name: "SolarInverter X1",
        price: 1500.0,
        product_type: ProductType::Inverter,
    },
    CatalogProduct {
        name: "EcoCharge Controller",
        price: 300.0,
        product_type: ProductType::Controller,
    },
];

/// Build the profile for index `i` as of `now`.
pub fn generate_profile(i: usize, now: NaiveDateTime) -> CustomerProfile {
    let country = COUNTRIES[i % COUNTRIES.len()];
    let regions = states(country);
    let state = regions[i % regions.len()];

    let purchase_history = (0..(i % 3) + 1)
        .map(|j| generate_purchase(i, j, now))
        .collect();

    let timestamp = format_timestamp(now);

    CustomerProfile {
        customer_id: format!("CUST{}", 100 + i),
        name: format!("Customer {}", i + 1),
        email: format!("customer{}@example.com", i + 1),
        country: country.to_string(),
        state: state.to_string(),
        purchase_history,
        preferences: Preferences {
            contact_preference: if i % 2 == 0 {
                ContactPreference::Email
            } else {
                ContactPreference::Phone
            },
            newsletter: i % 3 == 0,
            maintenance_reminder: i % 2 == 0,
        },
        created_at: timestamp.clone(),
        updated_at: timestamp,
    }
}

fn generate_purchase(i: usize, j: usize, now: NaiveDateTime) -> Purchase {
    let product = CATALOG[(i + j) % CATALOG.len()];
    Purchase {
        purchase_id: format!("PUR{}{}", 100 + i, j),
        product_name: product.name.to_string(),
        product_type: product.product_type,
        price: product.price,
        quantity: (j % 2) as u32 + 1,
        purchase_date: format_timestamp(purchase_date(i, j, now)),
    }
}

/// `now` moved to month `((i+j) % 12) + 1`, day `((i*j) % 28) + 1`.
fn purchase_date(i: usize, j: usize, now: NaiveDateTime) -> NaiveDateTime {
    let month = ((i + j) % 12) as u32 + 1;
    let day = ((i * j) % 28) as u32 + 1;
    // Days 1..=28 exist in every month.
    NaiveDate::from_ymd_opt(now.year(), month, day)
        .map(|date| date.and_time(now.time()))
        .unwrap_or(now)
}

/// Generate `count` profiles as of `now`.
pub fn generate_profiles(count: usize, now: NaiveDateTime) -> Vec<CustomerProfile> {
    (0..count).map(|i| generate_profile(i, now)).collect()
}

/// Generate `count` profiles and write them to `table`.
///
/// Returns the ids written, in order.
pub async fn seed_profiles(
    store: &dyn ProfileStore,
    table: &str,
    count: usize,
) -> Result<Vec<String>> {
    let now = Utc::now().naive_utc();
    let mut created = Vec::with_capacity(count);

    for profile in generate_profiles(count, now) {
        store.put_profile(table, &profile).await?;
        created.push(profile.customer_id);
    }

    info!(table = %table, count = created.len(), "Generated and stored synthetic customer profiles");
    Ok(created)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 1, 31)
            .unwrap()
            .and_hms_opt(8, 15, 0)
            .unwrap()
    }

    #[test]
    fn test_first_profile() {
        let p = generate_profile(0, now());
        assert_eq!(p.customer_id, "CUST100");
        assert_eq!(p.name, "Customer 1");
        assert_eq!(p.email, "customer1@example.com");
        assert_eq!(p.country, "USA");
        assert_eq!(p.state, "California");
        assert_eq!(p.purchase_history.len(), 1);
        assert_eq!(p.purchase_history[0].product_name, "SunPower X");
        assert_eq!(p.purchase_history[0].purchase_id, "PUR1000");
        assert_eq!(p.preferences.contact_preference, ContactPreference::Email);
        assert!(p.preferences.newsletter);
        assert!(p.preferences.maintenance_reminder);
    }

    #[test]
    fn test_purchase_count_cycles() {
        let counts: Vec<usize> = (0..6)
            .map(|i| generate_profile(i, now()).purchase_history.len())
            .collect();
        assert_eq!(counts, vec![1, 2, 3, 1, 2, 3]);
    }

    #[test]
    fn test_country_and_state_cycling() {
        let p = generate_profile(6, now());
        assert_eq!(p.country, "Canada");
        // 6 % 4 regions
        assert_eq!(p.state, "British Columbia");
        assert_eq!(p.preferences.contact_preference, ContactPreference::Email);
        assert!(p.preferences.newsletter);

        let p = generate_profile(7, now());
        assert_eq!(p.country, "Australia");
        assert_eq!(p.state, "Victoria");
        assert_eq!(p.preferences.contact_preference, ContactPreference::Phone);
        assert!(!p.preferences.newsletter);
    }

    #[test]
    fn test_purchase_fields() {
        let p = generate_profile(2, now());
        let second = &p.purchase_history[1];
        assert_eq!(second.purchase_id, "PUR1021");
        assert_eq!(second.product_name, "PowerWall Battery");
        assert_eq!(second.product_type, ProductType::Battery);
        assert_eq!(second.quantity, 2);
        // month (2+1)%12+1 = 4, day (2*1)%28+1 = 3; time kept from now
        assert_eq!(second.purchase_date, "2025-04-03T08:15:00.000000");
    }

    #[test]
    fn test_generation_is_deterministic() {
        assert_eq!(generate_profiles(10, now()), generate_profiles(10, now()));
    }
}
