//! solar-support-demo: end-to-end walkthrough against AWS
//!
//! Creates the profile table (recording its name in the table-name
//! parameter), seeds synthetic customers, then exercises the support tools
//! on `CUST100` and prints each result envelope.
//!
//! ## Configuration
//! - SOLAR_SUPPORT_CONFIG: YAML config file (optional)
//! - SOLAR_SUPPORT__AWS__REGION / SOLAR_SUPPORT__AWS__ENDPOINT_URL: AWS overrides
//! - SOLAR_SEED_COUNT: profiles to generate (default: 5)
//! - JIRA_INSTANCE_URL / JIRA_USERNAME / JIRA_API_TOKEN: ticketing (optional)

use std::sync::Arc;

use serde::Serialize;
use tracing::info;

use solar_support::config::AppConfig;
use solar_support::directory::CustomerDirectory;
use solar_support::model::ProfileUpdate;
use solar_support::parameters::SsmParameterStore;
use solar_support::storage::DynamoProfileStore;
use solar_support::support::{to_response, SupportTools, TimePeriod, ToolResult};
use solar_support::ticketing::TicketDesk;
use solar_support::utils::bootstrap::init_tracing;

const DEFAULT_SEED_COUNT: usize = 5;
const DEMO_CUSTOMER: &str = "CUST100";

fn print_result<T: Serialize>(label: &str, result: &ToolResult<T>) -> Result<(), serde_json::Error> {
    println!("--- {label} ---");
    println!("{}", serde_json::to_string_pretty(&to_response(result))?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let config = AppConfig::load(None)?;

    let seed_count = std::env::var("SOLAR_SEED_COUNT")
        .ok()
        .and_then(|c| c.parse().ok())
        .unwrap_or(DEFAULT_SEED_COUNT);

    let store = Arc::new(DynamoProfileStore::new(&config.aws).await);
    let parameters = Arc::new(SsmParameterStore::new(&config.aws).await);
    let directory = CustomerDirectory::new(store.clone(), parameters, config.profiles.clone());

    let handle = directory.create_table(None).await?;
    info!(table = %handle.name, status = ?handle.status, "Profile table ready");

    let seeded = directory.seed_profiles(Some(&handle.name), seed_count).await?;
    info!(count = seeded.len(), "Seeded customer profiles");

    let table = directory.resolve_table_name().await;
    let tools = SupportTools::new(store, table);
    info!(table = %tools.table(), "Support tools bound to profile table");

    let profile = tools.get_customer_profile(Some(DEMO_CUSTOMER), None).await;
    print_result("get_customer_profile", &profile)?;

    let update = ProfileUpdate::new().with_state("Nevada");
    let updated = tools.update_customer_profile(DEMO_CUSTOMER, &update).await;
    print_result("update_customer_profile", &updated)?;

    let performance = tools
        .analyze_solar_system_performance(Some(DEMO_CUSTOMER), None, TimePeriod::Month)
        .await;
    print_result("analyze_solar_system_performance", &performance)?;

    let warranty = tools
        .check_warranty_status(Some(DEMO_CUSTOMER), None, None)
        .await;
    print_result("check_warranty_status", &warranty)?;

    let desk = TicketDesk::connect(&config.jira).await;
    if desk.is_configured() {
        let tickets = desk.get_customer_tickets(DEMO_CUSTOMER).await;
        print_result("get_customer_tickets", &tickets)?;
    } else {
        info!("Jira not configured, skipping ticket lookup");
    }

    Ok(())
}
