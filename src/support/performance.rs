//! Solar system performance estimate.
//!
//! Capacity comes from the customer's panel purchases and a fixed
//! model-to-wattage table. Production is simulated from average sun hours
//! and a fixed efficiency per reporting period.

use serde::Serialize;

use crate::model::CustomerProfile;

/// Average daily sun hours used for the production estimate.
pub const AVG_DAILY_SUN_HOURS: f64 = 5.5;
/// Wattage assumed for panel models not in the table.
pub const DEFAULT_PANEL_WATTAGE: u32 = 300;

/// Reporting period for the analysis.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TimePeriod {
    #[default]
    Month,
    Quarter,
    Year,
}

impl TimePeriod {
    /// Parse a period name. Anything other than exactly `month` or
    /// `quarter` is treated as a year.
    pub fn parse(raw: &str) -> Self {
        match raw {
            "month" => TimePeriod::Month,
            "quarter" => TimePeriod::Quarter,
            _ => TimePeriod::Year,
        }
    }

    pub fn days(&self) -> u32 {
        match self {
            TimePeriod::Month => 30,
            TimePeriod::Quarter => 90,
            TimePeriod::Year => 365,
        }
    }

    /// Fraction of expected production actually achieved.
    pub fn efficiency(&self) -> f64 {
        match self {
            TimePeriod::Month => 0.92,
            TimePeriod::Quarter => 0.89,
            TimePeriod::Year => 0.87,
        }
    }
}

/// Rated wattage of a panel model.
///
/// Matches on substrings, first rule wins.
pub fn panel_wattage(model_name: &str) -> u32 {
    if model_name.contains("SunPower X") {
        320
    } else if model_name.contains("SunPower Y") {
        290
    } else if model_name.contains("SunPower Double-X") {
        400
    } else {
        DEFAULT_PANEL_WATTAGE
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PanelModel {
    pub model: String,
    pub quantity: u32,
    pub wattage: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SystemDetails {
    pub total_capacity_watts: u64,
    pub panel_models: Vec<PanelModel>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PerformanceFigures {
    pub time_period: TimePeriod,
    pub expected_kwh_production: f64,
    pub actual_kwh_production: f64,
    /// Efficiency as a percentage.
    pub performance_ratio: f64,
    pub avg_daily_production_kwh: f64,
}

/// Result of a performance analysis.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PerformanceReport {
    pub customer_name: String,
    pub system_details: SystemDetails,
    pub performance_analysis: PerformanceFigures,
    pub recommendations: Vec<String>,
}

/// Analyze the panels in `profile` over `period`.
///
/// Returns `None` if the profile has no panel purchases.
pub fn analyze(profile: &CustomerProfile, period: TimePeriod) -> Option<PerformanceReport> {
    let panel_models: Vec<PanelModel> = profile
        .panels()
        .map(|p| PanelModel {
            model: p.product_name.clone(),
            quantity: p.quantity,
            wattage: panel_wattage(&p.product_name),
        })
        .collect();

    if panel_models.is_empty() {
        return None;
    }

    let total_capacity_watts: u64 = panel_models
        .iter()
        .map(|m| u64::from(m.wattage) * u64::from(m.quantity))
        .sum();

    let efficiency = period.efficiency();
    let days = f64::from(period.days());
    let expected_daily_kwh = total_capacity_watts as f64 * AVG_DAILY_SUN_HOURS / 1000.0;
    let actual_daily_kwh = expected_daily_kwh * efficiency;

    Some(PerformanceReport {
        customer_name: profile.name.clone(),
        system_details: SystemDetails {
            total_capacity_watts,
            panel_models,
        },
        performance_analysis: PerformanceFigures {
            time_period: period,
            expected_kwh_production: round_to(expected_daily_kwh * days, 2),
            actual_kwh_production: round_to(actual_daily_kwh * days, 2),
            performance_ratio: round_to(efficiency * 100.0, 1),
            avg_daily_production_kwh: round_to(actual_daily_kwh, 2),
        },
        recommendations: recommendations(efficiency),
    })
}

/// Maintenance advice for an efficiency ratio.
pub fn recommendations(efficiency: f64) -> Vec<String> {
    let lines: &[&str] = if efficiency >= 0.95 {
        &["Your system is performing excellently. Continue with standard maintenance."]
    } else if efficiency >= 0.85 {
        &[
            "Your system is performing adequately but could be improved.",
            "Consider cleaning panels to remove potential debris or dust buildup.",
            "Check for any new shade sources that may have developed near panels.",
        ]
    } else {
        &[
            "Your system is performing below expectations.",
            "We recommend scheduling a professional inspection to identify issues.",
            "Check for inverter error codes or warning lights.",
            "Ensure all panels are clean and free from debris or shading.",
            "Monitor performance daily to identify any patterns in reduced output.",
        ]
    };
    lines.iter().map(|s| s.to_string()).collect()
}

pub(crate) fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}
