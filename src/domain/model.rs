use serde::{Deserialize, Serialize};

pub const DEFAULT_SCENARIO_NAME: &str = "Untitled";

/// User-supplied assumptions for one scenario.
///
/// Every numeric field is optional: an absent value is stored as NULL and
/// read as 0 by the calculator. Only volume, wage, horizon and
/// implementation cost feed the calculation; the rest are kept for the
/// record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScenarioInputs {
    pub scenario_name: Option<String>,
    pub monthly_invoice_volume: Option<f64>,
    pub num_ap_staff: Option<f64>,
    pub avg_hours_per_invoice: Option<f64>,
    pub hourly_wage: Option<f64>,
    pub error_rate_manual: Option<f64>,
    pub error_cost: Option<f64>,
    pub time_horizon_months: Option<f64>,
    pub one_time_implementation_cost: Option<f64>,
}

/// The subset of calculator output that is persisted with a scenario.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ScenarioResults {
    pub monthly_savings: Option<f64>,
    pub roi_percentage: Option<f64>,
    pub payback_months: Option<f64>,
}

/// Calculator output. Infinite values serialize as JSON `null`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoiResult {
    pub monthly_savings: f64,
    pub cumulative_savings: f64,
    pub payback_months: f64,
    pub roi_percentage: f64,
}

impl From<RoiResult> for ScenarioResults {
    fn from(result: RoiResult) -> Self {
        Self {
            monthly_savings: Some(result.monthly_savings),
            roi_percentage: Some(result.roi_percentage),
            payback_months: Some(result.payback_months),
        }
    }
}

/// A scenario that has not been assigned an identifier yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewScenario {
    pub scenario_name: String,
    pub inputs: ScenarioInputs,
    pub results: ScenarioResults,
}

impl NewScenario {
    pub fn new(inputs: ScenarioInputs, results: ScenarioResults) -> Self {
        let scenario_name = inputs
            .scenario_name
            .clone()
            .unwrap_or_else(|| DEFAULT_SCENARIO_NAME.to_string());
        Self {
            scenario_name,
            inputs,
            results,
        }
    }
}

/// A persisted scenario row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub id: i64,
    pub scenario_name: String,
    pub monthly_invoice_volume: Option<f64>,
    pub num_ap_staff: Option<f64>,
    pub avg_hours_per_invoice: Option<f64>,
    pub hourly_wage: Option<f64>,
    pub error_rate_manual: Option<f64>,
    pub error_cost: Option<f64>,
    pub time_horizon_months: Option<f64>,
    pub one_time_implementation_cost: Option<f64>,
    pub monthly_savings: Option<f64>,
    pub roi_percentage: Option<f64>,
    pub payback_months: Option<f64>,
}
