//! Explicit parsing of request JSON into typed scenario fields.
//!
//! Numbers pass through, numeric strings are parsed, `null` and missing
//! keys are absent. Anything else is rejected with the offending field name.

use crate::domain::model::{ScenarioInputs, ScenarioResults};
use crate::utils::error::{Result, RoiError};
use serde_json::{Map, Value};

pub fn parse_number(field: &str, value: Option<&Value>) -> Result<Option<f64>> {
    let parsed = match value {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::Number(n)) => n
            .as_f64()
            .ok_or_else(|| RoiError::validation(field, format!("{} is out of range", n)))?,
        Some(Value::String(s)) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return Ok(None);
            }
            trimmed.parse::<f64>().map_err(|_| {
                RoiError::validation(field, format!("expected a number, got {:?}", s))
            })?
        }
        Some(other) => {
            return Err(RoiError::validation(
                field,
                format!("expected a number, got {}", json_type_name(other)),
            ))
        }
    };

    if !parsed.is_finite() {
        return Err(RoiError::validation(field, "value must be finite"));
    }
    Ok(Some(parsed))
}

fn parse_text(field: &str, value: Option<&Value>) -> Result<Option<String>> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(RoiError::validation(
            field,
            format!("expected text, got {}", json_type_name(other)),
        )),
    }
}

pub fn as_object<'a>(field: &str, value: &'a Value) -> Result<&'a Map<String, Value>> {
    value.as_object().ok_or_else(|| {
        RoiError::validation(
            field,
            format!("expected a JSON object, got {}", json_type_name(value)),
        )
    })
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

impl ScenarioInputs {
    pub fn from_json(value: &Value) -> Result<Self> {
        let obj = as_object("body", value)?;
        Ok(Self {
            scenario_name: parse_text("scenario_name", obj.get("scenario_name"))?,
            monthly_invoice_volume: parse_number(
                "monthly_invoice_volume",
                obj.get("monthly_invoice_volume"),
            )?,
            num_ap_staff: parse_number("num_ap_staff", obj.get("num_ap_staff"))?,
            avg_hours_per_invoice: parse_number(
                "avg_hours_per_invoice",
                obj.get("avg_hours_per_invoice"),
            )?,
            hourly_wage: parse_number("hourly_wage", obj.get("hourly_wage"))?,
            error_rate_manual: parse_number("error_rate_manual", obj.get("error_rate_manual"))?,
            error_cost: parse_number("error_cost", obj.get("error_cost"))?,
            time_horizon_months: parse_number(
                "time_horizon_months",
                obj.get("time_horizon_months"),
            )?,
            one_time_implementation_cost: parse_number(
                "one_time_implementation_cost",
                obj.get("one_time_implementation_cost"),
            )?,
        })
    }
}

impl ScenarioResults {
    pub fn from_json(value: &Value) -> Result<Self> {
        let obj = as_object("results", value)?;
        Ok(Self {
            monthly_savings: parse_number("monthly_savings", obj.get("monthly_savings"))?,
            roi_percentage: parse_number("roi_percentage", obj.get("roi_percentage"))?,
            payback_months: parse_number("payback_months", obj.get("payback_months"))?,
        })
    }
}

/// Body of a save request: `{inputs: {...}, results: {...}}`.
#[derive(Debug, Clone, PartialEq)]
pub struct SaveRequest {
    pub inputs: ScenarioInputs,
    /// `None` when the caller did not send results.
    pub results: Option<ScenarioResults>,
}

impl SaveRequest {
    pub fn from_json(body: &Value) -> Result<Self> {
        let obj = as_object("body", body)?;

        let inputs = match obj.get("inputs") {
            None | Some(Value::Null) => ScenarioInputs::default(),
            Some(v) => {
                as_object("inputs", v)?;
                ScenarioInputs::from_json(v)?
            }
        };

        let results = match obj.get("results") {
            None | Some(Value::Null) => None,
            Some(v) => Some(ScenarioResults::from_json(v)?),
        };

        Ok(Self { inputs, results })
    }
}
