use crate::core::calculator::TIME_SAVED_PER_INVOICE_MINS;
use crate::core::inputs::as_object;
use crate::utils::error::{Result, RoiError};
use chrono::{DateTime, Utc};
use html_escape::encode_text;
use regex::{Captures, Regex};
use serde_json::{Map, Value};

pub const DEFAULT_REPORT_EMAIL: &str = "not_provided@example.com";
pub const REPORT_FILENAME: &str = "invoicing_roi_report.pdf";

const TEMPLATE: &str = include_str!("templates/report.html");
const NOT_AVAILABLE: &str = "N/A";
const PLACEHOLDER_PATTERN: &str = r"\{\{\{([A-Z_]+)\}\}\}";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PaperSize {
    #[default]
    A4,
    Letter,
    Legal,
}

impl PaperSize {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "a4" => Some(Self::A4),
            "letter" => Some(Self::Letter),
            "legal" => Some(Self::Legal),
            _ => None,
        }
    }

    /// Width and height in inches.
    pub fn dimensions_in(&self) -> (f64, f64) {
        match self {
            Self::A4 => (8.27, 11.69),
            Self::Letter => (8.5, 11.0),
            Self::Legal => (8.5, 14.0),
        }
    }

    pub fn css_name(&self) -> &'static str {
        match self {
            Self::A4 => "A4",
            Self::Letter => "letter",
            Self::Legal => "legal",
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum FieldKind {
    Count,
    Money,
    Percent,
    Months,
    Hours,
}

const INPUT_FIELDS: &[(&str, &str, FieldKind)] = &[
    ("monthly_invoice_volume", "Monthly invoice volume", FieldKind::Count),
    ("num_ap_staff", "AP staff", FieldKind::Count),
    ("avg_hours_per_invoice", "Average hours per invoice", FieldKind::Hours),
    ("hourly_wage", "Hourly wage", FieldKind::Money),
    ("error_rate_manual", "Manual error rate", FieldKind::Percent),
    ("error_cost", "Cost per error", FieldKind::Money),
    ("time_horizon_months", "Time horizon", FieldKind::Months),
    ("one_time_implementation_cost", "One-time implementation cost", FieldKind::Money),
];

const RESULT_FIELDS: &[(&str, &str, FieldKind)] = &[
    ("monthly_savings", "Monthly savings", FieldKind::Money),
    ("cumulative_savings", "Cumulative savings", FieldKind::Money),
    ("payback_months", "Payback period", FieldKind::Months),
    ("roi_percentage", "Return on investment", FieldKind::Percent),
];

/// Data for one report: requester plus loosely-typed scenario fields.
///
/// Accepts both the UI shape `{inputs, results, email}` and a flat scenario
/// record; nested objects win over top-level keys.
#[derive(Debug, Clone)]
pub struct ReportRequest {
    pub email: String,
    pub scenario_name: Option<String>,
    pub inputs: Map<String, Value>,
    pub results: Map<String, Value>,
}

impl ReportRequest {
    pub fn from_json(body: &Value) -> Result<Self> {
        let obj = as_object("body", body)?;

        let email = match obj.get("email") {
            None | Some(Value::Null) => DEFAULT_REPORT_EMAIL.to_string(),
            Some(Value::String(s)) if s.trim().is_empty() => DEFAULT_REPORT_EMAIL.to_string(),
            Some(Value::String(s)) => s.trim().to_string(),
            Some(_) => return Err(RoiError::validation("email", "expected text")),
        };

        let inputs = section(obj, "inputs")?;
        let results = section(obj, "results")?;
        let scenario_name = inputs
            .get("scenario_name")
            .or_else(|| obj.get("scenario_name"))
            .and_then(Value::as_str)
            .map(str::to_string);

        Ok(Self {
            email,
            scenario_name,
            inputs,
            results,
        })
    }
}

fn section(obj: &Map<String, Value>, key: &str) -> Result<Map<String, Value>> {
    match obj.get(key) {
        None | Some(Value::Null) => Ok(obj.clone()),
        Some(v) => as_object(key, v).cloned(),
    }
}

pub fn render_report_html(
    request: &ReportRequest,
    paper: PaperSize,
    generated_at: DateTime<Utc>,
) -> Result<String> {
    let scenario_name = request.scenario_name.as_deref().unwrap_or("Untitled");
    let values = [
        ("PAGE_SIZE", paper.css_name().to_string()),
        (
            "GENERATED_AT",
            generated_at.format("%Y-%m-%d %H:%M UTC").to_string(),
        ),
        ("MINUTES_SAVED", format!("{}", TIME_SAVED_PER_INVOICE_MINS)),
        ("RESULT_ROWS", table_rows(&request.results, RESULT_FIELDS)),
        ("INPUT_ROWS", table_rows(&request.inputs, INPUT_FIELDS)),
        ("SCENARIO_NAME", encode_text(scenario_name).into_owned()),
        ("EMAIL", encode_text(&request.email).into_owned()),
    ];

    let placeholder = Regex::new(PLACEHOLDER_PATTERN)
        .map_err(|e| RoiError::render(format!("invalid report template pattern: {}", e)))?;

    // Single pass: substituted text is never rescanned for placeholders.
    Ok(placeholder
        .replace_all(TEMPLATE, |caps: &Captures| {
            values
                .iter()
                .find(|(name, _)| *name == &caps[1])
                .map(|(_, value)| value.clone())
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned())
}

fn table_rows(values: &Map<String, Value>, fields: &[(&str, &str, FieldKind)]) -> String {
    fields
        .iter()
        .map(|(key, label, kind)| {
            format!(
                "  <tr><th>{}</th><td>{}</td></tr>",
                label,
                encode_text(&format_value(values.get(*key), *kind))
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn format_value(value: Option<&Value>, kind: FieldKind) -> String {
    let number = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => match s.trim().parse::<f64>() {
            Ok(n) => Some(n),
            Err(_) => return s.clone(),
        },
        _ => None,
    };

    let Some(n) = number.filter(|n| n.is_finite()) else {
        return NOT_AVAILABLE.to_string();
    };

    match kind {
        FieldKind::Count => group_thousands(&format!("{:.0}", n)),
        FieldKind::Money => format!("${}", group_thousands(&format!("{:.2}", n))),
        FieldKind::Percent => format!("{}%", group_thousands(&format!("{:.2}", n))),
        FieldKind::Months => format!("{:.1} months", n),
        FieldKind::Hours => format!("{:.2} h", n),
    }
}

fn group_thousands(formatted: &str) -> String {
    let (sign, unsigned) = match formatted.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", formatted),
    };
    let (int_part, frac_part) = match unsigned.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (unsigned, None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    match frac_part {
        Some(f) => format!("{}{}.{}", sign, grouped, f),
        None => format!("{}{}", sign, grouped),
    }
}
