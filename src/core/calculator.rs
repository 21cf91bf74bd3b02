//! Closed-form ROI model for invoice automation.
//!
//! Savings come from labor only: each automated invoice saves a fixed number
//! of minutes at the given hourly wage. Error rate and error cost inputs are
//! not part of the model.

use crate::domain::model::{RoiResult, ScenarioInputs};

pub const TIME_SAVED_PER_INVOICE_MINS: f64 = 8.0;

pub fn calculate_roi(inputs: &ScenarioInputs) -> RoiResult {
    let volume = inputs.monthly_invoice_volume.unwrap_or(0.0);
    let wage = inputs.hourly_wage.unwrap_or(0.0);
    let horizon = inputs.time_horizon_months.unwrap_or(0.0);
    let impl_cost = inputs.one_time_implementation_cost.unwrap_or(0.0);

    let monthly_savings = (TIME_SAVED_PER_INVOICE_MINS / 60.0) * wage * volume;

    if monthly_savings <= 0.0 {
        return RoiResult {
            monthly_savings: 0.0,
            cumulative_savings: round_to(-impl_cost, 2),
            payback_months: f64::INFINITY,
            roi_percentage: if impl_cost > 0.0 { -100.0 } else { 0.0 },
        };
    }

    let cumulative_savings = monthly_savings * horizon;
    let net_savings = cumulative_savings - impl_cost;

    // A zero (or negative) implementation cost pays back immediately.
    let (payback_months, roi_percentage) = if impl_cost > 0.0 {
        (impl_cost / monthly_savings, (net_savings / impl_cost) * 100.0)
    } else {
        (0.0, f64::INFINITY)
    };

    RoiResult {
        monthly_savings: round_to(monthly_savings, 2),
        cumulative_savings: round_to(cumulative_savings, 2),
        payback_months: round_to(payback_months, 1),
        roi_percentage: round_to(roi_percentage, 2),
    }
}

/// Round half away from zero; non-finite values pass through.
pub fn round_to(value: f64, places: i32) -> f64 {
    if !value.is_finite() {
        return value;
    }
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inputs(volume: f64, wage: f64, horizon: f64, impl_cost: f64) -> ScenarioInputs {
        ScenarioInputs {
            monthly_invoice_volume: Some(volume),
            hourly_wage: Some(wage),
            time_horizon_months: Some(horizon),
            one_time_implementation_cost: Some(impl_cost),
            ..ScenarioInputs::default()
        }
    }

    #[test]
    fn test_reference_scenario() {
        let result = calculate_roi(&inputs(500.0, 20.0, 12.0, 1000.0));
        assert_eq!(result.monthly_savings, 1333.33);
        assert_eq!(result.cumulative_savings, 16000.0);
        assert_eq!(result.payback_months, 0.8);
        assert_eq!(result.roi_percentage, 1500.0);
    }

    #[test]
    fn test_monthly_savings_formula() {
        for (volume, wage) in [(1.0, 1.0), (250.0, 31.5), (1200.0, 18.75), (7.0, 0.3)] {
            let result = calculate_roi(&inputs(volume, wage, 6.0, 100.0));
            let expected = round_to((8.0 / 60.0) * wage * volume, 2);
            assert_eq!(result.monthly_savings, expected);
        }
    }

    #[test]
    fn test_zero_savings_with_cost() {
        let result = calculate_roi(&inputs(0.0, 0.0, 12.0, 5000.0));
        assert_eq!(result.monthly_savings, 0.0);
        assert_eq!(result.cumulative_savings, -5000.0);
        assert!(result.payback_months.is_infinite());
        assert_eq!(result.roi_percentage, -100.0);
    }

    #[test]
    fn test_zero_savings_without_cost() {
        let result = calculate_roi(&inputs(0.0, 25.0, 12.0, 0.0));
        assert!(result.payback_months.is_infinite());
        assert_eq!(result.roi_percentage, 0.0);
    }

    #[test]
    fn test_negative_savings_clamp_to_zero() {
        let result = calculate_roi(&inputs(100.0, -20.0, 12.0, 300.0));
        assert_eq!(result.monthly_savings, 0.0);
        assert_eq!(result.roi_percentage, -100.0);
    }

    #[test]
    fn test_free_implementation_has_infinite_roi() {
        let result = calculate_roi(&inputs(300.0, 15.0, 24.0, 0.0));
        assert_eq!(result.payback_months, 0.0);
        assert!(result.roi_percentage.is_infinite());
        assert!(result.roi_percentage > 0.0);
    }

    #[test]
    fn test_payback_and_roi_rounding() {
        let result = calculate_roi(&inputs(1000.0, 30.0, 18.0, 12345.0));
        let monthly = (8.0 / 60.0) * 30.0 * 1000.0;
        assert_eq!(result.payback_months, round_to(12345.0 / monthly, 1));
        assert_eq!(
            result.roi_percentage,
            round_to(((monthly * 18.0 - 12345.0) / 12345.0) * 100.0, 2)
        );
    }

    #[test]
    fn test_missing_inputs_are_zero() {
        let result = calculate_roi(&ScenarioInputs::default());
        assert_eq!(result.monthly_savings, 0.0);
        assert_eq!(result.cumulative_savings, 0.0);
        assert_eq!(result.roi_percentage, 0.0);
    }

    #[test]
    fn test_error_inputs_do_not_change_result() {
        let base = inputs(500.0, 20.0, 12.0, 1000.0);
        let with_errors = ScenarioInputs {
            error_rate_manual: Some(0.05),
            error_cost: Some(45.0),
            num_ap_staff: Some(3.0),
            ..base.clone()
        };
        assert_eq!(calculate_roi(&base), calculate_roi(&with_errors));
    }
}
