//! Systematic Investment Plan (SIP) calculator
//!
//! A SIP is modelled as an annuity-due with monthly compounding: each
//! contribution is made at the start of the month and earns that month's
//! interest. For monthly rate `i` over `n` months:
//!
//! ```text
//! FV = M * ((1 + i)^n - 1) / i * (1 + i)
//! ```
//!
//! At `i == 0` the formula is 0/0, so the limit `FV = M * n` is used.

use log::debug;

use super::breakdown::{ProjectionInput, ProjectionResult, YearlyBreakdown};
use crate::error::{finite, non_negative, positive, positive_years, CalcResult};

/// Rates below this are treated as zero when dividing by the monthly rate
const ZERO_RATE_EPSILON: f64 = 1e-12;

fn monthly_rate(annual_rate_percent: f64) -> f64 {
    annual_rate_percent / 100.0 / 12.0
}

fn months_in(years: u32) -> f64 {
    f64::from(years) * 12.0
}

/// FV of one unit contributed monthly for `months` at `monthly_rate`
fn annuity_factor(monthly_rate: f64, months: f64) -> CalcResult<f64> {
    if monthly_rate.abs() < ZERO_RATE_EPSILON {
        debug!("zero monthly rate, using limit form of the annuity factor");
        return Ok(months);
    }
    finite(
        "annuity_factor",
        ((1.0 + monthly_rate).powf(months) - 1.0) / monthly_rate * (1.0 + monthly_rate),
    )
}

/// Future value of `monthly` invested every month for `years`
pub fn future_value(monthly: f64, annual_rate_percent: f64, years: u32) -> CalcResult<f64> {
    positive("monthly_contribution", monthly)?;
    non_negative("annual_rate_percent", annual_rate_percent)?;
    positive_years(years)?;

    let factor = annuity_factor(monthly_rate(annual_rate_percent), months_in(years))?;
    finite("future_value", monthly * factor)
}

/// Monthly contribution needed to reach `target_future_value` in `years`
pub fn required_monthly_contribution(
    target_future_value: f64,
    annual_rate_percent: f64,
    years: u32,
) -> CalcResult<f64> {
    positive("target_future_value", target_future_value)?;
    non_negative("annual_rate_percent", annual_rate_percent)?;
    positive_years(years)?;

    let factor = annuity_factor(monthly_rate(annual_rate_percent), months_in(years))?;
    Ok(target_future_value / factor)
}

/// Full SIP projection with a year-by-year breakdown
///
/// Each breakdown row is the closed-form value at that year boundary, not a
/// running total, so the last row matches `future_value` exactly.
pub fn project(input: &ProjectionInput) -> CalcResult<ProjectionResult> {
    let future = future_value(input.amount, input.annual_rate_percent, input.period_years)?;
    let contributed = input.amount * months_in(input.period_years);

    let mut result = ProjectionResult::new(contributed, future);
    for year in 1..=input.period_years {
        let value = future_value(input.amount, input.annual_rate_percent, year)?;
        let invested = input.amount * months_in(year);
        result.add_row(YearlyBreakdown::new(year, invested, value));
    }

    Ok(result)
}
