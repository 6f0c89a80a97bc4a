//! Lump-sum compound interest

use super::breakdown::{CompoundingFrequency, ProjectionInput, ProjectionResult, YearlyBreakdown};
use crate::error::{finite, non_negative, positive_years, CalcResult};

/// Future value of `principal` after `years` compounded `frequency` times a year
///
/// `FV = P * (1 + r/100/f)^(f*t)`
pub fn future_value(
    principal: f64,
    annual_rate_percent: f64,
    years: u32,
    frequency: CompoundingFrequency,
) -> CalcResult<f64> {
    non_negative("principal", principal)?;
    non_negative("annual_rate_percent", annual_rate_percent)?;
    positive_years(years)?;

    finite("future_value", grow(principal, annual_rate_percent, years, frequency))
}

fn grow(principal: f64, annual_rate_percent: f64, years: u32, frequency: CompoundingFrequency) -> f64 {
    let periods = f64::from(frequency.periods_per_year());
    let rate_per_period = annual_rate_percent / 100.0 / periods;
    principal * (1.0 + rate_per_period).powf(periods * f64::from(years))
}

/// Full lump-sum projection; `compounding` falls back to annual
pub fn project(input: &ProjectionInput) -> CalcResult<ProjectionResult> {
    let frequency = input.compounding.unwrap_or_default();
    let future = future_value(input.amount, input.annual_rate_percent, input.period_years, frequency)?;

    let mut result = ProjectionResult::new(input.amount, future);
    for year in 1..=input.period_years {
        let value = grow(input.amount, input.annual_rate_percent, year, frequency);
        result.add_row(YearlyBreakdown::new(year, input.amount, value));
    }

    Ok(result)
}

/// Future value under every supported compounding frequency
pub fn compare_frequencies(
    principal: f64,
    annual_rate_percent: f64,
    years: u32,
) -> CalcResult<Vec<(CompoundingFrequency, f64)>> {
    CompoundingFrequency::ALL
        .iter()
        .map(|&freq| future_value(principal, annual_rate_percent, years, freq).map(|fv| (freq, fv)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_annual_compounding() {
        let fv = future_value(10_000.0, 8.0, 3, CompoundingFrequency::Annually).unwrap();
        assert_relative_eq!(fv, 12_597.12, epsilon = 1e-6);
    }

    #[test]
    fn test_quarterly_compounding() {
        // 100,000 at 7% quarterly for 5 years: (1.0175)^20
        let fv = future_value(100_000.0, 7.0, 5, CompoundingFrequency::Quarterly).unwrap();
        assert_relative_eq!(fv, 141_477.82, epsilon = 0.01);
    }

    #[test]
    fn test_more_frequent_compounding_grows_more() {
        let values = compare_frequencies(50_000.0, 6.5, 10).unwrap();
        assert_eq!(values.len(), 4);
        for pair in values.windows(2) {
            assert!(pair[1].1 > pair[0].1, "{:?} should exceed {:?}", pair[1], pair[0]);
        }
    }

    #[test]
    fn test_zero_rate_and_zero_principal() {
        let fv = future_value(2_500.0, 0.0, 4, CompoundingFrequency::Monthly).unwrap();
        assert_eq!(fv, 2_500.0);

        let fv = future_value(0.0, 9.0, 4, CompoundingFrequency::Monthly).unwrap();
        assert_eq!(fv, 0.0);
    }

    #[test]
    fn test_overflow_is_an_error() {
        use crate::error::CalcError;

        assert_eq!(
            future_value(1_000.0, 500.0, 1_000, CompoundingFrequency::Monthly),
            Err(CalcError::Overflow("future_value"))
        );
        let input = ProjectionInput::new(1_000.0, 500.0, 1_000);
        assert!(project(&input).is_err());
        assert!(compare_frequencies(1_000.0, 500.0, 1_000).is_err());
    }

    #[test]
    fn test_project_breakdown() {
        let input = ProjectionInput::new(1_000.0, 10.0, 3).with_compounding(CompoundingFrequency::Annually);
        let result = project(&input).unwrap();

        assert_eq!(result.total_contributed, 1_000.0);
        assert_relative_eq!(result.future_value, 1_331.0, epsilon = 1e-9);
        assert_relative_eq!(result.total_gain, 331.0, epsilon = 1e-9);

        let values: Vec<f64> = result.yearly_breakdown.iter().map(|r| r.value).collect();
        assert_relative_eq!(values[0], 1_100.0, epsilon = 1e-9);
        assert_relative_eq!(values[1], 1_210.0, epsilon = 1e-9);
        assert_eq!(values[2], result.future_value);
    }

    #[test]
    fn test_rejects_negative_principal() {
        assert!(future_value(-1.0, 5.0, 1, CompoundingFrequency::Annually).is_err());
        assert!(future_value(1.0, 5.0, 0, CompoundingFrequency::Annually).is_err());
    }
}
