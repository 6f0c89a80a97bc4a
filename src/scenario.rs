//! Batch runs over many inputs
//!
//! Holds one set of [`Settings`] and evaluates grids of projections in
//! parallel. Every point is independent, so results come back in input
//! order regardless of scheduling.

use log::info;
use rayon::prelude::*;
use serde::Serialize;

use crate::config::Settings;
use crate::error::CalcResult;
use crate::projection::{compound, sip, CompoundingFrequency, ProjectionInput, ProjectionResult};
use crate::retirement::{RetirementPlan, RetirementProjector, RetirementScenario};
use crate::tax::TaxReport;

/// One point of a SIP sensitivity grid
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GridPoint {
    pub annual_rate_percent: f64,
    pub years: u32,
    pub total_contributed: f64,
    pub future_value: f64,
    pub total_gain: f64,
}

/// Settings-bound runner for batch projections
///
/// # Example
/// ```
/// use finance_projection::{Planner, Settings};
///
/// let planner = Planner::new(Settings::default());
/// let grid = planner.sip_grid(10_000.0, &[8.0, 10.0, 12.0], &[10, 20]).unwrap();
/// assert_eq!(grid.len(), 6);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Planner {
    settings: Settings,
}

impl Planner {
    pub fn new(settings: Settings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// SIP future value for every (rate, years) pair, rate-major order
    pub fn sip_grid(&self, monthly: f64, rates: &[f64], years: &[u32]) -> CalcResult<Vec<GridPoint>> {
        let points: Vec<(f64, u32)> = rates
            .iter()
            .flat_map(|&r| years.iter().map(move |&y| (r, y)))
            .collect();
        info!("running SIP grid with {} points", points.len());

        points
            .par_iter()
            .map(|&(rate, years)| {
                let result = sip::project(&ProjectionInput::new(monthly, rate, years))?;
                Ok(GridPoint {
                    annual_rate_percent: rate,
                    years,
                    total_contributed: result.total_contributed,
                    future_value: result.future_value,
                    total_gain: result.total_gain,
                })
            })
            .collect()
    }

    /// Lump-sum projection using the configured default frequency when none is set
    pub fn lump_sum(&self, input: &ProjectionInput) -> CalcResult<ProjectionResult> {
        let input = ProjectionInput {
            compounding: input.compounding.or(Some(self.settings.default_compounding)),
            ..*input
        };
        compound::project(&input)
    }

    /// Lump-sum future value under each compounding frequency
    pub fn compare_compounding(
        &self,
        principal: f64,
        annual_rate_percent: f64,
        years: u32,
    ) -> CalcResult<Vec<(CompoundingFrequency, f64)>> {
        compound::compare_frequencies(principal, annual_rate_percent, years)
    }

    /// Re-run a retirement scenario at each expected return
    pub fn retirement_sensitivity(
        &self,
        scenario: &RetirementScenario,
        returns_percent: &[f64],
    ) -> CalcResult<Vec<RetirementPlan>> {
        let projector = RetirementProjector::new(self.settings.retirement_policy()?);
        returns_percent
            .par_iter()
            .map(|&r| {
                let variant = RetirementScenario {
                    name: format!("{} @ {}%", scenario.name, r),
                    expected_return_percent: r,
                    ..scenario.clone()
                };
                projector.project(&variant)
            })
            .collect()
    }

    /// Assess a batch of incomes against the configured tax table
    ///
    /// Returns `None` when the configured table name is not a built-in.
    pub fn tax_batch(&self, incomes: &[f64]) -> Option<CalcResult<Vec<TaxReport>>> {
        let table = self.settings.tax_table()?;
        Some(incomes.par_iter().map(|&income| table.assess(income, &[])).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::retirement::GapStatus;

    fn scenario() -> RetirementScenario {
        RetirementScenario {
            name: "Base".to_string(),
            current_age: 30,
            retirement_age: 55,
            current_savings: 300_000.0,
            monthly_contribution: 15_000.0,
            expected_return_percent: 10.0,
            monthly_expenses_in_retirement: 50_000.0,
            inflation_rate_percent: 6.0,
        }
    }

    #[test]
    fn test_sip_grid_order_and_values() {
        let planner = Planner::default();
        let grid = planner.sip_grid(5_000.0, &[8.0, 12.0], &[5, 10, 15]).unwrap();

        assert_eq!(grid.len(), 6);
        assert_eq!((grid[0].annual_rate_percent, grid[0].years), (8.0, 5));
        assert_eq!((grid[5].annual_rate_percent, grid[5].years), (12.0, 15));
        for point in &grid {
            let fv = sip::future_value(5_000.0, point.annual_rate_percent, point.years).unwrap();
            assert_eq!(point.future_value, fv);
        }
    }

    #[test]
    fn test_sip_grid_propagates_errors() {
        let planner = Planner::default();
        assert!(planner.sip_grid(5_000.0, &[8.0], &[0]).is_err());
    }

    #[test]
    fn test_lump_sum_uses_default_frequency() {
        let settings = Settings {
            default_compounding: CompoundingFrequency::Monthly,
            ..Settings::default()
        };
        let planner = Planner::new(settings);
        let result = planner.lump_sum(&ProjectionInput::new(1_000.0, 12.0, 1)).unwrap();
        let expected = compound::future_value(1_000.0, 12.0, 1, CompoundingFrequency::Monthly).unwrap();
        assert_eq!(result.future_value, expected);
    }

    #[test]
    fn test_retirement_sensitivity_is_monotonic() {
        let planner = Planner::default();
        let plans = planner.retirement_sensitivity(&scenario(), &[6.0, 9.0, 12.0, 15.0]).unwrap();

        assert_eq!(plans.len(), 4);
        for pair in plans.windows(2) {
            assert!(pair[1].projected_corpus > pair[0].projected_corpus);
        }
        assert_eq!(plans[0].status, GapStatus::Shortfall);
    }

    #[test]
    fn test_tax_batch() {
        let planner = Planner::default();
        let reports = planner.tax_batch(&[0.0, 800_000.0, 2_000_000.0]).unwrap().unwrap();
        assert_eq!(reports.len(), 3);
        assert_eq!(reports[0].total_tax, 0.0);
        assert!(reports[2].effective_rate_percent > reports[1].effective_rate_percent);

        let unknown = Planner::new(Settings {
            tax_table: "nowhere".to_string(),
            ..Settings::default()
        });
        assert!(unknown.tax_batch(&[1.0]).is_none());
    }
}
