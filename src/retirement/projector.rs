//! Retirement corpus projection
//!
//! Projected corpus is the sum of two independent parts:
//! - current savings grown annually: `savings * (1 + r)^years`
//! - the monthly contribution treated as a SIP over the same years
//!
//! Required corpus is the inflated monthly expense multiplied out by
//! `12 * years_of_expenses`.

use log::debug;
use serde::{Deserialize, Serialize};

use super::scenario::RetirementScenario;
use crate::error::{finite, positive, CalcResult};
use crate::projection::sip;

/// Default number of years of expenses the corpus must cover (the 4% rule)
pub const DEFAULT_YEARS_OF_EXPENSES: f64 = 25.0;

/// Policy assumptions for the required-corpus heuristic
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RetirementPolicy {
    /// Corpus = annual expenses at retirement * this multiplier
    pub years_of_expenses: f64,
}

impl RetirementPolicy {
    pub fn new(years_of_expenses: f64) -> CalcResult<Self> {
        positive("years_of_expenses", years_of_expenses)?;
        Ok(Self { years_of_expenses })
    }

    /// Build from a safe withdrawal rate in percent (4.0 gives 25 years)
    pub fn from_withdrawal_rate(withdrawal_rate_percent: f64) -> CalcResult<Self> {
        positive("withdrawal_rate_percent", withdrawal_rate_percent)?;
        Ok(Self {
            years_of_expenses: 100.0 / withdrawal_rate_percent,
        })
    }

    pub fn withdrawal_rate_percent(&self) -> f64 {
        100.0 / self.years_of_expenses
    }
}

impl Default for RetirementPolicy {
    fn default() -> Self {
        Self {
            years_of_expenses: DEFAULT_YEARS_OF_EXPENSES,
        }
    }
}

/// Whether the projected corpus covers the requirement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GapStatus {
    Shortfall,
    Surplus,
}

impl GapStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            GapStatus::Shortfall => "shortfall",
            GapStatus::Surplus => "surplus",
        }
    }
}

/// Outcome of a retirement projection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetirementPlan {
    pub scenario: String,
    pub years_to_retirement: u32,

    /// Current savings grown to retirement
    pub savings_future_value: f64,

    /// Monthly contributions grown to retirement
    pub contributions_future_value: f64,

    pub projected_corpus: f64,

    /// Monthly expenses in retirement-year money
    pub future_monthly_expenses: f64,

    pub required_corpus: f64,

    /// required - projected; positive means shortfall
    pub gap: f64,

    pub status: GapStatus,

    /// Extra monthly SIP that would close a shortfall (0 for a surplus)
    pub additional_monthly_needed: f64,
}

/// Projects retirement scenarios under a fixed policy
#[derive(Debug, Clone, Default)]
pub struct RetirementProjector {
    policy: RetirementPolicy,
}

impl RetirementProjector {
    pub fn new(policy: RetirementPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &RetirementPolicy {
        &self.policy
    }

    /// Run the projection for one scenario
    pub fn project(&self, scenario: &RetirementScenario) -> CalcResult<RetirementPlan> {
        scenario.validate()?;
        positive("years_of_expenses", self.policy.years_of_expenses)?;

        let years = scenario.years_to_retirement()?;
        let rate = scenario.expected_return_percent;

        let growth_years = f64::from(years);

        let savings_future_value = finite(
            "savings_future_value",
            scenario.current_savings * (1.0 + rate / 100.0).powf(growth_years),
        )?;
        let contributions_future_value = if scenario.monthly_contribution > 0.0 {
            sip::future_value(scenario.monthly_contribution, rate, years)?
        } else {
            0.0
        };
        let projected_corpus = finite("projected_corpus", savings_future_value + contributions_future_value)?;

        let future_monthly_expenses = scenario.monthly_expenses_in_retirement
            * (1.0 + scenario.inflation_rate_percent / 100.0).powf(growth_years);
        let required_corpus = finite(
            "required_corpus",
            future_monthly_expenses * 12.0 * self.policy.years_of_expenses,
        )?;

        let gap = required_corpus - projected_corpus;
        let (status, additional_monthly_needed) = if gap > 0.0 {
            (GapStatus::Shortfall, sip::required_monthly_contribution(gap, rate, years)?)
        } else {
            (GapStatus::Surplus, 0.0)
        };

        debug!(
            "scenario {}: projected {:.2}, required {:.2}, {}",
            scenario.name,
            projected_corpus,
            required_corpus,
            status.as_str()
        );

        Ok(RetirementPlan {
            scenario: scenario.name.clone(),
            years_to_retirement: years,
            savings_future_value,
            contributions_future_value,
            projected_corpus,
            future_monthly_expenses,
            required_corpus,
            gap,
            status,
            additional_monthly_needed,
        })
    }
}

/// Project a scenario under the given policy
pub fn project(scenario: &RetirementScenario, policy: &RetirementPolicy) -> CalcResult<RetirementPlan> {
    RetirementProjector::new(*policy).project(scenario)
}
