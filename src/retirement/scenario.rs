//! User-defined retirement scenarios

use serde::{Deserialize, Serialize};

use crate::error::{non_negative, CalcError, CalcResult};

/// Inputs for one retirement projection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetirementScenario {
    /// Label used to select the scenario in a [`super::ScenarioBook`]
    pub name: String,

    pub current_age: u32,

    pub retirement_age: u32,

    /// Savings already accumulated
    pub current_savings: f64,

    pub monthly_contribution: f64,

    /// Expected annual return in percent
    pub expected_return_percent: f64,

    /// Monthly expenses in retirement, at today's prices
    pub monthly_expenses_in_retirement: f64,

    pub inflation_rate_percent: f64,
}

impl RetirementScenario {
    /// Years left to retirement
    pub fn years_to_retirement(&self) -> CalcResult<u32> {
        if self.retirement_age <= self.current_age {
            return Err(CalcError::InvalidInput {
                field: "retirement_age",
                value: f64::from(self.retirement_age),
                reason: "must be after the current age",
            });
        }
        Ok(self.retirement_age - self.current_age)
    }

    /// Check every numeric field
    pub fn validate(&self) -> CalcResult<()> {
        self.years_to_retirement()?;
        non_negative("current_savings", self.current_savings)?;
        non_negative("monthly_contribution", self.monthly_contribution)?;
        non_negative("expected_return_percent", self.expected_return_percent)?;
        non_negative("monthly_expenses_in_retirement", self.monthly_expenses_in_retirement)?;
        non_negative("inflation_rate_percent", self.inflation_rate_percent)?;
        Ok(())
    }
}
