//! Goal planning: how much to invest monthly to hit an inflation-adjusted target

use serde::{Deserialize, Serialize};

use super::sip;
use crate::error::{finite, non_negative, positive, positive_years, CalcResult};

/// A savings goal expressed in today's money
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    pub name: String,

    /// Cost of the goal at today's prices
    pub target_today: f64,

    /// Years until the money is needed
    pub years: u32,

    pub inflation_percent: f64,

    pub expected_return_percent: f64,

    /// Money already set aside for this goal
    #[serde(default)]
    pub current_savings: f64,
}

/// Result of planning a goal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalPlan {
    pub name: String,

    /// Target in money of the goal year
    pub inflated_target: f64,

    /// Current savings grown to the goal year (annual compounding)
    pub savings_future_value: f64,

    /// Part of the target not covered by current savings
    pub remaining: f64,

    /// Monthly SIP needed to cover `remaining`
    pub required_monthly_sip: f64,

    pub on_track: bool,
}

/// Plan a goal
pub fn plan(goal: &Goal) -> CalcResult<GoalPlan> {
    positive("target_today", goal.target_today)?;
    positive_years(goal.years)?;
    non_negative("inflation_percent", goal.inflation_percent)?;
    non_negative("expected_return_percent", goal.expected_return_percent)?;
    non_negative("current_savings", goal.current_savings)?;

    let years = f64::from(goal.years);
    let inflated_target = finite(
        "inflated_target",
        goal.target_today * (1.0 + goal.inflation_percent / 100.0).powf(years),
    )?;
    let savings_future_value = finite(
        "savings_future_value",
        goal.current_savings * (1.0 + goal.expected_return_percent / 100.0).powf(years),
    )?;
    let remaining = (inflated_target - savings_future_value).max(0.0);

    let required_monthly_sip = if remaining > 0.0 {
        sip::required_monthly_contribution(remaining, goal.expected_return_percent, goal.years)?
    } else {
        0.0
    };

    Ok(GoalPlan {
        name: goal.name.clone(),
        inflated_target,
        savings_future_value,
        remaining,
        required_monthly_sip,
        on_track: remaining == 0.0,
    })
}
