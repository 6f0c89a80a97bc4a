//! A set of stored retirement scenarios with one active selection

use serde::{Deserialize, Serialize};

use super::projector::{RetirementPlan, RetirementPolicy, RetirementProjector};
use super::scenario::RetirementScenario;
use crate::error::CalcResult;

/// Stored scenarios, at most one active
///
/// The first scenario added becomes active. Removing the active scenario
/// falls back to the first one left.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScenarioBook {
    scenarios: Vec<RetirementScenario>,
    active: Option<usize>,
}

impl ScenarioBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.scenarios.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenarios.is_empty()
    }

    pub fn scenarios(&self) -> &[RetirementScenario] {
        &self.scenarios
    }

    /// Add a scenario, replacing any with the same name
    pub fn add(&mut self, scenario: RetirementScenario) {
        match self.position(&scenario.name) {
            Some(idx) => self.scenarios[idx] = scenario,
            None => {
                self.scenarios.push(scenario);
                if self.active.is_none() {
                    self.active = Some(0);
                }
            }
        }
    }

    /// Make the named scenario active. Returns false if it does not exist.
    pub fn select(&mut self, name: &str) -> bool {
        match self.position(name) {
            Some(idx) => {
                self.active = Some(idx);
                true
            }
            None => false,
        }
    }

    pub fn active(&self) -> Option<&RetirementScenario> {
        self.active.and_then(|idx| self.scenarios.get(idx))
    }

    pub fn get(&self, name: &str) -> Option<&RetirementScenario> {
        self.position(name).map(|idx| &self.scenarios[idx])
    }

    /// Remove the named scenario
    pub fn remove(&mut self, name: &str) -> Option<RetirementScenario> {
        let idx = self.position(name)?;
        let removed = self.scenarios.remove(idx);

        self.active = match self.active {
            _ if self.scenarios.is_empty() => None,
            Some(active) if active == idx => Some(0),
            Some(active) if active > idx => Some(active - 1),
            other => other,
        };

        Some(removed)
    }

    /// Project the active scenario; `None` when nothing is active
    pub fn project_active(&self, policy: &RetirementPolicy) -> Option<CalcResult<RetirementPlan>> {
        let projector = RetirementProjector::new(*policy);
        self.active().map(|scenario| projector.project(scenario))
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.scenarios.iter().position(|s| s.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scenario(name: &str, retirement_age: u32) -> RetirementScenario {
        RetirementScenario {
            name: name.to_string(),
            current_age: 40,
            retirement_age,
            current_savings: 200_000.0,
            monthly_contribution: 10_000.0,
            expected_return_percent: 9.0,
            monthly_expenses_in_retirement: 40_000.0,
            inflation_rate_percent: 5.0,
        }
    }

    #[test]
    fn test_empty_book_has_no_plan() {
        let book = ScenarioBook::new();
        assert!(book.active().is_none());
        assert!(book.project_active(&RetirementPolicy::default()).is_none());
    }

    #[test]
    fn test_first_added_is_active_and_select() {
        let mut book = ScenarioBook::new();
        book.add(scenario("early", 55));
        book.add(scenario("late", 65));

        assert_eq!(book.len(), 2);
        assert_eq!(book.active().unwrap().name, "early");

        assert!(book.select("late"));
        assert_eq!(book.active().unwrap().name, "late");
        assert!(!book.select("missing"));
        assert_eq!(book.active().unwrap().name, "late");

        let plan = book.project_active(&RetirementPolicy::default()).unwrap().unwrap();
        assert_eq!(plan.scenario, "late");
        assert_eq!(plan.years_to_retirement, 25);
    }

    #[test]
    fn test_add_replaces_same_name() {
        let mut book = ScenarioBook::new();
        book.add(scenario("base", 60));
        book.add(scenario("base", 62));
        assert_eq!(book.len(), 1);
        assert_eq!(book.get("base").unwrap().retirement_age, 62);
    }

    #[test]
    fn test_remove_adjusts_active() {
        let mut book = ScenarioBook::new();
        book.add(scenario("a", 55));
        book.add(scenario("b", 60));
        book.add(scenario("c", 65));
        book.select("c");

        book.remove("a");
        assert_eq!(book.active().unwrap().name, "c");

        book.remove("c");
        assert_eq!(book.active().unwrap().name, "b");

        book.remove("b");
        assert!(book.active().is_none());
        assert!(book.remove("b").is_none());
    }

    #[test]
    fn test_invalid_active_scenario_reports_error() {
        let mut book = ScenarioBook::new();
        book.add(scenario("broken", 30));
        let result = book.project_active(&RetirementPolicy::default()).unwrap();
        assert!(result.is_err());
    }
}
