//! Named tax tables and full income assessments

use serde::{Deserialize, Serialize};

use super::brackets::{BracketSlice, BracketTable, TaxBracket};
use super::deduction::{resolve_deduction, Deduction};
use crate::error::{non_negative, CalcResult};

/// Identifier of the US 2024 single-filer table
pub const US_2024_SINGLE: &str = "us-2024-single";

/// Identifier of the Indian FY 2024-25 new-regime table
pub const INDIA_2024_NEW_REGIME: &str = "in-2024-new-regime";

/// A bracket table with the deduction and surcharge rules that go with it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxTable {
    pub name: String,
    pub brackets: BracketTable,
    pub standard_deduction: f64,

    /// Cess applied on top of the bracket tax, in percent
    #[serde(default)]
    pub cess_percent: f64,
}

/// Full tax assessment for one gross income
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxReport {
    pub table: String,
    pub gross_income: f64,
    pub deduction: Deduction,
    pub taxable_income: f64,

    /// Tax from the brackets alone
    pub bracket_tax: f64,

    pub cess: f64,

    /// bracket tax + cess
    pub total_tax: f64,

    /// total tax / gross income * 100; 0 when gross income is 0
    pub effective_rate_percent: f64,

    pub marginal_rate_percent: f64,

    pub slices: Vec<BracketSlice>,
}

impl TaxReport {
    pub fn take_home(&self) -> f64 {
        self.gross_income - self.total_tax
    }
}

impl TaxTable {
    pub fn new(name: impl Into<String>, brackets: BracketTable, standard_deduction: f64) -> CalcResult<Self> {
        non_negative("standard_deduction", standard_deduction)?;
        Ok(Self {
            name: name.into(),
            brackets,
            standard_deduction,
            cess_percent: 0.0,
        })
    }

    pub fn with_cess(mut self, cess_percent: f64) -> CalcResult<Self> {
        non_negative("cess_percent", cess_percent)?;
        self.cess_percent = cess_percent;
        Ok(self)
    }

    /// US federal brackets for a single filer, tax year 2024
    pub fn us_2024_single() -> Self {
        let brackets = vec![
            TaxBracket::new(0.0, Some(11_000.0), 10.0),
            TaxBracket::new(11_000.0, Some(44_725.0), 12.0),
            TaxBracket::new(44_725.0, Some(95_375.0), 22.0),
            TaxBracket::new(95_375.0, Some(182_100.0), 24.0),
            TaxBracket::new(182_100.0, Some(231_250.0), 32.0),
            TaxBracket::new(231_250.0, Some(578_125.0), 35.0),
            TaxBracket::new(578_125.0, None, 37.0),
        ];
        Self {
            name: US_2024_SINGLE.to_string(),
            brackets: BracketTable { brackets },
            standard_deduction: 14_600.0,
            cess_percent: 0.0,
        }
    }

    /// Indian new tax regime slabs, FY 2024-25, with 4% health and education cess
    pub fn india_2024_new_regime() -> Self {
        let brackets = vec![
            TaxBracket::new(0.0, Some(300_000.0), 0.0),
            TaxBracket::new(300_000.0, Some(700_000.0), 5.0),
            TaxBracket::new(700_000.0, Some(1_000_000.0), 10.0),
            TaxBracket::new(1_000_000.0, Some(1_200_000.0), 15.0),
            TaxBracket::new(1_200_000.0, Some(1_500_000.0), 20.0),
            TaxBracket::new(1_500_000.0, None, 30.0),
        ];
        Self {
            name: INDIA_2024_NEW_REGIME.to_string(),
            brackets: BracketTable { brackets },
            standard_deduction: 75_000.0,
            cess_percent: 4.0,
        }
    }

    /// Look up a built-in table by name
    pub fn preset(name: &str) -> Option<Self> {
        match name {
            US_2024_SINGLE => Some(Self::us_2024_single()),
            INDIA_2024_NEW_REGIME => Some(Self::india_2024_new_regime()),
            _ => None,
        }
    }

    pub fn preset_names() -> [&'static str; 2] {
        [US_2024_SINGLE, INDIA_2024_NEW_REGIME]
    }

    /// Assess tax on a gross income with optional itemized deductions
    pub fn assess(&self, gross_income: f64, itemized: &[f64]) -> CalcResult<TaxReport> {
        non_negative("gross_income", gross_income)?;
        for &item in itemized {
            non_negative("itemized_deduction", item)?;
        }

        let deduction = resolve_deduction(self.standard_deduction, itemized);
        let taxable_income = (gross_income - deduction.amount).max(0.0);
        let computation = self.brackets.tax_on(taxable_income);

        let cess = computation.tax * self.cess_percent / 100.0;
        let total_tax = computation.tax + cess;
        let effective_rate_percent = effective_rate(total_tax, gross_income);

        Ok(TaxReport {
            table: self.name.clone(),
            gross_income,
            deduction,
            taxable_income,
            bracket_tax: computation.tax,
            cess,
            total_tax,
            effective_rate_percent,
            marginal_rate_percent: computation.marginal_rate_percent,
            slices: computation.slices,
        })
    }
}

/// `tax / income * 100`, reported as 0 for non-positive income
pub fn effective_rate(tax: f64, gross_income: f64) -> f64 {
    if gross_income <= 0.0 {
        0.0
    } else {
        tax / gross_income * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tax::DeductionKind;
    use approx::assert_relative_eq;

    #[test]
    fn test_presets_are_valid() {
        for name in TaxTable::preset_names() {
            let table = TaxTable::preset(name).unwrap();
            let rebuilt = BracketTable::new(table.brackets.brackets().to_vec());
            assert!(rebuilt.is_ok(), "{} is malformed: {:?}", name, rebuilt.err());
        }
        assert!(TaxTable::preset("atlantis").is_none());
    }

    #[test]
    fn test_us_50k_taxable() {
        // 10% of 11,000 + 12% of 33,725 + 22% of 5,275
        let table = TaxTable::us_2024_single();
        let computation = table.brackets.tax_on(50_000.0);
        assert_relative_eq!(computation.tax, 6_307.50, epsilon = 1e-6);
        assert_eq!(computation.marginal_rate_percent, 22.0);
    }

    #[test]
    fn test_us_assessment_with_standard_deduction() {
        let table = TaxTable::us_2024_single();
        let report = table.assess(64_600.0, &[5_000.0, 3_000.0]).unwrap();

        assert_eq!(report.deduction.kind, DeductionKind::Standard);
        assert_relative_eq!(report.taxable_income, 50_000.0);
        assert_relative_eq!(report.total_tax, 6_307.50, epsilon = 1e-6);
        assert_relative_eq!(report.effective_rate_percent, 6_307.50 / 64_600.0 * 100.0, epsilon = 1e-9);
        assert_eq!(report.cess, 0.0);
        assert_relative_eq!(report.take_home(), 64_600.0 - 6_307.50, epsilon = 1e-6);
    }

    #[test]
    fn test_india_new_regime_with_cess() {
        let table = TaxTable::india_2024_new_regime();
        let report = table.assess(1_575_000.0, &[]).unwrap();

        // Taxable 15,00,000: 20,000 + 30,000 + 30,000 + 60,000
        assert_relative_eq!(report.taxable_income, 1_500_000.0);
        assert_relative_eq!(report.bracket_tax, 140_000.0, epsilon = 1e-6);
        assert_relative_eq!(report.cess, 5_600.0, epsilon = 1e-6);
        assert_relative_eq!(report.total_tax, 145_600.0, epsilon = 1e-6);
    }

    #[test]
    fn test_zero_income_has_zero_effective_rate() {
        let report = TaxTable::us_2024_single().assess(0.0, &[]).unwrap();
        assert_eq!(report.total_tax, 0.0);
        assert_eq!(report.effective_rate_percent, 0.0);
        assert_eq!(report.taxable_income, 0.0);
    }

    #[test]
    fn test_income_below_deduction() {
        let report = TaxTable::us_2024_single().assess(10_000.0, &[]).unwrap();
        assert_eq!(report.taxable_income, 0.0);
        assert_eq!(report.total_tax, 0.0);
    }

    #[test]
    fn test_rejects_negative_inputs() {
        let table = TaxTable::us_2024_single();
        assert!(table.assess(-1.0, &[]).is_err());
        assert!(table.assess(50_000.0, &[-100.0]).is_err());
    }

    #[test]
    fn test_effective_rate_guard() {
        assert_eq!(effective_rate(100.0, 0.0), 0.0);
        assert_eq!(effective_rate(100.0, -5.0), 0.0);
        assert_relative_eq!(effective_rate(100.0, 1_000.0), 10.0);
    }
}
