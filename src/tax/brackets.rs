//! Marginal tax brackets and the progressive walk over them

use serde::{Deserialize, Serialize};

use crate::error::{CalcError, CalcResult};

/// One marginal bracket: income in `[min, max)` is taxed at `rate_percent`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TaxBracket {
    pub min: f64,

    /// `None` for the top, unbounded bracket
    pub max: Option<f64>,

    pub rate_percent: f64,
}

impl TaxBracket {
    pub fn new(min: f64, max: Option<f64>, rate_percent: f64) -> Self {
        Self { min, max, rate_percent }
    }

    /// Width of the bracket; infinite for the top bracket
    pub fn width(&self) -> f64 {
        self.max.map(|max| max - self.min).unwrap_or(f64::INFINITY)
    }
}

/// Tax attributed to a single bracket
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BracketSlice {
    pub bracket: TaxBracket,
    pub taxed_amount: f64,
    pub tax: f64,
}

/// Result of applying a bracket table to a taxable income
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxComputation {
    pub taxable_income: f64,
    pub tax: f64,

    /// Rate of the highest bracket that received income (0 when nothing is taxed)
    pub marginal_rate_percent: f64,

    pub slices: Vec<BracketSlice>,
}

/// Validated, ascending, contiguous set of brackets
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<TaxBracket>", into = "Vec<TaxBracket>")]
pub struct BracketTable {
    pub(super) brackets: Vec<TaxBracket>,
}

impl BracketTable {
    /// Validate and wrap a bracket list
    ///
    /// Brackets must start at 0, be contiguous (`max[i] == min[i + 1]`),
    /// have positive width, carry rates in `[0, 100]`, and only the last
    /// one may be unbounded.
    pub fn new(brackets: Vec<TaxBracket>) -> CalcResult<Self> {
        let first = brackets
            .first()
            .ok_or_else(|| CalcError::InvalidBrackets("table is empty".to_string()))?;
        if first.min != 0.0 {
            return Err(CalcError::InvalidBrackets(format!(
                "first bracket must start at 0, starts at {}",
                first.min
            )));
        }

        let last_idx = brackets.len() - 1;
        for (i, bracket) in brackets.iter().enumerate() {
            if !bracket.rate_percent.is_finite() || !(0.0..=100.0).contains(&bracket.rate_percent) {
                return Err(CalcError::InvalidBrackets(format!(
                    "bracket {} has rate {} outside 0-100",
                    i + 1,
                    bracket.rate_percent
                )));
            }

            match bracket.max {
                Some(max) if !(max > bracket.min) || !max.is_finite() => {
                    return Err(CalcError::InvalidBrackets(format!(
                        "bracket {} has max {} not above min {}",
                        i + 1,
                        max,
                        bracket.min
                    )));
                }
                None if i != last_idx => {
                    return Err(CalcError::InvalidBrackets(format!(
                        "bracket {} is unbounded but is not the last",
                        i + 1
                    )));
                }
                _ => {}
            }

            if let Some(next) = brackets.get(i + 1) {
                if bracket.max != Some(next.min) {
                    return Err(CalcError::InvalidBrackets(format!(
                        "bracket {} ends at {:?} but bracket {} starts at {}",
                        i + 1,
                        bracket.max,
                        i + 2,
                        next.min
                    )));
                }
            }
        }

        Ok(Self { brackets })
    }

    pub fn brackets(&self) -> &[TaxBracket] {
        &self.brackets
    }

    /// Walk the brackets in ascending order, taxing each slice of income
    ///
    /// Stops once income or brackets are exhausted. Income above a bounded
    /// top bracket is left untaxed. Negative income is treated as zero.
    pub fn tax_on(&self, taxable_income: f64) -> TaxComputation {
        let taxable_income = taxable_income.max(0.0);
        let mut remaining = taxable_income;
        let mut tax = 0.0;
        let mut marginal_rate_percent = 0.0;
        let mut slices = Vec::new();

        for bracket in &self.brackets {
            if remaining <= 0.0 {
                break;
            }

            let taxed_amount = remaining.min(bracket.width());
            let slice_tax = taxed_amount * bracket.rate_percent / 100.0;

            tax += slice_tax;
            remaining -= taxed_amount;
            marginal_rate_percent = bracket.rate_percent;
            slices.push(BracketSlice {
                bracket: *bracket,
                taxed_amount,
                tax: slice_tax,
            });
        }

        TaxComputation {
            taxable_income,
            tax,
            marginal_rate_percent,
            slices,
        }
    }
}

impl TryFrom<Vec<TaxBracket>> for BracketTable {
    type Error = CalcError;

    fn try_from(brackets: Vec<TaxBracket>) -> Result<Self, Self::Error> {
        Self::new(brackets)
    }
}

impl From<BracketTable> for Vec<TaxBracket> {
    fn from(table: BracketTable) -> Self {
        table.brackets
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn simple_table() -> BracketTable {
        BracketTable::new(vec![
            TaxBracket::new(0.0, Some(10_000.0), 10.0),
            TaxBracket::new(10_000.0, Some(40_000.0), 20.0),
            TaxBracket::new(40_000.0, None, 30.0),
        ])
        .unwrap()
    }

    #[test]
    fn test_income_in_lowest_bracket() {
        let result = simple_table().tax_on(7_500.0);
        assert_relative_eq!(result.tax, 750.0);
        assert_eq!(result.slices.len(), 1);
        assert_eq!(result.marginal_rate_percent, 10.0);
    }

    #[test]
    fn test_income_spanning_all_brackets() {
        let result = simple_table().tax_on(100_000.0);
        // 1,000 + 6,000 + 18,000
        assert_relative_eq!(result.tax, 25_000.0);
        assert_eq!(result.slices.len(), 3);
        assert_eq!(result.marginal_rate_percent, 30.0);

        let sliced: f64 = result.slices.iter().map(|s| s.taxed_amount).sum();
        assert_relative_eq!(sliced, 100_000.0);
        let slice_tax: f64 = result.slices.iter().map(|s| s.tax).sum();
        assert_relative_eq!(slice_tax, result.tax);
    }

    #[test]
    fn test_zero_and_negative_income() {
        let result = simple_table().tax_on(0.0);
        assert_eq!(result.tax, 0.0);
        assert!(result.slices.is_empty());
        assert_eq!(result.marginal_rate_percent, 0.0);

        assert_eq!(simple_table().tax_on(-500.0).taxable_income, 0.0);
    }

    #[test]
    fn test_bounded_top_bracket_stops() {
        let table = BracketTable::new(vec![TaxBracket::new(0.0, Some(1_000.0), 10.0)]).unwrap();
        let result = table.tax_on(5_000.0);
        assert_relative_eq!(result.tax, 100.0);
    }

    #[test]
    fn test_rejects_malformed_tables() {
        assert!(BracketTable::new(vec![]).is_err());

        // Does not start at zero
        assert!(BracketTable::new(vec![TaxBracket::new(100.0, None, 10.0)]).is_err());

        // Gap between brackets
        assert!(BracketTable::new(vec![
            TaxBracket::new(0.0, Some(100.0), 10.0),
            TaxBracket::new(200.0, None, 20.0),
        ])
        .is_err());

        // Overlap
        assert!(BracketTable::new(vec![
            TaxBracket::new(0.0, Some(100.0), 10.0),
            TaxBracket::new(50.0, None, 20.0),
        ])
        .is_err());

        // Unbounded bracket in the middle
        assert!(BracketTable::new(vec![
            TaxBracket::new(0.0, None, 10.0),
            TaxBracket::new(100.0, None, 20.0),
        ])
        .is_err());

        // Rate out of range
        assert!(BracketTable::new(vec![TaxBracket::new(0.0, None, 120.0)]).is_err());
    }

    #[test]
    fn test_serde_validates() {
        let json = r#"[{"min":0.0,"max":100.0,"rate_percent":5.0},{"min":100.0,"max":null,"rate_percent":10.0}]"#;
        let table: BracketTable = serde_json::from_str(json).unwrap();
        assert_eq!(table.brackets().len(), 2);

        let bad = r#"[{"min":10.0,"max":null,"rate_percent":5.0}]"#;
        assert!(serde_json::from_str::<BracketTable>(bad).is_err());
    }
}
