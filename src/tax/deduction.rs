//! Standard vs itemized deduction resolution

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeductionKind {
    Standard,
    Itemized,
}

/// The deduction that applies after comparing both options
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Deduction {
    pub kind: DeductionKind,
    pub amount: f64,
}

/// `max(standard, sum(itemized))`
///
/// Itemizing only wins when it strictly exceeds the standard deduction.
pub fn resolve_deduction(standard: f64, itemized: &[f64]) -> Deduction {
    let itemized_total: f64 = itemized.iter().sum();

    if itemized_total > standard {
        Deduction {
            kind: DeductionKind::Itemized,
            amount: itemized_total,
        }
    } else {
        Deduction {
            kind: DeductionKind::Standard,
            amount: standard,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_wins_when_larger() {
        let deduction = resolve_deduction(14_600.0, &[5_000.0, 3_000.0]);
        assert_eq!(deduction.amount, 14_600.0);
        assert_eq!(deduction.kind, DeductionKind::Standard);
    }

    #[test]
    fn test_itemized_wins_when_larger() {
        let deduction = resolve_deduction(14_600.0, &[12_000.0, 4_000.0]);
        assert_eq!(deduction.amount, 16_000.0);
        assert_eq!(deduction.kind, DeductionKind::Itemized);
    }

    #[test]
    fn test_tie_and_empty() {
        assert_eq!(resolve_deduction(10_000.0, &[10_000.0]).kind, DeductionKind::Standard);
        assert_eq!(resolve_deduction(10_000.0, &[]).amount, 10_000.0);
    }
}
