//! Portfolio-level totals and allocation

use std::cmp::Ordering;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::holding::{AssetKind, Holding, HoldingValuation};

/// Share of portfolio value held in one asset kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationSlice {
    pub kind: AssetKind,
    pub value: f64,

    /// Share of total value; 0 when the portfolio is worth nothing
    pub weight_percent: f64,
}

/// Aggregated view over all holdings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioSummary {
    pub holdings: Vec<HoldingValuation>,
    pub total_value: f64,
    pub total_cost: f64,
    pub total_gain_loss: f64,

    /// `None` when the total cost basis is zero
    pub total_gain_loss_percent: Option<f64>,

    pub allocation: Vec<AllocationSlice>,
}

impl PortfolioSummary {
    pub fn from_holdings(holdings: &[Holding]) -> Self {
        let valuations: Vec<HoldingValuation> = holdings.iter().map(Holding::valuation).collect();

        let total_value: f64 = valuations.iter().map(|v| v.current_value).sum();
        let total_cost: f64 = valuations.iter().map(|v| v.cost_basis).sum();
        let total_gain_loss = total_value - total_cost;
        let total_gain_loss_percent = if total_cost > 0.0 {
            Some(total_gain_loss / total_cost * 100.0)
        } else {
            None
        };

        let mut by_kind: BTreeMap<AssetKind, f64> = BTreeMap::new();
        for v in &valuations {
            *by_kind.entry(v.kind).or_insert(0.0) += v.current_value;
        }
        let allocation = by_kind
            .into_iter()
            .map(|(kind, value)| AllocationSlice {
                kind,
                value,
                weight_percent: if total_value > 0.0 { value / total_value * 100.0 } else { 0.0 },
            })
            .collect();

        Self {
            holdings: valuations,
            total_value,
            total_cost,
            total_gain_loss,
            total_gain_loss_percent,
            allocation,
        }
    }

    /// Best and worst performers by gain/loss percent
    pub fn extremes(&self) -> Option<(&HoldingValuation, &HoldingValuation)> {
        let ranked: Vec<&HoldingValuation> = self
            .holdings
            .iter()
            .filter(|v| v.gain_loss_percent.is_some())
            .collect();

        let best = ranked.iter().max_by(|a, b| by_gain_percent(a, b))?;
        let worst = ranked.iter().min_by(|a, b| by_gain_percent(a, b))?;
        Some((*best, *worst))
    }
}

fn by_gain_percent(a: &HoldingValuation, b: &HoldingValuation) -> Ordering {
    a.gain_loss_percent
        .partial_cmp(&b.gain_loss_percent)
        .unwrap_or(Ordering::Equal)
}
