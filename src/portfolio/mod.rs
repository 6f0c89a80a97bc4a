//! Holdings, valuation, trades and price refresh

mod holding;
mod price;
mod summary;
mod trade;
pub mod loader;
pub mod monitor;

pub use holding::{AssetKind, Holding, HoldingValuation};
pub use price::{CsvPriceFeed, PriceSource, StaticPrices};
pub use summary::{AllocationSlice, PortfolioSummary};
pub use trade::{Trade, TradeSide};

use chrono::{DateTime, Utc};
use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::error::{positive, CalcError, CalcResult, PriceError};

/// Quantities below this are treated as a closed position
const QUANTITY_EPSILON: f64 = 1e-9;

/// Outcome of one price refresh
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RefreshReport {
    pub updated: Vec<String>,
    pub failed: Vec<(String, PriceError)>,
}

impl RefreshReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// A set of holdings, at most one per symbol
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Portfolio {
    holdings: Vec<Holding>,
}

impl Portfolio {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from holdings, merging rows that repeat a symbol
    pub fn from_holdings(holdings: Vec<Holding>) -> CalcResult<Self> {
        let mut portfolio = Self::new();
        for holding in holdings {
            match portfolio.position(&holding.symbol) {
                Some(idx) => portfolio.holdings[idx].absorb(holding)?,
                None => portfolio.holdings.push(holding),
            }
        }
        Ok(portfolio)
    }

    pub fn holdings(&self) -> &[Holding] {
        &self.holdings
    }

    pub fn get(&self, symbol: &str) -> Option<&Holding> {
        self.position(symbol).map(|idx| &self.holdings[idx])
    }

    pub fn symbols(&self) -> Vec<String> {
        self.holdings.iter().map(|h| h.symbol.clone()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.holdings.is_empty()
    }

    /// Apply a buy or sell
    ///
    /// Buys re-weight the average price; sells leave it unchanged and close
    /// the holding when the quantity reaches zero. The trade's kind must
    /// match an existing holding's. Returns the realised gain
    /// of a sell (0 for buys).
    pub fn apply(&mut self, trade: &Trade) -> CalcResult<f64> {
        positive("quantity", trade.quantity)?;
        positive("price", trade.price)?;
        if let Some(held) = self.get(&trade.symbol) {
            if held.kind != trade.kind {
                return Err(CalcError::KindMismatch {
                    symbol: trade.symbol.clone(),
                    held: held.kind,
                    given: trade.kind,
                });
            }
        }

        match trade.side {
            TradeSide::Buy => {
                match self.position(&trade.symbol) {
                    Some(idx) => {
                        let holding = &mut self.holdings[idx];
                        let quantity = holding.quantity + trade.quantity;
                        holding.average_price =
                            (holding.cost_basis() + trade.notional()) / quantity;
                        holding.quantity = quantity;
                    }
                    None => {
                        let holding = Holding::new(trade.symbol.clone(), trade.kind, trade.quantity, trade.price)?;
                        self.holdings.push(holding);
                    }
                }
                Ok(0.0)
            }
            TradeSide::Sell => {
                let idx = self
                    .position(&trade.symbol)
                    .ok_or_else(|| CalcError::UnknownHolding(trade.symbol.clone()))?;
                let holding = &mut self.holdings[idx];

                if trade.quantity > holding.quantity + QUANTITY_EPSILON {
                    return Err(CalcError::InsufficientQuantity {
                        symbol: trade.symbol.clone(),
                        requested: trade.quantity,
                        held: holding.quantity,
                    });
                }

                let realised = (trade.price - holding.average_price) * trade.quantity;
                holding.quantity -= trade.quantity;
                if holding.quantity <= QUANTITY_EPSILON {
                    self.holdings.remove(idx);
                }
                Ok(realised)
            }
        }
    }

    /// Pull fresh prices for every holding
    ///
    /// Failed quotes keep the previous price and are listed in the report.
    pub fn refresh_prices(&mut self, source: &dyn PriceSource, now: DateTime<Utc>) -> RefreshReport {
        let quotes = source.quotes(&self.symbols());
        let mut report = RefreshReport::default();

        for holding in &mut self.holdings {
            match quotes.get(&holding.symbol) {
                Some(Ok(price)) => {
                    holding.current_price = *price;
                    holding.last_priced = Some(now);
                    report.updated.push(holding.symbol.clone());
                }
                Some(Err(e)) => {
                    warn!("{}: keeping stale price for {}: {}", source.name(), holding.symbol, e);
                    report.failed.push((holding.symbol.clone(), e.clone()));
                }
                None => {
                    let e = PriceError::NotQuoted(holding.symbol.clone());
                    warn!("{}: {}", source.name(), e);
                    report.failed.push((holding.symbol.clone(), e));
                }
            }
        }

        info!(
            "refreshed {} of {} holdings from {}",
            report.updated.len(),
            self.holdings.len(),
            source.name()
        );
        report
    }

    pub fn summary(&self) -> PortfolioSummary {
        PortfolioSummary::from_holdings(&self.holdings)
    }

    fn position(&self, symbol: &str) -> Option<usize> {
        self.holdings.iter().position(|h| h.symbol == symbol)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::TimeZone;

    fn portfolio() -> Portfolio {
        let mut p = Portfolio::new();
        p.apply(&Trade::buy("INFY", AssetKind::Stock, 10.0, 1_400.0)).unwrap();
        p.apply(&Trade::buy("BTC", AssetKind::Crypto, 0.1, 5_000_000.0)).unwrap();
        p
    }

    #[test]
    fn test_buy_reweights_average() {
        let mut p = portfolio();
        p.apply(&Trade::buy("INFY", AssetKind::Stock, 30.0, 1_600.0)).unwrap();

        let infy = p.get("INFY").unwrap();
        assert_relative_eq!(infy.quantity, 40.0);
        assert_relative_eq!(infy.average_price, (14_000.0 + 48_000.0) / 40.0);
    }

    #[test]
    fn test_sell_keeps_average_and_closes() {
        let mut p = portfolio();
        let realised = p.apply(&Trade::sell("INFY", AssetKind::Stock, 4.0, 1_500.0)).unwrap();
        assert_relative_eq!(realised, 400.0);
        assert_relative_eq!(p.get("INFY").unwrap().quantity, 6.0);
        assert_relative_eq!(p.get("INFY").unwrap().average_price, 1_400.0);

        p.apply(&Trade::sell("INFY", AssetKind::Stock, 6.0, 1_300.0)).unwrap();
        assert!(p.get("INFY").is_none());
        assert_eq!(p.holdings().len(), 1);
    }

    #[test]
    fn test_invalid_trades() {
        let mut p = portfolio();
        assert_eq!(
            p.apply(&Trade::sell("TCS", AssetKind::Stock, 1.0, 10.0)),
            Err(CalcError::UnknownHolding("TCS".to_string()))
        );
        assert!(matches!(
            p.apply(&Trade::sell("INFY", AssetKind::Stock, 11.0, 10.0)),
            Err(CalcError::InsufficientQuantity { .. })
        ));
        assert!(p.apply(&Trade::buy("INFY", AssetKind::Stock, 0.0, 10.0)).is_err());
        assert!(p.apply(&Trade::buy("INFY", AssetKind::Stock, 1.0, -10.0)).is_err());
        assert_relative_eq!(p.get("INFY").unwrap().quantity, 10.0);
    }

    #[test]
    fn test_refresh_prices() {
        let mut p = portfolio();
        let now = Utc.with_ymd_and_hms(2024, 6, 3, 9, 15, 0).unwrap();
        let source = StaticPrices::new().with("INFY", 1_520.0);

        let report = p.refresh_prices(&source, now);
        assert_eq!(report.updated, vec!["INFY".to_string()]);
        assert_eq!(report.failed.len(), 1);
        assert!(!report.is_complete());

        let infy = p.get("INFY").unwrap();
        assert_eq!(infy.current_price, 1_520.0);
        assert_eq!(infy.last_priced, Some(now));

        // Failed quote leaves the stale price in place
        let btc = p.get("BTC").unwrap();
        assert_eq!(btc.current_price, 5_000_000.0);
        assert!(btc.last_priced.is_none());
    }

    #[test]
    fn test_summary_gain_matches_holdings() {
        let mut p = portfolio();
        let source = StaticPrices::new().with("INFY", 1_520.0).with("BTC", 4_800_000.0);
        p.refresh_prices(&source, Utc::now());

        let summary = p.summary();
        let per_holding: f64 = p.holdings().iter().map(Holding::gain_loss).sum();
        assert_relative_eq!(summary.total_gain_loss, per_holding, epsilon = 1e-6);
        assert_relative_eq!(summary.total_gain_loss, 1_200.0 - 20_000.0, epsilon = 1e-6);
    }

    #[test]
    fn test_from_holdings_merges_duplicates() {
        let p = Portfolio::from_holdings(vec![
            Holding::new("ITC", AssetKind::Stock, 100.0, 400.0).unwrap(),
            Holding::new("ITC", AssetKind::Stock, 100.0, 500.0).unwrap().with_current_price(520.0).unwrap(),
        ])
        .unwrap();
        assert_eq!(p.holdings().len(), 1);

        let itc = p.get("ITC").unwrap();
        assert_relative_eq!(itc.quantity, 200.0);
        assert_relative_eq!(itc.average_price, 450.0);
        assert_eq!(itc.current_price, 520.0);
    }

    #[test]
    fn test_from_holdings_merges_zero_cost_lot() {
        // Bonus units carry no purchase price
        let p = Portfolio::from_holdings(vec![
            Holding::new("PPFAS-FLEXI", AssetKind::MutualFund, 300.0, 60.0).unwrap(),
            Holding::new("PPFAS-FLEXI", AssetKind::MutualFund, 100.0, 0.0).unwrap(),
        ])
        .unwrap();

        let fund = p.get("PPFAS-FLEXI").unwrap();
        assert_relative_eq!(fund.quantity, 400.0);
        assert_relative_eq!(fund.average_price, 45.0);
    }

    #[test]
    fn test_kind_mismatch_is_rejected() {
        let mismatch = Portfolio::from_holdings(vec![
            Holding::new("GOLD", AssetKind::Etf, 10.0, 60.0).unwrap(),
            Holding::new("GOLD", AssetKind::Bond, 10.0, 60.0).unwrap(),
        ]);
        assert!(matches!(mismatch, Err(CalcError::KindMismatch { .. })));

        let mut p = portfolio();
        assert_eq!(
            p.apply(&Trade::buy("INFY", AssetKind::Etf, 1.0, 1_500.0)),
            Err(CalcError::KindMismatch {
                symbol: "INFY".to_string(),
                held: AssetKind::Stock,
                given: AssetKind::Etf,
            })
        );
        assert!(p.apply(&Trade::sell("BTC", AssetKind::Stock, 0.05, 5_000_000.0)).is_err());
        assert_relative_eq!(p.get("INFY").unwrap().quantity, 10.0);
        assert_relative_eq!(p.get("BTC").unwrap().quantity, 0.1);
    }
}
