//! Buy and sell actions that change quantity and average price

use serde::{Deserialize, Serialize};

use super::holding::AssetKind;

/// Direction of a trade
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TradeSide {
    Buy,
    Sell,
}

/// An explicit add/remove action against a portfolio
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    pub symbol: String,

    /// Used when a buy opens a new holding
    pub kind: AssetKind,

    pub side: TradeSide,
    pub quantity: f64,
    pub price: f64,
}

impl Trade {
    pub fn buy(symbol: impl Into<String>, kind: AssetKind, quantity: f64, price: f64) -> Self {
        Self {
            symbol: symbol.into(),
            kind,
            side: TradeSide::Buy,
            quantity,
            price,
        }
    }

    pub fn sell(symbol: impl Into<String>, kind: AssetKind, quantity: f64, price: f64) -> Self {
        Self {
            symbol: symbol.into(),
            kind,
            side: TradeSide::Sell,
            quantity,
            price,
        }
    }

    pub fn notional(&self) -> f64 {
        self.quantity * self.price
    }
}
