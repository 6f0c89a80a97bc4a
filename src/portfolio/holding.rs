//! Individual holdings and their valuation

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{non_negative, positive, CalcError, CalcResult};

/// Kind of asset held
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetKind {
    Stock,
    MutualFund,
    Etf,
    Bond,
    Crypto,
    Cash,
}

impl AssetKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssetKind::Stock => "stock",
            AssetKind::MutualFund => "mutual_fund",
            AssetKind::Etf => "etf",
            AssetKind::Bond => "bond",
            AssetKind::Crypto => "crypto",
            AssetKind::Cash => "cash",
        }
    }
}

/// A position in one symbol
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Holding {
    pub symbol: String,
    pub kind: AssetKind,
    pub quantity: f64,

    /// Weighted average purchase price
    pub average_price: f64,

    /// Latest known market price
    pub current_price: f64,

    /// When `current_price` was last refreshed from a price source
    #[serde(default)]
    pub last_priced: Option<DateTime<Utc>>,
}

/// Derived values for one holding
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HoldingValuation {
    pub symbol: String,
    pub kind: AssetKind,
    pub current_value: f64,
    pub cost_basis: f64,
    pub gain_loss: f64,
    pub gain_loss_percent: Option<f64>,
}

impl Holding {
    /// Create a holding; the current price starts at the average price until quoted
    pub fn new(symbol: impl Into<String>, kind: AssetKind, quantity: f64, average_price: f64) -> CalcResult<Self> {
        positive("quantity", quantity)?;
        non_negative("average_price", average_price)?;
        Ok(Self {
            symbol: symbol.into(),
            kind,
            quantity,
            average_price,
            current_price: average_price,
            last_priced: None,
        })
    }

    pub fn with_current_price(mut self, price: f64) -> CalcResult<Self> {
        non_negative("current_price", price)?;
        self.current_price = price;
        Ok(self)
    }

    /// Merge another lot of the same symbol into this one
    ///
    /// Quantities add, the average price is re-weighted by cost, and the
    /// newer lot's market price and quote time win.
    pub fn absorb(&mut self, other: Holding) -> CalcResult<()> {
        if other.kind != self.kind {
            return Err(CalcError::KindMismatch {
                symbol: self.symbol.clone(),
                held: self.kind,
                given: other.kind,
            });
        }

        let quantity = self.quantity + other.quantity;
        self.average_price = (self.cost_basis() + other.cost_basis()) / quantity;
        self.quantity = quantity;
        self.current_price = other.current_price;
        self.last_priced = self.last_priced.max(other.last_priced);
        Ok(())
    }

    pub fn current_value(&self) -> f64 {
        self.current_price * self.quantity
    }

    pub fn cost_basis(&self) -> f64 {
        self.average_price * self.quantity
    }

    pub fn gain_loss(&self) -> f64 {
        self.current_value() - self.cost_basis()
    }

    /// `(current - average) / average * 100`; `None` for a zero average price
    pub fn gain_loss_percent(&self) -> Option<f64> {
        if self.average_price > 0.0 {
            Some((self.current_price - self.average_price) / self.average_price * 100.0)
        } else {
            None
        }
    }

    pub fn valuation(&self) -> HoldingValuation {
        HoldingValuation {
            symbol: self.symbol.clone(),
            kind: self.kind,
            current_value: self.current_value(),
            cost_basis: self.cost_basis(),
            gain_loss: self.gain_loss(),
            gain_loss_percent: self.gain_loss_percent(),
        }
    }
}
