//! Price sources for refreshing holdings
//!
//! Prices always come from a [`PriceSource`]. Tests use [`StaticPrices`];
//! the CLI reads a CSV price file that an external process keeps current.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use log::debug;

use crate::error::PriceError;

/// Anything that can quote a price for a symbol
pub trait PriceSource {
    /// Latest price for one symbol
    fn quote(&self, symbol: &str) -> Result<f64, PriceError>;

    /// Latest prices for several symbols
    ///
    /// The default quotes one at a time; sources with a batch endpoint
    /// should override it.
    fn quotes(&self, symbols: &[String]) -> HashMap<String, Result<f64, PriceError>> {
        symbols
            .iter()
            .map(|s| (s.clone(), self.quote(s)))
            .collect()
    }

    fn name(&self) -> &str {
        "price source"
    }
}

fn checked(symbol: &str, price: f64) -> Result<f64, PriceError> {
    if price.is_finite() && price >= 0.0 {
        Ok(price)
    } else {
        Err(PriceError::BadQuote {
            symbol: symbol.to_string(),
            price,
        })
    }
}

/// Fixed in-memory prices
#[derive(Debug, Clone, Default)]
pub struct StaticPrices {
    prices: HashMap<String, f64>,
}

impl StaticPrices {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, symbol: impl Into<String>, price: f64) {
        self.prices.insert(symbol.into(), price);
    }

    pub fn with(mut self, symbol: impl Into<String>, price: f64) -> Self {
        self.insert(symbol, price);
        self
    }
}

impl FromIterator<(String, f64)> for StaticPrices {
    fn from_iter<I: IntoIterator<Item = (String, f64)>>(iter: I) -> Self {
        Self {
            prices: iter.into_iter().collect(),
        }
    }
}

impl PriceSource for StaticPrices {
    fn quote(&self, symbol: &str) -> Result<f64, PriceError> {
        let price = self
            .prices
            .get(symbol)
            .copied()
            .ok_or_else(|| PriceError::NotQuoted(symbol.to_string()))?;
        checked(symbol, price)
    }

    fn name(&self) -> &str {
        "static prices"
    }
}

#[derive(Debug, serde::Deserialize)]
struct PriceRow {
    symbol: String,
    price: f64,
}

/// `symbol,price` CSV file, re-read on every request
#[derive(Debug, Clone)]
pub struct CsvPriceFeed {
    path: PathBuf,
}

impl CsvPriceFeed {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<HashMap<String, f64>, PriceError> {
        let unavailable = |e: csv::Error| PriceError::Unavailable(format!("{}: {}", self.path.display(), e));

        let mut reader = csv::Reader::from_path(&self.path).map_err(unavailable)?;
        let mut prices = HashMap::new();
        for result in reader.deserialize() {
            let row: PriceRow = result.map_err(unavailable)?;
            prices.insert(row.symbol, row.price);
        }

        debug!("read {} prices from {}", prices.len(), self.path.display());
        Ok(prices)
    }
}

impl PriceSource for CsvPriceFeed {
    fn quote(&self, symbol: &str) -> Result<f64, PriceError> {
        let prices = self.read_all()?;
        let price = prices
            .get(symbol)
            .copied()
            .ok_or_else(|| PriceError::NotQuoted(symbol.to_string()))?;
        checked(symbol, price)
    }

    fn quotes(&self, symbols: &[String]) -> HashMap<String, Result<f64, PriceError>> {
        match self.read_all() {
            Ok(prices) => symbols
                .iter()
                .map(|s| {
                    let quote = match prices.get(s) {
                        Some(&price) => checked(s, price),
                        None => Err(PriceError::NotQuoted(s.clone())),
                    };
                    (s.clone(), quote)
                })
                .collect(),
            Err(e) => symbols.iter().map(|s| (s.clone(), Err(e.clone()))).collect(),
        }
    }

    fn name(&self) -> &str {
        "csv price feed"
    }
}
