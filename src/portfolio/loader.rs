//! Load holdings from CSV
//!
//! Columns: `symbol,kind,quantity,average_price,current_price`.
//! `current_price` may be empty, in which case the average price is used
//! until the first refresh.

use std::path::Path;

use csv::Reader;
use log::debug;

use super::holding::{AssetKind, Holding};
use super::Portfolio;
use crate::error::LoadError;

#[derive(Debug, serde::Deserialize)]
struct CsvRow {
    symbol: String,
    kind: AssetKind,
    quantity: f64,
    average_price: f64,
    current_price: Option<f64>,
}

impl CsvRow {
    fn into_holding(self, row: usize) -> Result<Holding, LoadError> {
        let invalid = |e: crate::error::CalcError| LoadError::Row {
            row,
            message: format!("{}: {}", self.symbol, e),
        };

        let holding = Holding::new(self.symbol.clone(), self.kind, self.quantity, self.average_price)
            .map_err(invalid)?;
        match self.current_price {
            Some(price) => holding.with_current_price(price).map_err(invalid),
            None => Ok(holding),
        }
    }
}

/// Load holdings from a CSV file
pub fn load_holdings<P: AsRef<Path>>(path: P) -> Result<Vec<Holding>, LoadError> {
    let path = path.as_ref();
    debug!("loading holdings from {}", path.display());
    read_holdings(Reader::from_path(path)?)
}

/// Load holdings from any reader
pub fn load_holdings_from_reader<R: std::io::Read>(reader: R) -> Result<Vec<Holding>, LoadError> {
    read_holdings(Reader::from_reader(reader))
}

/// Load a CSV file straight into a [`Portfolio`]
pub fn load_portfolio<P: AsRef<Path>>(path: P) -> Result<Portfolio, LoadError> {
    Ok(Portfolio::from_holdings(load_holdings(path)?)?)
}

fn read_holdings<R: std::io::Read>(mut reader: Reader<R>) -> Result<Vec<Holding>, LoadError> {
    let mut holdings = Vec::new();
    for (i, result) in reader.deserialize().enumerate() {
        let row: CsvRow = result?;
        // Header is line 1
        holdings.push(row.into_holding(i + 2)?);
    }
    Ok(holdings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_sample_holdings() {
        let holdings = load_holdings("data/holdings_sample.csv").expect("Failed to load holdings");
        assert_eq!(holdings.len(), 5);
        assert_eq!(holdings[0].symbol, "RELIANCE");
        assert_eq!(holdings[3].kind, AssetKind::MutualFund);
        assert_eq!(holdings[4].kind, AssetKind::Crypto);
    }

    #[test]
    fn test_missing_current_price_defaults_to_average() {
        let data = "symbol,kind,quantity,average_price,current_price\nSBIN,stock,10,600,\n";
        let holdings = load_holdings_from_reader(data.as_bytes()).unwrap();
        assert_eq!(holdings[0].current_price, 600.0);
    }

    #[test]
    fn test_invalid_row_reports_line() {
        let data = "symbol,kind,quantity,average_price,current_price\nSBIN,stock,10,600,610\nTATA,stock,-3,100,90\n";
        match load_holdings_from_reader(data.as_bytes()) {
            Err(LoadError::Row { row, message }) => {
                assert_eq!(row, 3);
                assert!(message.starts_with("TATA"));
            }
            other => panic!("expected row error, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_kind_is_rejected() {
        let data = "symbol,kind,quantity,average_price,current_price\nX,nft,1,1,1\n";
        assert!(matches!(load_holdings_from_reader(data.as_bytes()), Err(LoadError::Csv(_))));
    }
}
