//! Load bracket tables from CSV
//!
//! Expected columns: `min,max,rate`. An empty `max` marks the unbounded
//! top bracket.

use std::path::Path;

use csv::Reader;
use log::debug;

use super::brackets::{BracketTable, TaxBracket};
use super::table::TaxTable;
use crate::error::LoadError;

/// Default directory holding bracket CSV files
pub const DEFAULT_TAX_TABLE_PATH: &str = "data/tax";

/// Raw CSV row
#[derive(Debug, serde::Deserialize)]
struct CsvRow {
    min: f64,
    max: Option<f64>,
    rate: f64,
}

impl From<CsvRow> for TaxBracket {
    fn from(row: CsvRow) -> Self {
        TaxBracket::new(row.min, row.max, row.rate)
    }
}

/// Load and validate a bracket table from a CSV file
pub fn load_brackets<P: AsRef<Path>>(path: P) -> Result<BracketTable, LoadError> {
    let path = path.as_ref();
    debug!("loading tax brackets from {}", path.display());
    let reader = Reader::from_path(path)?;
    read_brackets(reader)
}

/// Load and validate a bracket table from any reader
pub fn load_brackets_from_reader<R: std::io::Read>(reader: R) -> Result<BracketTable, LoadError> {
    read_brackets(Reader::from_reader(reader))
}

fn read_brackets<R: std::io::Read>(mut reader: Reader<R>) -> Result<BracketTable, LoadError> {
    let mut brackets = Vec::new();
    for result in reader.deserialize() {
        let row: CsvRow = result?;
        brackets.push(TaxBracket::from(row));
    }

    Ok(BracketTable::new(brackets)?)
}

/// Load `<dir>/<name>.csv` as a named table with the given deduction and cess
pub fn load_table(
    dir: &Path,
    name: &str,
    standard_deduction: f64,
    cess_percent: f64,
) -> Result<TaxTable, LoadError> {
    let brackets = load_brackets(dir.join(format!("{}.csv", name)))?;
    Ok(TaxTable::new(name, brackets, standard_deduction)?.with_cess(cess_percent)?)
}
