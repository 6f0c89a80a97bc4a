//! Progressive income tax: brackets, deductions and built-in tables

mod brackets;
mod deduction;
mod table;
pub mod loader;

pub use brackets::{BracketSlice, BracketTable, TaxBracket, TaxComputation};
pub use deduction::{resolve_deduction, Deduction, DeductionKind};
pub use table::{effective_rate, TaxReport, TaxTable, INDIA_2024_NEW_REGIME, US_2024_SINGLE};
pub use loader::{load_brackets, load_brackets_from_reader};
