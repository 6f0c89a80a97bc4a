//! Error types shared by the calculators, loaders and price sources

use thiserror::Error;

use crate::portfolio::AssetKind;

/// Errors raised by the pure calculators
///
/// Every variant is recoverable: callers are expected to surface it as a
/// form-validation message and keep going.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CalcError {
    /// A rate, period or amount is outside its allowed range
    #[error("invalid {field}: {reason} (got {value})")]
    InvalidInput {
        field: &'static str,
        value: f64,
        reason: &'static str,
    },

    /// A growth factor or result is too large to represent
    #[error("{0} overflows: inputs are too large to project")]
    Overflow(&'static str),

    /// A bracket table is empty, unordered, overlapping or has gaps
    #[error("invalid tax bracket table: {0}")]
    InvalidBrackets(String),

    /// A trade referenced a symbol that is not held
    #[error("no holding for symbol {0}")]
    UnknownHolding(String),

    /// A trade or merged row names a different asset kind than the holding
    #[error("{symbol} is held as {held:?}, not {given:?}")]
    KindMismatch {
        symbol: String,
        held: AssetKind,
        given: AssetKind,
    },

    /// A sell order exceeds the quantity held
    #[error("cannot sell {requested} units of {symbol}: only {held} held")]
    InsufficientQuantity {
        symbol: String,
        requested: f64,
        held: f64,
    },
}

/// Errors raised while loading CSV or JSON inputs
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A field parsed but holds a value the model does not accept
    #[error("row {row}: {message}")]
    Row { row: usize, message: String },

    #[error(transparent)]
    Calc(#[from] CalcError),
}

/// Errors raised by a [`crate::portfolio::PriceSource`]
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PriceError {
    #[error("no quote available for {0}")]
    NotQuoted(String),

    #[error("quote for {symbol} is not a usable price: {price}")]
    BadQuote { symbol: String, price: f64 },

    #[error("price source unavailable: {0}")]
    Unavailable(String),
}

pub type CalcResult<T> = Result<T, CalcError>;

/// Reject non-finite values and values below zero
pub(crate) fn non_negative(field: &'static str, value: f64) -> CalcResult<f64> {
    if !value.is_finite() {
        return Err(CalcError::InvalidInput { field, value, reason: "must be a finite number" });
    }
    if value < 0.0 {
        return Err(CalcError::InvalidInput { field, value, reason: "must not be negative" });
    }
    Ok(value)
}

/// Reject non-finite values and values at or below zero
pub(crate) fn positive(field: &'static str, value: f64) -> CalcResult<f64> {
    non_negative(field, value)?;
    if value == 0.0 {
        return Err(CalcError::InvalidInput { field, value, reason: "must be greater than zero" });
    }
    Ok(value)
}

/// Reject results that overflowed to infinity or NaN
pub(crate) fn finite(what: &'static str, value: f64) -> CalcResult<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(CalcError::Overflow(what))
    }
}

/// Reject a zero-length term
pub(crate) fn positive_years(years: u32) -> CalcResult<u32> {
    if years == 0 {
        return Err(CalcError::InvalidInput {
            field: "period_years",
            value: 0.0,
            reason: "must be at least one year",
        });
    }
    Ok(years)
}
