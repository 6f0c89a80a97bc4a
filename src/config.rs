//! Calculator settings
//!
//! Settings are an explicit value passed to whatever needs them. They are
//! read from an optional JSON file, then overridden by environment
//! variables:
//!   FINPROJ_CURRENCY, FINPROJ_TAX_TABLE, FINPROJ_YEARS_OF_EXPENSES,
//!   FINPROJ_POLL_SECS, FINPROJ_COMPOUNDING

use std::env;
use std::path::Path;
use std::time::Duration;

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::error::{positive, CalcError, LoadError};
use crate::format::Currency;
use crate::projection::CompoundingFrequency;
use crate::retirement::{RetirementPolicy, DEFAULT_YEARS_OF_EXPENSES};
use crate::tax::{TaxTable, INDIA_2024_NEW_REGIME};

/// Default settings file looked up by the CLI
pub const DEFAULT_SETTINGS_PATH: &str = "finproj.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Currency used for display
    #[serde(default)]
    pub currency: Currency,

    /// Frequency used by the lump-sum calculator when none is given
    #[serde(default = "default_compounding")]
    pub default_compounding: CompoundingFrequency,

    /// Built-in tax table used when none is given
    #[serde(default = "default_tax_table")]
    pub tax_table: String,

    /// Required corpus = annual expenses * this
    #[serde(default = "default_years_of_expenses")]
    pub years_of_expenses: f64,

    /// Price refresh interval in seconds
    #[serde(default = "default_poll_secs")]
    pub price_poll_secs: u64,
}

fn default_compounding() -> CompoundingFrequency { CompoundingFrequency::Annually }
fn default_tax_table() -> String { INDIA_2024_NEW_REGIME.to_string() }
fn default_years_of_expenses() -> f64 { DEFAULT_YEARS_OF_EXPENSES }
fn default_poll_secs() -> u64 { 30 }

impl Default for Settings {
    fn default() -> Self {
        Self {
            currency: Currency::default(),
            default_compounding: default_compounding(),
            tax_table: default_tax_table(),
            years_of_expenses: default_years_of_expenses(),
            price_poll_secs: default_poll_secs(),
        }
    }
}

impl Settings {
    /// Parse settings from JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self, LoadError> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Reject values the calculators and the price monitor cannot run with
    pub fn validate(&self) -> Result<(), CalcError> {
        positive("years_of_expenses", self.years_of_expenses)?;
        if self.price_poll_secs == 0 {
            return Err(CalcError::InvalidInput {
                field: "price_poll_secs",
                value: 0.0,
                reason: "must be greater than zero",
            });
        }
        Ok(())
    }

    /// Load from a JSON file
    pub fn from_path(path: &Path) -> Result<Self, LoadError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Load from `path` if it exists (defaults otherwise), then apply the environment
    pub fn load(path: &Path) -> Result<Self, LoadError> {
        let mut settings = if path.exists() {
            debug!("loading settings from {}", path.display());
            Self::from_path(path)?
        } else {
            Self::default()
        };
        settings.apply_overrides(|key| env::var(key).ok());
        Ok(settings)
    }

    /// Apply `FINPROJ_*` overrides from `lookup`; unparseable values are ignored with a warning
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup("FINPROJ_CURRENCY") {
            match value.parse() {
                Ok(currency) => self.currency = currency,
                Err(e) => warn!("ignoring FINPROJ_CURRENCY: {}", e),
            }
        }
        if let Some(value) = lookup("FINPROJ_TAX_TABLE") {
            self.tax_table = value;
        }
        if let Some(value) = lookup("FINPROJ_YEARS_OF_EXPENSES") {
            match value.parse::<f64>() {
                Ok(years) if years > 0.0 => self.years_of_expenses = years,
                _ => warn!("ignoring FINPROJ_YEARS_OF_EXPENSES={}", value),
            }
        }
        if let Some(value) = lookup("FINPROJ_POLL_SECS") {
            match value.parse::<u64>() {
                Ok(secs) if secs > 0 => self.price_poll_secs = secs,
                _ => warn!("ignoring FINPROJ_POLL_SECS={}", value),
            }
        }
        if let Some(value) = lookup("FINPROJ_COMPOUNDING") {
            match value.parse::<u32>().ok().and_then(CompoundingFrequency::from_periods) {
                Some(freq) => self.default_compounding = freq,
                None => warn!("ignoring FINPROJ_COMPOUNDING={} (expected 1, 2, 4 or 12)", value),
            }
        }
    }

    pub fn retirement_policy(&self) -> Result<RetirementPolicy, CalcError> {
        RetirementPolicy::new(self.years_of_expenses)
    }

    /// The configured built-in tax table, if the name is known
    pub fn tax_table(&self) -> Option<TaxTable> {
        TaxTable::preset(&self.tax_table)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.price_poll_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults_from_empty_json() {
        let settings = Settings::from_json("{}").unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.currency, Currency::Inr);
        assert_eq!(settings.years_of_expenses, 25.0);
        assert!(settings.tax_table().is_some());
    }

    #[test]
    fn test_partial_json() {
        let settings = Settings::from_json(
            r#"{"currency":"USD","tax_table":"us-2024-single","default_compounding":"monthly"}"#,
        )
        .unwrap();
        assert_eq!(settings.currency, Currency::Usd);
        assert_eq!(settings.default_compounding, CompoundingFrequency::Monthly);
        assert_eq!(settings.tax_table().unwrap().standard_deduction, 14_600.0);
        assert_eq!(settings.price_poll_secs, 30);
    }

    #[test]
    fn test_rejects_zero_poll_interval() {
        let err = Settings::from_json(r#"{"price_poll_secs":0}"#).unwrap_err();
        assert!(matches!(
            err,
            LoadError::Calc(CalcError::InvalidInput { field: "price_poll_secs", .. })
        ));
        assert!(Settings::from_json(r#"{"years_of_expenses":-5}"#).is_err());
        assert!(Settings::default().validate().is_ok());
    }

    #[test]
    fn test_bad_json() {
        assert!(matches!(Settings::from_json("{"), Err(LoadError::Json(_))));
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            ("FINPROJ_CURRENCY", "gbp"),
            ("FINPROJ_YEARS_OF_EXPENSES", "30"),
            ("FINPROJ_POLL_SECS", "0"),
            ("FINPROJ_COMPOUNDING", "4"),
        ]
        .into_iter()
        .collect();

        let mut settings = Settings::default();
        settings.apply_overrides(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(settings.currency, Currency::Gbp);
        assert_eq!(settings.years_of_expenses, 30.0);
        assert_eq!(settings.default_compounding, CompoundingFrequency::Quarterly);
        // Zero poll interval is rejected
        assert_eq!(settings.price_poll_secs, 30);
        assert_eq!(settings.retirement_policy().unwrap().years_of_expenses, 30.0);
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let settings = Settings::load(Path::new("does/not/exist.json")).unwrap();
        assert_eq!(settings.tax_table, INDIA_2024_NEW_REGIME);
    }
}
