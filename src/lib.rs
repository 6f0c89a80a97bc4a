//! Finance Projection - calculation engine for a personal-finance dashboard
//!
//! This library provides:
//! - SIP (recurring monthly investment) projections and the required-SIP inverse
//! - Lump-sum compound interest under annual to monthly compounding
//! - Goal planning against an inflation-adjusted target
//! - Retirement corpus projection, required corpus and gap
//! - Progressive bracket tax with standard/itemized deduction resolution
//! - Portfolio valuation, trades and timer-driven price refresh
//!
//! All calculators are pure functions over values captured at call time.
//! Invalid inputs come back as [`CalcError`] rather than `NaN`.

pub mod config;
pub mod error;
pub mod format;
pub mod portfolio;
pub mod projection;
pub mod retirement;
pub mod scenario;
pub mod tax;

// Re-export commonly used types
pub use config::Settings;
pub use error::{CalcError, LoadError, PriceError};
pub use format::Currency;
pub use portfolio::{Holding, Portfolio, PortfolioSummary, PriceSource};
pub use projection::{CompoundingFrequency, ProjectionInput, ProjectionResult, YearlyBreakdown};
pub use retirement::{RetirementPlan, RetirementPolicy, RetirementScenario, ScenarioBook};
pub use scenario::Planner;
pub use tax::{TaxBracket, TaxReport, TaxTable};
