//! Input and output records shared by the projection calculators

use serde::{Deserialize, Serialize};

/// Number of compounding periods per year for lump-sum growth
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompoundingFrequency {
    Annually,
    SemiAnnually,
    Quarterly,
    Monthly,
}

impl CompoundingFrequency {
    /// Every supported frequency, least to most frequent
    pub const ALL: [CompoundingFrequency; 4] = [
        CompoundingFrequency::Annually,
        CompoundingFrequency::SemiAnnually,
        CompoundingFrequency::Quarterly,
        CompoundingFrequency::Monthly,
    ];

    pub fn periods_per_year(&self) -> u32 {
        match self {
            CompoundingFrequency::Annually => 1,
            CompoundingFrequency::SemiAnnually => 2,
            CompoundingFrequency::Quarterly => 4,
            CompoundingFrequency::Monthly => 12,
        }
    }

    /// Parse from a period count (1, 2, 4 or 12)
    pub fn from_periods(periods: u32) -> Option<Self> {
        match periods {
            1 => Some(CompoundingFrequency::Annually),
            2 => Some(CompoundingFrequency::SemiAnnually),
            4 => Some(CompoundingFrequency::Quarterly),
            12 => Some(CompoundingFrequency::Monthly),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CompoundingFrequency::Annually => "annually",
            CompoundingFrequency::SemiAnnually => "semi-annually",
            CompoundingFrequency::Quarterly => "quarterly",
            CompoundingFrequency::Monthly => "monthly",
        }
    }
}

impl Default for CompoundingFrequency {
    fn default() -> Self {
        CompoundingFrequency::Annually
    }
}

/// Input to a single projection call
///
/// `amount` is the monthly contribution for a SIP and the principal for a
/// lump sum. Captured by value; nothing is persisted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectionInput {
    pub amount: f64,

    /// Annual rate in percent (12.0 means 12%)
    pub annual_rate_percent: f64,

    /// Term in whole years
    pub period_years: u32,

    /// Only used by the lump-sum calculator
    #[serde(default)]
    pub compounding: Option<CompoundingFrequency>,
}

impl ProjectionInput {
    pub fn new(amount: f64, annual_rate_percent: f64, period_years: u32) -> Self {
        Self {
            amount,
            annual_rate_percent,
            period_years,
            compounding: None,
        }
    }

    pub fn with_compounding(mut self, frequency: CompoundingFrequency) -> Self {
        self.compounding = Some(frequency);
        self
    }
}

/// Value of a projection at the end of one year
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct YearlyBreakdown {
    pub year: u32,
    pub invested: f64,
    pub value: f64,
    pub gain: f64,
}

impl YearlyBreakdown {
    pub fn new(year: u32, invested: f64, value: f64) -> Self {
        Self {
            year,
            invested,
            value,
            gain: value - invested,
        }
    }
}

/// Complete projection result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionResult {
    pub total_contributed: f64,
    pub future_value: f64,
    pub total_gain: f64,
    pub yearly_breakdown: Vec<YearlyBreakdown>,
}

impl ProjectionResult {
    pub fn new(total_contributed: f64, future_value: f64) -> Self {
        Self {
            total_contributed,
            future_value,
            total_gain: future_value - total_contributed,
            yearly_breakdown: Vec::new(),
        }
    }

    /// Add a breakdown row
    pub fn add_row(&mut self, row: YearlyBreakdown) {
        self.yearly_breakdown.push(row);
    }

    /// Growth as a multiple of money put in (FV / contributed)
    pub fn wealth_multiple(&self) -> Option<f64> {
        if self.total_contributed > 0.0 {
            Some(self.future_value / self.total_contributed)
        } else {
            None
        }
    }

    pub fn final_year(&self) -> Option<&YearlyBreakdown> {
        self.yearly_breakdown.last()
    }
}
