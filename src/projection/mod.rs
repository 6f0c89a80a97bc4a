//! Projection calculators: SIP/annuity, lump-sum compound interest and goal planning

mod breakdown;
pub mod compound;
pub mod goal;
pub mod sip;

pub use breakdown::{CompoundingFrequency, ProjectionInput, ProjectionResult, YearlyBreakdown};
pub use goal::{Goal, GoalPlan};
