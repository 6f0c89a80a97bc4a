//! Retirement corpus projection and scenario management

mod book;
mod projector;
mod scenario;

pub use book::ScenarioBook;
pub use projector::{
    project, GapStatus, RetirementPlan, RetirementPolicy, RetirementProjector,
    DEFAULT_YEARS_OF_EXPENSES,
};
pub use scenario::RetirementScenario;
