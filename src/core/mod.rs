pub mod calculator;
pub mod engine;
pub mod inputs;
pub mod report;

pub use crate::domain::model::{
    NewScenario, RoiResult, Scenario, ScenarioInputs, ScenarioResults,
};
pub use crate::domain::ports::{PdfRenderer, ScenarioStore};
pub use crate::utils::error::Result;
