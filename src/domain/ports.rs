use crate::domain::model::{NewScenario, Scenario};
use crate::utils::error::Result;
use async_trait::async_trait;

#[async_trait]
pub trait ScenarioStore: Send + Sync {
    /// Persist a scenario atomically and return it with its new id.
    async fn create(&self, scenario: NewScenario) -> Result<Scenario>;
    /// All scenarios, newest first.
    async fn list(&self) -> Result<Vec<Scenario>>;
    async fn get(&self, id: i64) -> Result<Option<Scenario>>;
}

#[async_trait]
pub trait PdfRenderer: Send + Sync {
    async fn render_html_to_pdf(&self, html: &str) -> Result<Vec<u8>>;
}
