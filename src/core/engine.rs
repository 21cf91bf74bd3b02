use crate::core::calculator::calculate_roi;
use crate::core::inputs::SaveRequest;
use crate::core::report::{render_report_html, PaperSize, ReportRequest};
use crate::core::{NewScenario, PdfRenderer, RoiResult, Scenario, ScenarioInputs, ScenarioStore};
use crate::utils::error::{Result, RoiError};
use chrono::Utc;
use serde_json::Value;

/// Ties the calculator, scenario store and PDF renderer together.
///
/// Constructed once at startup and shared behind an `Arc`; it holds no
/// mutable state of its own.
pub struct RoiEngine<S: ScenarioStore, R: PdfRenderer> {
    store: S,
    renderer: R,
    paper: PaperSize,
}

impl<S: ScenarioStore, R: PdfRenderer> RoiEngine<S, R> {
    pub fn new(store: S, renderer: R) -> Self {
        Self {
            store,
            renderer,
            paper: PaperSize::default(),
        }
    }

    pub fn with_paper_size(mut self, paper: PaperSize) -> Self {
        self.paper = paper;
        self
    }

    pub fn simulate(&self, body: &Value) -> Result<RoiResult> {
        let inputs = ScenarioInputs::from_json(body)?;
        let result = calculate_roi(&inputs);
        tracing::debug!(
            "Simulated ROI: monthly_savings={} roi_percentage={}",
            result.monthly_savings,
            result.roi_percentage
        );
        Ok(result)
    }

    pub async fn save_scenario(&self, body: &Value) -> Result<Scenario> {
        let request = SaveRequest::from_json(body)?;
        let results = match request.results {
            Some(results) => results,
            None => {
                tracing::debug!("No results supplied, computing them from inputs");
                calculate_roi(&request.inputs).into()
            }
        };

        let new_scenario = NewScenario::new(request.inputs, results);
        tracing::info!("Saving scenario '{}'", new_scenario.scenario_name);

        match self.store.create(new_scenario).await {
            Ok(scenario) => {
                tracing::info!("Scenario {} saved", scenario.id);
                Ok(scenario)
            }
            Err(e) => {
                tracing::error!("Failed to save scenario: {}", e);
                Err(e)
            }
        }
    }

    pub async fn list_scenarios(&self) -> Result<Vec<Scenario>> {
        self.store.list().await
    }

    pub async fn get_scenario(&self, id: i64) -> Result<Scenario> {
        self.store
            .get(id)
            .await?
            .ok_or(RoiError::NotFound { id })
    }

    pub async fn generate_report(&self, body: &Value) -> Result<Vec<u8>> {
        let request = ReportRequest::from_json(body)?;
        tracing::info!("Report generated for: {}", request.email);

        let html = render_report_html(&request, self.paper, Utc::now())?;
        let pdf = self.renderer.render_html_to_pdf(&html).await?;
        tracing::debug!("Rendered report PDF ({} bytes)", pdf.len());
        Ok(pdf)
    }
}
