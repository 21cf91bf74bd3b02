use crate::core::report::PaperSize;
use crate::core::PdfRenderer;
use crate::utils::error::{Result, RoiError};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use std::time::Duration;

const CONVERT_HTML_PATH: &str = "/forms/chromium/convert/html";

/// Renders through a Gotenberg-compatible HTTP service that wraps headless
/// Chromium.
#[derive(Debug, Clone)]
pub struct GotenbergRenderer {
    client: Client,
    endpoint: String,
    timeout: Duration,
    paper: PaperSize,
}

impl GotenbergRenderer {
    pub fn new(endpoint: impl Into<String>, timeout: Duration, paper: PaperSize) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
            timeout,
            paper,
        })
    }

    fn convert_url(&self) -> String {
        format!("{}{}", self.endpoint.trim_end_matches('/'), CONVERT_HTML_PATH)
    }

    fn map_request_error(&self, e: reqwest::Error) -> RoiError {
        if e.is_timeout() {
            RoiError::RenderTimeout {
                seconds: self.timeout.as_secs(),
            }
        } else {
            RoiError::ApiError(e)
        }
    }
}

#[async_trait]
impl PdfRenderer for GotenbergRenderer {
    async fn render_html_to_pdf(&self, html: &str) -> Result<Vec<u8>> {
        let (width, height) = self.paper.dimensions_in();
        let page = Part::text(html.to_string())
            .file_name("index.html")
            .mime_str("text/html")?;
        let form = Form::new()
            .part("files", page)
            .text("paperWidth", width.to_string())
            .text("paperHeight", height.to_string())
            .text("printBackground", "true");

        let url = self.convert_url();
        tracing::debug!("Requesting PDF conversion from {}", url);

        let response = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| self.map_request_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RoiError::render(format!(
                "rendering service returned {}: {}",
                status,
                body.trim()
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| self.map_request_error(e))?;
        if bytes.is_empty() {
            return Err(RoiError::render("rendering service returned an empty document"));
        }
        Ok(bytes.to_vec())
    }
}
