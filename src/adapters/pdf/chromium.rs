use crate::core::PdfRenderer;
use crate::utils::error::{Result, RoiError};
use async_trait::async_trait;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use url::Url;

/// Prints the report with a local headless Chromium (or Chrome) binary.
///
/// Page size comes from the document's `@page` rule. The browser process is
/// killed if it outlives the timeout.
#[derive(Debug, Clone)]
pub struct ChromiumRenderer {
    binary: PathBuf,
    timeout: Duration,
}

impl ChromiumRenderer {
    pub fn new(binary: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self {
            binary: binary.into(),
            timeout,
        }
    }
}

#[async_trait]
impl PdfRenderer for ChromiumRenderer {
    async fn render_html_to_pdf(&self, html: &str) -> Result<Vec<u8>> {
        let workdir = tempfile::tempdir()?;
        let input = workdir.path().join("report.html");
        let output = workdir.path().join("report.pdf");
        tokio::fs::write(&input, html).await?;

        let page_url = Url::from_file_path(&input)
            .map_err(|_| RoiError::render(format!("cannot address {}", input.display())))?;

        let child = Command::new(&self.binary)
            .arg("--headless")
            .arg("--disable-gpu")
            .arg("--no-sandbox")
            .arg("--no-pdf-header-footer")
            .arg(format!("--print-to-pdf={}", output.display()))
            .arg(page_url.as_str())
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                RoiError::render(format!("failed to launch {}: {}", self.binary.display(), e))
            })?;

        let finished = match tokio::time::timeout(self.timeout, child.wait_with_output()).await {
            Ok(result) => result?,
            Err(_) => {
                tracing::warn!(
                    "{} did not finish within {:?}, killed",
                    self.binary.display(),
                    self.timeout
                );
                return Err(RoiError::RenderTimeout {
                    seconds: self.timeout.as_secs(),
                });
            }
        };

        if !finished.status.success() {
            let stderr = String::from_utf8_lossy(&finished.stderr);
            return Err(RoiError::render(format!(
                "{} exited with {}: {}",
                self.binary.display(),
                finished.status,
                stderr.trim()
            )));
        }

        let pdf = tokio::fs::read(&output)
            .await
            .map_err(|e| RoiError::render(format!("browser produced no PDF: {}", e)))?;
        if pdf.is_empty() {
            return Err(RoiError::render("browser produced an empty PDF"));
        }
        Ok(pdf)
    }
}
