pub mod toml_config;

pub use toml_config::{RendererKind, TomlConfig};

#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use std::path::PathBuf;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "roi-simulator")]
#[command(about = "Invoice automation ROI simulator with scenario storage and PDF reports")]
pub struct CliConfig {
    #[arg(long, env = "ROI_CONFIG", help = "Path to a TOML configuration file")]
    pub config: Option<PathBuf>,

    #[arg(long, env = "ROI_BIND", help = "Address to listen on, e.g. 127.0.0.1:5000")]
    pub bind: Option<String>,

    #[arg(long, env = "ROI_DATABASE", help = "SQLite database file")]
    pub database: Option<String>,

    #[arg(long, help = "PDF renderer: gotenberg or chromium")]
    pub renderer: Option<String>,

    #[arg(long, env = "ROI_RENDERER_ENDPOINT", help = "Base URL of the rendering service")]
    pub renderer_endpoint: Option<String>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub json_logs: bool,
}

#[cfg(feature = "cli")]
impl CliConfig {
    /// Load the file configuration (or defaults) and apply command line
    /// overrides on top.
    pub fn resolve(&self) -> Result<TomlConfig> {
        let mut config = match &self.config {
            Some(path) => TomlConfig::from_file(path)?,
            None => TomlConfig::default(),
        };

        if let Some(bind) = &self.bind {
            config.server.bind = bind.clone();
        }
        if let Some(database) = &self.database {
            config.database.path = database.clone();
        }
        if let Some(renderer) = &self.renderer {
            config.renderer.kind = renderer.clone();
        }
        if let Some(endpoint) = &self.renderer_endpoint {
            config.renderer.endpoint = endpoint.clone();
        }
        config.logging.verbose |= self.verbose;
        config.logging.json |= self.json_logs;

        Ok(config)
    }
}
