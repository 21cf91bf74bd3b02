use crate::core::report::PaperSize;
use crate::utils::error::{Result, RoiError};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_BIND: &str = "127.0.0.1:5000";
pub const DEFAULT_DATABASE_PATH: &str = "roi_simulator.db";
pub const DEFAULT_RENDERER_ENDPOINT: &str = "http://localhost:3000";
pub const DEFAULT_CHROMIUM_PATH: &str = "chromium";
pub const DEFAULT_RENDER_TIMEOUT_SECS: u64 = 30;

const RENDERER_KINDS: &[&str] = &["gotenberg", "chromium"];
const PAPER_SIZES: &[&str] = &["A4", "Letter", "Legal"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RendererKind {
    Gotenberg,
    Chromium,
}

impl FromStr for RendererKind {
    type Err = RoiError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "gotenberg" => Ok(Self::Gotenberg),
            "chromium" => Ok(Self::Chromium),
            _ => Err(RoiError::InvalidConfigValueError {
                field: "renderer.kind".to_string(),
                value: s.to_string(),
                reason: format!("Expected one of: {}", RENDERER_KINDS.join(", ")),
            }),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub renderer: RendererConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: DEFAULT_BIND.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: DEFAULT_DATABASE_PATH.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RendererConfig {
    /// `gotenberg` (HTTP service) or `chromium` (local binary).
    pub kind: String,
    pub endpoint: String,
    pub chromium_path: String,
    pub timeout_seconds: u64,
    pub paper: String,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            kind: "gotenberg".to_string(),
            endpoint: DEFAULT_RENDERER_ENDPOINT.to_string(),
            chromium_path: DEFAULT_CHROMIUM_PATH.to_string(),
            timeout_seconds: DEFAULT_RENDER_TIMEOUT_SECS,
            paper: "A4".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub verbose: bool,
    pub json: bool,
}

impl TomlConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(|e| RoiError::ConfigError {
            message: format!("cannot read {}: {}", path.as_ref().display(), e),
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| RoiError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replace `${VAR}` with the environment value; unknown variables are
    /// left as written.
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| RoiError::ConfigError {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn bind_addr(&self) -> Result<SocketAddr> {
        validation::validate_socket_addr("server.bind", &self.server.bind)
    }

    pub fn renderer_kind(&self) -> Result<RendererKind> {
        self.renderer.kind.parse()
    }

    pub fn paper_size(&self) -> Result<PaperSize> {
        PaperSize::from_name(&self.renderer.paper).ok_or_else(|| {
            RoiError::InvalidConfigValueError {
                field: "renderer.paper".to_string(),
                value: self.renderer.paper.clone(),
                reason: format!("Expected one of: {}", PAPER_SIZES.join(", ")),
            }
        })
    }

    pub fn render_timeout(&self) -> Duration {
        Duration::from_secs(self.renderer.timeout_seconds)
    }

    pub fn validate_config(&self) -> Result<()> {
        self.bind_addr()?;
        validation::validate_path("database.path", &self.database.path)?;
        validation::validate_one_of("renderer.kind", &self.renderer.kind, RENDERER_KINDS)?;
        validation::validate_one_of("renderer.paper", &self.renderer.paper, PAPER_SIZES)?;
        validation::validate_positive_number(
            "renderer.timeout_seconds",
            self.renderer.timeout_seconds,
            1,
        )?;

        match self.renderer_kind()? {
            RendererKind::Gotenberg => {
                validation::validate_url("renderer.endpoint", &self.renderer.endpoint)?
            }
            RendererKind::Chromium => {
                validation::validate_path("renderer.chromium_path", &self.renderer.chromium_path)?
            }
        }

        Ok(())
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
