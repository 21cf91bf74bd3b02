use thiserror::Error;

#[derive(Error, Debug)]
pub enum RoiError {
    #[error("Invalid value for field '{field}': {reason}")]
    ValidationError { field: String, reason: String },

    #[error("Scenario {id} not found")]
    NotFound { id: i64 },

    #[error("Database error: {0}")]
    DatabaseError(#[from] rusqlite::Error),

    #[error("Persistence error: {message}")]
    PersistenceError { message: String },

    #[error("Report rendering failed: {message}")]
    RenderError { message: String },

    #[error("Report rendering timed out after {seconds}s")]
    RenderTimeout { seconds: u64 },

    #[error("Rendering service request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Malformed JSON: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid configuration value for '{field}' ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    NotFound,
    Persistence,
    Rendering,
    Configuration,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl RoiError {
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ValidationError {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub fn render(message: impl Into<String>) -> Self {
        Self::RenderError {
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::ValidationError { .. } | Self::SerializationError(_) => ErrorCategory::Input,
            Self::NotFound { .. } => ErrorCategory::NotFound,
            Self::DatabaseError(_) | Self::PersistenceError { .. } => ErrorCategory::Persistence,
            Self::RenderError { .. } | Self::RenderTimeout { .. } | Self::ApiError(_) => {
                ErrorCategory::Rendering
            }
            Self::ConfigError { .. } | Self::InvalidConfigValueError { .. } => {
                ErrorCategory::Configuration
            }
            Self::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Input | ErrorCategory::NotFound => ErrorSeverity::Low,
            ErrorCategory::Rendering => ErrorSeverity::Medium,
            ErrorCategory::Persistence | ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::ConfigError { message } => format!("Configuration problem: {}", message),
            Self::InvalidConfigValueError { field, reason, .. } => {
                format!("Setting '{}' is invalid: {}", field, reason)
            }
            Self::DatabaseError(e) => format!("Could not use the scenario database: {}", e),
            Self::IoError(e) => format!("File system error: {}", e),
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Input => "Check the request body: numeric fields must be numbers or numeric strings",
            ErrorCategory::NotFound => "List scenarios to find a valid identifier",
            ErrorCategory::Persistence => "Check that the database path is writable and the schema is up to date",
            ErrorCategory::Rendering => "Check that the PDF rendering service is reachable or raise renderer.timeout_seconds",
            ErrorCategory::Configuration => "Fix the configuration file or command line flags and restart",
            ErrorCategory::System => "Check file permissions and available disk space",
        }
    }
}

pub type Result<T> = std::result::Result<T, RoiError>;
