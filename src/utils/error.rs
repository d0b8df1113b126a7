use thiserror::Error;

#[derive(Error, Debug)]
pub enum DashboardError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("Dataset request to {url} returned HTTP {status}")]
    HttpStatusError { url: String, status: u16 },

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Failed to format the report: {0}")]
    RenderError(#[from] std::fmt::Error),

    #[error("Dataset is missing required columns: {}", .columns.join(", "))]
    MissingColumnsError { columns: Vec<String> },

    #[error("Invalid record on line {line}: {reason}")]
    InvalidRecordError { line: u64, reason: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Data,
    Configuration,
    System,
    Rendering,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ErrorSeverity {
    /// Process exit code for the CLI binaries.
    pub fn exit_code(&self) -> i32 {
        match self {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }
}

impl DashboardError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::ApiError(_) | Self::HttpStatusError { .. } => ErrorCategory::Network,
            Self::CsvError(_)
            | Self::MissingColumnsError { .. }
            | Self::InvalidRecordError { .. } => ErrorCategory::Data,
            Self::ConfigError { .. }
            | Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            Self::IoError(_) => ErrorCategory::System,
            Self::SerializationError(_) | Self::RenderError(_) => ErrorCategory::Rendering,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            // 網路錯誤通常可重試
            ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Data | ErrorCategory::Configuration | ErrorCategory::Rendering => {
                ErrorSeverity::High
            }
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            Self::ApiError(_) => {
                "Check your network connection and that the dataset URL is reachable".to_string()
            }
            Self::HttpStatusError { status, .. } if *status == 404 => {
                "The dataset URL does not exist; verify --dataset-url".to_string()
            }
            Self::HttpStatusError { .. } => {
                "The dataset server rejected the request; try again later".to_string()
            }
            Self::CsvError(_) | Self::InvalidRecordError { .. } => {
                "Make sure the dataset is a well-formed, comma separated CSV file".to_string()
            }
            Self::MissingColumnsError { .. } => format!(
                "The dataset header must contain: {}",
                crate::domain::model::REQUIRED_COLUMNS.join(", ")
            ),
            Self::IoError(_) => "Check that the file exists and is readable".to_string(),
            Self::ConfigError { .. }
            | Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. } => {
                "Review the command line flags or configuration file".to_string()
            }
            Self::SerializationError(_) | Self::RenderError(_) => {
                "Try a different output format".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Network => format!("Could not download the dataset: {}", self),
            ErrorCategory::Data => format!("The dataset could not be read: {}", self),
            ErrorCategory::Configuration => format!("Invalid configuration: {}", self),
            ErrorCategory::System => format!("System error: {}", self),
            ErrorCategory::Rendering => format!("Could not render the dashboard: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, DashboardError>;
