use crate::config::{
    DEFAULT_DATASET_URL, DEFAULT_HISTOGRAM_BINS, DEFAULT_PREVIEW_ROWS, MAX_HISTOGRAM_BINS,
};
use crate::core::ConfigProvider;
use crate::render::text::{DEFAULT_BAR_WIDTH, MAX_BAR_WIDTH};
use crate::render::OutputFormat;
use crate::utils::error::Result;
use crate::utils::validation::{
    validate_file_extension, validate_path, validate_range, validate_url, Validate,
};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "house-dashboard")]
#[command(about = "Descriptive statistics dashboard for house prices")]
pub struct CliConfig {
    #[arg(long, default_value = DEFAULT_DATASET_URL)]
    pub dataset_url: String,

    #[arg(long, help = "Read the dataset from a local CSV file instead of the URL")]
    pub dataset_file: Option<String>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    #[arg(long, default_value_t = DEFAULT_PREVIEW_ROWS)]
    pub preview_rows: usize,

    #[arg(long, default_value_t = DEFAULT_HISTOGRAM_BINS)]
    pub histogram_bins: usize,

    #[arg(long, default_value_t = DEFAULT_BAR_WIDTH)]
    pub bar_width: usize,

    #[arg(long, help = "Compact single-line JSON output")]
    pub compact: bool,

    #[arg(long, help = "Request timeout in seconds (no timeout by default)")]
    pub timeout_secs: Option<u64>,

    #[arg(long, help = "Log CPU and memory usage per phase")]
    pub monitor: bool,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        match &self.dataset_file {
            Some(path) => {
                validate_path("dataset_file", path)?;
                validate_file_extension("dataset_file", path, &["csv"])?;
            }
            None => validate_url("dataset_url", &self.dataset_url)?,
        }
        validate_range("histogram_bins", self.histogram_bins, 1, MAX_HISTOGRAM_BINS)?;
        validate_range("bar_width", self.bar_width, 1, MAX_BAR_WIDTH)?;
        if let Some(timeout) = self.timeout_secs {
            validate_range("timeout_secs", timeout, 1, 3600)?;
        }
        Ok(())
    }
}

impl ConfigProvider for CliConfig {
    fn dataset_url(&self) -> &str {
        &self.dataset_url
    }

    fn dataset_file(&self) -> Option<&str> {
        self.dataset_file.as_deref()
    }

    fn request_timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    fn preview_rows(&self) -> usize {
        self.preview_rows
    }

    fn histogram_bins(&self) -> usize {
        self.histogram_bins
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CliConfig::parse_from(["house-dashboard"]);
        assert_eq!(config.dataset_url, DEFAULT_DATASET_URL);
        assert_eq!(config.format, OutputFormat::Text);
        assert_eq!(config.preview_rows, 10);
        assert_eq!(config.histogram_bins, 10);
        assert!(config.request_timeout().is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_flags() {
        let config = CliConfig::parse_from([
            "house-dashboard",
            "--dataset-file",
            "house.csv",
            "--format",
            "json",
            "--histogram-bins",
            "20",
            "--timeout-secs",
            "30",
        ]);
        assert_eq!(config.dataset_file(), Some("house.csv"));
        assert_eq!(config.format, OutputFormat::Json);
        assert_eq!(config.request_timeout(), Some(Duration::from_secs(30)));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation_failures() {
        let config = CliConfig::parse_from(["house-dashboard", "--dataset-url", "ftp://x/y.csv"]);
        assert!(config.validate().is_err());

        let config = CliConfig::parse_from(["house-dashboard", "--histogram-bins", "0"]);
        assert!(config.validate().is_err());

        let config = CliConfig::parse_from(["house-dashboard", "--dataset-file", "house.xlsx"]);
        assert!(config.validate().is_err());
    }
}
