use crate::config::{
    DEFAULT_DATASET_URL, DEFAULT_HISTOGRAM_BINS, DEFAULT_PREVIEW_ROWS, MAX_HISTOGRAM_BINS,
};
use crate::core::ConfigProvider;
use crate::render::text::{DEFAULT_BAR_WIDTH, MAX_BAR_WIDTH};
use crate::render::OutputFormat;
use crate::utils::error::{DashboardError, Result};
use crate::utils::validation::{
    validate_file_extension, validate_non_empty_string, validate_path, validate_range,
    validate_url, Validate,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub dashboard: DashboardConfig,
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub report: ReportConfig,
    pub monitoring: Option<MonitoringConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardConfig {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    #[serde(default = "default_url")]
    pub url: String,
    pub file: Option<String>,
    pub timeout_seconds: Option<u64>,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            file: None,
            timeout_seconds: None,
        }
    }
}

fn default_url() -> String {
    DEFAULT_DATASET_URL.to_string()
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportConfig {
    pub format: Option<OutputFormat>,
    pub preview_rows: Option<usize>,
    pub histogram_bins: Option<usize>,
    pub bar_width: Option<usize>,
    pub pretty_json: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringConfig {
    pub enabled: bool,
    pub log_format: Option<String>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| DashboardError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${DATASET_URL})，未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| DashboardError::ConfigError {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn format(&self) -> OutputFormat {
        self.report.format.unwrap_or_default()
    }

    pub fn bar_width(&self) -> usize {
        self.report.bar_width.unwrap_or(DEFAULT_BAR_WIDTH)
    }

    pub fn pretty_json(&self) -> bool {
        self.report.pretty_json.unwrap_or(true)
    }

    pub fn monitoring_enabled(&self) -> bool {
        self.monitoring.as_ref().map(|m| m.enabled).unwrap_or(false)
    }

    pub fn json_logs(&self) -> bool {
        self.monitoring
            .as_ref()
            .and_then(|m| m.log_format.as_deref())
            .map(|f| f.eq_ignore_ascii_case("json"))
            .unwrap_or(false)
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("dashboard.name", &self.dashboard.name)?;

        match &self.source.file {
            Some(path) => {
                validate_path("source.file", path)?;
                validate_file_extension("source.file", path, &["csv"])?;
            }
            None => validate_url("source.url", &self.source.url)?,
        }
        if let Some(timeout) = self.source.timeout_seconds {
            validate_range("source.timeout_seconds", timeout, 1, 3600)?;
        }

        validate_range(
            "report.histogram_bins",
            self.histogram_bins(),
            1,
            MAX_HISTOGRAM_BINS,
        )?;
        validate_range("report.bar_width", self.bar_width(), 1, MAX_BAR_WIDTH)?;

        if let Some(format) = self
            .monitoring
            .as_ref()
            .and_then(|m| m.log_format.as_deref())
        {
            if !["compact", "json"].contains(&format.to_ascii_lowercase().as_str()) {
                return Err(DashboardError::InvalidConfigValueError {
                    field: "monitoring.log_format".to_string(),
                    value: format.to_string(),
                    reason: "Supported log formats: compact, json".to_string(),
                });
            }
        }

        Ok(())
    }
}

impl ConfigProvider for TomlConfig {
    fn dataset_url(&self) -> &str {
        &self.source.url
    }

    fn dataset_file(&self) -> Option<&str> {
        self.source.file.as_deref()
    }

    fn request_timeout(&self) -> Option<Duration> {
        self.source.timeout_seconds.map(Duration::from_secs)
    }

    fn preview_rows(&self) -> usize {
        self.report.preview_rows.unwrap_or(DEFAULT_PREVIEW_ROWS)
    }

    fn histogram_bins(&self) -> usize {
        self.report.histogram_bins.unwrap_or(DEFAULT_HISTOGRAM_BINS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_minimal_config_uses_defaults() {
        let toml_content = r#"
[dashboard]
name = "jabodetabek"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.dashboard.name, "jabodetabek");
        assert_eq!(config.dataset_url(), DEFAULT_DATASET_URL);
        assert_eq!(config.preview_rows(), 10);
        assert_eq!(config.histogram_bins(), 10);
        assert_eq!(config.format(), OutputFormat::Text);
        assert!(!config.monitoring_enabled());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_full_config() {
        let toml_content = r#"
[dashboard]
name = "jabodetabek"
description = "Jakarta and surroundings"

[source]
url = "https://example.com/house.csv"
timeout_seconds = 15

[report]
format = "json"
preview_rows = 5
histogram_bins = 20
pretty_json = false

[monitoring]
enabled = true
log_format = "json"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.dataset_url(), "https://example.com/house.csv");
        assert_eq!(config.request_timeout(), Some(Duration::from_secs(15)));
        assert_eq!(config.format(), OutputFormat::Json);
        assert_eq!(config.preview_rows(), 5);
        assert_eq!(config.histogram_bins(), 20);
        assert!(!config.pretty_json());
        assert!(config.monitoring_enabled());
        assert!(config.json_logs());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("TEST_HOUSE_DATASET_URL", "https://test.example.com/house.csv");

        let toml_content = r#"
[dashboard]
name = "env"

[source]
url = "${TEST_HOUSE_DATASET_URL}"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.source.url, "https://test.example.com/house.csv");

        std::env::remove_var("TEST_HOUSE_DATASET_URL");
    }

    #[test]
    fn test_config_validation() {
        let toml_content = r#"
[dashboard]
name = "bad"

[source]
url = "invalid-url"
"#;
        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert!(config.validate().is_err());

        let toml_content = r#"
[dashboard]
name = "bad"

[monitoring]
enabled = true
log_format = "xml"
"#;
        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let err = TomlConfig::from_toml_str("[dashboard\nname = 1").unwrap_err();
        assert!(matches!(err, DashboardError::ConfigValidationError { .. }));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();

        let toml_content = r#"
[dashboard]
name = "file-test"

[source]
file = "./data/clean_house_price.csv"
"#;

        temp_file.write_all(toml_content.as_bytes()).unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.dashboard.name, "file-test");
        assert_eq!(config.dataset_file(), Some("./data/clean_house_price.csv"));
        assert!(config.validate().is_ok());
    }
}
