use crate::domain::model::DashboardReport;
use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;

/// Where the raw CSV bytes come from.
#[async_trait]
pub trait DatasetSource: Send + Sync {
    async fn fetch(&self) -> Result<Vec<u8>>;

    /// Human readable location, used in logs.
    fn describe(&self) -> String;
}

pub trait ConfigProvider: Send + Sync {
    fn dataset_url(&self) -> &str;
    fn dataset_file(&self) -> Option<&str>;
    fn request_timeout(&self) -> Option<Duration>;
    fn preview_rows(&self) -> usize;
    fn histogram_bins(&self) -> usize;
}

/// Turns a finished report into its presentation.
pub trait Renderer {
    fn render(&self, report: &DashboardReport) -> Result<String>;
}
