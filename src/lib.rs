pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod render;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::TomlConfig;

pub use adapters::{ConfiguredSource, FileSource, HttpSource};
pub use crate::core::dashboard::Dashboard;
pub use crate::core::summarizer::{correlation_matrix, counts_by_city, mean_price_by_city};
pub use domain::model::{DashboardReport, Dataset, HouseRecord};
pub use render::{JsonRenderer, OutputFormat, TextRenderer};
pub use utils::error::{DashboardError, Result};
