#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
pub use cli::CliConfig;
pub use toml_config::TomlConfig;

pub const DEFAULT_DATASET_URL: &str =
    "https://raw.githubusercontent.com/ekobw/house_price_prediction/main/data/clean_house_price.csv";
pub const DEFAULT_PREVIEW_ROWS: usize = 10;
pub const DEFAULT_HISTOGRAM_BINS: usize = 10;
pub const MAX_HISTOGRAM_BINS: usize = 100;
