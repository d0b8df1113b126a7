// Adapters layer: concrete dataset sources.

pub mod file;
pub mod http;

pub use file::FileSource;
pub use http::HttpSource;

use crate::domain::ports::{ConfigProvider, DatasetSource};
use crate::utils::error::Result;
use async_trait::async_trait;

/// The source selected by configuration: a local file wins over the URL.
#[derive(Debug, Clone)]
pub enum ConfiguredSource {
    Http(HttpSource),
    File(FileSource),
}

impl ConfiguredSource {
    pub fn from_config<C: ConfigProvider>(config: &C) -> Result<Self> {
        match config.dataset_file() {
            Some(path) => Ok(Self::File(FileSource::new(path))),
            None => Ok(Self::Http(HttpSource::with_timeout(
                config.dataset_url(),
                config.request_timeout(),
            )?)),
        }
    }
}

#[async_trait]
impl DatasetSource for ConfiguredSource {
    async fn fetch(&self) -> Result<Vec<u8>> {
        match self {
            Self::Http(source) => source.fetch().await,
            Self::File(source) => source.fetch().await,
        }
    }

    fn describe(&self) -> String {
        match self {
            Self::Http(source) => source.describe(),
            Self::File(source) => source.describe(),
        }
    }
}
