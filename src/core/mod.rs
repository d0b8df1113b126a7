pub mod dashboard;
pub mod loader;
pub mod narrative;
pub mod summarizer;

pub use crate::domain::model::{Dataset, DashboardReport, HouseRecord};
pub use crate::domain::ports::{ConfigProvider, DatasetSource, Renderer};
pub use crate::utils::error::Result;
