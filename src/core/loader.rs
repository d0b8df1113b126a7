use crate::domain::model::{Dataset, HouseRecord, REQUIRED_COLUMNS};
use crate::domain::ports::DatasetSource;
use crate::utils::error::{DashboardError, Result};

/// Parses CSV bytes with a header row into a [`Dataset`].
///
/// Column order does not matter and extra columns are ignored. All missing
/// required columns are reported together.
pub fn parse_dataset(bytes: &[u8]) -> Result<Dataset> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(bytes);

    let headers = reader.headers()?.clone();
    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|required| !headers.iter().any(|h| h == **required))
        .map(|c| c.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(DashboardError::MissingColumnsError { columns: missing });
    }

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row?;
        let record: HouseRecord = row.deserialize(Some(&headers))?;
        if let Err(reason) = record.check() {
            // 實際行號，含空白行與跨行欄位
            let line = row.position().map_or(0, |p| p.line());
            return Err(DashboardError::InvalidRecordError { line, reason });
        }
        records.push(record);
    }

    tracing::debug!("Parsed {} records from {} bytes", records.len(), bytes.len());
    Ok(Dataset::new(records))
}

pub struct DatasetLoader<S: DatasetSource> {
    source: S,
}

impl<S: DatasetSource> DatasetLoader<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    pub async fn load(&self) -> Result<Dataset> {
        tracing::info!("📥 Loading dataset from {}", self.source.describe());
        let bytes = self.source.fetch().await?;
        tracing::debug!("Fetched {} bytes", bytes.len());

        let dataset = parse_dataset(&bytes)?;
        if dataset.is_empty() {
            tracing::warn!("Dataset contains a header but no rows");
        }
        tracing::info!("Loaded {} records", dataset.len());
        Ok(dataset)
    }
}
