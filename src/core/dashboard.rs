use crate::core::loader::DatasetLoader;
use crate::core::{narrative, summarizer};
use crate::domain::model::{Dataset, DashboardReport, Distribution, NumericAttribute};
use crate::domain::ports::{ConfigProvider, DatasetSource, Renderer};
use crate::utils::error::Result;
use crate::utils::monitor::SystemMonitor;

pub const DASHBOARD_TITLE: &str = "House Price Overview";

/// Runs load → summarize → render once.
pub struct Dashboard<S: DatasetSource, C: ConfigProvider> {
    loader: DatasetLoader<S>,
    config: C,
    monitor: SystemMonitor,
}

impl<S: DatasetSource, C: ConfigProvider> Dashboard<S, C> {
    pub fn new(source: S, config: C) -> Self {
        Self::new_with_monitoring(source, config, false)
    }

    pub fn new_with_monitoring(source: S, config: C, monitor_enabled: bool) -> Self {
        Self {
            loader: DatasetLoader::new(source),
            config,
            monitor: SystemMonitor::new(monitor_enabled),
        }
    }

    pub async fn build(&self) -> Result<DashboardReport> {
        tracing::info!("Starting dashboard build...");
        self.monitor.log_stats("Start");

        let dataset = self.loader.load().await?;
        self.monitor.log_stats("Load");

        let report = summarize(
            &dataset,
            self.config.preview_rows(),
            self.config.histogram_bins(),
        )?;
        self.monitor.log_stats("Summarize");

        tracing::info!(
            "Summarized {} records across {} cities",
            report.overview.row_count,
            report.overview.cities.len()
        );
        Ok(report)
    }

    pub async fn run<R: Renderer>(&self, renderer: &R) -> Result<String> {
        let report = self.build().await?;
        let output = renderer.render(&report)?;
        self.monitor.log_stats("Render");
        self.monitor.log_final_stats();
        Ok(output)
    }
}

/// Assembles the full report from an already loaded dataset.
pub fn summarize(
    dataset: &Dataset,
    preview_rows: usize,
    histogram_bins: usize,
) -> Result<DashboardReport> {
    let records = dataset.records();

    let overview = summarizer::overview(records, preview_rows);
    let distributions = NumericAttribute::ALL
        .iter()
        .map(|attribute| {
            Ok(Distribution {
                summary: summarizer::describe(records, *attribute),
                histogram: summarizer::histogram(records, *attribute, histogram_bins)?,
            })
        })
        .collect::<Result<Vec<_>>>()?;
    let counts_by_city = summarizer::counts_by_city(records);
    let mean_price_by_city = summarizer::mean_price_by_city(records);
    let correlation = summarizer::correlation_matrix(records);

    let price_summary = distributions
        .iter()
        .find(|d| d.summary.attribute == NumericAttribute::Price)
        .map(|d| &d.summary);

    let mut sections = vec![narrative::describe_dataset(&overview)];
    if let Some(summary) = price_summary {
        sections.push(narrative::describe_distribution(summary));
    }
    sections.push(narrative::describe_counts(&counts_by_city));
    sections.push(narrative::describe_mean_prices(&mean_price_by_city));
    sections.push(narrative::describe_correlation(&correlation));

    Ok(DashboardReport {
        title: DASHBOARD_TITLE.to_string(),
        generated_at: chrono::Utc::now(),
        overview,
        distributions,
        counts_by_city,
        mean_price_by_city,
        correlation,
        sections,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::HouseRecord;
    use crate::utils::error::DashboardError;
    use async_trait::async_trait;
    use std::time::Duration;

    struct StaticSource(String);

    #[async_trait]
    impl DatasetSource for StaticSource {
        async fn fetch(&self) -> Result<Vec<u8>> {
            Ok(self.0.clone().into_bytes())
        }

        fn describe(&self) -> String {
            "static".to_string()
        }
    }

    struct FailingSource;

    #[async_trait]
    impl DatasetSource for FailingSource {
        async fn fetch(&self) -> Result<Vec<u8>> {
            Err(DashboardError::HttpStatusError {
                url: "http://example.com/data.csv".to_string(),
                status: 503,
            })
        }

        fn describe(&self) -> String {
            "failing".to_string()
        }
    }

    struct MockConfig {
        preview_rows: usize,
        histogram_bins: usize,
    }

    impl ConfigProvider for MockConfig {
        fn dataset_url(&self) -> &str {
            "http://example.com/data.csv"
        }

        fn dataset_file(&self) -> Option<&str> {
            None
        }

        fn request_timeout(&self) -> Option<Duration> {
            None
        }

        fn preview_rows(&self) -> usize {
            self.preview_rows
        }

        fn histogram_bins(&self) -> usize {
            self.histogram_bins
        }
    }

    struct CountingRenderer;

    impl Renderer for CountingRenderer {
        fn render(&self, report: &DashboardReport) -> Result<String> {
            Ok(format!("{} rows", report.overview.row_count))
        }
    }

    fn csv() -> String {
        "kamar_tidur,luas_bangunan_m2,luas_tanah_m2,kota,harga\n\
         2,50,60,Bogor,500\n\
         3,80,100,Bogor,900\n\
         4,150,120,Jakarta Selatan,4500\n"
            .to_string()
    }

    #[tokio::test]
    async fn test_build_report() {
        let dashboard = Dashboard::new(
            StaticSource(csv()),
            MockConfig {
                preview_rows: 2,
                histogram_bins: 5,
            },
        );
        let report = dashboard.build().await.unwrap();

        assert_eq!(report.title, DASHBOARD_TITLE);
        assert_eq!(report.overview.row_count, 3);
        assert_eq!(report.overview.preview.len(), 2);
        assert_eq!(report.distributions.len(), 4);
        assert!(report.distributions.iter().all(|d| d.histogram.total() == 3));
        assert_eq!(report.counts_by_city[0].city, "Jakarta Selatan");
        assert_eq!(report.mean_price_by_city[0].mean_price, 700.0);
        assert_eq!(report.sections.len(), 5);
        assert!(report.section(narrative::CORRELATION).is_some());
    }

    #[tokio::test]
    async fn test_run_renders_report() {
        let dashboard = Dashboard::new(
            StaticSource(csv()),
            MockConfig {
                preview_rows: 10,
                histogram_bins: 10,
            },
        );
        let output = dashboard.run(&CountingRenderer).await.unwrap();
        assert_eq!(output, "3 rows");
    }

    #[tokio::test]
    async fn test_fetch_failure_is_surfaced() {
        let dashboard = Dashboard::new(
            FailingSource,
            MockConfig {
                preview_rows: 10,
                histogram_bins: 10,
            },
        );
        assert!(matches!(
            dashboard.build().await,
            Err(DashboardError::HttpStatusError { status: 503, .. })
        ));
    }

    #[test]
    fn test_summarize_rejects_zero_bins() {
        let dataset = Dataset::new(vec![HouseRecord::new(2, 50.0, 60.0, "Bogor", 500.0)]);
        assert!(summarize(&dataset, 10, 0).is_err());
    }

    #[test]
    fn test_summarize_empty_dataset() {
        let report = summarize(&Dataset::default(), 10, 10).unwrap();
        assert_eq!(report.overview.row_count, 0);
        assert!(report.counts_by_city.is_empty());
        assert!(report.distributions.iter().all(|d| d.histogram.bins.is_empty()));
    }
}
