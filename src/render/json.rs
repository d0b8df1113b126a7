use crate::domain::model::DashboardReport;
use crate::domain::ports::Renderer;
use crate::utils::error::Result;

/// Serializes the report for an external charting front-end.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonRenderer {
    pub pretty: bool,
}

impl JsonRenderer {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }
}

impl Renderer for JsonRenderer {
    fn render(&self, report: &DashboardReport) -> Result<String> {
        let json = if self.pretty {
            serde_json::to_string_pretty(report)?
        } else {
            serde_json::to_string(report)?
        };
        Ok(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::dashboard::summarize;
    use crate::domain::model::{Dataset, HouseRecord};

    #[test]
    fn test_undefined_correlation_serializes_as_null() {
        let dataset = Dataset::new(vec![
            HouseRecord::new(2, 50.0, 60.0, "Bogor", 500.0),
            HouseRecord::new(2, 80.0, 100.0, "Bogor", 900.0),
        ]);
        let report = summarize(&dataset, 10, 10).unwrap();
        let output = JsonRenderer::new(false).render(&report).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();

        assert_eq!(value["counts_by_city"][0]["city"], "Bogor");
        assert_eq!(value["counts_by_city"][0]["count"], 2);
        assert_eq!(value["mean_price_by_city"][0]["mean_price"], 700.0);
        assert_eq!(value["correlation"]["attributes"][0], "bedroom_count");
        assert_eq!(value["correlation"]["values"][0][0], 1.0);
        assert!(value["correlation"]["values"][0][3].is_null());
        assert_eq!(value["overview"]["preview"][0]["kota"], "Bogor");
    }
}
