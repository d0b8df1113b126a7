use chrono::{DateTime, Utc};
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

pub const COL_BEDROOMS: &str = "kamar_tidur";
pub const COL_BUILDING_AREA: &str = "luas_bangunan_m2";
pub const COL_LAND_AREA: &str = "luas_tanah_m2";
pub const COL_CITY: &str = "kota";
pub const COL_PRICE: &str = "harga";

/// Header columns the dataset must provide, in their canonical order.
pub const REQUIRED_COLUMNS: [&str; 5] = [
    COL_BEDROOMS,
    COL_BUILDING_AREA,
    COL_LAND_AREA,
    COL_CITY,
    COL_PRICE,
];

/// One house listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HouseRecord {
    #[serde(rename = "kamar_tidur", deserialize_with = "integral_count")]
    pub bedroom_count: u32,
    #[serde(rename = "luas_bangunan_m2")]
    pub building_area_m2: f64,
    #[serde(rename = "luas_tanah_m2")]
    pub land_area_m2: f64,
    #[serde(rename = "kota")]
    pub city: String,
    #[serde(rename = "harga")]
    pub price: f64,
}

impl HouseRecord {
    pub fn new(
        bedroom_count: u32,
        building_area_m2: f64,
        land_area_m2: f64,
        city: impl Into<String>,
        price: f64,
    ) -> Self {
        Self {
            bedroom_count,
            building_area_m2,
            land_area_m2,
            city: city.into(),
            price,
        }
    }

    pub fn value(&self, attribute: NumericAttribute) -> f64 {
        match attribute {
            NumericAttribute::BedroomCount => f64::from(self.bedroom_count),
            NumericAttribute::BuildingArea => self.building_area_m2,
            NumericAttribute::LandArea => self.land_area_m2,
            NumericAttribute::Price => self.price,
        }
    }

    /// Checks the value domain. Returns the reason on failure.
    pub fn check(&self) -> std::result::Result<(), String> {
        if self.city.trim().is_empty() {
            return Err(format!("{} must not be empty", COL_CITY));
        }
        for (column, value) in [
            (COL_BUILDING_AREA, self.building_area_m2),
            (COL_LAND_AREA, self.land_area_m2),
            (COL_PRICE, self.price),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(format!("{} must be a positive number, got {}", column, value));
            }
        }
        Ok(())
    }
}

// 部分資料集將房間數寫成 "3.0"
fn integral_count<'de, D>(deserializer: D) -> std::result::Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_any(IntegralCountVisitor)
}

#[derive(Clone, Copy)]
struct IntegralCountVisitor;

impl<'de> Visitor<'de> for IntegralCountVisitor {
    type Value = u32;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "a non-negative integer for {}", COL_BEDROOMS)
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> std::result::Result<u32, E> {
        u32::try_from(v).map_err(|_| E::invalid_value(de::Unexpected::Unsigned(v), &self))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> std::result::Result<u32, E> {
        u32::try_from(v).map_err(|_| E::invalid_value(de::Unexpected::Signed(v), &self))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> std::result::Result<u32, E> {
        if v.fract() == 0.0 && v >= 0.0 && v <= f64::from(u32::MAX) {
            Ok(v as u32)
        } else {
            Err(E::invalid_value(de::Unexpected::Float(v), &self))
        }
    }

    fn visit_str<E: de::Error>(self, v: &str) -> std::result::Result<u32, E> {
        let trimmed = v.trim();
        if let Ok(count) = trimmed.parse::<u64>() {
            return self.visit_u64(count);
        }
        match trimmed.parse::<f64>() {
            Ok(value) => self.visit_f64(value),
            Err(_) => Err(E::invalid_value(de::Unexpected::Str(v), &self)),
        }
    }
}

/// The loaded table. Immutable once built.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    records: Vec<HouseRecord>,
}

impl Dataset {
    pub fn new(records: Vec<HouseRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[HouseRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl From<Vec<HouseRecord>> for Dataset {
    fn from(records: Vec<HouseRecord>) -> Self {
        Self::new(records)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NumericAttribute {
    BedroomCount,
    BuildingArea,
    LandArea,
    Price,
}

impl NumericAttribute {
    pub const ALL: [NumericAttribute; 4] = [
        NumericAttribute::BedroomCount,
        NumericAttribute::BuildingArea,
        NumericAttribute::LandArea,
        NumericAttribute::Price,
    ];

    pub fn column(&self) -> &'static str {
        match self {
            NumericAttribute::BedroomCount => COL_BEDROOMS,
            NumericAttribute::BuildingArea => COL_BUILDING_AREA,
            NumericAttribute::LandArea => COL_LAND_AREA,
            NumericAttribute::Price => COL_PRICE,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            NumericAttribute::BedroomCount => "Number of bedrooms",
            NumericAttribute::BuildingArea => "Building area of the house in square meters",
            NumericAttribute::LandArea => "Land area of the house in square meters",
            NumericAttribute::Price => "The price of the house being sold",
        }
    }
}

impl fmt::Display for NumericAttribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CityCount {
    pub city: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CityMeanPrice {
    pub city: String,
    pub mean_price: f64,
}

/// Pairwise Pearson coefficients. `values[i][j]` pairs `attributes[i]` with `attributes[j]`.
/// Undefined cells hold NaN and serialize as `null`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationMatrix {
    pub attributes: Vec<NumericAttribute>,
    pub values: Vec<Vec<f64>>,
}

impl CorrelationMatrix {
    pub fn get(&self, a: NumericAttribute, b: NumericAttribute) -> Option<f64> {
        let i = self.attributes.iter().position(|x| *x == a)?;
        let j = self.attributes.iter().position(|x| *x == b)?;
        Some(self.values[i][j])
    }

    pub fn size(&self) -> usize {
        self.attributes.len()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistogramBin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Histogram {
    pub attribute: NumericAttribute,
    pub bins: Vec<HistogramBin>,
}

impl Histogram {
    pub fn total(&self) -> usize {
        self.bins.iter().map(|b| b.count).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttributeSummary {
    pub attribute: NumericAttribute,
    pub count: usize,
    pub mean: f64,
    pub std_dev: f64,
    pub min: f64,
    pub median: f64,
    pub max: f64,
    pub skewness: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetOverview {
    pub row_count: usize,
    pub column_count: usize,
    pub cities: Vec<String>,
    pub preview: Vec<HouseRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Distribution {
    pub summary: AttributeSummary,
    pub histogram: Histogram,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NarrativeSection {
    pub heading: String,
    pub body: String,
}

/// Everything a renderer needs to draw the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardReport {
    pub title: String,
    pub generated_at: DateTime<Utc>,
    pub overview: DatasetOverview,
    pub distributions: Vec<Distribution>,
    pub counts_by_city: Vec<CityCount>,
    pub mean_price_by_city: Vec<CityMeanPrice>,
    pub correlation: CorrelationMatrix,
    pub sections: Vec<NarrativeSection>,
}

impl DashboardReport {
    pub fn section(&self, heading: &str) -> Option<&NarrativeSection> {
        self.sections.iter().find(|s| s.heading == heading)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_rejects_non_positive_price() {
        let record = HouseRecord::new(2, 50.0, 60.0, "Bogor", 0.0);
        let reason = record.check().unwrap_err();
        assert!(reason.contains("harga"));
    }

    #[test]
    fn test_check_rejects_blank_city() {
        let record = HouseRecord::new(2, 50.0, 60.0, "  ", 500.0);
        assert!(record.check().is_err());
    }

    #[test]
    fn test_value_by_attribute() {
        let record = HouseRecord::new(3, 80.0, 100.0, "Depok", 900.0);
        assert_eq!(record.value(NumericAttribute::BedroomCount), 3.0);
        assert_eq!(record.value(NumericAttribute::LandArea), 100.0);
        assert_eq!(record.value(NumericAttribute::Price), 900.0);
    }

    #[test]
    fn test_record_json_round_trip_keeps_column_names() {
        let record = HouseRecord::new(3, 80.0, 100.0, "Depok", 900.0);
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["kamar_tidur"], 3);
        assert_eq!(json["kota"], "Depok");

        let back: HouseRecord = serde_json::from_value(json).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn test_attribute_serializes_as_snake_case() {
        let json = serde_json::to_string(&NumericAttribute::BuildingArea).unwrap();
        assert_eq!(json, "\"building_area\"");
    }
}
