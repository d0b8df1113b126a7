//! Descriptive statistics over the loaded dataset.
//!
//! Every function here is a pure function of the record slice.

use crate::domain::model::{
    AttributeSummary, CityCount, CityMeanPrice, CorrelationMatrix, DatasetOverview, Histogram,
    HistogramBin, HouseRecord, NumericAttribute, REQUIRED_COLUMNS,
};
use crate::utils::error::Result;
use crate::utils::validation::validate_positive_number;
use std::collections::{BTreeMap, BTreeSet};

/// Number of listings per city, ascending by count (ties by city name).
pub fn counts_by_city(records: &[HouseRecord]) -> Vec<CityCount> {
    let mut groups: BTreeMap<&str, usize> = BTreeMap::new();
    for record in records {
        *groups.entry(record.city.as_str()).or_insert(0) += 1;
    }

    let mut counts: Vec<CityCount> = groups
        .into_iter()
        .map(|(city, count)| CityCount {
            city: city.to_string(),
            count,
        })
        .collect();
    // stable sort，同數量時保留城市名稱順序
    counts.sort_by_key(|c| c.count);
    counts
}

#[derive(Default)]
struct PriceGroup {
    total: f64,
    count: usize,
    min: f64,
    max: f64,
}

/// Mean price per city, ascending by mean (ties by city name).
pub fn mean_price_by_city(records: &[HouseRecord]) -> Vec<CityMeanPrice> {
    let mut groups: BTreeMap<&str, PriceGroup> = BTreeMap::new();
    for record in records {
        let group = groups.entry(record.city.as_str()).or_default();
        if group.count == 0 {
            group.min = record.price;
            group.max = record.price;
        } else {
            group.min = group.min.min(record.price);
            group.max = group.max.max(record.price);
        }
        group.total += record.price;
        group.count += 1;
    }

    let mut means: Vec<CityMeanPrice> = groups
        .into_iter()
        .map(|(city, group)| {
            // groups only exist for cities that have records, so count >= 1
            let mean = group.total / group.count as f64;
            CityMeanPrice {
                city: city.to_string(),
                mean_price: if mean.is_finite() {
                    mean.clamp(group.min, group.max)
                } else {
                    mean
                },
            }
        })
        .collect();
    means.sort_by(|a, b| a.mean_price.total_cmp(&b.mean_price));
    means
}

fn column(records: &[HouseRecord], attribute: NumericAttribute) -> Vec<f64> {
    records.iter().map(|r| r.value(attribute)).collect()
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Pearson coefficient of two equally long columns. NaN when undefined.
pub fn pearson(xs: &[f64], ys: &[f64]) -> f64 {
    let n = xs.len();
    if n < 2 || n != ys.len() {
        return f64::NAN;
    }

    let mean_x = mean(xs);
    let mean_y = mean(ys);

    let (mut cov, mut var_x, mut var_y) = (0.0, 0.0, 0.0);
    for (x, y) in xs.iter().zip(ys) {
        let dx = x - mean_x;
        let dy = y - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    if var_x == 0.0 || var_y == 0.0 {
        return f64::NAN;
    }
    (cov / (var_x * var_y).sqrt()).clamp(-1.0, 1.0)
}

/// Pairwise Pearson correlation over the numeric attributes.
///
/// The matrix is filled from the upper triangle and mirrored, so it is
/// exactly symmetric; the diagonal is always 1.0.
pub fn correlation_matrix(records: &[HouseRecord]) -> CorrelationMatrix {
    let attributes = NumericAttribute::ALL.to_vec();
    let columns: Vec<Vec<f64>> = attributes.iter().map(|a| column(records, *a)).collect();

    let size = attributes.len();
    let mut values = vec![vec![f64::NAN; size]; size];
    for i in 0..size {
        values[i][i] = 1.0;
        for j in (i + 1)..size {
            let r = pearson(&columns[i], &columns[j]);
            values[i][j] = r;
            values[j][i] = r;
        }
    }

    CorrelationMatrix { attributes, values }
}

/// Equal-width histogram of one attribute. The last bin is closed on the right.
pub fn histogram(
    records: &[HouseRecord],
    attribute: NumericAttribute,
    bins: usize,
) -> Result<Histogram> {
    validate_positive_number("histogram_bins", bins, 1)?;

    let values = column(records, attribute);
    let Some((min, max)) = min_max(&values) else {
        return Ok(Histogram {
            attribute,
            bins: Vec::new(),
        });
    };

    if min == max {
        return Ok(Histogram {
            attribute,
            bins: vec![HistogramBin {
                lower: min,
                upper: max,
                count: values.len(),
            }],
        });
    }

    let width = (max - min) / bins as f64;
    let mut counts = vec![0usize; bins];
    for value in &values {
        let index = (((value - min) / width).floor() as usize).min(bins - 1);
        counts[index] += 1;
    }

    let bins = counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| HistogramBin {
            lower: min + width * i as f64,
            upper: if i + 1 == bins {
                max
            } else {
                min + width * (i + 1) as f64
            },
            count,
        })
        .collect();

    Ok(Histogram { attribute, bins })
}

fn min_max(values: &[f64]) -> Option<(f64, f64)> {
    let first = *values.first()?;
    Some(
        values
            .iter()
            .fold((first, first), |(lo, hi), v| (lo.min(*v), hi.max(*v))),
    )
}

/// Count, mean, sample std, min, median, max and sample skewness.
pub fn describe(records: &[HouseRecord], attribute: NumericAttribute) -> AttributeSummary {
    let values = column(records, attribute);
    let n = values.len();
    if n == 0 {
        return AttributeSummary {
            attribute,
            count: 0,
            mean: f64::NAN,
            std_dev: f64::NAN,
            min: f64::NAN,
            median: f64::NAN,
            max: f64::NAN,
            skewness: f64::NAN,
        };
    }

    let mut sorted = values.clone();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let mean = mean(&values);
    let median = if n % 2 == 0 {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    } else {
        sorted[n / 2]
    };

    let m2 = values.iter().map(|x| (x - mean).powi(2)).sum::<f64>();
    let m3 = values.iter().map(|x| (x - mean).powi(3)).sum::<f64>();
    let std_dev = if n > 1 {
        (m2 / (n - 1) as f64).sqrt()
    } else {
        0.0
    };

    AttributeSummary {
        attribute,
        count: n,
        mean,
        std_dev,
        min: sorted[0],
        median,
        max: sorted[n - 1],
        skewness: skewness(n, m2, m3),
    }
}

// adjusted Fisher-Pearson 係數，與 pandas Series.skew 相同
fn skewness(n: usize, sum_sq: f64, sum_cube: f64) -> f64 {
    if n < 3 {
        return f64::NAN;
    }
    let nf = n as f64;
    let m2 = sum_sq / nf;
    let m3 = sum_cube / nf;
    if m2 == 0.0 {
        return 0.0;
    }
    let g1 = m3 / m2.powf(1.5);
    (nf * (nf - 1.0)).sqrt() / (nf - 2.0) * g1
}

/// Row/column counts, distinct cities and the first `preview_rows` records.
pub fn overview(records: &[HouseRecord], preview_rows: usize) -> DatasetOverview {
    let cities: BTreeSet<&str> = records.iter().map(|r| r.city.as_str()).collect();

    DatasetOverview {
        row_count: records.len(),
        column_count: REQUIRED_COLUMNS.len(),
        cities: cities.into_iter().map(str::to_string).collect(),
        preview: records.iter().take(preview_rows).cloned().collect(),
    }
}
