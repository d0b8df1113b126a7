use house_price_dashboard::core::summarizer::{histogram, pearson};
use house_price_dashboard::domain::model::NumericAttribute;
use house_price_dashboard::{correlation_matrix, counts_by_city, mean_price_by_city, HouseRecord};

const CITIES: [&str; 6] = [
    "Jakarta Selatan",
    "Bogor",
    "Depok",
    "Tangerang",
    "Bekasi",
    "Tangerang Selatan",
];

/// Deterministic pseudo-random listings (64-bit LCG).
fn generate(seed: u64, len: usize) -> Vec<HouseRecord> {
    let mut state = seed;
    let mut next = move || {
        state = state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        (state >> 33) as f64 / (1u64 << 31) as f64
    };

    (0..len)
        .map(|_| {
            let bedrooms = 1 + (next() * 6.0) as u32;
            let building = 30.0 + next() * 300.0;
            let land = 40.0 + next() * 400.0;
            let city = CITIES[(next() * CITIES.len() as f64) as usize % CITIES.len()];
            let price = 100_000_000.0 + building * 10_000_000.0 * (0.5 + next());
            HouseRecord::new(bedrooms, building, land, city, price)
        })
        .collect()
}

#[test]
fn test_counts_sum_to_record_count() {
    for (seed, len) in [(1, 1), (7, 13), (42, 250), (1234, 1000)] {
        let records = generate(seed, len);
        let counts = counts_by_city(&records);
        assert_eq!(counts.iter().map(|c| c.count).sum::<usize>(), len);
        for pair in counts.windows(2) {
            assert!(pair[0].count <= pair[1].count);
        }
    }
}

#[test]
fn test_mean_prices_within_group_range() {
    for seed in [3, 99, 2024] {
        let records = generate(seed, 500);
        for mean in mean_price_by_city(&records) {
            let prices: Vec<f64> = records
                .iter()
                .filter(|r| r.city == mean.city)
                .map(|r| r.price)
                .collect();
            assert!(!prices.is_empty());
            let lo = prices.iter().cloned().fold(f64::INFINITY, f64::min);
            let hi = prices.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
            assert!(
                mean.mean_price >= lo && mean.mean_price <= hi,
                "{} mean {} outside [{}, {}]",
                mean.city,
                mean.mean_price,
                lo,
                hi
            );
        }
    }
}

#[test]
fn test_correlation_matrix_is_symmetric_with_unit_diagonal() {
    for seed in [5, 17, 31337] {
        let matrix = correlation_matrix(&generate(seed, 300));
        for i in 0..matrix.size() {
            assert_eq!(matrix.values[i][i], 1.0);
            for j in 0..matrix.size() {
                assert_eq!(matrix.values[i][j].to_bits(), matrix.values[j][i].to_bits());
            }
        }
        // 價格由建築面積生成，應為正相關
        let r = matrix
            .get(NumericAttribute::BuildingArea, NumericAttribute::Price)
            .unwrap();
        assert!(r > 0.5, "expected strong positive correlation, got {}", r);
    }
}

#[test]
fn test_pearson_is_order_independent() {
    let xs = [1.0, 2.0, 3.0, 4.0, 5.0];
    let ys = [2.0, 1.0, 4.0, 3.0, 5.0];
    assert_eq!(pearson(&xs, &ys).to_bits(), pearson(&ys, &xs).to_bits());
    assert!((pearson(&xs, &ys) - 0.8).abs() < 1e-12);
}

#[test]
fn test_histogram_counts_cover_all_records() {
    let records = generate(11, 400);
    for attribute in NumericAttribute::ALL {
        let hist = histogram(&records, attribute, 12).unwrap();
        assert_eq!(hist.total(), records.len());
        for pair in hist.bins.windows(2) {
            assert_eq!(pair[0].upper, pair[1].lower);
        }
    }
}
