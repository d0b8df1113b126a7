//! Prose that accompanies each dashboard section, derived from the numbers.

use crate::domain::model::{
    AttributeSummary, CityCount, CityMeanPrice, CorrelationMatrix, DatasetOverview,
    NarrativeSection, NumericAttribute, COL_CITY,
};

pub const DATASET_DESCRIPTION: &str = "Dataset Description";
pub const DISTRIBUTION: &str = "Distribution of Data";
pub const COUNTS_BY_CITY: &str = "Number of Houses for Sale per City";
pub const MEAN_PRICE_BY_CITY: &str = "Average House Price per City";
pub const CORRELATION: &str = "Correlation Matrix of Numeric Variables";

// skewness 超過此值視為明顯偏斜
const SKEW_THRESHOLD: f64 = 0.5;
const JAKARTA_PREFIX: &str = "Jakarta";

pub fn describe_dataset(overview: &DatasetOverview) -> NarrativeSection {
    let mut body = format!(
        "- This dataset consists of a total of {} rows (entries) and contains {} columns of variable.\n",
        group_thousands(overview.row_count),
        overview.column_count
    );

    if !overview.cities.is_empty() {
        let cities: Vec<String> = overview.cities.iter().map(|c| format!("**{}**", c)).collect();
        body.push_str(&format!(
            "- The dataset contains house information data from {} regions, namely {}.\n",
            overview.cities.len(),
            join_list(&cities)
        ));
    }

    body.push_str(&format!(
        "- The independent variables consist of **{}**, **{}**, **{}**, and **{}** which contain information about the house specifications.\n",
        NumericAttribute::BedroomCount,
        NumericAttribute::BuildingArea,
        NumericAttribute::LandArea,
        COL_CITY
    ));
    body.push_str(&format!(
        "- The dependent variable is **{}**, which informs the selling price of the house.\n\nFeatures:\n\n",
        NumericAttribute::Price
    ));

    for attribute in [
        NumericAttribute::BedroomCount,
        NumericAttribute::BuildingArea,
        NumericAttribute::LandArea,
    ] {
        body.push_str(&format!("- **{}** : {}\n", attribute, attribute.description()));
    }
    body.push_str(&format!(
        "- **{}** : Name of the city where the house is being sold\n",
        COL_CITY
    ));
    body.push_str(&format!(
        "- **{}** : {}",
        NumericAttribute::Price,
        NumericAttribute::Price.description()
    ));

    section(DATASET_DESCRIPTION, body)
}

pub fn describe_distribution(summary: &AttributeSummary) -> NarrativeSection {
    let body = if summary.count < 3 || summary.skewness.is_nan() {
        format!(
            "There are too few values of {} to judge the shape of its distribution.",
            summary.attribute
        )
    } else if summary.skewness > SKEW_THRESHOLD {
        format!(
            "From the histogram above, we can see that {} is right-skewed (skewness {:.2}). \
             The range of values is quite wide, but the data is not evenly distributed: \
             most houses sit at the low end, with a median of {} against a mean of {}, \
             meaning most houses sold are still quite affordable.",
            summary.attribute,
            summary.skewness,
            format_number(summary.median),
            format_number(summary.mean)
        )
    } else if summary.skewness < -SKEW_THRESHOLD {
        format!(
            "From the histogram above, we can see that {} is left-skewed (skewness {:.2}). \
             Most values sit at the high end of the range, with a median of {} against a mean of {}.",
            summary.attribute,
            summary.skewness,
            format_number(summary.median),
            format_number(summary.mean)
        )
    } else {
        format!(
            "From the histogram above, {} is roughly symmetric (skewness {:.2}), \
             with a median of {} close to the mean of {}.",
            summary.attribute,
            summary.skewness,
            format_number(summary.median),
            format_number(summary.mean)
        )
    };

    section(DISTRIBUTION, body)
}

/// Expects counts in ascending order, as returned by `counts_by_city`.
pub fn describe_counts(counts: &[CityCount]) -> NarrativeSection {
    let (Some(smallest), Some(largest)) = (counts.first(), counts.last()) else {
        return section(COUNTS_BY_CITY, "There are no houses in the dataset.".to_string());
    };

    let mut body = format!(
        "From the bar chart above, the number of houses for sale ranges from {} in {} to {} in {}.",
        group_thousands(smallest.count),
        smallest.city,
        group_thousands(largest.count),
        largest.city
    );

    if largest.count > 0 && smallest.count * 2 >= largest.count {
        body.push_str(" The number of houses being sold for each region is more or less the same.");
    }

    let jakarta: Vec<&CityCount> = counts
        .iter()
        .filter(|c| c.city.starts_with(JAKARTA_PREFIX))
        .collect();
    if jakarta.len() > 1 {
        let total: usize = jakarta.iter().map(|c| c.count).sum();
        body.push_str(&format!(
            " Accumulated over its {} areas, the entire Jakarta region has {} houses for sale.",
            jakarta.len(),
            group_thousands(total)
        ));
    }

    section(COUNTS_BY_CITY, body)
}

/// Expects means in ascending order, as returned by `mean_price_by_city`.
pub fn describe_mean_prices(means: &[CityMeanPrice]) -> NarrativeSection {
    let (Some(cheapest), Some(priciest)) = (means.first(), means.last()) else {
        return section(
            MEAN_PRICE_BY_CITY,
            "There are no prices in the dataset.".to_string(),
        );
    };

    let mut body = format!(
        "From the bar chart above, the average price of houses sold is highest in {} ({}) and lowest in {} ({}).",
        priciest.city,
        format_number(priciest.mean_price),
        cheapest.city,
        format_number(cheapest.mean_price)
    );

    // 將 Jakarta 區域與其他區域比較
    let (inside, outside): (Vec<&CityMeanPrice>, Vec<&CityMeanPrice>) = means
        .iter()
        .partition(|m| m.city.starts_with(JAKARTA_PREFIX));
    if let (Some(lowest_inside), Some(highest_outside)) = (inside.first(), outside.last()) {
        if lowest_inside.mean_price > highest_outside.mean_price {
            body.push_str(" Every area of Jakarta is priced above every area outside Jakarta.");
        } else {
            let below: Vec<String> = inside
                .iter()
                .filter(|m| m.mean_price < highest_outside.mean_price)
                .map(|m| m.city.clone())
                .collect();
            body.push_str(&format!(
                " Jakarta areas are mostly at the top, except {} which is below {}.",
                join_list(&below),
                highest_outside.city
            ));
        }
    }

    section(MEAN_PRICE_BY_CITY, body)
}

pub fn describe_correlation(matrix: &CorrelationMatrix) -> NarrativeSection {
    let mut with_price: Vec<(NumericAttribute, f64)> = matrix
        .attributes
        .iter()
        .filter(|a| **a != NumericAttribute::Price)
        .filter_map(|a| {
            let r = matrix.get(*a, NumericAttribute::Price)?;
            (!r.is_nan()).then_some((*a, r))
        })
        .collect();

    if with_price.is_empty() {
        return section(
            CORRELATION,
            "Correlation with price is undefined for this dataset.".to_string(),
        );
    }

    with_price.sort_by(|a, b| b.1.abs().total_cmp(&a.1.abs()));
    let (strongest, r_strong) = with_price[0];
    let (weakest, r_weak) = with_price[with_price.len() - 1];

    let mut body = format!(
        "Correlation Matrix shows that {} has the strongest relationship with {} (r = {:.2})",
        strongest,
        NumericAttribute::Price,
        r_strong
    );
    if weakest != strongest {
        body.push_str(&format!(
            ", while {} has the weakest (r = {:.2})",
            weakest, r_weak
        ));
    }
    body.push('.');

    if r_strong > 0.0 {
        body.push_str(&format!(
            " Houses with a larger {} tend to have higher prices.",
            strongest
        ));
    }

    section(CORRELATION, body)
}

fn section(heading: &str, body: String) -> NarrativeSection {
    NarrativeSection {
        heading: heading.to_string(),
        body,
    }
}

fn join_list(items: &[String]) -> String {
    match items {
        [] => String::new(),
        [only] => only.clone(),
        [init @ .., last] => format!("{} and {}", init.join(", "), last),
    }
}

/// 1234567 -> "1,234,567"
pub fn group_thousands(value: usize) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Thousands-grouped number with up to two decimals.
pub fn format_number(value: f64) -> String {
    if !value.is_finite() {
        return "n/a".to_string();
    }
    let rounded = (value * 100.0).round() / 100.0;
    let sign = if rounded < 0.0 { "-" } else { "" };
    let abs = rounded.abs();
    let whole = group_thousands(abs.trunc() as usize);
    let cents = ((abs.fract() * 100.0).round() as u64).min(99);
    if cents == 0 {
        format!("{}{}", sign, whole)
    } else {
        format!("{}{}.{:02}", sign, whole, cents)
    }
}
