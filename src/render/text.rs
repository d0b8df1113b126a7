use crate::core::narrative::{self, format_number, group_thousands};
use crate::domain::model::{
    CorrelationMatrix, DashboardReport, Distribution, HouseRecord, NarrativeSection,
    REQUIRED_COLUMNS,
};
use crate::domain::ports::Renderer;
use crate::utils::error::Result;
use crate::utils::validation::validate_range;
use std::fmt::{self, Write};

pub const DEFAULT_BAR_WIDTH: usize = 40;
pub const MAX_BAR_WIDTH: usize = 200;

const BAR: char = '█';
// |r| 由低到高
const HEAT_SHADES: [char; 5] = [' ', '░', '▒', '▓', '█'];

/// Terminal dashboard: tables, horizontal bar charts and an annotated heatmap.
#[derive(Debug, Clone)]
pub struct TextRenderer {
    bar_width: usize,
}

impl Default for TextRenderer {
    fn default() -> Self {
        Self {
            bar_width: DEFAULT_BAR_WIDTH,
        }
    }
}

impl TextRenderer {
    pub fn new(bar_width: usize) -> Result<Self> {
        validate_range("bar_width", bar_width, 1, MAX_BAR_WIDTH)?;
        Ok(Self { bar_width })
    }

    fn bar(&self, value: f64, max: f64) -> String {
        if !(value > 0.0 && max > 0.0) {
            return String::new();
        }
        let len = ((value / max) * self.bar_width as f64).round() as usize;
        std::iter::repeat(BAR).take(len.max(1)).collect()
    }

    fn bar_chart(&self, out: &mut String, rows: &[(String, f64, String)]) -> fmt::Result {
        let label_width = rows.iter().map(|r| r.0.chars().count()).max().unwrap_or(0);
        let max = rows.iter().map(|r| r.1).fold(0.0, f64::max);
        for (label, value, annotation) in rows {
            writeln!(
                out,
                "{:>width$} | {} {}",
                label,
                self.bar(*value, max),
                annotation,
                width = label_width
            )?;
        }
        Ok(())
    }

    fn preview_table(&self, out: &mut String, records: &[HouseRecord]) -> fmt::Result {
        let rows: Vec<[String; 5]> = records
            .iter()
            .map(|r| {
                [
                    r.bedroom_count.to_string(),
                    format_number(r.building_area_m2),
                    format_number(r.land_area_m2),
                    r.city.clone(),
                    format_number(r.price),
                ]
            })
            .collect();

        let mut widths = REQUIRED_COLUMNS.map(str::len);
        for row in &rows {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(cell.chars().count());
            }
        }

        let header: Vec<String> = REQUIRED_COLUMNS
            .iter()
            .zip(widths)
            .map(|(name, w)| format!("{:<w$}", name, w = w))
            .collect();
        writeln!(out, "| {} |", header.join(" | "))?;
        let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
        writeln!(out, "|-{}-|", rule.join("-|-"))?;
        for row in &rows {
            let cells: Vec<String> = row
                .iter()
                .zip(widths)
                .map(|(cell, w)| format!("{:<w$}", cell, w = w))
                .collect();
            writeln!(out, "| {} |", cells.join(" | "))?;
        }
        Ok(())
    }

    fn distribution(&self, out: &mut String, distribution: &Distribution) -> fmt::Result {
        let s = &distribution.summary;
        writeln!(out, "### {}\n", s.attribute)?;
        writeln!(
            out,
            "count {}  mean {}  std {}  min {}  median {}  max {}\n",
            group_thousands(s.count),
            format_number(s.mean),
            format_number(s.std_dev),
            format_number(s.min),
            format_number(s.median),
            format_number(s.max)
        )?;

        let bins = &distribution.histogram.bins;
        let rows: Vec<(String, f64, String)> = bins
            .iter()
            .enumerate()
            .map(|(i, bin)| {
                let close = if i + 1 == bins.len() { ']' } else { ')' };
                (
                    format!(
                        "[{}, {}{}",
                        format_number(bin.lower),
                        format_number(bin.upper),
                        close
                    ),
                    bin.count as f64,
                    group_thousands(bin.count),
                )
            })
            .collect();
        self.bar_chart(out, &rows)?;
        out.write_char('\n')
    }

    fn heatmap(&self, out: &mut String, matrix: &CorrelationMatrix) -> fmt::Result {
        let names: Vec<String> = matrix.attributes.iter().map(|a| a.to_string()).collect();
        let label_width = names.iter().map(|n| n.len()).max().unwrap_or(0);
        let cell_width = names.iter().map(|n| n.len()).max().unwrap_or(0).max(7);

        write!(out, "{:width$}", "", width = label_width)?;
        for name in &names {
            write!(out, " {:>w$}", name, w = cell_width)?;
        }
        out.push('\n');

        for (name, row) in names.iter().zip(&matrix.values) {
            write!(out, "{:>width$}", name, width = label_width)?;
            for r in row {
                let cell = if r.is_nan() {
                    "n/a".to_string()
                } else {
                    format!("{} {:.2}", shade(*r), r)
                };
                write!(out, " {:>w$}", cell, w = cell_width)?;
            }
            out.push('\n');
        }
        out.write_char('\n')
    }

    fn narrative(&self, out: &mut String, section: Option<&NarrativeSection>) -> fmt::Result {
        match section {
            Some(section) => writeln!(out, "{}\n", section.body),
            None => Ok(()),
        }
    }
}

fn shade(r: f64) -> char {
    let index = (r.abs() * (HEAT_SHADES.len() - 1) as f64).round() as usize;
    HEAT_SHADES[index.min(HEAT_SHADES.len() - 1)]
}

impl TextRenderer {
    fn write_report(&self, out: &mut String, report: &DashboardReport) -> fmt::Result {
        writeln!(out, "# {}\n", report.title)?;
        writeln!(
            out,
            "Generated at {}\n",
            report.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
        )?;

        writeln!(
            out,
            "## Dataset Overview (first {} rows)\n",
            report.overview.preview.len()
        )?;
        self.preview_table(out, &report.overview.preview)?;
        out.push('\n');

        writeln!(out, "## {}\n", narrative::DATASET_DESCRIPTION)?;
        self.narrative(out, report.section(narrative::DATASET_DESCRIPTION))?;

        writeln!(out, "## {}\n", narrative::DISTRIBUTION)?;
        for distribution in &report.distributions {
            self.distribution(out, distribution)?;
        }
        self.narrative(out, report.section(narrative::DISTRIBUTION))?;

        writeln!(out, "## {}\n", narrative::COUNTS_BY_CITY)?;
        let counts: Vec<(String, f64, String)> = report
            .counts_by_city
            .iter()
            .map(|c| (c.city.clone(), c.count as f64, group_thousands(c.count)))
            .collect();
        self.bar_chart(out, &counts)?;
        out.push('\n');
        self.narrative(out, report.section(narrative::COUNTS_BY_CITY))?;

        writeln!(out, "## {}\n", narrative::MEAN_PRICE_BY_CITY)?;
        let means: Vec<(String, f64, String)> = report
            .mean_price_by_city
            .iter()
            .map(|m| (m.city.clone(), m.mean_price, format_number(m.mean_price)))
            .collect();
        self.bar_chart(out, &means)?;
        out.push('\n');
        self.narrative(out, report.section(narrative::MEAN_PRICE_BY_CITY))?;

        writeln!(out, "## {}\n", narrative::CORRELATION)?;
        self.heatmap(out, &report.correlation)?;
        self.narrative(out, report.section(narrative::CORRELATION))
    }
}

impl Renderer for TextRenderer {
    fn render(&self, report: &DashboardReport) -> Result<String> {
        let mut out = String::new();
        self.write_report(&mut out, report)?;
        Ok(out.trim_end().to_string() + "\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::dashboard::summarize;
    use crate::domain::model::Dataset;

    fn report() -> DashboardReport {
        let dataset = Dataset::new(vec![
            HouseRecord::new(2, 50.0, 60.0, "Bogor", 500.0),
            HouseRecord::new(3, 80.0, 100.0, "Bogor", 900.0),
            HouseRecord::new(4, 150.0, 120.0, "Jakarta Selatan", 4500.0),
            HouseRecord::new(2, 36.0, 72.0, "Depok", 450.0),
        ]);
        summarize(&dataset, 10, 4).unwrap()
    }

    #[test]
    fn test_rejects_out_of_range_bar_width() {
        assert!(TextRenderer::new(0).is_err());
        assert!(TextRenderer::new(MAX_BAR_WIDTH + 1).is_err());
        assert!(TextRenderer::new(20).is_ok());
    }

    #[test]
    fn test_render_contains_every_section() {
        let output = TextRenderer::default().render(&report()).unwrap();

        assert!(output.starts_with("# House Price Overview"));
        for heading in [
            narrative::DATASET_DESCRIPTION,
            narrative::DISTRIBUTION,
            narrative::COUNTS_BY_CITY,
            narrative::MEAN_PRICE_BY_CITY,
            narrative::CORRELATION,
        ] {
            assert!(output.contains(&format!("## {}", heading)), "missing {}", heading);
        }
        assert!(output.contains("| kamar_tidur | luas_bangunan_m2 |"));
        assert!(output.contains("Jakarta Selatan"));
    }

    #[test]
    fn test_largest_bar_uses_full_width() {
        let renderer = TextRenderer::new(10).unwrap();
        let output = renderer.render(&report()).unwrap();
        // 平均價格最高的城市
        let line = output
            .lines()
            .find(|l| l.trim_start().starts_with("Jakarta Selatan |") && l.ends_with("4,500"))
            .unwrap();
        assert!(line.contains(&"█".repeat(10)));
    }

    #[test]
    fn test_report_without_narrative_still_renders_charts() {
        let mut report = report();
        report.sections.clear();
        let mut out = String::new();
        TextRenderer::default()
            .write_report(&mut out, &report)
            .unwrap();

        assert!(out.contains(&format!("## {}", narrative::CORRELATION)));
        assert!(out.contains("Bogor |"));
        assert!(out.ends_with('\n'));
    }

    #[test]
    fn test_bar_is_empty_for_zero() {
        let renderer = TextRenderer::default();
        assert_eq!(renderer.bar(0.0, 10.0), "");
        assert_eq!(renderer.bar(1.0, 1000.0).chars().count(), 1);
    }

    #[test]
    fn test_shade_scales_with_magnitude() {
        assert_eq!(shade(0.0), ' ');
        assert_eq!(shade(1.0), '█');
        assert_eq!(shade(-1.0), '█');
    }
}
