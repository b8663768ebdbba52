//! Chart data for the visualization view
//!
//! Builds the numbers behind each chart (histogram bins with a Gaussian
//! KDE overlay, per-category box summaries, per-category totals) and renders
//! them as terminal bar charts.
//! SVG rendering lives in `html_output`.

use crate::dataset::{Category, Dataset};
use crate::error::{InsightsError, Result};
use crate::special::standard_normal_pdf;
use crate::stats::{category_stats, mean, quantile_sorted, sample_variance};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Default histogram bin count
pub const DEFAULT_BINS: usize = 10;

/// Evaluation points of the KDE curve
pub const KDE_POINTS: usize = 200;

/// Width of the longest bar in text rendering
const TEXT_BAR_WIDTH: usize = 40;

/// Chart selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    /// Distribution of units sold
    Histogram,
    /// Units sold by category (quartiles, whiskers, outliers)
    Boxplot,
    /// Total units sold by category
    Bar,
}

impl ChartKind {
    pub fn title(&self) -> &'static str {
        match self {
            ChartKind::Histogram => "Distribution of Units Sold",
            ChartKind::Boxplot => "Boxplot of Units Sold by Category",
            ChartKind::Bar => "Total Units Sold by Category",
        }
    }
}

/// One histogram bin; `upper` is exclusive except for the last bin
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistogramBin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

/// Point on the KDE curve, scaled to histogram counts
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KdePoint {
    pub x: f64,
    pub y: f64,
}

/// Tukey box summary for one category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoxSummary {
    pub category: Category,
    pub count: usize,
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
    /// Smallest observation within 1.5 IQR below Q1
    pub whisker_low: f64,
    /// Largest observation within 1.5 IQR above Q3
    pub whisker_high: f64,
    pub outliers: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarEntry {
    pub category: Category,
    pub total: u64,
}

/// Computed chart, ready for rendering
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Chart {
    Histogram {
        bins: Vec<HistogramBin>,
        /// Empty when the bandwidth is undefined (fewer than two distinct values)
        kde: Vec<KdePoint>,
    },
    Boxplot { boxes: Vec<BoxSummary> },
    Bar { bars: Vec<BarEntry> },
}

impl Chart {
    pub fn kind(&self) -> ChartKind {
        match self {
            Chart::Histogram { .. } => ChartKind::Histogram,
            Chart::Boxplot { .. } => ChartKind::Boxplot,
            Chart::Bar { .. } => ChartKind::Bar,
        }
    }

    pub fn title(&self) -> &'static str {
        self.kind().title()
    }
}

/// Build chart data for `kind` over `dataset`
///
/// # Errors
/// `InvalidConfiguration` for zero bins; `CannotCompute` for an empty
/// dataset.
pub fn build_chart(kind: ChartKind, dataset: &Dataset, bins: usize) -> Result<Chart> {
    if dataset.is_empty() {
        return Err(InsightsError::insufficient_data("chart", 1, 0));
    }

    match kind {
        ChartKind::Histogram => {
            let values = dataset.units_sold();
            let bins = histogram(&values, bins)?;
            let kde = match (bins.first(), bins.last()) {
                (Some(first), Some(last)) => {
                    let bin_width = first.upper - first.lower;
                    let scale = values.len() as f64 * bin_width;
                    gaussian_kde(&values, first.lower, last.upper, scale)
                }
                _ => Vec::new(),
            };
            Ok(Chart::Histogram { bins, kde })
        }
        ChartKind::Boxplot => Ok(Chart::Boxplot {
            boxes: box_summaries(dataset),
        }),
        ChartKind::Bar => Ok(Chart::Bar {
            bars: category_stats(dataset)
                .into_iter()
                .map(|(category, agg)| BarEntry {
                    category,
                    total: agg.sum,
                })
                .collect(),
        }),
    }
}

/// Equal-width histogram over [min, max]
///
/// A constant column gets a unit-wide range centred on the value.
pub fn histogram(values: &[f64], bins: usize) -> Result<Vec<HistogramBin>> {
    if bins == 0 {
        return Err(InsightsError::invalid("histogram bins must be > 0"));
    }
    if values.is_empty() {
        return Err(InsightsError::insufficient_data("histogram", 1, 0));
    }

    let mut lo = values.iter().copied().fold(f64::INFINITY, f64::min);
    let mut hi = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if lo == hi {
        lo -= 0.5;
        hi += 0.5;
    }
    let width = (hi - lo) / bins as f64;

    let mut out: Vec<HistogramBin> = (0..bins)
        .map(|i| HistogramBin {
            lower: lo + i as f64 * width,
            upper: if i + 1 == bins {
                hi
            } else {
                lo + (i + 1) as f64 * width
            },
            count: 0,
        })
        .collect();

    for &v in values {
        let idx = (((v - lo) / width).floor() as usize).min(bins - 1);
        out[idx].count += 1;
    }

    Ok(out)
}

/// Scott's rule bandwidth: sample std times n^(-1/5)
///
/// `None` for fewer than two values or a constant column.
pub fn scott_bandwidth(values: &[f64]) -> Option<f64> {
    let first = values.first()?;
    if values.len() < 2 || values.iter().all(|v| v == first) {
        return None;
    }
    let std = sample_variance(values, mean(values))?.sqrt();
    Some(std * (values.len() as f64).powf(-0.2))
}

/// Gaussian kernel density estimate on `KDE_POINTS` evenly spaced points of
/// [lo, hi], multiplied by `scale`
///
/// With `scale = n * bin_width` the curve sits on the histogram's count
/// axis.
pub fn gaussian_kde(values: &[f64], lo: f64, hi: f64, scale: f64) -> Vec<KdePoint> {
    let Some(h) = scott_bandwidth(values) else {
        return Vec::new();
    };
    if lo.is_nan() || hi.is_nan() || hi <= lo {
        return Vec::new();
    }

    let norm = scale / (values.len() as f64 * h);
    let step = (hi - lo) / (KDE_POINTS - 1) as f64;
    (0..KDE_POINTS)
        .map(|i| {
            let x = lo + i as f64 * step;
            let density: f64 = values.iter().map(|v| standard_normal_pdf((x - v) / h)).sum();
            KdePoint { x, y: norm * density }
        })
        .collect()
}

fn box_summaries(dataset: &Dataset) -> Vec<BoxSummary> {
    let mut groups: BTreeMap<Category, Vec<f64>> = BTreeMap::new();
    for record in dataset {
        groups
            .entry(record.category)
            .or_default()
            .push(record.units_sold as f64);
    }

    groups
        .into_iter()
        .map(|(category, mut values)| {
            values.sort_by(|a, b| a.total_cmp(b));
            let q1 = quantile_sorted(&values, 0.25);
            let median = quantile_sorted(&values, 0.5);
            let q3 = quantile_sorted(&values, 0.75);
            let fence = 1.5 * (q3 - q1);
            let (low_fence, high_fence) = (q1 - fence, q3 + fence);

            let inside: Vec<f64> = values
                .iter()
                .copied()
                .filter(|v| (low_fence..=high_fence).contains(v))
                .collect();
            let outliers = values
                .iter()
                .copied()
                .filter(|v| !(low_fence..=high_fence).contains(v))
                .collect();

            BoxSummary {
                category,
                count: values.len(),
                min: values.first().copied().unwrap_or(q1),
                q1,
                median,
                q3,
                max: values.last().copied().unwrap_or(q3),
                whisker_low: inside.first().copied().unwrap_or(q1),
                whisker_high: inside.last().copied().unwrap_or(q3),
                outliers,
            }
        })
        .collect()
}

/// Render a chart as a plain-text bar chart
pub fn render_text(chart: &Chart) -> String {
    let mut out = String::new();
    out.push_str(chart.title());
    out.push('\n');
    out.push_str(&"─".repeat(chart.title().chars().count()));
    out.push('\n');

    match chart {
        Chart::Histogram { bins, .. } => {
            let max = bins.iter().map(|b| b.count).max().unwrap_or(0);
            for (i, bin) in bins.iter().enumerate() {
                out.push_str(&format!(
                    "[{:>7.2}, {:>7.2}{} {:>4} {}\n",
                    bin.lower,
                    bin.upper,
                    if i + 1 == bins.len() { "]" } else { ")" },
                    bin.count,
                    bar(bin.count as f64, max as f64)
                ));
            }
        }
        Chart::Boxplot { boxes } => {
            out.push_str(&format!(
                "{:<12} {:>5} {:>8} {:>8} {:>8} {:>8} {:>8}  outliers\n",
                "category", "n", "low", "q1", "median", "q3", "high"
            ));
            for b in boxes {
                let outliers: Vec<String> = b.outliers.iter().map(|v| format!("{v}")).collect();
                out.push_str(&format!(
                    "{:<12} {:>5} {:>8.2} {:>8.2} {:>8.2} {:>8.2} {:>8.2}  {}\n",
                    b.category.as_str(),
                    b.count,
                    b.whisker_low,
                    b.q1,
                    b.median,
                    b.q3,
                    b.whisker_high,
                    outliers.join(", ")
                ));
            }
        }
        Chart::Bar { bars } => {
            let max = bars.iter().map(|b| b.total).max().unwrap_or(0);
            for entry in bars {
                out.push_str(&format!(
                    "{:<12} {:>6} {}\n",
                    entry.category.as_str(),
                    entry.total,
                    bar(entry.total as f64, max as f64)
                ));
            }
        }
    }

    out
}

fn bar(value: f64, max: f64) -> String {
    if max <= 0.0 {
        return String::new();
    }
    let len = ((value / max) * TEXT_BAR_WIDTH as f64).round() as usize;
    "█".repeat(len)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{generate_dataset, SalesRecord};
    use chrono::NaiveDate;

    fn fixture(units: &[(Category, u64)]) -> Dataset {
        Dataset::from_records(
            units
                .iter()
                .enumerate()
                .map(|(i, &(category, units_sold))| SalesRecord {
                    product_id: i as u32 + 1,
                    product_name: format!("Product{}", i + 1),
                    category,
                    units_sold,
                    sales_date: NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(),
                })
                .collect(),
        )
    }

    #[test]
    fn test_histogram_counts_sum_to_n() {
        let dataset = generate_dataset(20, 42).unwrap();
        let chart = build_chart(ChartKind::Histogram, &dataset, DEFAULT_BINS).unwrap();
        let Chart::Histogram { bins, kde } = chart else {
            panic!("expected histogram");
        };
        assert_eq!(bins.len(), DEFAULT_BINS);
        assert_eq!(bins.iter().map(|b| b.count).sum::<usize>(), 20);

        assert_eq!(kde.len(), KDE_POINTS);
        assert_eq!(kde[0].x, bins[0].lower);
        assert!((kde[KDE_POINTS - 1].x - bins[DEFAULT_BINS - 1].upper).abs() < 1e-9);
        assert!(kde.iter().all(|p| p.y >= 0.0 && p.y.is_finite()));
    }

    #[test]
    fn test_kde_area_matches_histogram_area() {
        let values: Vec<f64> = generate_dataset(200, 42).unwrap().units_sold();
        let h = scott_bandwidth(&values).unwrap();
        let bin_width = 2.5;
        let n = values.len() as f64;

        // Extend well past the data so the tails are captured
        let lo = values.iter().copied().fold(f64::INFINITY, f64::min) - 6.0 * h;
        let hi = values.iter().copied().fold(f64::NEG_INFINITY, f64::max) + 6.0 * h;
        let curve = gaussian_kde(&values, lo, hi, n * bin_width);

        let area: f64 = curve
            .windows(2)
            .map(|w| 0.5 * (w[0].y + w[1].y) * (w[1].x - w[0].x))
            .sum();
        let expected = n * bin_width;
        assert!(
            (area - expected).abs() / expected < 0.01,
            "area {area}, expected {expected}"
        );
    }

    #[test]
    fn test_scott_bandwidth() {
        let values = [1.0, 2.0, 3.0, 4.0, 5.0];
        let std = 2.5f64.sqrt();
        let h = scott_bandwidth(&values).unwrap();
        assert!((h - std * 5f64.powf(-0.2)).abs() < 1e-12);

        assert!(scott_bandwidth(&[4.0]).is_none());
        assert!(scott_bandwidth(&[0.1; 7]).is_none());
    }

    #[test]
    fn test_constant_column_has_no_kde() {
        let dataset = fixture(&[(Category::Home, 7), (Category::Sports, 7)]);
        let Chart::Histogram { bins, kde } =
            build_chart(ChartKind::Histogram, &dataset, 4).unwrap()
        else {
            panic!("expected histogram");
        };
        assert_eq!(bins.iter().map(|b| b.count).sum::<usize>(), 2);
        assert!(kde.is_empty());
    }

    #[test]
    fn test_histogram_edges() {
        let bins = histogram(&[0.0, 5.0, 10.0], 2).unwrap();
        assert_eq!(bins[0].lower, 0.0);
        assert_eq!(bins[0].upper, 5.0);
        assert_eq!(bins[1].upper, 10.0);
        // 5.0 belongs to the upper bin; the max lands in the last bin
        assert_eq!(bins[0].count, 1);
        assert_eq!(bins[1].count, 2);
    }

    #[test]
    fn test_histogram_constant_values() {
        let bins = histogram(&[3.0, 3.0, 3.0], 4).unwrap();
        assert_eq!(bins[0].lower, 2.5);
        assert_eq!(bins[3].upper, 3.5);
        assert_eq!(bins.iter().map(|b| b.count).sum::<usize>(), 3);
    }

    #[test]
    fn test_histogram_zero_bins() {
        assert!(histogram(&[1.0], 0).is_err());
    }

    #[test]
    fn test_boxplot_outlier() {
        let dataset = fixture(&[
            (Category::Home, 10),
            (Category::Home, 11),
            (Category::Home, 12),
            (Category::Home, 13),
            (Category::Home, 60),
            (Category::Sports, 5),
        ]);
        let Chart::Boxplot { boxes } = build_chart(ChartKind::Boxplot, &dataset, 10).unwrap()
        else {
            panic!("expected boxplot");
        };

        assert_eq!(boxes.len(), 2);
        let home = &boxes[0];
        assert_eq!(home.category, Category::Home);
        assert_eq!(home.outliers, vec![60.0]);
        assert_eq!(home.whisker_high, 13.0);
        assert_eq!(home.whisker_low, 10.0);
        assert_eq!(home.min, 10.0);
        assert_eq!(home.max, 60.0);
        assert!(home.q1 <= home.median && home.median <= home.q3);

        let sports = &boxes[1];
        assert_eq!(sports.count, 1);
        assert_eq!(sports.whisker_low, 5.0);
        assert!(sports.outliers.is_empty());
    }

    #[test]
    fn test_bar_totals() {
        let dataset = fixture(&[
            (Category::Clothing, 4),
            (Category::Electronic, 6),
            (Category::Clothing, 5),
        ]);
        let Chart::Bar { bars } = build_chart(ChartKind::Bar, &dataset, 10).unwrap() else {
            panic!("expected bar chart");
        };
        assert_eq!(
            bars,
            vec![
                BarEntry {
                    category: Category::Clothing,
                    total: 9
                },
                BarEntry {
                    category: Category::Electronic,
                    total: 6
                },
            ]
        );
    }

    #[test]
    fn test_empty_dataset_rejected() {
        let empty = Dataset::from_records(Vec::new());
        assert!(build_chart(ChartKind::Bar, &empty, 10).is_err());
    }

    #[test]
    fn test_render_text_titles() {
        let dataset = generate_dataset(20, 42).unwrap();
        for kind in [ChartKind::Histogram, ChartKind::Boxplot, ChartKind::Bar] {
            let chart = build_chart(kind, &dataset, DEFAULT_BINS).unwrap();
            let text = render_text(&chart);
            assert!(text.starts_with(kind.title()));
        }
    }
}
