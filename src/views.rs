//! Dashboard views
//!
//! Each view is one page of the dashboard: it runs the engine over the
//! dataset and renders the result in the requested output format.

use crate::charts::{build_chart, render_text, Chart, ChartKind};
use crate::cli::OutputFormat;
use crate::config::AnalysisConfig;
use crate::csv_output::{category_stats_csv, CsvOutput};
use crate::dataset::{Category, Dataset};
use crate::html_output::HtmlOutput;
use crate::hypothesis::{one_sample_ttest, Decision, TTestResult};
use crate::json_output::JsonOutput;
use crate::stats::{category_stats, describe, CategoryAggregate, SummaryStats};
use anyhow::{Context, Result};
use clap::ValueEnum;
use std::collections::BTreeMap;
use std::fmt::Write;

/// Report heading
pub const REPORT_TITLE: &str = "Store Revenue Insights";

/// Dashboard page
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum View {
    /// Browse the sales dataset (CSV export with --format csv)
    Dataset,
    /// Summary statistics of units sold and per-category rollups
    Describe,
    /// Histogram, boxplot or bar chart
    Charts,
    /// One-sample t-test of mean units sold
    Ttest,
}

/// Parameters the user picked for a single view
#[derive(Debug, Clone)]
pub struct ViewRequest {
    pub view: View,
    pub format: OutputFormat,
    pub chart: ChartKind,
    pub category: Option<Category>,
    pub analysis: AnalysisConfig,
}

impl ViewRequest {
    pub fn new(view: View, format: OutputFormat) -> Self {
        Self {
            view,
            format,
            chart: ChartKind::Histogram,
            category: None,
            analysis: AnalysisConfig::default(),
        }
    }
}

/// Render one view of `dataset`
///
/// # Errors
/// Engine failures (e.g. a t-test over a category filter with fewer than two
/// rows) are returned with the view name as context.
pub fn render_view(dataset: &Dataset, request: &ViewRequest) -> Result<String> {
    request.analysis.validate()?;

    let filtered;
    let dataset = match request.category {
        Some(category) => {
            filtered = dataset.filter_category(category);
            tracing::debug!(%category, rows = filtered.len(), "applied category filter");
            &filtered
        }
        None => dataset,
    };

    match request.view {
        View::Dataset => render_dataset(dataset, request.format),
        View::Describe => {
            let summary = describe(&dataset.units_sold())
                .context("Descriptive statistics unavailable")?;
            let groups = category_stats(dataset);
            render_describe(&summary, &groups, request.format)
        }
        View::Charts => {
            let chart = build_chart(request.chart, dataset, request.analysis.histogram_bins)
                .context("Chart unavailable")?;
            render_chart(&chart, request.format)
        }
        View::Ttest => {
            let result = one_sample_ttest(
                &dataset.units_sold(),
                request.analysis.hypothesized_mean,
            )
            .context("One-sample t-test unavailable")?;
            render_ttest(&result, request.analysis.significance_level, request.format)
        }
    }
}

fn render_dataset(dataset: &Dataset, format: OutputFormat) -> Result<String> {
    Ok(match format {
        OutputFormat::Csv => CsvOutput::from_dataset(dataset).to_csv(),
        OutputFormat::Json => JsonOutput::Dataset {
            rows: dataset.len(),
            records: dataset.records().to_vec(),
        }
        .to_json()?,
        OutputFormat::Html => {
            let mut html = HtmlOutput::new(REPORT_TITLE);
            html.add_dataset(dataset);
            html.to_html()
        }
        OutputFormat::Text => dataset_text(dataset),
    })
}

fn render_describe(
    summary: &SummaryStats,
    groups: &BTreeMap<Category, CategoryAggregate>,
    format: OutputFormat,
) -> Result<String> {
    Ok(match format {
        OutputFormat::Csv => {
            let mut out = String::from("statistic,units_sold\n");
            for (label, value) in summary.rows() {
                let value = value.map(|v| v.to_string()).unwrap_or_default();
                let _ = writeln!(out, "{},{}", label, value);
            }
            out.push('\n');
            out.push_str(&category_stats_csv(groups));
            out
        }
        OutputFormat::Json => JsonOutput::Describe {
            column: "units_sold".to_string(),
            summary: summary.clone(),
            categories: JsonOutput::categories_from(groups),
        }
        .to_json()?,
        OutputFormat::Html => {
            let mut html = HtmlOutput::new(REPORT_TITLE);
            html.add_summary(summary);
            html.add_category_stats(groups);
            html.to_html()
        }
        OutputFormat::Text => describe_text(summary, groups),
    })
}

fn render_chart(chart: &Chart, format: OutputFormat) -> Result<String> {
    Ok(match format {
        OutputFormat::Csv => chart_csv(chart),
        OutputFormat::Json => JsonOutput::Chart {
            title: chart.title().to_string(),
            chart: chart.clone(),
        }
        .to_json()?,
        OutputFormat::Html => {
            let mut html = HtmlOutput::new(REPORT_TITLE);
            html.add_chart(chart);
            html.to_html()
        }
        OutputFormat::Text => render_text(chart),
    })
}

fn render_ttest(result: &TTestResult, alpha: f64, format: OutputFormat) -> Result<String> {
    let decision = result.decision(alpha);
    Ok(match format {
        OutputFormat::Csv => format!(
            "hypothesized_mean,t_statistic,p_value,degrees_of_freedom,alpha,decision\n{},{},{},{},{},{}\n",
            result.hypothesized_mean,
            result.t_statistic,
            result.p_value,
            result.degrees_of_freedom,
            alpha,
            match decision {
                Decision::RejectNull => "reject_null",
                Decision::FailToReject => "fail_to_reject",
            }
        ),
        OutputFormat::Json => JsonOutput::ttest(result.clone(), alpha).to_json()?,
        OutputFormat::Html => {
            let mut html = HtmlOutput::new(REPORT_TITLE);
            html.add_ttest(result, alpha);
            html.to_html()
        }
        OutputFormat::Text => {
            let mut out = String::new();
            out.push_str("One Sample t-Test\n");
            out.push_str("─────────────────\n");
            let _ = writeln!(out, "Hypothesized mean: {:.4}", result.hypothesized_mean);
            let _ = writeln!(
                out,
                "Sample mean: {:.4} (n = {})",
                result.sample_mean, result.sample_size
            );
            let _ = writeln!(out, "Standard error: {:.4}", result.standard_error());
            let _ = writeln!(out, "T-statistic: {:.4}", result.t_statistic);
            let _ = writeln!(out, "P-value: {:.4}", result.p_value);
            let _ = writeln!(out, "Significance level: {}", alpha);
            out.push('\n');
            out.push_str(decision.message());
            out.push('\n');
            out
        }
    })
}

fn dataset_text(dataset: &Dataset) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:>10}  {:<14} {:<10} {:>10}  {}",
        "product_id", "product_name", "category", "units_sold", "sales_date"
    );
    for record in dataset {
        let _ = writeln!(
            out,
            "{:>10}  {:<14} {:<10} {:>10}  {}",
            record.product_id,
            record.product_name,
            record.category.as_str(),
            record.units_sold,
            record.sales_date
        );
    }
    let _ = writeln!(out, "\n[{} rows x 5 columns]", dataset.len());
    out
}

fn describe_text(summary: &SummaryStats, groups: &BTreeMap<Category, CategoryAggregate>) -> String {
    let mut out = String::new();
    out.push_str("Descriptive Statistics\n");
    out.push_str("──────────────────────\n");
    for (label, value) in summary.rows() {
        let _ = writeln!(out, "{:<8}{:>14}", label, format_stat(value, 6));
    }
    out.push_str("Name: units_sold, dtype: float64\n\n");

    let _ = writeln!(out, "{:<20}{:>10}", "Mean Units Sold", format!("{:.2}", summary.mean));
    let _ = writeln!(out, "{:<20}{:>10}", "Median Units Sold", summary.median);
    let _ = writeln!(out, "{:<20}{:>10}", "Variance", format_stat(summary.variance, 2));
    let _ = writeln!(out, "{:<20}{:>10}", "Standard Deviation", format_stat(summary.std, 2));

    out.push_str("\nCategory Statistics\n");
    out.push_str("───────────────────\n");
    let _ = writeln!(out, "{:<12}{:>8}{:>12}{:>12}", "category", "sum", "mean", "std");
    for (category, agg) in groups {
        let _ = writeln!(
            out,
            "{:<12}{:>8}{:>12.6}{:>12}",
            category.as_str(),
            agg.sum,
            agg.mean,
            format_stat(agg.std, 6)
        );
    }
    out
}

fn format_stat(value: Option<f64>, precision: usize) -> String {
    match value {
        Some(v) => format!("{:.*}", precision, v),
        None => "NaN".to_string(),
    }
}

fn chart_csv(chart: &Chart) -> String {
    let mut out = String::new();
    match chart {
        Chart::Histogram { bins, kde } => {
            out.push_str("lower,upper,count\n");
            for bin in bins {
                let _ = writeln!(out, "{},{},{}", bin.lower, bin.upper, bin.count);
            }
            if !kde.is_empty() {
                out.push_str("\nx,kde\n");
                for point in kde {
                    let _ = writeln!(out, "{},{}", point.x, point.y);
                }
            }
        }
        Chart::Boxplot { boxes } => {
            out.push_str("category,count,min,whisker_low,q1,median,q3,whisker_high,max,outliers\n");
            for b in boxes {
                let outliers: Vec<String> = b.outliers.iter().map(|v| v.to_string()).collect();
                let _ = writeln!(
                    out,
                    "{},{},{},{},{},{},{},{},{},{}",
                    b.category,
                    b.count,
                    b.min,
                    b.whisker_low,
                    b.q1,
                    b.median,
                    b.q3,
                    b.whisker_high,
                    b.max,
                    outliers.join(";")
                );
            }
        }
        Chart::Bar { bars } => {
            out.push_str("category,units_sold\n");
            for entry in bars {
                let _ = writeln!(out, "{},{}", entry.category, entry.total);
            }
        }
    }
    out
}
