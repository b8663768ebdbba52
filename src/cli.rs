//! CLI argument parsing for Revenue Insights

use crate::charts::ChartKind;
use crate::config::InsightsConfig;
use crate::dataset::Category;
use crate::views::{View, ViewRequest};
use chrono::NaiveDate;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Output format for dashboard views
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text format (default)
    Text,
    /// JSON format for machine parsing
    Json,
    /// CSV format for spreadsheet analysis
    Csv,
    /// HTML report with inline SVG charts
    Html,
}

#[derive(Parser, Debug)]
#[command(name = "revenue-insights")]
#[command(version)]
#[command(
    about = "Synthetic store sales dataset with descriptive statistics and a one-sample t-test",
    long_about = None
)]
pub struct Cli {
    /// Dashboard view to render
    #[arg(long = "view", value_enum, default_value = "dataset")]
    pub view: View,

    /// Output format (text, json, csv or html)
    #[arg(long = "format", value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Number of products to generate (default: 20)
    #[arg(short = 'n', long = "rows", value_name = "N")]
    pub rows: Option<usize>,

    /// RNG seed (default: 42)
    #[arg(short = 's', long = "seed", value_name = "SEED")]
    pub seed: Option<u64>,

    /// Poisson rate for units sold (default: 20.0)
    #[arg(long = "lambda", value_name = "LAMBDA")]
    pub lambda: Option<f64>,

    /// Date of the first row (default: 2023-01-01)
    #[arg(long = "start-date", value_name = "YYYY-MM-DD")]
    pub start_date: Option<NaiveDate>,

    /// Only include rows of this category (Electronic, Clothing, Home, Sports)
    #[arg(short = 'c', long = "category", value_name = "CATEGORY")]
    pub category: Option<Category>,

    /// Chart to draw in the charts view
    #[arg(long = "chart", value_enum, default_value = "histogram")]
    pub chart: ChartKind,

    /// Histogram bin count (default: 10)
    #[arg(long = "bins", value_name = "BINS")]
    pub bins: Option<usize>,

    /// Hypothesized population mean for the t-test (default: 20.0)
    #[arg(long = "mu", value_name = "MU", allow_negative_numbers = true)]
    pub mu: Option<f64>,

    /// Significance level for the t-test decision (default: 0.05)
    #[arg(long = "alpha", value_name = "ALPHA")]
    pub alpha: Option<f64>,

    /// Write output to a file instead of stdout
    #[arg(short = 'o', long = "output", value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Load generator and analysis settings from a TOML file
    #[arg(long = "config", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Enable debug tracing to stderr
    #[arg(long = "debug")]
    pub debug: bool,
}

impl Cli {
    /// Overlay command-line values on a loaded configuration
    pub fn apply_overrides(&self, mut config: InsightsConfig) -> InsightsConfig {
        if let Some(rows) = self.rows {
            config.generator.rows = rows;
        }
        if let Some(seed) = self.seed {
            config.generator.seed = seed;
        }
        if let Some(lambda) = self.lambda {
            config.generator.poisson_lambda = lambda;
        }
        if let Some(start_date) = self.start_date {
            config.generator.start_date = start_date;
        }
        if let Some(bins) = self.bins {
            config.analysis.histogram_bins = bins;
        }
        if let Some(mu) = self.mu {
            config.analysis.hypothesized_mean = mu;
        }
        if let Some(alpha) = self.alpha {
            config.analysis.significance_level = alpha;
        }
        config
    }

    /// View parameters for an already-merged configuration
    pub fn view_request(&self, config: &InsightsConfig) -> ViewRequest {
        ViewRequest {
            view: self.view,
            format: self.format,
            chart: self.chart,
            category: self.category,
            analysis: config.analysis.clone(),
        }
    }
}
