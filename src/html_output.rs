//! HTML output format for dashboard views
//!
//! Self-contained report: embedded CSS, styled tables and inline SVG charts.

use crate::charts::{BarEntry, BoxSummary, Chart, HistogramBin, KdePoint};
use crate::dataset::{Category, Dataset};
use crate::hypothesis::{Decision, TTestResult};
use crate::stats::{CategoryAggregate, SummaryStats};
use std::collections::BTreeMap;
use std::fmt::Write;

const SVG_WIDTH: f64 = 640.0;
const SVG_HEIGHT: f64 = 360.0;
const MARGIN_LEFT: f64 = 56.0;
const MARGIN_RIGHT: f64 = 16.0;
const MARGIN_TOP: f64 = 36.0;
const MARGIN_BOTTOM: f64 = 40.0;

/// HTML report builder
#[derive(Debug)]
pub struct HtmlOutput {
    title: String,
    sections: Vec<String>,
}

impl HtmlOutput {
    /// Create a new report with a page heading
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            sections: Vec::new(),
        }
    }

    /// Escape HTML special characters to prevent XSS
    fn escape_html(text: &str) -> String {
        text.replace('&', "&amp;")
            .replace('<', "&lt;")
            .replace('>', "&gt;")
            .replace('"', "&quot;")
            .replace('\'', "&#39;")
    }

    /// Generate embedded CSS styles
    fn generate_styles() -> &'static str {
        r#"
        body {
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
            margin: 20px;
            background-color: #f5f5f5;
        }
        h1, h2 {
            color: #333;
        }
        table {
            border-collapse: collapse;
            width: 100%;
            background-color: white;
            box-shadow: 0 1px 3px rgba(0,0,0,0.1);
            margin-bottom: 20px;
        }
        th, td {
            border: 1px solid #ddd;
            padding: 8px;
            text-align: left;
        }
        th {
            background-color: #4a90d9;
            color: white;
            font-weight: bold;
        }
        tr:nth-child(even) {
            background-color: #f9f9f9;
        }
        .numeric {
            font-family: monospace;
            text-align: right;
        }
        .stats-table th {
            background-color: #5cb85c;
        }
        .chart {
            background-color: white;
            box-shadow: 0 1px 3px rgba(0,0,0,0.1);
            margin-bottom: 20px;
        }
        .reject {
            color: #a94442;
            background-color: #f2dede;
            padding: 10px;
        }
        .fail-to-reject {
            color: #3c763d;
            background-color: #dff0d8;
            padding: 10px;
        }
        .footer {
            margin-top: 20px;
            font-size: 0.8em;
            color: #888;
            text-align: center;
        }
        "#
    }

    /// Add the dataset as a table
    pub fn add_dataset(&mut self, dataset: &Dataset) {
        let mut html = String::new();
        html.push_str("    <h2>Sales Dataset</h2>\n");
        html.push_str("    <table>\n");
        html.push_str("        <tr><th>product_id</th><th>product_name</th><th>category</th><th>units_sold</th><th>sales_date</th></tr>\n");

        for record in dataset {
            let _ = writeln!(
                html,
                "        <tr><td class=\"numeric\">{}</td><td>{}</td><td>{}</td><td class=\"numeric\">{}</td><td>{}</td></tr>",
                record.product_id,
                Self::escape_html(&record.product_name),
                record.category,
                record.units_sold,
                record.sales_date
            );
        }

        html.push_str("    </table>\n");
        self.sections.push(html);
    }

    /// Add the descriptive summary of units sold
    pub fn add_summary(&mut self, summary: &SummaryStats) {
        let mut html = String::new();
        html.push_str("    <h2>Descriptive Statistics</h2>\n");
        html.push_str("    <table class=\"stats-table\">\n");
        html.push_str("        <tr><th>statistic</th><th>units_sold</th></tr>\n");

        for (label, value) in summary.rows() {
            let _ = writeln!(
                html,
                "        <tr><td>{}</td><td class=\"numeric\">{}</td></tr>",
                label,
                format_optional(value)
            );
        }
        let _ = writeln!(
            html,
            "        <tr><td>variance</td><td class=\"numeric\">{}</td></tr>",
            format_optional(summary.variance)
        );

        html.push_str("    </table>\n");
        self.sections.push(html);
    }

    /// Add per-category sum/mean/std
    pub fn add_category_stats(&mut self, groups: &BTreeMap<Category, CategoryAggregate>) {
        let mut html = String::new();
        html.push_str("    <h2>Category Statistics</h2>\n");
        html.push_str("    <table class=\"stats-table\">\n");
        html.push_str("        <tr><th>category</th><th>sum</th><th>mean</th><th>std</th></tr>\n");

        for (category, agg) in groups {
            let _ = writeln!(
                html,
                "        <tr><td>{}</td><td class=\"numeric\">{}</td><td class=\"numeric\">{:.6}</td><td class=\"numeric\">{}</td></tr>",
                category,
                agg.sum,
                agg.mean,
                format_optional(agg.std)
            );
        }

        html.push_str("    </table>\n");
        self.sections.push(html);
    }

    /// Add a chart rendered as inline SVG
    pub fn add_chart(&mut self, chart: &Chart) {
        let mut html = String::new();
        let _ = writeln!(html, "    <h2>{}</h2>", Self::escape_html(chart.title()));
        html.push_str(&render_svg(chart));
        self.sections.push(html);
    }

    /// Add a one-sample t-test result and its decision at `alpha`
    pub fn add_ttest(&mut self, result: &TTestResult, alpha: f64) {
        let decision = result.decision(alpha);
        let class = match decision {
            Decision::RejectNull => "reject",
            Decision::FailToReject => "fail-to-reject",
        };

        let mut html = String::new();
        html.push_str("    <h2>One Sample t-Test</h2>\n");
        html.push_str("    <table class=\"stats-table\">\n");
        let _ = writeln!(
            html,
            "        <tr><td>Hypothesized mean</td><td class=\"numeric\">{:.4}</td></tr>",
            result.hypothesized_mean
        );
        let _ = writeln!(
            html,
            "        <tr><td>T-statistic</td><td class=\"numeric\">{:.4}</td></tr>",
            result.t_statistic
        );
        let _ = writeln!(
            html,
            "        <tr><td>P-value</td><td class=\"numeric\">{:.4}</td></tr>",
            result.p_value
        );
        let _ = writeln!(
            html,
            "        <tr><td>Degrees of freedom</td><td class=\"numeric\">{}</td></tr>",
            result.degrees_of_freedom
        );
        html.push_str("    </table>\n");
        let _ = writeln!(
            html,
            "    <p class=\"{}\">{}</p>",
            class,
            Self::escape_html(decision.message())
        );
        self.sections.push(html);
    }

    /// Generate complete HTML document
    pub fn to_html(&self) -> String {
        let mut html = String::new();

        html.push_str("<!DOCTYPE html>\n");
        html.push_str("<html lang=\"en\">\n");

        html.push_str("<head>\n");
        html.push_str("    <meta charset=\"UTF-8\">\n");
        html.push_str(
            "    <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n",
        );
        let _ = writeln!(html, "    <title>{}</title>", Self::escape_html(&self.title));
        html.push_str("    <style>");
        html.push_str(Self::generate_styles());
        html.push_str("</style>\n");
        html.push_str("</head>\n");

        html.push_str("<body>\n");
        let _ = writeln!(html, "    <h1>{}</h1>", Self::escape_html(&self.title));

        for section in &self.sections {
            html.push_str(section);
        }

        html.push_str("    <div class=\"footer\">\n");
        html.push_str("        Generated by revenue-insights\n");
        html.push_str("    </div>\n");

        html.push_str("</body>\n");
        html.push_str("</html>\n");

        html
    }
}

fn format_optional(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:.6}", v),
        None => "NaN".to_string(),
    }
}

/// Render chart data as a standalone `<svg>` element
pub fn render_svg(chart: &Chart) -> String {
    let mut svg = String::new();
    let _ = writeln!(
        svg,
        "    <svg class=\"chart\" xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\">",
        w = SVG_WIDTH,
        h = SVG_HEIGHT
    );
    let _ = writeln!(
        svg,
        "      <text x=\"{}\" y=\"22\" text-anchor=\"middle\" font-size=\"15\">{}</text>",
        SVG_WIDTH / 2.0,
        chart.title()
    );

    match chart {
        Chart::Histogram { bins, kde } => svg_histogram(&mut svg, bins, kde),
        Chart::Boxplot { boxes } => svg_boxplot(&mut svg, boxes),
        Chart::Bar { bars } => svg_bar(&mut svg, bars),
    }

    svg.push_str("    </svg>\n");
    svg
}

fn plot_width() -> f64 {
    SVG_WIDTH - MARGIN_LEFT - MARGIN_RIGHT
}

fn plot_height() -> f64 {
    SVG_HEIGHT - MARGIN_TOP - MARGIN_BOTTOM
}

/// Map a value in [lo, hi] to a y pixel coordinate
fn y_of(value: f64, lo: f64, hi: f64) -> f64 {
    let span = if hi > lo { hi - lo } else { 1.0 };
    MARGIN_TOP + plot_height() * (1.0 - (value - lo) / span)
}

fn svg_axes(svg: &mut String, lo: f64, hi: f64) {
    let bottom = MARGIN_TOP + plot_height();
    let _ = writeln!(
        svg,
        "      <line x1=\"{l}\" y1=\"{t}\" x2=\"{l}\" y2=\"{b}\" stroke=\"#333\"/>",
        l = MARGIN_LEFT,
        t = MARGIN_TOP,
        b = bottom
    );
    let _ = writeln!(
        svg,
        "      <line x1=\"{l}\" y1=\"{b}\" x2=\"{r}\" y2=\"{b}\" stroke=\"#333\"/>",
        l = MARGIN_LEFT,
        r = MARGIN_LEFT + plot_width(),
        b = bottom
    );
    for value in [lo, hi] {
        let _ = writeln!(
            svg,
            "      <text x=\"{}\" y=\"{:.1}\" text-anchor=\"end\" font-size=\"11\">{}</text>",
            MARGIN_LEFT - 6.0,
            y_of(value, lo, hi) + 4.0,
            value
        );
    }
}

fn svg_histogram(svg: &mut String, bins: &[HistogramBin], kde: &[KdePoint]) {
    let max = kde
        .iter()
        .map(|p| p.y)
        .fold(bins.iter().map(|b| b.count).max().unwrap_or(0) as f64, f64::max);
    svg_axes(svg, 0.0, max);
    if bins.is_empty() {
        return;
    }

    let width = plot_width() / bins.len() as f64;
    for (i, bin) in bins.iter().enumerate() {
        let x = MARGIN_LEFT + i as f64 * width;
        let y = y_of(bin.count as f64, 0.0, max);
        let _ = writeln!(
            svg,
            "      <rect x=\"{:.1}\" y=\"{:.1}\" width=\"{:.1}\" height=\"{:.1}\" fill=\"#4a90d9\" stroke=\"white\"><title>[{:.2}, {:.2}): {}</title></rect>",
            x,
            y,
            width,
            MARGIN_TOP + plot_height() - y,
            bin.lower,
            bin.upper,
            bin.count
        );
    }

    let bottom = MARGIN_TOP + plot_height();
    if let (Some(first), Some(last)) = (bins.first(), bins.last()) {
        let span = last.upper - first.lower;
        if !kde.is_empty() && span > 0.0 {
            let points: Vec<String> = kde
                .iter()
                .map(|p| {
                    let x = MARGIN_LEFT + plot_width() * (p.x - first.lower) / span;
                    format!("{:.1},{:.1}", x, y_of(p.y, 0.0, max))
                })
                .collect();
            let _ = writeln!(
                svg,
                "      <polyline class=\"kde\" points=\"{}\" fill=\"none\" stroke=\"#d9534f\" stroke-width=\"2\"/>",
                points.join(" ")
            );
        }

        let _ = writeln!(
            svg,
            "      <text x=\"{}\" y=\"{}\" font-size=\"11\">{:.1}</text>",
            MARGIN_LEFT,
            bottom + 16.0,
            first.lower
        );
        let _ = writeln!(
            svg,
            "      <text x=\"{}\" y=\"{}\" text-anchor=\"end\" font-size=\"11\">{:.1}</text>",
            MARGIN_LEFT + plot_width(),
            bottom + 16.0,
            last.upper
        );
    }
}

fn svg_boxplot(svg: &mut String, boxes: &[BoxSummary]) {
    let lo = boxes
        .iter()
        .flat_map(|b| b.outliers.iter().copied().chain([b.whisker_low]))
        .fold(f64::INFINITY, f64::min);
    let hi = boxes
        .iter()
        .flat_map(|b| b.outliers.iter().copied().chain([b.whisker_high]))
        .fold(f64::NEG_INFINITY, f64::max);
    if boxes.is_empty() || !lo.is_finite() || !hi.is_finite() {
        svg_axes(svg, 0.0, 0.0);
        return;
    }
    svg_axes(svg, lo, hi);

    let slot = plot_width() / boxes.len() as f64;
    let bottom = MARGIN_TOP + plot_height();
    for (i, b) in boxes.iter().enumerate() {
        let center = MARGIN_LEFT + slot * (i as f64 + 0.5);
        let half = slot * 0.25;
        let (y_q1, y_q3) = (y_of(b.q1, lo, hi), y_of(b.q3, lo, hi));

        let _ = writeln!(
            svg,
            "      <line x1=\"{c:.1}\" y1=\"{:.1}\" x2=\"{c:.1}\" y2=\"{:.1}\" stroke=\"#333\"/>",
            y_of(b.whisker_low, lo, hi),
            y_of(b.whisker_high, lo, hi),
            c = center
        );
        let _ = writeln!(
            svg,
            "      <rect x=\"{:.1}\" y=\"{:.1}\" width=\"{:.1}\" height=\"{:.1}\" fill=\"#5cb85c\" stroke=\"#333\"/>",
            center - half,
            y_q3,
            2.0 * half,
            (y_q1 - y_q3).max(1.0)
        );
        let y_median = y_of(b.median, lo, hi);
        let _ = writeln!(
            svg,
            "      <line x1=\"{:.1}\" y1=\"{m:.1}\" x2=\"{:.1}\" y2=\"{m:.1}\" stroke=\"#333\" stroke-width=\"2\"/>",
            center - half,
            center + half,
            m = y_median
        );
        for &outlier in &b.outliers {
            let _ = writeln!(
                svg,
                "      <circle cx=\"{:.1}\" cy=\"{:.1}\" r=\"3\" fill=\"none\" stroke=\"#a94442\"/>",
                center,
                y_of(outlier, lo, hi)
            );
        }
        let _ = writeln!(
            svg,
            "      <text x=\"{:.1}\" y=\"{}\" text-anchor=\"middle\" font-size=\"12\">{}</text>",
            center,
            bottom + 16.0,
            b.category
        );
    }
}

fn svg_bar(svg: &mut String, bars: &[BarEntry]) {
    let max = bars.iter().map(|b| b.total).max().unwrap_or(0) as f64;
    svg_axes(svg, 0.0, max);
    if bars.is_empty() {
        return;
    }

    let slot = plot_width() / bars.len() as f64;
    let bottom = MARGIN_TOP + plot_height();
    for (i, entry) in bars.iter().enumerate() {
        let x = MARGIN_LEFT + slot * i as f64 + slot * 0.15;
        let y = y_of(entry.total as f64, 0.0, max);
        let _ = writeln!(
            svg,
            "      <rect x=\"{:.1}\" y=\"{:.1}\" width=\"{:.1}\" height=\"{:.1}\" fill=\"#4a90d9\"><title>{}: {}</title></rect>",
            x,
            y,
            slot * 0.7,
            bottom - y,
            entry.category,
            entry.total
        );
        let _ = writeln!(
            svg,
            "      <text x=\"{:.1}\" y=\"{}\" text-anchor=\"middle\" font-size=\"12\">{}</text>",
            MARGIN_LEFT + slot * (i as f64 + 0.5),
            bottom + 16.0,
            entry.category
        );
    }
}
