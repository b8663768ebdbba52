//! JSON output format for dashboard views

use crate::charts::Chart;
use crate::dataset::{Category, SalesRecord};
use crate::hypothesis::{Decision, TTestResult};
use crate::stats::{CategoryAggregate, SummaryStats};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Per-category row of the descriptive statistics view
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonCategoryStats {
    pub category: Category,
    pub count: usize,
    pub sum: u64,
    pub mean: f64,
    /// Omitted when undefined (single-row group)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub std: Option<f64>,
}

/// Hypothesis test with the decision applied
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonTTest {
    #[serde(flatten)]
    pub result: TTestResult,
    pub alpha: f64,
    pub decision: Decision,
    pub message: String,
}

/// Top-level JSON document, tagged by view
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum JsonOutput {
    Dataset {
        rows: usize,
        records: Vec<SalesRecord>,
    },
    Describe {
        column: String,
        summary: SummaryStats,
        categories: Vec<JsonCategoryStats>,
    },
    Chart {
        title: String,
        chart: Chart,
    },
    TTest(JsonTTest),
}

impl JsonOutput {
    pub fn categories_from(
        groups: &BTreeMap<Category, CategoryAggregate>,
    ) -> Vec<JsonCategoryStats> {
        groups
            .iter()
            .map(|(category, agg)| JsonCategoryStats {
                category: *category,
                count: agg.count,
                sum: agg.sum,
                mean: agg.mean,
                std: agg.std,
            })
            .collect()
    }

    pub fn ttest(result: TTestResult, alpha: f64) -> Self {
        let decision = result.decision(alpha);
        JsonOutput::TTest(JsonTTest {
            result,
            alpha,
            decision,
            message: decision.message().to_string(),
        })
    }

    /// Pretty-printed JSON document
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
