//! Descriptive statistics over the units-sold column
//!
//! `describe` mirrors the shape of a pandas `describe()` summary
//! (count, mean, std, min, 25%, 50%, 75%, max). Standard deviation and
//! variance use the sample (N-1) denominator; quartiles use linear
//! interpolation between closest ranks (Hyndman & Fan type 7).

use crate::dataset::{Category, Dataset, SalesRecord};
use crate::error::{InsightsError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Summary of a numeric column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryStats {
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation; `None` for a single observation
    pub std: Option<f64>,
    /// Sample variance; `None` for a single observation
    pub variance: Option<f64>,
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
}

impl SummaryStats {
    /// Interquartile range
    pub fn iqr(&self) -> f64 {
        self.q3 - self.q1
    }

    /// Rows in `describe()` order, as (label, value)
    pub fn rows(&self) -> Vec<(&'static str, Option<f64>)> {
        vec![
            ("count", Some(self.count as f64)),
            ("mean", Some(self.mean)),
            ("std", self.std),
            ("min", Some(self.min)),
            ("25%", Some(self.q1)),
            ("50%", Some(self.median)),
            ("75%", Some(self.q3)),
            ("max", Some(self.max)),
        ]
    }
}

/// Per-group rollup of units sold
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryAggregate {
    pub count: usize,
    pub sum: u64,
    pub mean: f64,
    /// Sample standard deviation; `None` when the group has one row
    pub std: Option<f64>,
}

/// Compute the summary of a numeric column
///
/// # Errors
/// `CannotCompute` when the column is empty or holds NaN/infinite values.
///
/// # Example
/// ```
/// use revenue_insights::stats::describe;
///
/// let summary = describe(&[1.0, 2.0, 3.0, 4.0]).unwrap();
/// assert_eq!(summary.count, 4);
/// assert!((summary.mean - 2.5).abs() < 1e-12);
/// assert!((summary.q1 - 1.75).abs() < 1e-12);
/// ```
pub fn describe(column: &[f64]) -> Result<SummaryStats> {
    if column.is_empty() {
        return Err(InsightsError::insufficient_data("summary", 1, 0));
    }
    if !column.iter().all(|x| x.is_finite()) {
        return Err(InsightsError::non_finite("summary"));
    }

    let mut sorted = column.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let mean = mean(column);
    let variance = sample_variance(column, mean);

    Ok(SummaryStats {
        count: column.len(),
        mean,
        std: variance.map(f64::sqrt),
        variance,
        min: sorted[0],
        q1: quantile_sorted(&sorted, 0.25),
        median: quantile_sorted(&sorted, 0.5),
        q3: quantile_sorted(&sorted, 0.75),
        max: sorted[sorted.len() - 1],
    })
}

/// Arithmetic mean; callers guarantee a non-empty slice
pub(crate) fn mean(data: &[f64]) -> f64 {
    data.iter().sum::<f64>() / data.len() as f64
}

/// Two-pass sample variance around a precomputed mean
pub(crate) fn sample_variance(data: &[f64], mean: f64) -> Option<f64> {
    if data.len() < 2 {
        return None;
    }
    let ss: f64 = data.iter().map(|x| (x - mean).powi(2)).sum();
    Some(ss / (data.len() - 1) as f64)
}

/// Linear-interpolation quantile on pre-sorted data
///
/// `p` is clamped to [0, 1]. Returns NaN for an empty slice.
pub fn quantile_sorted(sorted: &[f64], p: f64) -> f64 {
    match sorted.len() {
        0 => f64::NAN,
        1 => sorted[0],
        n => {
            let h = p.clamp(0.0, 1.0) * (n - 1) as f64;
            let lower = h.floor() as usize;
            let upper = h.ceil() as usize;
            if lower == upper {
                sorted[lower]
            } else {
                sorted[lower] + (h - lower as f64) * (sorted[upper] - sorted[lower])
            }
        }
    }
}

/// Group rows by `key` and aggregate units sold per group
///
/// Only keys present in the dataset appear in the result; the map is
/// ordered by key.
pub fn group_stats<K, F>(dataset: &Dataset, key: F) -> BTreeMap<K, CategoryAggregate>
where
    K: Ord,
    F: Fn(&SalesRecord) -> K,
{
    let mut groups: BTreeMap<K, Vec<u64>> = BTreeMap::new();
    for record in dataset {
        groups.entry(key(record)).or_default().push(record.units_sold);
    }

    groups
        .into_iter()
        .map(|(k, units)| (k, aggregate(&units)))
        .collect()
}

/// `group_stats` keyed by product category
pub fn category_stats(dataset: &Dataset) -> BTreeMap<Category, CategoryAggregate> {
    group_stats(dataset, |r| r.category)
}

fn aggregate(units: &[u64]) -> CategoryAggregate {
    let values: Vec<f64> = units.iter().map(|&u| u as f64).collect();
    let mean = mean(&values);
    CategoryAggregate {
        count: units.len(),
        sum: units.iter().sum(),
        mean,
        std: sample_variance(&values, mean).map(f64::sqrt),
    }
}
