//! Revenue Insights - synthetic store sales data with summary statistics
//!
//! This library generates a reproducible synthetic sales dataset (Poisson
//! distributed units sold, uniformly drawn categories, consecutive
//! dates) and computes descriptive statistics, per-category aggregates,
//! chart data and a one-sample t-test over it.
//!
//! ```
//! use revenue_insights::{describe, generate_dataset, one_sample_ttest};
//!
//! let dataset = generate_dataset(20, 42).unwrap();
//! let units = dataset.units_sold();
//! let summary = describe(&units).unwrap();
//! let test = one_sample_ttest(&units, 20.0).unwrap();
//! assert_eq!(summary.count, 20);
//! assert!(test.p_value > 0.0 && test.p_value <= 1.0);
//! ```

pub mod charts;
pub mod cli;
pub mod config;
pub mod csv_output;
pub mod dataset;
pub mod distributions;
pub mod error;
pub mod html_output;
pub mod hypothesis;
pub mod json_output;
pub mod special;
pub mod stats;
pub mod views;

pub use dataset::{generate_dataset, Category, Dataset, SalesRecord};
pub use error::{InsightsError, Result};
pub use hypothesis::{one_sample_ttest, TTestResult};
pub use stats::{describe, group_stats, CategoryAggregate, SummaryStats};
