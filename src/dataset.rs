//! Synthetic retail sales dataset
//!
//! The dataset is generated once from a seed and then passed explicitly to
//! every view. Columns are drawn in order: categories for every row, then
//! units sold for every row.

use crate::distributions::Poisson;
use crate::error::{InsightsError, Result};
use chrono::{Datelike, Days, NaiveDate, Weekday};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Default number of rows in the dashboard dataset
pub const DEFAULT_ROWS: usize = 20;

/// Default RNG seed
pub const DEFAULT_SEED: u64 = 42;

/// Default Poisson rate for units sold
pub const DEFAULT_POISSON_LAMBDA: f64 = 20.0;

/// First sales date (2023-01-01)
pub fn default_start_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2023, 1, 1).unwrap_or(NaiveDate::MIN)
}

/// Product category label
///
/// Ordered alphabetically by label, so grouped output lists Clothing first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Electronic,
    Clothing,
    Home,
    Sports,
}

impl Category {
    /// All categories in draw order
    pub const ALL: [Category; 4] = [
        Category::Electronic,
        Category::Clothing,
        Category::Home,
        Category::Sports,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Electronic => "Electronic",
            Category::Clothing => "Clothing",
            Category::Home => "Home",
            Category::Sports => "Sports",
        }
    }
}

impl Ord for Category {
    fn cmp(&self, other: &Self) -> Ordering {
        self.as_str().cmp(other.as_str())
    }
}

impl PartialOrd for Category {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = InsightsError;

    fn from_str(s: &str) -> Result<Self> {
        Category::ALL
            .iter()
            .copied()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                InsightsError::invalid(format!(
                    "unknown category '{}' (expected one of: Electronic, Clothing, Home, Sports)",
                    s
                ))
            })
    }
}

/// A single generated sales row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalesRecord {
    pub product_id: u32,
    pub product_name: String,
    pub category: Category,
    pub units_sold: u64,
    pub sales_date: NaiveDate,
}

impl SalesRecord {
    pub fn weekday(&self) -> Weekday {
        self.sales_date.weekday()
    }
}

/// Parameters for the synthetic dataset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Number of products (rows)
    pub rows: usize,
    /// RNG seed
    pub seed: u64,
    /// Poisson rate for units sold
    pub poisson_lambda: f64,
    /// Date of the first row; each subsequent row is one day later
    pub start_date: NaiveDate,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            rows: DEFAULT_ROWS,
            seed: DEFAULT_SEED,
            poisson_lambda: DEFAULT_POISSON_LAMBDA,
            start_date: default_start_date(),
        }
    }
}

impl GeneratorConfig {
    pub fn validate(&self) -> Result<()> {
        if self.rows == 0 {
            return Err(InsightsError::invalid("rows must be > 0"));
        }
        if self.rows > u32::MAX as usize {
            return Err(InsightsError::invalid(format!(
                "rows must fit a u32 product id, got {}",
                self.rows
            )));
        }
        if !self.poisson_lambda.is_finite() || self.poisson_lambda <= 0.0 {
            return Err(InsightsError::invalid(format!(
                "poisson_lambda must be finite and > 0, got {}",
                self.poisson_lambda
            )));
        }
        if self
            .start_date
            .checked_add_days(Days::new(self.rows as u64 - 1))
            .is_none()
        {
            return Err(InsightsError::invalid(format!(
                "{} daily rows starting {} overflow the calendar",
                self.rows, self.start_date
            )));
        }
        Ok(())
    }
}

/// Ordered, read-only collection of sales records
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dataset {
    records: Vec<SalesRecord>,
}

impl Dataset {
    /// Wrap existing records (e.g. hand-built fixtures)
    pub fn from_records(records: Vec<SalesRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[SalesRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SalesRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Units sold as a numeric column for the statistics engine
    pub fn units_sold(&self) -> Vec<f64> {
        self.records.iter().map(|r| r.units_sold as f64).collect()
    }

    pub fn total_units(&self) -> u64 {
        self.records.iter().map(|r| r.units_sold).sum()
    }

    /// Rows belonging to a single category, order preserved
    pub fn filter_category(&self, category: Category) -> Dataset {
        Dataset {
            records: self
                .records
                .iter()
                .filter(|r| r.category == category)
                .cloned()
                .collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Dataset {
    type Item = &'a SalesRecord;
    type IntoIter = std::slice::Iter<'a, SalesRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// Generate `n` rows with the default Poisson rate and start date
///
/// # Errors
/// `InvalidConfiguration` when `n == 0`.
///
/// # Example
/// ```
/// use revenue_insights::dataset::generate_dataset;
///
/// let dataset = generate_dataset(20, 42).unwrap();
/// assert_eq!(dataset.len(), 20);
/// assert_eq!(dataset.records()[0].product_name, "Product1");
/// ```
pub fn generate_dataset(n: usize, seed: u64) -> Result<Dataset> {
    generate_with(&GeneratorConfig {
        rows: n,
        seed,
        ..GeneratorConfig::default()
    })
}

/// Generate a dataset from a full generator configuration
pub fn generate_with(config: &GeneratorConfig) -> Result<Dataset> {
    config.validate()?;

    let poisson = Poisson::new(config.poisson_lambda)?;
    let mut rng = StdRng::seed_from_u64(config.seed);

    let categories: Vec<Category> = (0..config.rows)
        .map(|_| Category::ALL[rng.gen_range(0..Category::ALL.len())])
        .collect();
    let units: Vec<u64> = (0..config.rows).map(|_| poisson.sample(&mut rng)).collect();

    let mut records = Vec::with_capacity(config.rows);
    for (offset, (category, units_sold)) in categories.into_iter().zip(units).enumerate() {
        let product_id = offset as u32 + 1;
        let sales_date = config
            .start_date
            .checked_add_days(Days::new(offset as u64))
            .ok_or_else(|| InsightsError::invalid("sales date overflow"))?;

        records.push(SalesRecord {
            product_id,
            product_name: format!("Product{}", product_id),
            category,
            units_sold,
            sales_date,
        });
    }

    tracing::debug!(
        rows = records.len(),
        seed = config.seed,
        lambda = poisson.lambda(),
        "generated sales dataset"
    );

    Ok(Dataset { records })
}
