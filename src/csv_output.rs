//! CSV output for the sales dataset and category aggregates
//!
//! Dataset export column order: product_id, product_name, category,
//! units_sold, sales_date

use crate::dataset::{Category, Dataset, SalesRecord};
use crate::stats::CategoryAggregate;
use std::collections::BTreeMap;

/// Header row of the dataset export
pub const DATASET_HEADER: &str = "product_id,product_name,category,units_sold,sales_date";

/// Header row of the category aggregate export
pub const CATEGORY_HEADER: &str = "category,count,sum,mean,std";

/// CSV output formatter for sales records
#[derive(Debug, Default)]
pub struct CsvOutput {
    rows: Vec<String>,
}

impl CsvOutput {
    /// Create an empty CSV output formatter
    pub fn new() -> Self {
        Self::default()
    }

    /// Formatter pre-filled with every record of `dataset`
    pub fn from_dataset(dataset: &Dataset) -> Self {
        let mut output = Self::new();
        for record in dataset {
            output.add_record(record);
        }
        output
    }

    /// Add a record to the output
    pub fn add_record(&mut self, record: &SalesRecord) {
        self.rows.push(Self::format_record(record));
    }

    /// Escape CSV field (handle commas, quotes, newlines)
    pub(crate) fn escape_field(field: &str) -> String {
        if field.contains(',') || field.contains('"') || field.contains('\n') {
            format!("\"{}\"", field.replace('"', "\"\""))
        } else {
            field.to_string()
        }
    }

    fn format_record(record: &SalesRecord) -> String {
        [
            record.product_id.to_string(),
            Self::escape_field(&record.product_name),
            record.category.as_str().to_string(),
            record.units_sold.to_string(),
            record.sales_date.format("%Y-%m-%d").to_string(),
        ]
        .join(",")
    }

    /// Generate CSV output as string
    pub fn to_csv(&self) -> String {
        let mut output = String::with_capacity(DATASET_HEADER.len() + 1 + self.rows.len() * 40);
        output.push_str(DATASET_HEADER);
        output.push('\n');

        for row in &self.rows {
            output.push_str(row);
            output.push('\n');
        }

        output
    }
}

/// CSV formatter for per-category aggregates
///
/// An undefined standard deviation (single-row group) is written as an
/// empty field.
pub fn category_stats_csv(groups: &BTreeMap<Category, CategoryAggregate>) -> String {
    let mut output = String::new();
    output.push_str(CATEGORY_HEADER);
    output.push('\n');

    for (category, agg) in groups {
        output.push_str(category.as_str());
        output.push(',');
        output.push_str(&agg.count.to_string());
        output.push(',');
        output.push_str(&agg.sum.to_string());
        output.push(',');
        output.push_str(&agg.mean.to_string());
        output.push(',');
        if let Some(std) = agg.std {
            output.push_str(&std.to_string());
        }
        output.push('\n');
    }

    output
}
