//! Property-based tests for the summary and test engine
//!
//! Core properties:
//! 1. Dataset shape and determinism per seed
//! 2. Descriptive statistics agree with their closed-form definitions
//! 3. One-sample t-test symmetry and boundary behavior
//! 4. Group aggregates partition the column

use proptest::prelude::*;
use revenue_insights::csv_output::CsvOutput;
use revenue_insights::dataset::{generate_with, GeneratorConfig};
use revenue_insights::{describe, generate_dataset, group_stats, one_sample_ttest, Category};

const TOL: f64 = 1e-9;

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() <= TOL * a.abs().max(b.abs()).max(1.0)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_dataset_shape(n in 1usize..200, seed in any::<u64>()) {
        let dataset = generate_dataset(n, seed).unwrap();
        prop_assert_eq!(dataset.len(), n);

        for (i, record) in dataset.iter().enumerate() {
            prop_assert_eq!(record.product_id as usize, i + 1);
            prop_assert_eq!(&record.product_name, &format!("Product{}", i + 1));
            prop_assert!(Category::ALL.contains(&record.category));
        }

        let dates: Vec<_> = dataset.iter().map(|r| r.sales_date).collect();
        for pair in dates.windows(2) {
            prop_assert_eq!((pair[1] - pair[0]).num_days(), 1);
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_same_seed_same_csv(n in 1usize..100, seed in any::<u64>()) {
        let a = CsvOutput::from_dataset(&generate_dataset(n, seed).unwrap()).to_csv();
        let b = CsvOutput::from_dataset(&generate_dataset(n, seed).unwrap()).to_csv();
        prop_assert_eq!(a.as_bytes(), b.as_bytes());
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_describe_matches_definitions(
        column in prop::collection::vec(0.0f64..1_000.0, 2..100),
    ) {
        let summary = describe(&column).unwrap();
        let n = column.len() as f64;
        let mean = column.iter().sum::<f64>() / n;
        let variance = column.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1.0);

        prop_assert_eq!(summary.count, column.len());
        prop_assert!(close(summary.mean, mean));
        prop_assert!(close(summary.variance.unwrap(), variance));
        prop_assert!(close(summary.std.unwrap(), variance.sqrt()));

        let mut sorted = column.clone();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap());
        prop_assert_eq!(summary.min, sorted[0]);
        prop_assert_eq!(summary.max, sorted[sorted.len() - 1]);

        prop_assert!(summary.min <= summary.q1);
        prop_assert!(summary.q1 <= summary.median);
        prop_assert!(summary.median <= summary.q3);
        prop_assert!(summary.q3 <= summary.max);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_ttest_at_sample_mean(
        column in prop::collection::vec(0.0f64..100.0, 3..60),
    ) {
        let mean = column.iter().sum::<f64>() / column.len() as f64;
        // Skip near-constant columns
        prop_assume!(column.iter().any(|x| (x - mean).abs() > 1.0));

        let result = one_sample_ttest(&column, mean).unwrap();
        prop_assert!(result.t_statistic.abs() < 1e-9);
        prop_assert!((result.p_value - 1.0).abs() < 1e-6);
    }

    #[test]
    fn prop_ttest_symmetric(
        column in prop::collection::vec(0.0f64..100.0, 3..60),
        delta in 0.1f64..50.0,
    ) {
        let mean = column.iter().sum::<f64>() / column.len() as f64;
        prop_assume!(column.iter().any(|x| (x - mean).abs() > 1.0));

        let above = one_sample_ttest(&column, mean + delta).unwrap();
        let below = one_sample_ttest(&column, mean - delta).unwrap();
        let scale = above.t_statistic.abs().max(1.0);
        prop_assert!((above.t_statistic + below.t_statistic).abs() < 1e-9 * scale);
        prop_assert!((above.p_value - below.p_value).abs() < 1e-9);
        prop_assert!(above.p_value >= 0.0 && above.p_value <= 1.0);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn prop_group_sums_partition_total(n in 1usize..150, seed in any::<u64>()) {
        let dataset = generate_dataset(n, seed).unwrap();
        let groups = group_stats(&dataset, |r| r.category);

        let total: u64 = groups.values().map(|g| g.sum).sum();
        let count: usize = groups.values().map(|g| g.count).sum();
        prop_assert_eq!(total, dataset.total_units());
        prop_assert_eq!(count, n);

        for aggregate in groups.values() {
            prop_assert!(aggregate.count > 0);
            prop_assert_eq!(aggregate.std.is_none(), aggregate.count == 1);
        }
    }

    #[test]
    fn prop_lambda_changes_units_not_categories(seed in any::<u64>()) {
        let base = GeneratorConfig { rows: 30, seed, ..GeneratorConfig::default() };
        let shifted = GeneratorConfig { poisson_lambda: 5.0, ..base.clone() };

        let a = generate_with(&base).unwrap();
        let b = generate_with(&shifted).unwrap();
        let cats_a: Vec<_> = a.iter().map(|r| r.category).collect();
        let cats_b: Vec<_> = b.iter().map(|r| r.category).collect();
        prop_assert_eq!(cats_a, cats_b);
    }
}

#[test]
fn test_default_dataset_row_one_golden() {
    // 20 rows, lambda 20, seed 42 on rand 0.8 StdRng
    let first = generate_dataset(20, 42).unwrap().records()[0].clone();
    assert_eq!(first.product_id, 1);
    assert_eq!(first.product_name, "Product1");
    assert_eq!(first.category, Category::Home);
    assert_eq!(first.units_sold, 15);
    assert_eq!(first.sales_date.to_string(), "2023-01-01");

    for _ in 0..5 {
        assert_eq!(generate_dataset(20, 42).unwrap().records()[0], first);
    }
}

#[test]
fn test_row_prefix_independent_of_length() {
    // Every category is drawn before any units, so a longer dataset shares
    // the shorter one's categories but not its units.
    let short = generate_dataset(5, 42).unwrap();
    let long = generate_dataset(50, 42).unwrap();
    for (a, b) in short.iter().zip(long.iter()) {
        assert_eq!(a.product_id, b.product_id);
        assert_eq!(a.sales_date, b.sales_date);
        assert_eq!(a.category, b.category);
    }
}

#[test]
fn test_different_seeds_differ() {
    let a = generate_dataset(20, 1).unwrap();
    let b = generate_dataset(20, 2).unwrap();
    assert_ne!(a, b);
}

#[test]
fn test_default_units_near_lambda() {
    let dataset = generate_dataset(5_000, 42).unwrap();
    let summary = describe(&dataset.units_sold()).unwrap();
    assert!((summary.mean - 20.0).abs() < 0.5, "mean = {}", summary.mean);
    assert!(
        (summary.variance.unwrap() - 20.0).abs() < 2.0,
        "variance = {:?}",
        summary.variance
    );
}
