//! One-sample t-test
//!
//! H0: the population mean equals `mu`. The statistic is
//! `t = (x̄ - mu) / (s / √n)` with `n - 1` degrees of freedom and the
//! p-value is two-tailed.

use crate::error::{InsightsError, Result};
use crate::special::t_two_tailed_p;
use crate::stats::{mean, sample_variance};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Conventional significance level (alpha)
pub const SIGNIFICANCE_LEVEL: f64 = 0.05;

/// Outcome of comparing a p-value against alpha
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    /// p < alpha: the sample mean differs significantly from `mu`
    RejectNull,
    /// p >= alpha: no significant difference found
    FailToReject,
}

impl Decision {
    pub fn message(&self) -> &'static str {
        match self {
            Decision::RejectNull => {
                "Reject the null hypothesis: Mean units sold is significantly different."
            }
            Decision::FailToReject => {
                "Fail to reject the null hypothesis: No significant difference found."
            }
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Result of a one-sample t-test
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TTestResult {
    pub t_statistic: f64,
    /// Two-tailed p-value
    pub p_value: f64,
    pub degrees_of_freedom: f64,
    pub sample_size: usize,
    pub sample_mean: f64,
    pub sample_std: f64,
    pub hypothesized_mean: f64,
}

impl TTestResult {
    /// Apply the decision rule at significance level `alpha`
    pub fn decision(&self, alpha: f64) -> Decision {
        if self.p_value < alpha {
            Decision::RejectNull
        } else {
            Decision::FailToReject
        }
    }

    /// Standard error of the mean
    pub fn standard_error(&self) -> f64 {
        self.sample_std / (self.sample_size as f64).sqrt()
    }

    /// (t, p) pair
    pub fn as_pair(&self) -> (f64, f64) {
        (self.t_statistic, self.p_value)
    }
}

/// Run a one-sample t-test of `column` against hypothesized mean `mu`
///
/// # Errors
/// `CannotCompute` when the column has fewer than 2 observations, its
/// standard deviation is zero, or any input is NaN/infinite.
///
/// # Example
/// ```
/// use revenue_insights::hypothesis::{one_sample_ttest, Decision, SIGNIFICANCE_LEVEL};
///
/// let sample = [18.0, 22.0, 19.0, 25.0, 21.0, 17.0, 23.0];
/// let result = one_sample_ttest(&sample, 20.0).unwrap();
/// assert!(result.p_value > SIGNIFICANCE_LEVEL);
/// assert_eq!(result.decision(SIGNIFICANCE_LEVEL), Decision::FailToReject);
/// ```
pub fn one_sample_ttest(column: &[f64], mu: f64) -> Result<TTestResult> {
    if column.len() < 2 {
        return Err(InsightsError::insufficient_data("t-test", 2, column.len()));
    }
    if !mu.is_finite() || !column.iter().all(|x| x.is_finite()) {
        return Err(InsightsError::non_finite("t-test"));
    }

    // A constant column can leave a rounding residual in the variance
    let first = column[0];
    if column.iter().all(|&x| x == first) {
        return Err(InsightsError::zero_variance("t-test"));
    }

    let n = column.len();
    let sample_mean = mean(column);
    let sample_std = sample_variance(column, sample_mean)
        .map(f64::sqrt)
        .ok_or_else(|| InsightsError::insufficient_data("t-test", 2, n))?;

    if sample_std == 0.0 {
        return Err(InsightsError::zero_variance("t-test"));
    }

    let df = (n - 1) as f64;
    let t_statistic = (sample_mean - mu) / (sample_std / (n as f64).sqrt());
    let p_value = t_two_tailed_p(t_statistic, df);

    tracing::debug!(n, mu, t_statistic, p_value, "one-sample t-test");

    Ok(TTestResult {
        t_statistic,
        p_value,
        degrees_of_freedom: df,
        sample_size: n,
        sample_mean,
        sample_std,
        hypothesized_mean: mu,
    })
}
