//! Error types for dataset generation and statistical computation

use thiserror::Error;

/// Errors raised by the summary and test engine
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InsightsError {
    /// Generator or analysis parameters are out of range (e.g. zero rows)
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// The input cannot support the requested statistic
    #[error("Cannot compute {statistic}: {reason}")]
    CannotCompute {
        statistic: &'static str,
        reason: String,
    },
}

impl InsightsError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidConfiguration(msg.into())
    }

    pub(crate) fn insufficient_data(
        statistic: &'static str,
        required: usize,
        actual: usize,
    ) -> Self {
        Self::CannotCompute {
            statistic,
            reason: format!("need at least {required} observations, got {actual}"),
        }
    }

    pub(crate) fn zero_variance(statistic: &'static str) -> Self {
        Self::CannotCompute {
            statistic,
            reason: "sample standard deviation is zero".to_string(),
        }
    }

    pub(crate) fn non_finite(statistic: &'static str) -> Self {
        Self::CannotCompute {
            statistic,
            reason: "input contains NaN or infinite values".to_string(),
        }
    }

    /// True for degenerate-input failures the presentation layer should
    /// show as a message rather than a configuration mistake.
    pub fn is_cannot_compute(&self) -> bool {
        matches!(self, Self::CannotCompute { .. })
    }
}

pub type Result<T> = std::result::Result<T, InsightsError>;
