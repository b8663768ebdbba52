//! Configuration for dataset generation and analysis
//!
//! Loaded from an optional TOML file; CLI flags override file values, which
//! override the defaults below.
//!
//! ```toml
//! [generator]
//! rows = 20
//! seed = 42
//! poisson_lambda = 20.0
//! start_date = "2023-01-01"
//!
//! [analysis]
//! significance_level = 0.05
//! hypothesized_mean = 20.0
//! histogram_bins = 10
//! ```

use crate::charts::DEFAULT_BINS;
use crate::dataset::GeneratorConfig;
use crate::error::{InsightsError, Result};
use crate::hypothesis::SIGNIFICANCE_LEVEL;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Default hypothesized mean for the t-test view
pub const DEFAULT_HYPOTHESIZED_MEAN: f64 = 20.0;

/// Parameters of the statistics and chart views
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Significance level (alpha) for the t-test decision
    ///
    /// - 0.05 (default): 95% confidence
    /// - 0.01: stricter, fewer false rejections
    /// - 0.10: looser, more false rejections
    pub significance_level: f64,

    /// Hypothesized population mean of units sold
    pub hypothesized_mean: f64,

    /// Number of equal-width histogram bins
    pub histogram_bins: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            significance_level: SIGNIFICANCE_LEVEL,
            hypothesized_mean: DEFAULT_HYPOTHESIZED_MEAN,
            histogram_bins: DEFAULT_BINS,
        }
    }
}

impl AnalysisConfig {
    /// 99% confidence
    pub fn strict() -> Self {
        Self {
            significance_level: 0.01,
            ..Self::default()
        }
    }

    /// 90% confidence
    pub fn permissive() -> Self {
        Self {
            significance_level: 0.10,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.significance_level > 0.0 && self.significance_level < 1.0) {
            return Err(InsightsError::invalid(format!(
                "significance_level must be in (0, 1), got {}",
                self.significance_level
            )));
        }

        if !self.hypothesized_mean.is_finite() {
            return Err(InsightsError::invalid(format!(
                "hypothesized_mean must be finite, got {}",
                self.hypothesized_mean
            )));
        }

        if self.histogram_bins == 0 {
            return Err(InsightsError::invalid("histogram_bins must be > 0"));
        }

        Ok(())
    }
}

/// Complete configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InsightsConfig {
    pub generator: GeneratorConfig,
    pub analysis: AnalysisConfig,
}

impl InsightsConfig {
    /// Load configuration from a TOML file
    ///
    /// Missing tables and keys fall back to defaults. The result is not
    /// validated.
    pub fn from_toml<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config = Self::from_toml_str(&content)
            .with_context(|| format!("Failed to load config file: {}", path.display()))?;

        tracing::info!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    /// Parse configuration from TOML text
    ///
    /// Values are range-checked by `validate`, after command-line overrides
    /// have been applied.
    pub fn from_toml_str(content: &str) -> anyhow::Result<Self> {
        toml::from_str(content).context("Failed to parse TOML configuration")
    }

    pub fn validate(&self) -> Result<()> {
        self.generator.validate()?;
        self.analysis.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_default_config() {
        let config = InsightsConfig::default();
        assert_eq!(config.generator.rows, 20);
        assert_eq!(config.generator.seed, 42);
        assert_eq!(config.generator.poisson_lambda, 20.0);
        assert_eq!(
            config.generator.start_date,
            NaiveDate::from_ymd_opt(2023, 1, 1).unwrap()
        );
        assert_eq!(config.analysis.significance_level, 0.05);
        assert_eq!(config.analysis.histogram_bins, 10);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_presets() {
        assert_eq!(AnalysisConfig::strict().significance_level, 0.01);
        assert_eq!(AnalysisConfig::permissive().significance_level, 0.10);
        assert!(AnalysisConfig::strict().validate().is_ok());
        assert!(AnalysisConfig::permissive().validate().is_ok());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = InsightsConfig::from_toml_str(
            r#"
            [generator]
            rows = 100

            [analysis]
            significance_level = 0.01
            "#,
        )
        .unwrap();

        assert_eq!(config.generator.rows, 100);
        assert_eq!(config.generator.seed, 42);
        assert_eq!(config.analysis.significance_level, 0.01);
        assert_eq!(config.analysis.hypothesized_mean, 20.0);
    }

    #[test]
    fn test_start_date_string() {
        let config = InsightsConfig::from_toml_str(
            r#"
            [generator]
            start_date = "2024-06-30"
            "#,
        )
        .unwrap();
        assert_eq!(
            config.generator.start_date,
            NaiveDate::from_ymd_opt(2024, 6, 30).unwrap()
        );
    }

    #[test]
    fn test_empty_toml_is_default() {
        let config = InsightsConfig::from_toml_str("").unwrap();
        assert_eq!(config, InsightsConfig::default());
    }

    #[test]
    fn test_invalid_values_rejected() {
        for content in [
            "[generator]\nrows = 0\n",
            "[analysis]\nsignificance_level = 1.5\n",
            "[analysis]\nhistogram_bins = 0\n",
        ] {
            let config = InsightsConfig::from_toml_str(content).unwrap();
            assert!(config.validate().is_err(), "{content}");
        }
        assert!(InsightsConfig::from_toml_str("[generator]\nrows = \"many\"\n").is_err());
    }

    #[test]
    fn test_out_of_range_file_value_can_be_overridden() {
        let mut config = InsightsConfig::from_toml_str("[generator]\nrows = 0\n").unwrap();
        assert!(config.validate().is_err());
        config.generator.rows = 5;
        assert!(config.validate().is_ok());
    }

    #[test]
    #[allow(clippy::field_reassign_with_default)]
    fn test_invalid_significance_level() {
        let mut config = AnalysisConfig::default();
        config.significance_level = 0.0;
        assert!(config.validate().is_err());
        config.significance_level = f64::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_toml_missing_file() {
        let err = InsightsConfig::from_toml("/nonexistent/insights.toml").unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }
}
