use crate::error::ConfigError;
use core_types::DataKind;
use serde::Deserialize;
use std::path::PathBuf;

/// The root configuration structure for the entire application.
///
/// Every section is optional; an empty file yields the defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub dataset: DatasetSettings,
    pub analysis: AnalysisSettings,
    pub logging: LoggingSettings,
}

/// Where the dataset document lives and which record collection to use.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatasetSettings {
    pub path: PathBuf,
    pub data_kind: DataKind,
}

/// Years and safeguards for growth metrics.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AnalysisSettings {
    /// When unset, the dataset metadata decides.
    pub base_year: Option<i32>,
    /// When unset, the dataset metadata decides.
    pub forecast_year: Option<i32>,
    /// Growth ratios are clamped to this multiple before computing CAGR.
    pub max_growth_multiple: f64,
    /// Upper bound of any reported CAGR, in percent.
    pub max_cagr_pct: f64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// An `EnvFilter` directive, e.g. `"info"` or `"market_lens=debug"`. `RUST_LOG` wins.
    pub level: String,
    /// Enables a daily rolling log file in this directory.
    pub directory: Option<PathBuf>,
}

// --- Default Implementations ---

impl Default for DatasetSettings {
    fn default() -> Self {
        Self {
            path: PathBuf::from("data/comparison-data.json"),
            data_kind: DataKind::Value,
        }
    }
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            base_year: None,
            forecast_year: None,
            max_growth_multiple: 100.0,
            max_cagr_pct: 100.0,
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self { level: "info".to_string(), directory: None }
    }
}

impl AnalysisSettings {
    /// Configured years, each falling back to the given `(base, forecast)` defaults.
    pub fn resolve_years(&self, defaults: (i32, i32)) -> (i32, i32) {
        (
            self.base_year.unwrap_or(defaults.0),
            self.forecast_year.unwrap_or(defaults.1),
        )
    }
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let analysis = &self.analysis;
        if let (Some(base), Some(forecast)) = (analysis.base_year, analysis.forecast_year) {
            if forecast <= base {
                return Err(ConfigError::ValidationError(format!(
                    "analysis.forecast_year ({forecast}) must be after analysis.base_year ({base})"
                )));
            }
        }
        if !(analysis.max_growth_multiple >= 1.0) {
            return Err(ConfigError::ValidationError(format!(
                "analysis.max_growth_multiple must be at least 1, got {}",
                analysis.max_growth_multiple
            )));
        }
        if !(analysis.max_cagr_pct > 0.0) {
            return Err(ConfigError::ValidationError(format!(
                "analysis.max_cagr_pct must be positive, got {}",
                analysis.max_cagr_pct
            )));
        }
        if self.logging.level.trim().is_empty() {
            return Err(ConfigError::ValidationError("logging.level must not be empty".to_string()));
        }
        Ok(())
    }
}
