//! Runner configuration loaded from TOML.
//!
//! ```toml
//! [strategy]
//! mode = "override"
//! fast_window = 12
//! slow_window = 26
//! signal_window = 9
//! rsi_window = 14
//! short_ma_window = 50
//! long_ma_window = 200
//!
//! [strategy.thresholds]
//! oversold = 30.0
//! overbought = 70.0
//!
//! [output]
//! format = "summary"
//! include_indicators = false
//! ```
//!
//! Every key is optional. Parameters are validated on load, so a
//! `RunnerConfig` obtained from [`RunnerConfig::from_file`] or
//! [`RunnerConfig::from_toml`] is always runnable.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use momentumlab_core::{ParamError, StrategyParams};

/// Errors from loading or validating a config.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error(transparent)]
    Invalid(#[from] ParamError),
}

/// How a classification is rendered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    /// Human-readable report.
    #[default]
    Summary,
    /// Pretty-printed `ClassificationResult`.
    Json,
    /// One row per bar with indicators and label.
    Csv,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Summary => "summary",
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "summary" => Ok(OutputFormat::Summary),
            "json" => Ok(OutputFormat::Json),
            "csv" => Ok(OutputFormat::Csv),
            other => Err(format!(
                "unknown output format '{other}' (expected summary, json or csv)"
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    pub format: OutputFormat,
    /// Embed the per-bar indicator frame in the result.
    pub include_indicators: bool,
}

impl OutputConfig {
    /// CSV export is per bar, so it always needs the frame.
    pub fn wants_indicators(&self) -> bool {
        self.include_indicators || self.format == OutputFormat::Csv
    }
}

/// Top-level runner config: strategy parameters plus output options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunnerConfig {
    pub strategy: StrategyParams,
    pub output: OutputConfig,
}

impl RunnerConfig {
    /// Parse and validate a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: RunnerConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.strategy.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use momentumlab_core::ClassifierMode;

    #[test]
    fn empty_toml_is_default() {
        let config = RunnerConfig::from_toml("").unwrap();
        assert_eq!(config, RunnerConfig::default());
        assert_eq!(config.strategy.windows.slow_window, 26);
        assert_eq!(config.output.format, OutputFormat::Summary);
    }

    #[test]
    fn full_config_parses() {
        let toml_str = r#"
[strategy]
mode = "ma_confluence"
fast_window = 8
slow_window = 21
signal_window = 5
rsi_window = 10
short_ma_window = 20
long_ma_window = 100

[strategy.thresholds]
oversold = 25.0
overbought = 75.0

[output]
format = "json"
include_indicators = true
"#;
        let config = RunnerConfig::from_toml(toml_str).unwrap();
        assert_eq!(config.strategy.mode, ClassifierMode::MaConfluence);
        assert_eq!(config.strategy.windows.fast_window, 8);
        assert_eq!(config.strategy.windows.long_ma_window, 100);
        assert_eq!(config.strategy.thresholds.oversold, 25.0);
        assert_eq!(config.output.format, OutputFormat::Json);
        assert!(config.output.include_indicators);
    }

    #[test]
    fn partial_strategy_table_keeps_defaults() {
        let config = RunnerConfig::from_toml("[strategy]\nrsi_window = 7\n").unwrap();
        assert_eq!(config.strategy.windows.rsi_window, 7);
        assert_eq!(config.strategy.windows.fast_window, 12);
        assert_eq!(config.strategy.thresholds.overbought, 70.0);
    }

    #[test]
    fn zero_window_is_rejected() {
        let err = RunnerConfig::from_toml("[strategy]\nshort_ma_window = 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
        assert!(err.to_string().contains("short_ma_window"));
    }

    #[test]
    fn negative_window_is_a_parse_error() {
        let err = RunnerConfig::from_toml("[strategy]\nfast_window = -3\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn unknown_mode_is_a_parse_error() {
        let err = RunnerConfig::from_toml("[strategy]\nmode = \"vote\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn unknown_output_key_is_rejected() {
        let err = RunnerConfig::from_toml("[output]\ncolour = true\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn misspelled_strategy_key_is_rejected() {
        let err = RunnerConfig::from_toml("[strategy]\nrsi_windw = 7\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
        assert!(err.to_string().contains("rsi_windw"));
    }

    #[test]
    fn inverted_thresholds_are_rejected() {
        let toml_str = "[strategy.thresholds]\noversold = 80.0\noverbought = 20.0\n";
        let err = RunnerConfig::from_toml(toml_str).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(ParamError::InvalidThresholds { .. })));
    }

    #[test]
    fn toml_round_trip() {
        let mut config = RunnerConfig::default();
        config.strategy.windows.rsi_window = 21;
        config.output.format = OutputFormat::Csv;
        let text = config.to_toml().unwrap();
        assert_eq!(RunnerConfig::from_toml(&text).unwrap(), config);
    }

    #[test]
    fn missing_file_reports_path() {
        let err = RunnerConfig::from_file(Path::new("/nonexistent/momentumlab.toml")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/momentumlab.toml"));
    }

    #[test]
    fn csv_output_needs_indicators() {
        let output = OutputConfig {
            format: OutputFormat::Csv,
            include_indicators: false,
        };
        assert!(output.wants_indicators());
        assert!(!OutputConfig::default().wants_indicators());
    }

    #[test]
    fn output_format_from_str() {
        assert_eq!("JSON".parse::<OutputFormat>(), Ok(OutputFormat::Json));
        assert!("xml".parse::<OutputFormat>().is_err());
    }
}
