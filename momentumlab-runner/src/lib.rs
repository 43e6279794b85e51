//! MomentumLab Runner — loading, configuration, batch runs and export.
//!
//! This crate builds on `momentumlab-core` to provide:
//! - TOML runner configuration with validation
//! - CSV price loading and deterministic synthetic series
//! - Single and batch (rayon) classification
//! - Versioned JSON, per-bar CSV and plain-text summaries

pub mod batch;
pub mod config;
pub mod export;
pub mod loader;
pub mod result;
pub mod runner;
pub mod synthetic;

pub use batch::{BatchEntry, BatchResults, BatchRunner};
pub use config::{ConfigError, OutputConfig, OutputFormat, RunnerConfig};
pub use export::{
    export_bars_csv, export_json, export_series_csv, import_json, render, render_summary,
    write_output, ExportError,
};
pub use loader::{load_csv, parse_csv, parse_timestamp, LoadError, LoadedSeries};
pub use result::{ClassificationResult, SCHEMA_VERSION};
pub use runner::{run_single, RunError, Runner};
pub use synthetic::{generate_synthetic, SyntheticError, SyntheticOptions};
