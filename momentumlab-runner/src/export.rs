//! Reporting and export: JSON, per-bar CSV and a plain-text summary.
//!
//! JSON is the full `ClassificationResult` with schema versioning; unknown
//! (newer) versions are rejected on import. CSV has one row per bar:
//! `timestamp,close,macd,macd_signal,macd_histogram,rsi,short_ma,long_ma,signal`
//! with an empty `rsi` cell where RSI is undefined.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::OutputFormat;
use crate::loader::LoadedSeries;
use crate::result::{ClassificationResult, SCHEMA_VERSION};

/// Errors from rendering or writing artifacts.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to write '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("failed to flush CSV writer: {0}")]
    Flush(String),

    #[error("unsupported schema version {found} (max supported: {max})")]
    UnsupportedSchema { found: u32, max: u32 },

    #[error("per-bar export needs the indicator frame; rerun with indicators included")]
    MissingIndicators,
}

// ─── JSON ───────────────────────────────────────────────────────────

pub fn export_json(result: &ClassificationResult) -> Result<String, ExportError> {
    Ok(serde_json::to_string_pretty(result)?)
}

/// Deserialize a result, rejecting schema versions newer than this build.
pub fn import_json(json: &str) -> Result<ClassificationResult, ExportError> {
    let result: ClassificationResult = serde_json::from_str(json)?;
    if result.schema_version > SCHEMA_VERSION {
        return Err(ExportError::UnsupportedSchema {
            found: result.schema_version,
            max: SCHEMA_VERSION,
        });
    }
    Ok(result)
}

// ─── CSV ────────────────────────────────────────────────────────────

pub fn export_bars_csv(result: &ClassificationResult) -> Result<String, ExportError> {
    let frame = result
        .indicators
        .as_ref()
        .ok_or(ExportError::MissingIndicators)?;

    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record([
        "timestamp",
        "close",
        "macd",
        "macd_signal",
        "macd_histogram",
        "rsi",
        "short_ma",
        "long_ma",
        "signal",
    ])?;

    for (row, signal) in frame.rows().iter().zip(result.signals.iter()) {
        wtr.write_record([
            row.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
            row.close.to_string(),
            format!("{:.6}", row.macd),
            format!("{:.6}", row.macd_signal),
            format!("{:.6}", row.macd_histogram),
            row.rsi.map(|v| format!("{v:.4}")).unwrap_or_default(),
            format!("{:.6}", row.short_ma),
            format!("{:.6}", row.long_ma),
            signal.as_str().to_string(),
        ])?;
    }

    let data = wtr
        .into_inner()
        .map_err(|e| ExportError::Flush(e.to_string()))?;
    String::from_utf8(data).map_err(|e| ExportError::Flush(e.to_string()))
}

/// Write a price series as `timestamp,close`, readable by `load_csv`.
pub fn export_series_csv(series: &LoadedSeries) -> Result<String, ExportError> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(["timestamp", "close"])?;
    for p in &series.points {
        wtr.write_record([
            p.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
            p.close.to_string(),
        ])?;
    }
    let data = wtr
        .into_inner()
        .map_err(|e| ExportError::Flush(e.to_string()))?;
    String::from_utf8(data).map_err(|e| ExportError::Flush(e.to_string()))
}

// ─── Summary ────────────────────────────────────────────────────────

/// Human-readable report for terminals.
pub fn render_summary(result: &ClassificationResult) -> String {
    let mut out = String::new();
    let current = result
        .current_signal
        .map(|s| s.as_str())
        .unwrap_or("n/a");
    let w = &result.params.windows;

    let _ = writeln!(out, "=== Signal Classification ===");
    let _ = writeln!(out, "Symbol:       {}", result.symbol);
    let _ = writeln!(out, "Bars:         {}", result.bar_count);
    let _ = writeln!(out, "Mode:         {}", result.params.mode);
    let _ = writeln!(
        out,
        "Windows:      MACD {}/{}/{}, RSI {}, MA {}/{}",
        w.fast_window, w.slow_window, w.signal_window, w.rsi_window, w.short_ma_window, w.long_ma_window
    );
    let _ = writeln!(out, "Current:      {current}");
    let _ = writeln!(
        out,
        "Counts:       BUY {}  SELL {}  HOLD {}",
        result.counts.buy, result.counts.sell, result.counts.hold
    );
    let _ = writeln!(out, "Transitions:  {}", result.transitions.len());
    let _ = writeln!(out, "Params hash:  {}", result.params_hash);
    let _ = writeln!(out, "Dataset hash: {}", result.dataset_hash);
    if result.synthetic {
        let _ = writeln!(out);
        let _ = writeln!(out, "WARNING: result based on SYNTHETIC data");
    }
    out
}

/// Render in the requested format.
pub fn render(result: &ClassificationResult, format: OutputFormat) -> Result<String, ExportError> {
    match format {
        OutputFormat::Summary => Ok(render_summary(result)),
        OutputFormat::Json => export_json(result),
        OutputFormat::Csv => export_bars_csv(result),
    }
}

/// Write rendered output to `path`, creating parent directories.
pub fn write_output(path: &Path, contents: &str) -> Result<(), ExportError> {
    let io_err = |source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(io_err)?;
    }
    std::fs::write(path, contents).map_err(io_err)
}
