//! Price series loading for the runner.
//!
//! Reads `timestamp,close` CSV files into a [`LoadedSeries`]. The file must
//! have a header row; the timestamp column may be named `timestamp`, `date`,
//! `datetime` or `time`, and the close column `close` (case-insensitive).
//! Other columns are ignored.
//!
//! Rows are kept in file order. Sorting and deduplication are the producer's
//! job; the classifier assumes ascending timestamps and does not check.

use std::io::Read;
use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use thiserror::Error;

use momentumlab_core::{dataset_hash, DatasetHash, PricePoint};

/// Errors from the data loading layer.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("missing '{0}' column in CSV header")]
    MissingColumn(&'static str),

    #[error("row {row}: unrecognized timestamp '{value}'")]
    BadTimestamp { row: u64, value: String },

    #[error("row {row}: close must be a finite, non-negative number (got '{value}')")]
    BadClose { row: u64, value: String },

    #[error("no price rows in '{0}'")]
    Empty(String),
}

/// A price series plus its provenance.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedSeries {
    pub symbol: String,
    pub points: Vec<PricePoint>,
    /// Generated rather than read from a file.
    pub synthetic: bool,
}

impl LoadedSeries {
    pub fn new(symbol: impl Into<String>, points: Vec<PricePoint>) -> Self {
        Self {
            symbol: symbol.into(),
            points,
            synthetic: false,
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn dataset_hash(&self) -> DatasetHash {
        dataset_hash(&self.points)
    }
}

const TIMESTAMP_HEADERS: [&str; 4] = ["timestamp", "date", "datetime", "time"];

const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

/// Parse a timestamp in any supported format.
///
/// RFC 3339 values are converted to UTC and the offset dropped.
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.naive_utc());
    }
    for fmt in NAIVE_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, fmt) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Parse CSV price data from any reader.
///
/// A header-only input yields an empty series; [`load_csv`] turns that into
/// [`LoadError::Empty`].
pub fn parse_csv<R: Read>(reader: R) -> Result<Vec<PricePoint>, LoadError> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    let column = |names: &[&str]| {
        headers
            .iter()
            .position(|h| names.iter().any(|n| h.eq_ignore_ascii_case(n)))
    };
    let ts_idx = column(&TIMESTAMP_HEADERS).ok_or(LoadError::MissingColumn("timestamp"))?;
    let close_idx = column(&["close"]).ok_or(LoadError::MissingColumn("close"))?;

    let mut points = Vec::new();
    for record in rdr.records() {
        let record = record?;
        let row = record.position().map(|p| p.line()).unwrap_or_default();

        let raw_ts = record.get(ts_idx).unwrap_or_default();
        let timestamp = parse_timestamp(raw_ts).ok_or_else(|| LoadError::BadTimestamp {
            row,
            value: raw_ts.to_string(),
        })?;

        let raw_close = record.get(close_idx).unwrap_or_default();
        let point = raw_close
            .parse::<f64>()
            .ok()
            .map(|close| PricePoint::new(timestamp, close))
            .filter(PricePoint::is_valid)
            .ok_or_else(|| LoadError::BadClose {
                row,
                value: raw_close.to_string(),
            })?;

        points.push(point);
    }

    Ok(points)
}

/// Load a CSV file. The symbol is the file stem.
pub fn load_csv(path: &Path) -> Result<LoadedSeries, LoadError> {
    let file = std::fs::File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let points = parse_csv(file)?;
    if points.is_empty() {
        return Err(LoadError::Empty(path.display().to_string()));
    }
    Ok(LoadedSeries::new(symbol_from_path(path), points))
}

fn symbol_from_path(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "UNKNOWN".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn parses_all_timestamp_formats() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 15)
            .unwrap()
            .and_hms_opt(14, 30, 0)
            .unwrap();
        assert_eq!(parse_timestamp("2024-03-15 14:30:00"), Some(expected));
        assert_eq!(parse_timestamp("2024-03-15T14:30:00"), Some(expected));
        assert_eq!(parse_timestamp("2024-03-15T14:30:00Z"), Some(expected));
        assert_eq!(parse_timestamp("2024-03-15T10:30:00-04:00"), Some(expected));
        assert_eq!(
            parse_timestamp("2024-03-15"),
            NaiveDate::from_ymd_opt(2024, 3, 15).unwrap().and_hms_opt(0, 0, 0)
        );
        assert_eq!(parse_timestamp("15/03/2024"), None);
    }

    #[test]
    fn parses_basic_csv() {
        let data = "timestamp,close\n2024-01-02,100.5\n2024-01-03,101.25\n";
        let points = parse_csv(data.as_bytes()).unwrap();
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].close, 100.5);
        assert_eq!(points[1].close, 101.25);
    }

    #[test]
    fn accepts_header_variants_and_extra_columns() {
        let data = "Date,Open,High,Low,Close,Volume\n2024-01-02,1,2,0.5,1.5,1000\n";
        let points = parse_csv(data.as_bytes()).unwrap();
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].close, 1.5);
    }

    #[test]
    fn keeps_file_order() {
        let data = "timestamp,close\n2024-01-03,2\n2024-01-02,1\n";
        let points = parse_csv(data.as_bytes()).unwrap();
        assert!(points[0].timestamp > points[1].timestamp);
    }

    #[test]
    fn missing_close_column() {
        let err = parse_csv("timestamp,price\n2024-01-02,1\n".as_bytes()).unwrap_err();
        assert!(matches!(err, LoadError::MissingColumn("close")));
    }

    #[test]
    fn bad_close_reports_row() {
        let data = "timestamp,close\n2024-01-02,1\n2024-01-03,-5\n";
        match parse_csv(data.as_bytes()).unwrap_err() {
            LoadError::BadClose { row, value } => {
                assert_eq!(row, 3);
                assert_eq!(value, "-5");
            }
            other => panic!("expected BadClose, got {other:?}"),
        }
    }

    #[test]
    fn non_finite_close_rejected() {
        for bad in ["NaN", "inf", "abc", ""] {
            let data = format!("timestamp,close\n2024-01-02,{bad}\n");
            assert!(matches!(
                parse_csv(data.as_bytes()),
                Err(LoadError::BadClose { row: 2, .. })
            ));
        }
    }

    #[test]
    fn bad_timestamp_reports_row() {
        let data = "timestamp,close\n2024-01-02,1\nyesterday,2\n";
        let err = parse_csv(data.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("row 3"));
        assert!(err.to_string().contains("yesterday"));
    }

    #[test]
    fn load_csv_uses_file_stem_as_symbol() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("AAPL.csv");
        let mut f = std::fs::File::create(&path).unwrap();
        writeln!(f, "timestamp,close\n2024-01-02 09:30:00,185.2").unwrap();

        let loaded = load_csv(&path).unwrap();
        assert_eq!(loaded.symbol, "AAPL");
        assert_eq!(loaded.len(), 1);
        assert!(!loaded.synthetic);
    }

    #[test]
    fn header_only_file_is_empty_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("EMPTY.csv");
        std::fs::write(&path, "timestamp,close\n").unwrap();
        assert!(matches!(load_csv(&path), Err(LoadError::Empty(_))));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = load_csv(Path::new("/nonexistent/SPY.csv")).unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }
}
