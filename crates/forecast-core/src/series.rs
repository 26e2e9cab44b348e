//! Per-company historical series stored as `<data_dir>/<TICKER>.csv`.
//!
//! Files carry at least a `date` and a `value` column. Rows with an
//! unparseable date or a missing value are skipped rather than failing the
//! whole load, and the result is always sorted by date.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use std::io::Read;
use std::path::{Path, PathBuf};

use crate::{ForecastError, ForecastResult, SeriesPoint};

const DATE_COLUMN: &str = "date";
const VALUE_COLUMN: &str = "value";
/// Fewer points than this cannot be fitted by any forecaster.
pub const MIN_POINTS: usize = 2;

pub fn series_path(data_dir: &Path, ticker: &str) -> PathBuf {
    data_dir.join(format!("{}.csv", ticker))
}

/// Load and clean the series for `ticker` from `data_dir`.
pub fn load_series(data_dir: &Path, ticker: &str) -> ForecastResult<Vec<SeriesPoint>> {
    let path = series_path(data_dir, ticker);
    let file = std::fs::File::open(&path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => ForecastError::DataNotFound(path.display().to_string()),
        _ => ForecastError::Io(e),
    })?;

    let points = read_series(file)?;
    tracing::debug!("Loaded {} points for {} from {}", points.len(), ticker, path.display());
    Ok(points)
}

/// Parse a series from any CSV source.
pub fn read_series<R: Read>(reader: R) -> ForecastResult<Vec<SeriesPoint>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    let date_idx = column_index(&headers, DATE_COLUMN)?;
    let value_idx = column_index(&headers, VALUE_COLUMN)?;

    let mut points = Vec::new();
    let mut skipped = 0usize;
    for result in rdr.records() {
        let record = result?;
        let date = record.get(date_idx).and_then(parse_date);
        let value = record
            .get(value_idx)
            .and_then(|v| v.parse::<f64>().ok())
            .filter(|v| v.is_finite());

        match (date, value) {
            (Some(date), Some(value)) => points.push(SeriesPoint { date, value }),
            _ => skipped += 1,
        }
    }

    if skipped > 0 {
        tracing::debug!("Skipped {} unusable rows", skipped);
    }

    points.sort_by(|a, b| a.date.cmp(&b.date));

    if points.len() < MIN_POINTS {
        return Err(ForecastError::InsufficientData(format!(
            "need at least {} valid rows, found {}",
            MIN_POINTS,
            points.len()
        )));
    }

    Ok(points)
}

fn column_index(headers: &csv::StringRecord, name: &str) -> ForecastResult<usize> {
    headers
        .iter()
        .position(|h| h.eq_ignore_ascii_case(name))
        .ok_or_else(|| ForecastError::InvalidData(format!("missing column '{}'", name)))
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    if raw.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(raw, "%Y/%m/%d"))
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
                .ok()
                .map(|dt| dt.date())
        })
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))
}
