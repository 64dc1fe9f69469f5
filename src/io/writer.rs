//! CSV forecast writer.

use crate::core::{ForecastTable, OutputRow};
use crate::error::{ForecastError, Result};
use chrono::{DateTime, Timelike, Utc};
use serde::Serialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Serialize)]
struct OutputRecord {
    date: String,
    forecast: f64,
    lower: f64,
    upper: f64,
    actual: Option<f64>,
}

impl From<&OutputRow> for OutputRecord {
    fn from(row: &OutputRow) -> Self {
        Self {
            date: format_timestamp(row.timestamp),
            forecast: row.point,
            lower: row.lower,
            upper: row.upper,
            actual: row.actual,
        }
    }
}

/// Period labels fall on midnight, so the time part is dropped there.
fn format_timestamp(ts: DateTime<Utc>) -> String {
    if ts.num_seconds_from_midnight() == 0 && ts.nanosecond() == 0 {
        ts.format("%Y-%m-%d").to_string()
    } else {
        ts.format("%Y-%m-%d %H:%M:%S").to_string()
    }
}

/// Write the table as `date,forecast,lower,upper,actual`.
///
/// Missing parent directories are created. Absent actuals are written as
/// empty fields.
pub fn write_forecast(path: &Path, table: &ForecastTable) -> Result<()> {
    let write_err = |reason: String| ForecastError::OutputWrite {
        path: path.display().to_string(),
        reason,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| write_err(e.to_string()))?;
    }

    let mut writer = csv::Writer::from_path(path).map_err(|e| write_err(e.to_string()))?;
    for row in table.rows() {
        writer
            .serialize(OutputRecord::from(row))
            .map_err(|e| write_err(e.to_string()))?;
    }
    writer.flush().map_err(|e| write_err(e.to_string()))?;

    tracing::info!(path = %path.display(), rows = table.len(), "forecast written");
    Ok(())
}
