//! CSV transaction reader.

use crate::core::Observation;
use crate::error::{ForecastError, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

/// Parse a timestamp in one of the accepted layouts.
///
/// Accepts RFC 3339, `YYYY-MM-DD HH:MM:SS[.fff]` (space or `T`),
/// `YYYY-MM-DD HH:MM` and bare dates. Values without an offset are UTC.
pub fn parse_timestamp(text: &str) -> Result<DateTime<Utc>> {
    let text = text.trim();

    if let Ok(ts) = DateTime::parse_from_rfc3339(text) {
        return Ok(ts.with_timezone(&Utc));
    }

    for fmt in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, fmt) {
            return Ok(naive.and_utc());
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        if let Some(naive) = date.and_hms_opt(0, 0, 0) {
            return Ok(naive.and_utc());
        }
    }

    Err(ForecastError::Parse {
        value: text.to_string(),
        reason: "not a recognised date/time".to_string(),
    })
}

/// Read observations from a CSV file with a header row.
///
/// `timestamp_column` and `value_column` are looked up by header name.
pub fn read_observations(
    path: &Path,
    timestamp_column: &str,
    value_column: &str,
) -> Result<Vec<Observation>> {
    let file = File::open(path).map_err(|e| ForecastError::InputUnavailable {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;

    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(BufReader::new(file));

    let headers = reader
        .headers()
        .map_err(|e| csv_error(path, "header", e))?
        .clone();

    let column_index = |name: &str| {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| ForecastError::Schema {
                field: name.to_string(),
                detail: format!(
                    "column not found in {} (available: {})",
                    path.display(),
                    headers.iter().collect::<Vec<_>>().join(", ")
                ),
            })
    };
    let ts_idx = column_index(timestamp_column)?;
    let value_idx = column_index(value_column)?;

    let mut observations = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        let record = result.map_err(|e| csv_error(path, "record", e))?;
        let line = record.position().map_or(idx as u64 + 2, |p| p.line());

        let ts_text = record.get(ts_idx).ok_or_else(|| ForecastError::Schema {
            field: timestamp_column.to_string(),
            detail: format!("missing on line {}", line),
        })?;
        let value_text = record.get(value_idx).ok_or_else(|| ForecastError::Schema {
            field: value_column.to_string(),
            detail: format!("missing on line {}", line),
        })?;

        let timestamp = parse_timestamp(ts_text)?;
        let value = value_text
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| ForecastError::Schema {
                field: value_column.to_string(),
                detail: format!("unparseable value '{}' on line {}", value_text, line),
            })?;

        observations.push(Observation::new(timestamp, value));
    }

    tracing::info!(
        path = %path.display(),
        rows = observations.len(),
        "loaded observations"
    );

    Ok(observations)
}

fn csv_error(path: &Path, field: &str, err: csv::Error) -> ForecastError {
    if err.is_io_error() {
        ForecastError::InputUnavailable {
            path: path.display().to_string(),
            reason: err.to_string(),
        }
    } else {
        ForecastError::Schema {
            field: field.to_string(),
            detail: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn csv_file(lines: &[&str]) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        for line in lines {
            writeln!(file, "{}", line).unwrap();
        }
        file
    }

    #[test]
    fn parses_supported_layouts() {
        let expected = Utc.with_ymd_and_hms(2017, 10, 2, 10, 56, 33).unwrap();
        assert_eq!(parse_timestamp("2017-10-02 10:56:33").unwrap(), expected);
        assert_eq!(parse_timestamp("2017-10-02T10:56:33").unwrap(), expected);
        assert_eq!(parse_timestamp("2017-10-02T12:56:33+02:00").unwrap(), expected);
        assert_eq!(
            parse_timestamp("2017-10-02").unwrap(),
            Utc.with_ymd_and_hms(2017, 10, 2, 0, 0, 0).unwrap()
        );
        assert_eq!(
            parse_timestamp("2017-10-02 10:56").unwrap(),
            Utc.with_ymd_and_hms(2017, 10, 2, 10, 56, 0).unwrap()
        );
    }

    #[test]
    fn malformed_timestamp_names_value() {
        let err = parse_timestamp("02/10/2017").unwrap_err();
        assert_eq!(
            err,
            ForecastError::Parse {
                value: "02/10/2017".into(),
                reason: "not a recognised date/time".into(),
            }
        );
    }

    #[test]
    fn reads_named_columns() {
        let file = csv_file(&[
            "order_id,order_purchase_timestamp,price",
            "a,2018-01-01 09:00:00,10.5",
            "b,2018-01-03 18:30:00,4.5",
        ]);

        let obs = read_observations(file.path(), "order_purchase_timestamp", "price").unwrap();

        assert_eq!(obs.len(), 2);
        assert_eq!(obs[0].value, 10.5);
        assert_eq!(
            obs[1].timestamp,
            Utc.with_ymd_and_hms(2018, 1, 3, 18, 30, 0).unwrap()
        );
    }

    #[test]
    fn missing_file_is_input_unavailable() {
        let err = read_observations(Path::new("/nonexistent/orders.csv"), "ts", "v").unwrap_err();
        assert!(matches!(err, ForecastError::InputUnavailable { .. }));
    }

    #[test]
    fn missing_column_is_schema_error() {
        let file = csv_file(&["ts,amount", "2018-01-01,1.0"]);
        let err = read_observations(file.path(), "ts", "price").unwrap_err();
        match err {
            ForecastError::Schema { field, .. } => assert_eq!(field, "price"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn bad_value_is_schema_error_with_line() {
        let file = csv_file(&["ts,price", "2018-01-01,1.0", "2018-01-02,abc"]);
        let err = read_observations(file.path(), "ts", "price").unwrap_err();
        match err {
            ForecastError::Schema { detail, .. } => {
                assert!(detail.contains("abc"));
                assert!(detail.contains("line 3"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn bad_timestamp_is_parse_error() {
        let file = csv_file(&["ts,price", "yesterday,1.0"]);
        let err = read_observations(file.path(), "ts", "price").unwrap_err();
        assert!(matches!(err, ForecastError::Parse { .. }));
    }
}
