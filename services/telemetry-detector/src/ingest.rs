//! CSV loading. Row order defines the reading index (0-based); only the
//! `temperature` and `pressure` columns are read.

use crate::detection::{FrameError, Sensor, TelemetryFrame};
use csv::StringRecord;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("io error: {0}")] Io(#[from] std::io::Error),
    #[error("csv error: {0}")] Csv(#[from] csv::Error),
    #[error("row {row}: invalid {column} value {value:?}")] InvalidValue { row: u64, column: Sensor, value: String },
    #[error("frame error: {0}")] Frame(#[from] FrameError),
}

pub fn load_csv(path: &Path) -> Result<TelemetryFrame, IngestError> {
    let file = File::open(path)?;
    read_csv(file)
}

/// A channel column absent from the header is left out of the frame; the
/// engine reports it when detection runs.
pub fn read_csv<R: Read>(reader: R) -> Result<TelemetryFrame, IngestError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);
    let headers = rdr.headers()?.clone();
    let column_of = |sensor: Sensor| headers.iter().position(|h| h == sensor.column());
    let (temp_col, press_col) = (column_of(Sensor::Temperature), column_of(Sensor::Pressure));

    let mut index = Vec::new();
    let mut temperature = temp_col.map(|_| Vec::new());
    let mut pressure = press_col.map(|_| Vec::new());
    for (row, record) in rdr.records().enumerate() {
        let record = record?;
        let row = row as u64;
        if let (Some(col), Some(values)) = (temp_col, temperature.as_mut()) {
            values.push(parse_cell(&record, col, row, Sensor::Temperature)?);
        }
        if let (Some(col), Some(values)) = (press_col, pressure.as_mut()) {
            values.push(parse_cell(&record, col, row, Sensor::Pressure)?);
        }
        index.push(row);
    }
    Ok(TelemetryFrame::new(index, temperature, pressure)?)
}

fn parse_cell(record: &StringRecord, col: usize, row: u64, column: Sensor) -> Result<f64, IngestError> {
    let raw = record.get(col).unwrap_or_default();
    match raw.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(IngestError::InvalidValue { row, column, value: raw.to_string() }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_named_columns_in_row_order() {
        let csv = "timestamp,pressure,temperature\n2024-01-01T00:00,1.01,21.5\n2024-01-01T00:01, 0.98 ,22.0\n";
        let frame = read_csv(csv.as_bytes()).unwrap();
        assert_eq!(frame.index(), &[0u64, 1]);
        assert_eq!(frame.channel(Sensor::Temperature), Some(&[21.5, 22.0][..]));
        assert_eq!(frame.channel(Sensor::Pressure), Some(&[1.01, 0.98][..]));
    }

    #[test]
    fn missing_column_leaves_channel_absent() {
        let frame = read_csv("temperature\n20\n21\n".as_bytes()).unwrap();
        assert_eq!(frame.len(), 2);
        assert!(frame.channel(Sensor::Pressure).is_none());
    }

    #[test]
    fn bad_cells_name_row_and_column() {
        let err = read_csv("temperature,pressure\n20,1.0\nhot,1.0\n".as_bytes()).unwrap_err();
        match err {
            IngestError::InvalidValue { row, column, value } => {
                assert_eq!((row, column, value.as_str()), (1, Sensor::Temperature, "hot"));
            }
            other => panic!("unexpected error: {other}"),
        }
        let err = read_csv("temperature,pressure\n20,\n".as_bytes()).unwrap_err();
        assert!(matches!(err, IngestError::InvalidValue { row: 0, column: Sensor::Pressure, .. }));
        let err = read_csv("temperature,pressure\n20,NaN\n".as_bytes()).unwrap_err();
        assert!(matches!(err, IngestError::InvalidValue { column: Sensor::Pressure, .. }));
    }

    #[test]
    fn ragged_rows_are_csv_errors() {
        let err = read_csv("temperature,pressure\n20,1.0,extra\n".as_bytes()).unwrap_err();
        assert!(matches!(err, IngestError::Csv(_)));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = load_csv(Path::new("/nonexistent/telemetry.csv")).unwrap_err();
        assert!(matches!(err, IngestError::Io(_)));
    }
}
