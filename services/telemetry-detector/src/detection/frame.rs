use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Telemetry channel. Evaluation order follows `Sensor::ALL`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sensor {
    Temperature,
    Pressure,
}

impl Sensor {
    pub const ALL: [Sensor; 2] = [Sensor::Temperature, Sensor::Pressure];

    /// Column name in the input table, also used in report lines.
    pub fn column(self) -> &'static str {
        match self {
            Sensor::Temperature => "temperature",
            Sensor::Pressure => "pressure",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Sensor::Temperature => "Temperature",
            Sensor::Pressure => "Pressure",
        }
    }
}

impl fmt::Display for Sensor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.column()) }
}

/// One row of the input batch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reading {
    pub index: u64,
    pub temperature: f64,
    pub pressure: f64,
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum FrameError {
    #[error("{column} column has {actual} values, expected {expected}")]
    LengthMismatch { column: Sensor, expected: usize, actual: usize },
    #[error("index {index} at position {position} does not follow {previous}")]
    NonIncreasingIndex { position: usize, previous: u64, index: u64 },
    #[error("non-finite {sensor} value at index {index}")]
    NonFinite { sensor: Sensor, index: u64 },
}

/// Columnar batch of readings. A channel column is absent when the source
/// table did not carry it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TelemetryFrame {
    index: Vec<u64>,
    temperature: Option<Vec<f64>>,
    pressure: Option<Vec<f64>>,
}

impl TelemetryFrame {
    pub fn new(index: Vec<u64>, temperature: Option<Vec<f64>>, pressure: Option<Vec<f64>>) -> Result<Self, FrameError> {
        for (position, pair) in index.windows(2).enumerate() {
            if pair[1] <= pair[0] {
                return Err(FrameError::NonIncreasingIndex { position: position + 1, previous: pair[0], index: pair[1] });
            }
        }
        for (sensor, column) in [(Sensor::Temperature, &temperature), (Sensor::Pressure, &pressure)] {
            let Some(values) = column else { continue };
            if values.len() != index.len() {
                return Err(FrameError::LengthMismatch { column: sensor, expected: index.len(), actual: values.len() });
            }
            if let Some(pos) = values.iter().position(|v| !v.is_finite()) {
                return Err(FrameError::NonFinite { sensor, index: index[pos] });
            }
        }
        Ok(Self { index, temperature, pressure })
    }

    pub fn from_readings(readings: &[Reading]) -> Result<Self, FrameError> {
        Self::new(
            readings.iter().map(|r| r.index).collect(),
            Some(readings.iter().map(|r| r.temperature).collect()),
            Some(readings.iter().map(|r| r.pressure).collect()),
        )
    }

    pub fn len(&self) -> usize { self.index.len() }
    pub fn is_empty(&self) -> bool { self.index.is_empty() }
    pub fn index(&self) -> &[u64] { &self.index }

    pub fn channel(&self, sensor: Sensor) -> Option<&[f64]> {
        match sensor {
            Sensor::Temperature => self.temperature.as_deref(),
            Sensor::Pressure => self.pressure.as_deref(),
        }
    }

    /// Row view; `None` unless both channels are present.
    pub fn readings(&self) -> Option<Vec<Reading>> {
        let (temperature, pressure) = (self.temperature.as_ref()?, self.pressure.as_ref()?);
        Some(self.index.iter().zip(temperature).zip(pressure)
            .map(|((&index, &temperature), &pressure)| Reading { index, temperature, pressure })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_non_increasing_index() {
        let err = TelemetryFrame::new(vec![0, 2, 2], Some(vec![1.0, 2.0, 3.0]), None).unwrap_err();
        assert_eq!(err, FrameError::NonIncreasingIndex { position: 2, previous: 2, index: 2 });
    }

    #[test]
    fn rejects_length_mismatch_and_nan() {
        let err = TelemetryFrame::new(vec![0, 1], None, Some(vec![1.0])).unwrap_err();
        assert!(matches!(err, FrameError::LengthMismatch { column: Sensor::Pressure, expected: 2, actual: 1 }));
        let err = TelemetryFrame::new(vec![4, 9], Some(vec![1.0, f64::NAN]), None).unwrap_err();
        assert_eq!(err, FrameError::NonFinite { sensor: Sensor::Temperature, index: 9 });
    }

    #[test]
    fn readings_round_through_columns() {
        let rows = vec![
            Reading { index: 3, temperature: 20.0, pressure: 1.0 },
            Reading { index: 7, temperature: 21.5, pressure: 0.9 },
        ];
        let frame = TelemetryFrame::from_readings(&rows).unwrap();
        assert_eq!(frame.len(), 2);
        assert_eq!(frame.channel(Sensor::Pressure), Some(&[1.0, 0.9][..]));
        assert_eq!(frame.readings(), Some(rows));
    }

    #[test]
    fn sensor_display_uses_column_name() {
        assert_eq!(Sensor::Temperature.to_string(), "temperature");
        assert_eq!(Sensor::Pressure.to_string(), "pressure");
    }
}
