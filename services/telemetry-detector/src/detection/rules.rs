use super::{ChannelStats, Sensor};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("{field} must be a finite number, got {value}")]
    NonFinite { field: &'static str, value: f64 },
    #[error("z_threshold must be greater than zero, got {0}")]
    NonPositiveZThreshold(f64),
}

/// Caller-supplied limits. Only constructible through `new`, which rejects a
/// non-finite field or a z threshold that is not strictly positive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThresholdConfig {
    temp_threshold: f64,
    press_threshold: f64,
    z_threshold: f64,
}

impl ThresholdConfig {
    pub fn new(temp_threshold: f64, press_threshold: f64, z_threshold: f64) -> Result<Self, ConfigError> {
        for (field, value) in [("temp_threshold", temp_threshold), ("press_threshold", press_threshold), ("z_threshold", z_threshold)] {
            if !value.is_finite() { return Err(ConfigError::NonFinite { field, value }); }
        }
        if z_threshold <= 0.0 { return Err(ConfigError::NonPositiveZThreshold(z_threshold)); }
        Ok(Self { temp_threshold, press_threshold, z_threshold })
    }

    pub fn temp_threshold(&self) -> f64 { self.temp_threshold }
    pub fn press_threshold(&self) -> f64 { self.press_threshold }
    pub fn z_threshold(&self) -> f64 { self.z_threshold }
}

/// Which side of the limits counts as out of range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Above,
    Below,
}

/// Dual-criterion rule for one channel: temperature is bad when high,
/// pressure when low.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rule {
    pub sensor: Sensor,
    pub direction: Direction,
    pub threshold: f64,
    pub z_threshold: f64,
}

impl Rule {
    pub fn for_sensor(sensor: Sensor, cfg: &ThresholdConfig) -> Self {
        let (direction, threshold) = match sensor {
            Sensor::Temperature => (Direction::Above, cfg.temp_threshold),
            Sensor::Pressure => (Direction::Below, cfg.press_threshold),
        };
        Self { sensor, direction, threshold, z_threshold: cfg.z_threshold }
    }

    pub fn hard_breach(&self, value: f64) -> bool {
        match self.direction {
            Direction::Above => value > self.threshold,
            Direction::Below => value < self.threshold,
        }
    }

    pub fn statistical_breach(&self, z: f64) -> bool {
        match self.direction {
            Direction::Above => z > self.z_threshold,
            Direction::Below => z < -self.z_threshold,
        }
    }

    /// Both tests must hold. Without stats (degenerate channel) the
    /// statistical test never fires.
    pub fn is_anomalous(&self, value: f64, stats: Option<&ChannelStats>) -> bool {
        let Some(stats) = stats else { return false };
        self.hard_breach(value) && self.statistical_breach(stats.z_score(value))
    }

    /// `(index, value)` pairs of the rows this rule flags, in input order.
    pub fn flagged(&self, index: &[u64], values: &[f64], stats: Option<&ChannelStats>) -> Vec<(u64, f64)> {
        index.iter().zip(values)
            .filter(|(_, v)| self.is_anomalous(**v, stats))
            .map(|(&i, &v)| (i, v))
            .collect()
    }
}
