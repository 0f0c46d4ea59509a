use super::{ChannelStats, Sensor};
use serde::Serialize;
use std::fmt;

/// One flagged reading.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Anomaly {
    pub index: u64,
    pub sensor: Sensor,
    pub value: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetectionStatus {
    NoAnomalies,
    Detected { count: usize },
}

impl fmt::Display for DetectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DetectionStatus::NoAnomalies => f.write_str("no anomalies"),
            DetectionStatus::Detected { count } => write!(f, "{count} anomalies"),
        }
    }
}

/// Result of one detection call. Anomalies are ordered by index; at equal
/// index the temperature entry comes first. The per-channel point lists are
/// the same subsets the rule produced, kept for chart overlays.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnomalyReport {
    anomalies: Vec<Anomaly>,
    temperature_points: Vec<(u64, f64)>,
    pressure_points: Vec<(u64, f64)>,
    #[serde(skip)]
    stats: [Option<ChannelStats>; 2],
}

impl AnomalyReport {
    pub(crate) fn from_channels(
        temperature_points: Vec<(u64, f64)>,
        pressure_points: Vec<(u64, f64)>,
        stats: [Option<ChannelStats>; 2],
    ) -> Self {
        let tag = |sensor: Sensor, points: &[(u64, f64)]| -> Vec<Anomaly> {
            points.iter().map(|&(index, value)| Anomaly { index, sensor, value }).collect()
        };
        let mut anomalies = tag(Sensor::Temperature, &temperature_points);
        anomalies.extend(tag(Sensor::Pressure, &pressure_points));
        // stable: temperature stays ahead of pressure at equal index
        anomalies.sort_by_key(|a| a.index);
        Self { anomalies, temperature_points, pressure_points, stats }
    }

    pub fn anomalies(&self) -> &[Anomaly] { &self.anomalies }
    pub fn iter(&self) -> std::slice::Iter<'_, Anomaly> { self.anomalies.iter() }
    pub fn len(&self) -> usize { self.anomalies.len() }
    pub fn is_empty(&self) -> bool { self.anomalies.is_empty() }

    pub fn points(&self, sensor: Sensor) -> &[(u64, f64)] {
        match sensor {
            Sensor::Temperature => &self.temperature_points,
            Sensor::Pressure => &self.pressure_points,
        }
    }

    pub fn count(&self, sensor: Sensor) -> usize { self.points(sensor).len() }

    /// Statistics used for the channel; `None` when the series was degenerate.
    pub fn channel_stats(&self, sensor: Sensor) -> Option<ChannelStats> {
        match sensor {
            Sensor::Temperature => self.stats[0],
            Sensor::Pressure => self.stats[1],
        }
    }

    pub fn status(&self) -> DetectionStatus {
        if self.anomalies.is_empty() { DetectionStatus::NoAnomalies } else { DetectionStatus::Detected { count: self.anomalies.len() } }
    }
}

impl<'a> IntoIterator for &'a AnomalyReport {
    type Item = &'a Anomaly;
    type IntoIter = std::slice::Iter<'a, Anomaly>;
    fn into_iter(self) -> Self::IntoIter { self.anomalies.iter() }
}
