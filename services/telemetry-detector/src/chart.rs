//! Chart-ready series: the raw channel plus the anomaly points the engine
//! already selected, so a plotting tool can overlay them without re-running
//! the rule.

use crate::detection::{AnomalyReport, DetectionError, Sensor, TelemetryFrame};
use serde::Serialize;
use std::io::Write;

pub const CHART_TITLE: &str = "Telemetry Anomaly Detection";
pub const X_LABEL: &str = "Time Index";

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SeriesPoint {
    pub index: u64,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChannelPanel {
    pub sensor: Sensor,
    pub label: &'static str,
    pub anomaly_label: &'static str,
    pub raw: Vec<SeriesPoint>,
    pub anomalies: Vec<SeriesPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartFeed {
    pub title: &'static str,
    pub x_label: &'static str,
    pub panels: Vec<ChannelPanel>,
}

impl ChartFeed {
    pub fn build(frame: &TelemetryFrame, report: &AnomalyReport) -> Result<Self, DetectionError> {
        let mut panels = Vec::with_capacity(Sensor::ALL.len());
        for sensor in Sensor::ALL {
            let values = frame.channel(sensor).ok_or(DetectionError::MissingChannel(sensor))?;
            panels.push(ChannelPanel {
                sensor,
                label: sensor.label(),
                anomaly_label: anomaly_label(sensor),
                raw: frame.index().iter().zip(values).map(|(&index, &value)| SeriesPoint { index, value }).collect(),
                anomalies: report.points(sensor).iter().map(|&(index, value)| SeriesPoint { index, value }).collect(),
            });
        }
        Ok(Self { title: CHART_TITLE, x_label: X_LABEL, panels })
    }

    pub fn panel(&self, sensor: Sensor) -> Option<&ChannelPanel> { self.panels.iter().find(|p| p.sensor == sensor) }

    pub fn to_json(&self) -> serde_json::Result<String> { serde_json::to_string_pretty(self) }

    pub fn write_json<W: Write>(&self, writer: W) -> serde_json::Result<()> { serde_json::to_writer_pretty(writer, self) }
}

fn anomaly_label(sensor: Sensor) -> &'static str {
    match sensor {
        Sensor::Temperature => "Temp Anomalies",
        Sensor::Pressure => "Pressure Anomalies",
    }
}
