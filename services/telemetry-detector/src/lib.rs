//! SkySurveil telemetry anomaly detection: a pure dual-criterion engine plus
//! the CSV, report, chart and narration collaborators around it.

pub mod detection;
pub mod ingest;
pub mod chart;
pub mod narration;
pub mod cli;
pub mod app;

pub use detection::{detect, Anomaly, AnomalyEngine, AnomalyReport, DetectionError, Reading, Sensor, TelemetryFrame, ThresholdConfig};
pub use app::{run, run_detect, run_plot, DetectOutcome};
