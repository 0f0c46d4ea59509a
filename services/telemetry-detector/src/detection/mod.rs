//! Dual-criterion anomaly detection over a loaded telemetry batch.
//!
//! Everything here is pure: no logging, no narration, no global state.

pub mod frame;
pub mod stats;
pub mod rules;
pub mod anomaly;
pub mod engine;
pub mod report;

pub use frame::{Reading, Sensor, TelemetryFrame, FrameError};
pub use stats::{ChannelStats, StatsError};
pub use rules::{ThresholdConfig, ConfigError, Rule, Direction};
pub use anomaly::{Anomaly, AnomalyReport, DetectionStatus};
pub use engine::{detect, AnomalyEngine, DetectionError};
