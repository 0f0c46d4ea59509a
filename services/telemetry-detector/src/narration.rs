//! Spoken-style announcements derived from a finished report. Delivery is
//! behind `Narrator` so the detection path never touches audio or logs.

use crate::detection::{AnomalyReport, Sensor};
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Announcement {
    NoAnomalies,
    ChannelAnomaly(Sensor),
}

impl Announcement {
    pub fn text(self) -> &'static str {
        match self {
            Announcement::NoAnomalies => "No anomalies detected",
            Announcement::ChannelAnomaly(Sensor::Temperature) => "Temperature anomaly detected",
            Announcement::ChannelAnomaly(Sensor::Pressure) => "Pressure anomaly detected",
        }
    }
}

/// One announcement per channel that flagged something, temperature first.
pub fn announcements(report: &AnomalyReport) -> Vec<Announcement> {
    if report.is_empty() { return vec![Announcement::NoAnomalies]; }
    Sensor::ALL.into_iter()
        .filter(|s| report.count(*s) > 0)
        .map(Announcement::ChannelAnomaly)
        .collect()
}

pub trait Narrator {
    fn announce(&self, text: &str);
}

/// Emits announcements as log events.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNarrator;

impl Narrator for LogNarrator {
    fn announce(&self, text: &str) { info!(target: "narration", "{text}"); }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SilentNarrator;

impl Narrator for SilentNarrator {
    fn announce(&self, _text: &str) {}
}

pub fn narrate(report: &AnomalyReport, narrator: &dyn Narrator) -> Vec<Announcement> {
    let out = announcements(report);
    for a in &out { narrator.announce(a.text()); }
    out
}
