use super::{Anomaly, AnomalyReport, DetectionStatus};
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

/// `"<index> <sensor> <value to 2 decimals>"`
pub fn render_line(anomaly: &Anomaly) -> String {
    format!("{} {} {:.2}", anomaly.index, anomaly.sensor, anomaly.value)
}

/// Every line newline-terminated; an empty report renders to an empty string.
pub fn render(report: &AnomalyReport) -> String {
    let mut out = String::new();
    for anomaly in report {
        out.push_str(&render_line(anomaly));
        out.push('\n');
    }
    out
}

pub fn write_report<W: Write>(report: &AnomalyReport, mut writer: W) -> io::Result<()> {
    writer.write_all(render(report).as_bytes())?;
    writer.flush()
}

/// Creates or truncates `path`, writes the report and returns the status line.
pub fn save_report(report: &AnomalyReport, path: &Path) -> io::Result<String> {
    let file = File::create(path)?;
    write_report(report, io::BufWriter::new(file))?;
    Ok(status_message(report, path))
}

pub fn status_message(report: &AnomalyReport, path: &Path) -> String {
    match report.status() {
        DetectionStatus::NoAnomalies => format!("No high-confidence anomalies found. Output saved to '{}'.", path.display()),
        DetectionStatus::Detected { count } => format!("{count} anomalies detected and saved to '{}'.", path.display()),
    }
}

/// SHA-256 hex of the rendered report; equal digests mean byte-identical output.
pub fn digest(report: &AnomalyReport) -> String {
    let mut hasher = Sha256::new();
    hasher.update(render(report).as_bytes());
    hex::encode(hasher.finalize())
}
