//! Wires config, ingest, detection, rendering and narration together. This is
//! the only layer that logs.

use crate::chart::ChartFeed;
use crate::cli::{Cli, Command};
use crate::detection::{report, AnomalyEngine, AnomalyReport, Sensor, TelemetryFrame, ThresholdConfig};
use crate::ingest;
use crate::narration::{self, LogNarrator, Narrator, SilentNarrator};
use anyhow::{Context, Result};
use skysurveil_core::{init_tracing, load_config};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, info_span, warn};

pub const SERVICE: &str = "telemetry-detector";

#[derive(Debug, Clone)]
pub struct DetectOutcome {
    pub report: AnomalyReport,
    pub status: String,
    pub digest: String,
    pub output: PathBuf,
}

pub fn run(cli: Cli) -> Result<()> {
    let cfg = load_config(SERVICE, cli.config.as_deref()).context("loading configuration")?;
    init_tracing(SERVICE, &cfg.log_level, cli.json_log || cfg.json_log)?;
    debug!(?cfg, "config loaded");

    match cli.command {
        Command::Detect { input, thresholds, output, quiet } => {
            let thresholds = thresholds.resolve(&cfg).context("invalid threshold configuration")?;
            let output = output.unwrap_or_else(|| cfg.report_path.clone());
            let narrator: &dyn Narrator = if quiet { &SilentNarrator } else { &LogNarrator };
            let outcome = run_detect(&input, &thresholds, &output, narrator)?;
            println!("{}", outcome.status);
        }
        Command::Plot { input, thresholds, output } => {
            let thresholds = thresholds.resolve(&cfg).context("invalid threshold configuration")?;
            let feed = run_plot(&input, &thresholds)?;
            match output {
                Some(path) => {
                    let file = File::create(&path).with_context(|| format!("creating chart feed {}", path.display()))?;
                    let mut writer = BufWriter::new(file);
                    feed.write_json(&mut writer)?;
                    writer.flush()?;
                    info!(output = %path.display(), "chart feed written");
                }
                None => {
                    let stdout = io::stdout();
                    let mut lock = stdout.lock();
                    feed.write_json(&mut lock)?;
                    writeln!(lock)?;
                }
            }
        }
    }
    Ok(())
}

fn load_and_detect(input: &Path, thresholds: &ThresholdConfig) -> Result<(TelemetryFrame, AnomalyReport)> {
    let frame = ingest::load_csv(input).with_context(|| format!("loading telemetry from {}", input.display()))?;
    info!(rows = frame.len(), input = %input.display(), "telemetry loaded");
    let report = AnomalyEngine::new(*thresholds).detect(&frame)
        .with_context(|| format!("detecting anomalies in {}", input.display()))?;
    for sensor in Sensor::ALL {
        match report.channel_stats(sensor) {
            Some(stats) => debug!(%sensor, mean = stats.mean, std_dev = stats.std_dev, flagged = report.count(sensor), "channel evaluated"),
            None => warn!(%sensor, "channel has zero variance; z-score test disabled"),
        }
    }
    Ok((frame, report))
}

/// Detect, write the text report to `output`, then narrate.
pub fn run_detect(input: &Path, thresholds: &ThresholdConfig, output: &Path, narrator: &dyn Narrator) -> Result<DetectOutcome> {
    let _span = info_span!("detect", input = %input.display()).entered();
    let (_, report) = load_and_detect(input, thresholds)?;
    let status = report::save_report(&report, output).with_context(|| format!("writing report to {}", output.display()))?;
    let digest = report::digest(&report);
    info!(status = %report.status(), output = %output.display(), %digest, "detection complete");
    narration::narrate(&report, narrator);
    Ok(DetectOutcome { report, status, digest, output: output.to_path_buf() })
}

pub fn run_plot(input: &Path, thresholds: &ThresholdConfig) -> Result<ChartFeed> {
    let _span = info_span!("plot", input = %input.display()).entered();
    let (frame, report) = load_and_detect(input, thresholds)?;
    Ok(ChartFeed::build(&frame, &report)?)
}
