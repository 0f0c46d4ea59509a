use crate::detection::{ConfigError, ThresholdConfig};
use clap::{Args, Parser, Subcommand};
use skysurveil_core::DynamicConfig;
use std::path::PathBuf;

/// SkySurveil telemetry anomaly detection
#[derive(Parser, Debug)]
#[command(name = "telemetry-detector")]
#[command(about = "Flags temperature/pressure readings that breach both a hard limit and a z-score limit", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Configuration file (yaml, toml or json)
    #[arg(short, long, global = true, env = "SKYSURVEIL_CONFIG_FILE")]
    pub config: Option<PathBuf>,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    pub json_log: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run detection and write the text report
    Detect {
        /// Telemetry CSV with `temperature` and `pressure` columns
        #[arg(short, long)]
        input: PathBuf,
        #[command(flatten)]
        thresholds: ThresholdArgs,
        /// Report destination (defaults to the configured report_path)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Skip announcements
        #[arg(short, long)]
        quiet: bool,
    },
    /// Run detection and export the chart feed as JSON
    Plot {
        #[arg(short, long)]
        input: PathBuf,
        #[command(flatten)]
        thresholds: ThresholdArgs,
        /// JSON destination; stdout when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Command line overrides for the configured thresholds.
#[derive(Args, Debug, Clone, Default, PartialEq)]
pub struct ThresholdArgs {
    /// Temperature hard limit (readings above it qualify)
    #[arg(long, allow_negative_numbers = true)]
    pub temp_threshold: Option<f64>,
    /// Pressure hard limit (readings below it qualify)
    #[arg(long, allow_negative_numbers = true)]
    pub press_threshold: Option<f64>,
    /// Z-score limit in standard deviations, must be > 0
    #[arg(short = 'z', long, allow_negative_numbers = true)]
    pub z_threshold: Option<f64>,
}

impl ThresholdArgs {
    pub fn resolve(&self, cfg: &DynamicConfig) -> Result<ThresholdConfig, ConfigError> {
        ThresholdConfig::new(
            self.temp_threshold.unwrap_or(cfg.temp_threshold),
            self.press_threshold.unwrap_or(cfg.press_threshold),
            self.z_threshold.unwrap_or(cfg.z_threshold),
        )
    }
}
