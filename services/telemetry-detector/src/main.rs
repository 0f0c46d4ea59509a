use anyhow::Result;
use clap::Parser;
use telemetry_detector::cli::Cli;

fn main() -> Result<()> {
    telemetry_detector::run(Cli::parse())
}
