//! Core shared utilities for SkySurveil services.

use anyhow::Result;
use once_cell::sync::OnceCell;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

static TRACING_INIT: OnceCell<()> = OnceCell::new();

pub const ENV_PREFIX: &str = "SKYSURVEIL";
pub const CONFIG_FILE_ENV: &str = "SKYSURVEIL_CONFIG_FILE";
pub const JSON_LOG_ENV: &str = "SKYSURVEIL_JSON_LOG";

/// Installs the global subscriber once. `RUST_LOG` wins over `default_level`.
/// Output goes to stderr so command results on stdout stay machine readable.
pub fn init_tracing(service: &str, default_level: &str, json: bool) -> Result<()> {
    TRACING_INIT.get_or_try_init(|| -> Result<()> {
        let json = json || env_flag(JSON_LOG_ENV);
        let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));
        let registry = tracing_subscriber::registry().with(env_filter);
        if json {
            registry.with(tracing_subscriber::fmt::layer()
                .json()
                .flatten_event(true)
                .with_current_span(true)
                .with_span_list(false)
                .with_writer(std::io::stderr))
                .try_init()?;
        } else {
            registry.with(tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_thread_ids(false)
                .with_line_number(true)
                .with_writer(std::io::stderr))
                .try_init()?;
        }
        Ok(())
    })?;
    info!(service, "tracing initialized");
    Ok(())
}

fn env_flag(name: &str) -> bool {
    std::env::var(name).ok().map(|v| v == "1" || v.eq_ignore_ascii_case("true")).unwrap_or(false)
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct DynamicConfig {
    pub service_name: Option<String>,
    pub log_level: String,
    #[serde(default)]
    pub json_log: bool,
    pub temp_threshold: f64,
    pub press_threshold: f64,
    pub z_threshold: f64,
    pub report_path: PathBuf,
}

impl Default for DynamicConfig {
    fn default() -> Self {
        Self {
            service_name: None,
            log_level: "info".into(),
            json_log: false,
            temp_threshold: 100.0,
            press_threshold: 0.5,
            z_threshold: 3.0,
            report_path: PathBuf::from("anomalies.txt"),
        }
    }
}

/// Layers defaults, an optional config file and `SKYSURVEIL_*` environment
/// variables, in that order. The file comes from `file` or, failing that,
/// `SKYSURVEIL_CONFIG_FILE`; its format follows the extension.
pub fn load_config(service: &str, file: Option<&Path>) -> Result<DynamicConfig> {
    let defaults = DynamicConfig::default();
    let mut builder = config::Config::builder()
        .set_default("service_name", service)?
        .set_default("log_level", defaults.log_level.as_str())?
        .set_default("json_log", defaults.json_log)?
        .set_default("temp_threshold", defaults.temp_threshold)?
        .set_default("press_threshold", defaults.press_threshold)?
        .set_default("z_threshold", defaults.z_threshold)?
        .set_default("report_path", defaults.report_path.to_string_lossy().into_owned())?;

    let file_path = file.map(Path::to_path_buf).or_else(|| std::env::var_os(CONFIG_FILE_ENV).map(PathBuf::from));
    if let Some(path) = &file_path {
        builder = builder.add_source(config::File::from(path.as_path()).required(true));
    }
    builder = builder.add_source(
        config::Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true),
    );
    let cfg = builder.build()?;
    let dyn_cfg: DynamicConfig = cfg.try_deserialize()?;
    Ok(dyn_cfg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_match_detector_presets() {
        let cfg = load_config("telemetry-detector", None).unwrap();
        assert_eq!(cfg.service_name.as_deref(), Some("telemetry-detector"));
        assert_eq!(cfg.report_path, PathBuf::from("anomalies.txt"));
        assert!(cfg.z_threshold > 0.0);
    }

    #[test]
    fn file_overrides_defaults() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(file, "temp_threshold: 80.5\nz_threshold: 2\nreport_path: out/flags.txt").unwrap();
        let cfg = load_config("telemetry-detector", Some(file.path())).unwrap();
        assert_eq!(cfg.temp_threshold, 80.5);
        assert_eq!(cfg.z_threshold, 2.0);
        assert_eq!(cfg.report_path, PathBuf::from("out/flags.txt"));
        assert_eq!(cfg.press_threshold, 0.5);
    }

    #[test]
    fn missing_file_is_an_error() {
        let res = load_config("telemetry-detector", Some(Path::new("/nonexistent/skysurveil.yaml")));
        assert!(res.is_err());
    }
}
