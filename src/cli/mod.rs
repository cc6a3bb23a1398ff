//! CLI command handlers.
//!
//! Testable command handlers invoked by main.rs. Each handler builds a
//! [`PreflightController`] from the merged [`AppConfig`] and returns the
//! process exit code.

mod check;
mod tui;

pub use check::{CheckReport, OutputFormat, render_text, run_check};
pub use tui::run_tui_command;

use crate::config::AppConfig;
use crate::model::PreflightMode;
use crate::preflight::{
    PreflightController, PreflightRoute, StaticStatusSource, StatusSource, build_telemetry_sink,
};
use anyhow::{Context, Result};
use std::path::PathBuf;

/// Process exit codes
pub mod exit_codes {
    /// Every backend service check passed
    pub const SUCCESS: i32 = 0;
    /// At least one backend service check failed
    pub const CHECK_FAILED: i32 = 1;
    /// An error occurred
    pub const ERROR: i32 = 3;
}

/// Where the controller reads its status from and how it starts.
#[derive(Debug, Clone, Default)]
pub struct SourceOptions {
    /// Read the status from a JSON file instead of the backend
    pub from_file: Option<PathBuf>,
    /// Mode to select before the first fetch
    pub mode: Option<PreflightMode>,
    /// Incoming route such as `/preflight?mode=live`; applied before `mode`
    pub route: Option<String>,
}

fn build_source(config: &AppConfig, options: &SourceOptions) -> Result<Box<dyn StatusSource>> {
    if let Some(path) = &options.from_file {
        return Ok(Box::new(StaticStatusSource::from_file(path)));
    }
    build_http_source(config)
}

#[cfg(feature = "http")]
fn build_http_source(config: &AppConfig) -> Result<Box<dyn StatusSource>> {
    let source = crate::preflight::HttpStatusSource::new(
        &config.server.base_url,
        config.server.timeout(),
    )
    .context("failed to create preflight HTTP client")?;
    Ok(Box::new(source))
}

#[cfg(not(feature = "http"))]
fn build_http_source(_config: &AppConfig) -> Result<Box<dyn StatusSource>> {
    anyhow::bail!("reading from a backend requires the `http` feature; use --from-file")
}

/// Build a controller, apply the requested route and mode, then fetch once.
pub(crate) fn start_controller(
    config: &AppConfig,
    options: &SourceOptions,
) -> Result<PreflightController> {
    let source = build_source(config, options)?;
    let mut controller = PreflightController::new(source, config.controller_options());

    if let Some(sink) =
        build_telemetry_sink(&config.telemetry).context("failed to set up telemetry sink")?
    {
        controller = controller.with_telemetry(sink);
    }

    if let Some(route) = &options.route {
        controller.apply_route(&PreflightRoute::parse(route));
    }
    if options.mode.is_some() {
        controller.set_preflight_mode(options.mode, true);
    }

    Ok(controller.started())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TelemetrySinkKind;
    use std::io::Write;

    fn status_file(body: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(body.as_bytes()).unwrap();
        file
    }

    fn offline_config() -> AppConfig {
        let mut config = AppConfig::default();
        config.telemetry.sink = TelemetrySinkKind::None;
        config
    }

    #[test]
    fn test_start_controller_from_file() {
        let file = status_file(r#"{"cloud": true, "django": true}"#);
        let options = SourceOptions {
            from_file: Some(file.path().to_path_buf()),
            ..SourceOptions::default()
        };
        let controller = start_controller(&offline_config(), &options).unwrap();
        assert_eq!(controller.fetch_count(), 1);
        assert!(controller.preflight().unwrap().cloud);
    }

    #[test]
    fn test_route_then_mode_override() {
        let file = status_file("{}");
        let options = SourceOptions {
            from_file: Some(file.path().to_path_buf()),
            mode: Some(PreflightMode::Experimentation),
            route: Some("/preflight?mode=live".to_string()),
        };
        let controller = start_controller(&offline_config(), &options).unwrap();
        assert_eq!(
            controller.preflight_mode(),
            Some(PreflightMode::Experimentation)
        );
        assert_eq!(controller.fetch_count(), 1);
    }
}
