//! Check command handler.
//!
//! Fetches the preflight status once and reports the backend service
//! checks, instance options and derived flags.

use super::{SourceOptions, exit_codes, start_controller};
use crate::config::AppConfig;
use crate::model::{ConfigOption, PreflightCheck, PreflightMode, Realm};
use crate::preflight::PreflightController;
use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::Serialize;
use std::fmt::Write as _;

/// Output format for the `check` command
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Everything `check` reports about a loaded status.
#[derive(Debug, Clone, Serialize)]
pub struct CheckReport {
    pub route: String,
    pub mode: Option<PreflightMode>,
    pub realm: Option<Realm>,
    pub posthog_version: Option<String>,
    pub checks: Vec<PreflightCheck>,
    pub config_options: Vec<ConfigOption>,
    pub social_auth_available: bool,
    pub site_url_misconfigured: bool,
    pub organization_creation_allowed: bool,
    pub all_checks_passed: bool,
}

impl CheckReport {
    /// Snapshot the controller's derived views.
    #[must_use]
    pub fn from_controller(controller: &PreflightController) -> Self {
        Self {
            route: controller.route().to_string(),
            mode: controller.preflight_mode(),
            realm: controller.realm(),
            posthog_version: controller
                .preflight()
                .and_then(|s| s.posthog_version.clone()),
            all_checks_passed: controller.all_checks_passed(),
            checks: controller.checks(),
            config_options: controller.config_options(),
            social_auth_available: controller.social_auth_available(),
            site_url_misconfigured: controller.site_url_misconfigured(),
            organization_creation_allowed: controller.organization_creation_allowed(),
        }
    }

    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        if self.all_checks_passed {
            exit_codes::SUCCESS
        } else {
            exit_codes::CHECK_FAILED
        }
    }
}

/// Run the check command, returning the desired exit code.
///
/// A failed fetch is returned as an error; the caller maps it to
/// [`exit_codes::ERROR`].
pub fn run_check(config: &AppConfig, options: &SourceOptions, format: OutputFormat) -> Result<i32> {
    let mut controller = start_controller(config, options)?;

    if let Some(err) = controller.last_error() {
        anyhow::bail!("could not load preflight status: {err}");
    }

    report_and_flush(&mut controller, format)
}

/// Print the report for a loaded controller, then deliver its registration.
fn report_and_flush(controller: &mut PreflightController, format: OutputFormat) -> Result<i32> {
    let report = CheckReport::from_controller(controller);
    let output = match format {
        OutputFormat::Json => {
            serde_json::to_string_pretty(&report).context("failed to serialize report")?
        }
        OutputFormat::Text => render_text(&report),
    };
    println!("{output}");

    // Deliver the registration before the process exits, including one
    // whose delay has elapsed but whose sink is still running.
    controller.flush_registration();

    tracing::debug!(exit_code = report.exit_code(), "check finished");
    Ok(report.exit_code())
}

/// Human-readable rendering of a [`CheckReport`].
#[must_use]
pub fn render_text(report: &CheckReport) -> String {
    let mut out = String::new();

    let realm = report.realm.map_or("unknown", Realm::as_str);
    let version = report.posthog_version.as_deref().unwrap_or("unknown");
    let _ = writeln!(out, "Instance: {realm} (version {version})");
    if let Some(mode) = report.mode {
        let _ = writeln!(out, "Mode:     {}", mode.label());
    }
    out.push('\n');

    out.push_str("Checks:\n");
    for check in &report.checks {
        let mark = if check.passed { "ok" } else { "FAIL" };
        let _ = write!(out, "  [{mark:>4}] {}", check.label);
        if let Some(caption) = &check.caption {
            let _ = write!(out, " ({caption})");
        }
        out.push('\n');
    }
    out.push('\n');

    out.push_str("Configuration:\n");
    for option in &report.config_options {
        let _ = writeln!(out, "  {}: {}", option.metric, option.value);
    }
    out.push('\n');

    let _ = writeln!(
        out,
        "Social login available:  {}",
        yes_no(report.social_auth_available)
    );
    let _ = writeln!(
        out,
        "Site URL misconfigured:  {}",
        yes_no(report.site_url_misconfigured)
    );
    let _ = write!(
        out,
        "Can create organization: {}",
        yes_no(report.organization_creation_allowed)
    );
    out
}

const fn yes_no(value: bool) -> &'static str {
    if value { "yes" } else { "no" }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PreflightStatus;
    use crate::preflight::{
        ControllerOptions, StaticStatusSource, TelemetryProps, TelemetrySink,
    };
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// Sink that takes a while to deliver, like a webhook on a slow link.
    struct SlowSink {
        delivered: AtomicUsize,
    }

    impl TelemetrySink for SlowSink {
        fn register(&self, _props: &TelemetryProps) -> crate::Result<()> {
            std::thread::sleep(Duration::from_millis(300));
            self.delivered.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    fn controller_for(status: PreflightStatus) -> PreflightController {
        PreflightController::init(
            Box::new(StaticStatusSource::Fixed(status)),
            ControllerOptions::default(),
        )
    }

    #[test]
    fn test_report_all_passed() {
        let controller = controller_for(PreflightStatus {
            django: true,
            db: true,
            redis: true,
            celery: true,
            plugins: true,
            ..PreflightStatus::default()
        });
        let report = CheckReport::from_controller(&controller);
        assert!(report.all_checks_passed);
        assert_eq!(report.exit_code(), exit_codes::SUCCESS);
        assert_eq!(report.realm, Some(Realm::Hosted));
    }

    #[test]
    fn test_report_failed_check() {
        let controller = controller_for(PreflightStatus {
            django: true,
            ..PreflightStatus::default()
        });
        let report = CheckReport::from_controller(&controller);
        assert!(!report.all_checks_passed);
        assert_eq!(report.exit_code(), exit_codes::CHECK_FAILED);
    }

    #[test]
    fn test_render_text_lists_checks_and_options() {
        let controller = controller_for(PreflightStatus {
            cloud: true,
            site_url: Some("https://app.example.com".to_string()),
            ..PreflightStatus::default()
        });
        let text = render_text(&CheckReport::from_controller(&controller));
        assert!(text.starts_with("Instance: cloud (version unknown)"));
        assert!(text.contains("[FAIL] Plugin server (Plugins are disabled until it runs)"));
        assert!(text.contains("Site URL: https://app.example.com"));
        assert!(text.contains("Site URL misconfigured:  yes"));
    }

    #[test]
    fn test_report_json_shape() {
        let controller = controller_for(PreflightStatus::default());
        let value = serde_json::to_value(CheckReport::from_controller(&controller)).unwrap();
        assert_eq!(value["route"], "/preflight");
        assert_eq!(value["realm"], "hosted");
        assert_eq!(value["checks"].as_array().unwrap().len(), 5);
    }

    #[test]
    fn test_report_waits_for_registration_in_flight() {
        let sink = Arc::new(SlowSink {
            delivered: AtomicUsize::new(0),
        });
        let mut controller = PreflightController::new(
            Box::new(StaticStatusSource::Fixed(PreflightStatus::default())),
            ControllerOptions {
                registration_delay: Duration::from_millis(10),
                ..ControllerOptions::default()
            },
        )
        .with_telemetry(Arc::clone(&sink) as Arc<dyn TelemetrySink>)
        .started();

        // Timer has fired; the sink is still delivering.
        std::thread::sleep(Duration::from_millis(100));
        assert!(!controller.registration_pending());

        let exit_code = report_and_flush(&mut controller, OutputFormat::Json).unwrap();
        assert_eq!(exit_code, exit_codes::CHECK_FAILED);
        assert_eq!(sink.delivered.load(Ordering::SeqCst), 1);
    }
}
