//! Application state for the preflight screen.

use super::status::StatusMessage;
use super::theme::{colors, toggle_theme};
use super::tooltip::{BodyLine, InsightTooltip, Interval};
use crate::model::PreflightMode;
use crate::preflight::PreflightController;
use ratatui::prelude::*;
use std::time::Duration;

/// State of the interactive preflight screen.
pub struct PreflightApp {
    pub(crate) controller: PreflightController,
    pub(crate) status: StatusMessage,
    pub(crate) show_tooltip: bool,
    pub(crate) should_quit: bool,
    pub(crate) tick: u64,
}

impl PreflightApp {
    #[must_use]
    pub fn new(controller: PreflightController) -> Self {
        let mut status = StatusMessage::with_auto_clear(Duration::from_secs(4));
        if let Some(err) = controller.last_error() {
            status.error(err.to_string());
        }
        Self {
            controller,
            status,
            show_tooltip: true,
            should_quit: false,
            tick: 0,
        }
    }

    #[must_use]
    pub const fn controller(&self) -> &PreflightController {
        &self.controller
    }

    #[must_use]
    pub const fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    /// Re-fetch the status and report the outcome in the status bar.
    pub fn reload(&mut self) {
        match self.controller.load_preflight() {
            Ok(_) => self.status.info("Preflight status reloaded"),
            Err(e) => self.status.error(e.display_chain()),
        }
    }

    /// Select the next mode; selecting a mode reloads the status.
    pub fn cycle_mode(&mut self) {
        let next = PreflightMode::cycle(self.controller.preflight_mode());
        self.controller.set_preflight_mode(Some(next), false);
        match self.controller.last_error() {
            Some(err) => self.status.error(err.to_string()),
            None => self.status.info(format!("Mode: {}", next.label())),
        }
    }

    pub fn toggle_tooltip(&mut self) {
        self.show_tooltip = !self.show_tooltip;
    }

    pub fn cycle_theme(&mut self) {
        let name = toggle_theme();
        self.status.info(format!("Theme: {name}"));
    }

    pub fn on_tick(&mut self) {
        self.tick += 1;
        self.status.expire();
    }

    /// Tooltip summarizing the service checks of the current status.
    #[must_use]
    pub fn checks_tooltip(&self) -> InsightTooltip {
        let scheme = colors();
        let mut lines: Vec<BodyLine> = self
            .controller
            .checks()
            .into_iter()
            .map(|check| {
                let (verdict, color) = if check.passed {
                    ("OK", scheme.success)
                } else {
                    ("FAILED", scheme.error)
                };
                BodyLine::new(check.id, format!("{}: {verdict}", check.label), color)
            })
            .collect();

        if let Some(realm) = self.controller.realm() {
            lines.push(
                BodyLine::new("realm", format!("Realm: {realm}"), scheme.border)
                    .with_background(scheme.primary),
            );
        }

        let tooltip = InsightTooltip::new(lines).alt_title("Preflight checks");
        match self.controller.loaded_at() {
            Some(at) => tooltip.reference_date(at.to_rfc3339(), Interval::Minute),
            None => tooltip,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PreflightStatus;
    use crate::preflight::{ControllerOptions, StaticStatusSource};

    fn app_with(status: PreflightStatus) -> PreflightApp {
        let controller = PreflightController::init(
            Box::new(StaticStatusSource::Fixed(status)),
            ControllerOptions::default(),
        );
        PreflightApp::new(controller)
    }

    #[test]
    fn test_cycle_mode_reloads() {
        let mut app = app_with(PreflightStatus::default());
        assert_eq!(app.controller().fetch_count(), 1);
        app.cycle_mode();
        assert_eq!(
            app.controller().preflight_mode(),
            Some(PreflightMode::Experimentation)
        );
        assert_eq!(app.controller().fetch_count(), 2);
        app.cycle_mode();
        assert_eq!(app.controller().preflight_mode(), Some(PreflightMode::Live));
        assert_eq!(app.controller().route().to_string(), "/preflight?mode=live");
    }

    #[test]
    fn test_checks_tooltip_lines() {
        let app = app_with(PreflightStatus {
            django: true,
            cloud: false,
            ..PreflightStatus::default()
        });
        let tooltip = app.checks_tooltip();
        assert!(tooltip.reference_date.is_some());
        // five service checks plus realm
        assert_eq!(tooltip.body_lines.len(), 6);
        assert_eq!(tooltip.body_lines[0].id, "django");
        assert!(tooltip.body_lines[5].background_color.is_some());
    }

    #[test]
    fn test_tooltip_without_status_uses_alt_title() {
        let controller = PreflightController::new(
            Box::new(StaticStatusSource::Fixed(PreflightStatus::default())),
            ControllerOptions::default(),
        );
        let app = PreflightApp::new(controller);
        let tooltip = app.checks_tooltip();
        assert_eq!(tooltip.title(), "Preflight checks");
        assert!(tooltip.body_lines.is_empty());
    }

    #[test]
    fn test_toggle_tooltip_and_quit() {
        let mut app = app_with(PreflightStatus::default());
        assert!(app.show_tooltip);
        app.toggle_tooltip();
        assert!(!app.show_tooltip);
        app.quit();
        assert!(app.should_quit());
    }
}
