//! **Preflight status client, readiness checks and insight tooltip rendering.**
//!
//! `preflight-tools` reads the readiness ("preflight") status object exposed by an
//! analytics backend, derives the views an onboarding screen needs from it, and
//! registers a fixed set of instance properties with a telemetry sink. It also ships
//! the tooltip renderer used to summarize insight data points in the terminal UI.
//!
//! ## Core Concepts & Modules
//!
//! - **[`model`]**: The fetched [`PreflightStatus`], the [`PreflightMode`] selector and
//!   the display rows derived from them.
//! - **[`preflight`]**: The [`PreflightController`], which owns the status, mirrors the
//!   selected mode into a route and schedules debounced telemetry registration.
//!   Derived views are pure functions in [`preflight::selectors`].
//! - **[`tui`]**: The [`InsightTooltip`] widget and the interactive preflight screen.
//! - **[`config`]**: YAML configuration with discovery, merging and validation.
//! - **[`cli`]**: Testable handlers for the `preflight-tools` binary.
//!
//! ## Getting Started
//!
//! ```no_run
//! use preflight_tools::preflight::{ControllerOptions, PreflightController, StaticStatusSource};
//!
//! let source = StaticStatusSource::from_file("preflight.json");
//! let controller = PreflightController::init(Box::new(source), ControllerOptions::default());
//!
//! for check in controller.checks() {
//!     println!("{}: {}", check.label, if check.passed { "ok" } else { "failing" });
//! }
//! println!("site URL misconfigured: {}", controller.site_url_misconfigured());
//! ```
//!
//! ### Rendering a tooltip
//!
//! ```
//! use preflight_tools::tui::{BodyLine, InsightTooltip, Interval};
//! use ratatui::style::Color;
//!
//! let tooltip = InsightTooltip::new(vec![BodyLine::new("pageviews", "1,024 pageviews", Color::Blue)])
//!     .reference_date("2021-06-01", Interval::Day)
//!     .inspect_users_label(true);
//! assert_eq!(tooltip.title(), "Tue, 1 Jun 2021");
//! ```

// Lint to discourage unwrap() in production code - prefer explicit error handling
#![warn(clippy::unwrap_used)]
// Pedantic lints: allow categories that are design choices for this codebase
#![allow(
    // Layout math in the TUI casts between u16 and usize
    clippy::cast_possible_truncation,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    // TUI render functions are inherently long
    clippy::too_many_lines,
    // The status object is a flat record of service flags
    clippy::struct_excessive_bools,
    clippy::fn_params_excessive_bools
)]

pub mod cli;
pub mod config;
pub mod error;
pub mod model;
pub mod preflight;
pub mod tui;

// Re-export main types for convenience
pub use config::{AppConfig, ConfigError, TelemetryConfig, TuiConfig, Validatable};
pub use error::{ErrorContext, FetchErrorKind, PreflightError, Result};
pub use model::{ConfigOption, ConfigValue, PreflightCheck, PreflightMode, PreflightStatus, Realm};
pub use preflight::{
    ControllerOptions, PreflightController, PreflightRoute, StaticStatusSource, StatusSource,
    TelemetryProps, TelemetrySink,
};
#[cfg(feature = "http")]
pub use preflight::HttpStatusSource;
pub use tui::{BodyLine, InsightTooltip, Interval};
