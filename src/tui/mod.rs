//! Terminal UI for the preflight screen.
//!
//! Provides the [`InsightTooltip`] widget, a theme shared across views and
//! the interactive preflight screen driven by a
//! [`PreflightController`](crate::preflight::PreflightController).

mod app;
mod events;
mod status;
pub mod theme;
pub mod tooltip;
mod ui;

pub use app::PreflightApp;
pub use events::{handle_key_event, Event, EventHandler};
pub use status::{StatusLevel, StatusMessage};
pub use theme::{colors, set_theme, toggle_theme, ColorScheme, Theme};
pub use tooltip::{format_reference_date, BodyLine, InsightTooltip, Interval, INSPECT_USERS_HINT};
pub use ui::{render, run_tui};
