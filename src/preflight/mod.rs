//! Preflight status controller and its collaborators.
//!
//! The [`PreflightController`] owns the fetched [`PreflightStatus`], the
//! selected [`PreflightMode`] and the route that mirrors it. Derived values
//! live in [`selectors`] as pure functions so they can be evaluated against
//! any status snapshot. Fetching goes through a [`StatusSource`] and
//! instance properties are registered with a [`TelemetrySink`] after a
//! debounce delay.
//!
//! ```ignore
//! use preflight_tools::preflight::{ControllerOptions, HttpStatusSource, PreflightController};
//!
//! let source = HttpStatusSource::new("http://localhost:8000", Duration::from_secs(10))?;
//! let mut controller = PreflightController::init(Box::new(source), ControllerOptions::default());
//! println!("realm: {:?}", controller.realm());
//! controller.shutdown();
//! ```
//!
//! [`PreflightStatus`]: crate::model::PreflightStatus
//! [`PreflightMode`]: crate::model::PreflightMode

mod controller;
pub mod debounce;
pub mod route;
pub mod selectors;
mod source;
pub mod telemetry;

pub use controller::{ControllerOptions, PreflightController, DEFAULT_REGISTRATION_DELAY};
pub use debounce::Debouncer;
pub use route::{PreflightRoute, PREFLIGHT_PATH};
#[cfg(feature = "http")]
pub use source::HttpStatusSource;
pub use source::{StaticStatusSource, StatusSource, PREFLIGHT_ENDPOINT};
pub use telemetry::{
    build_telemetry_sink, LogTelemetrySink, MemoryTelemetrySink, NdjsonTelemetrySink,
    TelemetryProps, TelemetrySink,
};
#[cfg(feature = "http")]
pub use telemetry::WebhookTelemetrySink;
