//! Data model for the preflight endpoint.
//!
//! [`PreflightStatus`] mirrors the JSON object served at `/_preflight/`.
//! The remaining types are the small enumerations and row types derived
//! from it for display and telemetry.

mod mode;
mod options;
mod status;

pub use mode::{ParseModeError, PreflightMode, Realm};
pub use options::{ConfigOption, ConfigValue, PreflightCheck};
pub use status::PreflightStatus;
