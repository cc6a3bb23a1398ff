//! Configuration module for preflight-tools.
//!
//! This module provides:
//! - Type-safe configuration structures
//! - Validation for all configuration values
//! - YAML config file loading and discovery
//! - CLI overrides layered over the file
//!
//! # Configuration File
//!
//! Place a `.preflight-tools.yaml` file in your project root or
//! `~/.config/preflight-tools/`:
//!
//! ```yaml
//! server:
//!   base_url: http://localhost:8000
//!   origin: http://localhost:8000
//! telemetry:
//!   sink: ndjson
//!   ndjson_path: registrations.ndjson
//! ```

pub mod file;
mod types;
mod validation;

pub use types::{
    AppConfig, ServerConfig, TelemetryConfig, TelemetrySinkKind, TuiConfig,
    DEFAULT_BASE_URL, DEFAULT_REGISTRATION_DELAY_MS, DEFAULT_TIMEOUT_SECS,
};
pub use validation::{ConfigError, Validatable};

pub use file::{
    discover_config_file, generate_example_config, load_config_file, load_or_default,
    ConfigFileError, ConfigOverrides,
};

/// Generate a JSON Schema for the `AppConfig` configuration format.
pub fn generate_json_schema() -> crate::Result<String> {
    let schema = schemars::schema_for!(AppConfig);
    serde_json::to_string_pretty(&schema).map_err(|e| crate::PreflightError::config(e.to_string()))
}
