//! Configuration types for preflight-tools.

use crate::preflight::ControllerOptions;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_REGISTRATION_DELAY_MS: u64 = 100;

/// Unified application configuration loaded from a config file and
/// overridden by CLI arguments.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct AppConfig {
    /// Backend connection settings
    pub server: ServerConfig,
    /// Instance property registration
    pub telemetry: TelemetryConfig,
    /// Terminal UI settings
    pub tui: TuiConfig,
}

impl AppConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Controller options derived from this configuration.
    #[must_use]
    pub fn controller_options(&self) -> ControllerOptions {
        ControllerOptions {
            origin: self.server.effective_origin().to_string(),
            registration_delay: Duration::from_millis(self.telemetry.debounce_ms),
        }
    }
}

// ============================================================================
// Server
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct ServerConfig {
    /// Backend base URL; the status is read from `<base_url>/_preflight/`
    pub base_url: String,
    /// Origin the UI is served from; defaults to `base_url`
    pub origin: Option<String>,
    /// HTTP request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            origin: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl ServerConfig {
    /// The configured origin, falling back to the base URL without a
    /// trailing slash.
    #[must_use]
    pub fn effective_origin(&self) -> &str {
        self.origin
            .as_deref()
            .unwrap_or_else(|| self.base_url.trim_end_matches('/'))
    }

    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

// ============================================================================
// Telemetry
// ============================================================================

/// Which sink receives instance property registrations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum TelemetrySinkKind {
    /// Structured log event
    #[default]
    Log,
    /// One JSON object per line to `ndjson_path` or stdout
    Ndjson,
    /// HTTP POST to `webhook_url`
    Webhook,
    None,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct TelemetryConfig {
    pub enabled: bool,
    /// Delay before a registration fires, in milliseconds
    pub debounce_ms: u64,
    pub sink: TelemetrySinkKind,
    pub ndjson_path: Option<PathBuf>,
    pub webhook_url: Option<String>,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            debounce_ms: DEFAULT_REGISTRATION_DELAY_MS,
            sink: TelemetrySinkKind::Log,
            ndjson_path: None,
            webhook_url: None,
        }
    }
}

// ============================================================================
// TUI
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct TuiConfig {
    /// Theme name: "dark", "light", or "high-contrast"
    pub theme: String,
    /// Event poll interval in milliseconds
    pub tick_rate_ms: u64,
}

impl Default for TuiConfig {
    fn default() -> Self {
        Self {
            theme: "dark".to_string(),
            tick_rate_ms: 250,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effective_origin_falls_back_to_base_url() {
        let mut server = ServerConfig {
            base_url: "https://app.example.com/".to_string(),
            ..ServerConfig::default()
        };
        assert_eq!(server.effective_origin(), "https://app.example.com");
        server.origin = Some("https://ui.example.com".to_string());
        assert_eq!(server.effective_origin(), "https://ui.example.com");
    }

    #[test]
    fn test_controller_options() {
        let mut config = AppConfig::default();
        config.telemetry.debounce_ms = 250;
        let options = config.controller_options();
        assert_eq!(options.registration_delay, Duration::from_millis(250));
        assert_eq!(options.origin, DEFAULT_BASE_URL);
    }

    #[test]
    fn test_yaml_partial_sections() {
        let config: AppConfig = serde_yaml::from_str("telemetry:\n  sink: ndjson\n").unwrap();
        assert_eq!(config.telemetry.sink, TelemetrySinkKind::Ndjson);
        assert!(config.telemetry.enabled);
        assert_eq!(config.server, ServerConfig::default());
    }
}
