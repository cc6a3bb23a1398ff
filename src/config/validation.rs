//! Configuration validation for preflight-tools.

use super::types::{AppConfig, ServerConfig, TelemetryConfig, TelemetrySinkKind, TuiConfig};

/// Error type for configuration validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    /// The field that failed validation
    pub field: String,
    /// Description of the validation error
    pub message: String,
}

impl ConfigError {
    fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ConfigError {}

/// Trait for validatable configuration types.
pub trait Validatable {
    /// Validate the configuration, returning any errors found.
    fn validate(&self) -> Vec<ConfigError>;

    /// Check if the configuration is valid.
    fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }
}

impl Validatable for AppConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        errors.extend(self.server.validate());
        errors.extend(self.telemetry.validate());
        errors.extend(self.tui.validate());
        errors
    }
}

fn is_http_url(s: &str) -> bool {
    ["http://", "https://"]
        .iter()
        .any(|scheme| s.strip_prefix(scheme).is_some_and(|rest| !rest.is_empty()))
}

impl Validatable for ServerConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        if !is_http_url(&self.base_url) {
            errors.push(ConfigError::new(
                "server.base_url",
                format!("'{}' is not an http(s) URL", self.base_url),
            ));
        }
        if let Some(origin) = &self.origin {
            if !is_http_url(origin) {
                errors.push(ConfigError::new(
                    "server.origin",
                    format!("'{origin}' is not an http(s) origin"),
                ));
            }
        }
        if self.timeout_secs == 0 {
            errors.push(ConfigError::new(
                "server.timeout_secs",
                "Timeout must be at least 1 second",
            ));
        }
        errors
    }
}

impl Validatable for TelemetryConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        if self.enabled && self.sink == TelemetrySinkKind::Webhook {
            match &self.webhook_url {
                Some(url) if is_http_url(url) => {}
                Some(url) => errors.push(ConfigError::new(
                    "telemetry.webhook_url",
                    format!("'{url}' is not an http(s) URL"),
                )),
                None => errors.push(ConfigError::new(
                    "telemetry.webhook_url",
                    "Required when telemetry.sink is 'webhook'",
                )),
            }
        }
        if self.debounce_ms > 60_000 {
            errors.push(ConfigError::new(
                "telemetry.debounce_ms",
                "Debounce must not exceed 60000 ms",
            ));
        }
        errors
    }
}

impl Validatable for TuiConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        let valid_themes = ["dark", "light", "high-contrast"];
        if !valid_themes.contains(&self.theme.as_str()) {
            errors.push(ConfigError::new(
                "tui.theme",
                format!(
                    "Invalid theme '{}'. Valid options: {}",
                    self.theme,
                    valid_themes.join(", ")
                ),
            ));
        }
        if self.tick_rate_ms == 0 {
            errors.push(ConfigError::new(
                "tui.tick_rate_ms",
                "Tick rate must be at least 1 ms",
            ));
        }
        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(AppConfig::default().is_valid());
    }

    #[test]
    fn test_invalid_base_url() {
        let mut config = AppConfig::default();
        config.server.base_url = "localhost:8000".to_string();
        let errors = config.validate();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "server.base_url");
    }

    #[test]
    fn test_webhook_requires_url() {
        let mut config = AppConfig::default();
        config.telemetry.sink = TelemetrySinkKind::Webhook;
        assert!(!config.is_valid());
        config.telemetry.webhook_url = Some("https://hooks.example.com/x".to_string());
        assert!(config.is_valid());
        config.telemetry.enabled = false;
        config.telemetry.webhook_url = None;
        assert!(config.is_valid());
    }

    #[test]
    fn test_invalid_theme_and_timeout() {
        let mut config = AppConfig::default();
        config.tui.theme = "solarized".to_string();
        config.server.timeout_secs = 0;
        let fields: Vec<_> = config.validate().into_iter().map(|e| e.field).collect();
        assert_eq!(fields, vec!["server.timeout_secs", "tui.theme"]);
    }
}
