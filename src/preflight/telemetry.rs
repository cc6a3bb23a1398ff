//! Instance property registration with a telemetry sink.
//!
//! Provides trait-based sinks: tracing log output, NDJSON (machine
//! readable), webhook (HTTP POST, feature-gated) and an in-memory recorder.

use crate::config::{TelemetryConfig, TelemetrySinkKind};
use crate::error::{PreflightError, Result};
use crate::model::{PreflightStatus, Realm};
use crate::preflight::selectors;
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::sync::{Arc, Mutex, PoisonError};

/// Flat property set registered once per successful fetch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TelemetryProps {
    pub posthog_version: Option<String>,
    pub realm: Option<Realm>,
    pub is_clickhouse_enabled: bool,
    pub ee_available: bool,
    pub email_service_available: Option<bool>,
}

impl TelemetryProps {
    /// Properties for a loaded status.
    #[must_use]
    pub fn from_status(status: &PreflightStatus) -> Self {
        Self {
            posthog_version: status.posthog_version.clone(),
            realm: selectors::realm(Some(status)),
            is_clickhouse_enabled: status.is_clickhouse_enabled,
            ee_available: status.ee_available,
            email_service_available: status.email_service_available,
        }
    }

    /// The properties as a flat JSON object.
    #[must_use]
    pub fn to_map(&self) -> serde_json::Map<String, serde_json::Value> {
        match serde_json::to_value(self) {
            Ok(serde_json::Value::Object(map)) => map,
            _ => serde_json::Map::new(),
        }
    }
}

/// Receives instance property registrations.
pub trait TelemetrySink: Send + Sync {
    fn register(&self, props: &TelemetryProps) -> Result<()>;
}

// ============================================================================
// Log sink: structured tracing event
// ============================================================================

#[derive(Debug, Default)]
pub struct LogTelemetrySink;

impl TelemetrySink for LogTelemetrySink {
    fn register(&self, props: &TelemetryProps) -> Result<()> {
        tracing::info!(
            posthog_version = props.posthog_version.as_deref().unwrap_or("unknown"),
            realm = props.realm.map_or("unknown", Realm::as_str),
            is_clickhouse_enabled = props.is_clickhouse_enabled,
            ee_available = props.ee_available,
            email_service_available = ?props.email_service_available,
            "registered instance properties"
        );
        Ok(())
    }
}

// ============================================================================
// NDJSON sink: one JSON object per registration
// ============================================================================

pub struct NdjsonTelemetrySink {
    writer: Mutex<Box<dyn Write + Send>>,
}

impl NdjsonTelemetrySink {
    pub fn new(writer: Box<dyn Write + Send>) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }
}

impl TelemetrySink for NdjsonTelemetrySink {
    fn register(&self, props: &TelemetryProps) -> Result<()> {
        let event = serde_json::json!({
            "type": "register",
            "timestamp": chrono::Utc::now().to_rfc3339(),
            "properties": props.to_map(),
        });
        let mut writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        serde_json::to_writer(&mut *writer, &event)
            .map_err(|e| PreflightError::telemetry(e.to_string()))?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        Ok(())
    }
}

// ============================================================================
// Webhook sink: HTTP POST (feature-gated)
// ============================================================================

#[cfg(feature = "http")]
pub struct WebhookTelemetrySink {
    url: String,
    client: reqwest::blocking::Client,
}

#[cfg(feature = "http")]
impl WebhookTelemetrySink {
    pub fn new(url: String) -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(10))
            .build()
            .unwrap_or_else(|_| reqwest::blocking::Client::new());
        Self { url, client }
    }
}

#[cfg(feature = "http")]
impl TelemetrySink for WebhookTelemetrySink {
    fn register(&self, props: &TelemetryProps) -> Result<()> {
        let response = self
            .client
            .post(&self.url)
            .json(&props.to_map())
            .send()
            .map_err(|e| PreflightError::telemetry(format!("POST {}: {e}", self.url)))?;
        if !response.status().is_success() {
            return Err(PreflightError::telemetry(format!(
                "POST {} returned {}",
                self.url,
                response.status()
            )));
        }
        Ok(())
    }
}

// ============================================================================
// Memory sink: records registrations
// ============================================================================

#[derive(Debug, Default)]
pub struct MemoryTelemetrySink {
    registrations: Mutex<Vec<TelemetryProps>>,
}

impl MemoryTelemetrySink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All registrations received so far, oldest first.
    #[must_use]
    pub fn registrations(&self) -> Vec<TelemetryProps> {
        self.registrations
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    #[must_use]
    pub fn count(&self) -> usize {
        self.registrations
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl TelemetrySink for MemoryTelemetrySink {
    fn register(&self, props: &TelemetryProps) -> Result<()> {
        self.registrations
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(props.clone());
        Ok(())
    }
}

/// Build the sink selected by the configuration, `None` when disabled.
pub fn build_telemetry_sink(config: &TelemetryConfig) -> Result<Option<Arc<dyn TelemetrySink>>> {
    if !config.enabled {
        return Ok(None);
    }
    let sink: Arc<dyn TelemetrySink> = match config.sink {
        TelemetrySinkKind::None => return Ok(None),
        TelemetrySinkKind::Log => Arc::new(LogTelemetrySink),
        TelemetrySinkKind::Ndjson => {
            let writer: Box<dyn Write + Send> = match &config.ndjson_path {
                Some(path) => {
                    let file = std::fs::OpenOptions::new()
                        .create(true)
                        .append(true)
                        .open(path)
                        .map_err(|e| PreflightError::io(path, e))?;
                    Box::new(file)
                }
                None => Box::new(std::io::stdout()),
            };
            Arc::new(NdjsonTelemetrySink::new(writer))
        }
        #[cfg(feature = "http")]
        TelemetrySinkKind::Webhook => {
            let url = config.webhook_url.clone().ok_or_else(|| {
                PreflightError::config("telemetry.webhook_url is required for the webhook sink")
            })?;
            Arc::new(WebhookTelemetrySink::new(url))
        }
        #[cfg(not(feature = "http"))]
        TelemetrySinkKind::Webhook => {
            return Err(PreflightError::config(
                "webhook telemetry requires the `http` feature",
            ))
        }
    };
    Ok(Some(sink))
}
