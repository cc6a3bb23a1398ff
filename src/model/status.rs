//! The preflight status snapshot served by the backend.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Snapshot of backend deployment configuration and feature availability.
///
/// Every field defaults when the server omits it, so older or newer
/// backends still decode. Unknown fields are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreflightStatus {
    /// Backend web server is up
    pub django: bool,
    /// Cache is reachable
    pub redis: bool,
    /// Plugin server is running
    pub plugins: bool,
    /// Task queue workers are running
    pub celery: bool,
    /// Database is reachable
    pub db: bool,
    /// The instance has completed its first-run setup
    pub initiated: bool,
    /// Managed multi-tenant deployment
    pub cloud: bool,
    /// Social login providers keyed by provider name
    pub available_social_auth_providers: IndexMap<String, bool>,
    pub can_create_org: bool,
    /// `None` when the backend did not report email configuration
    pub email_service_available: Option<bool>,
    pub is_clickhouse_enabled: bool,
    pub ee_available: bool,
    pub ee_enabled: bool,
    pub db_backend: Option<String>,
    pub posthog_version: Option<String>,
    /// Configured public URL of the instance, `None` when unset
    pub site_url: Option<String>,
    pub opt_out_capture: bool,
    pub is_debug: bool,
}

impl PreflightStatus {
    /// Decode a status object from a JSON body.
    pub fn from_json(body: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(body)?)
    }

    /// Names of the social login providers that are switched on.
    pub fn enabled_social_providers(&self) -> impl Iterator<Item = &str> {
        self.available_social_auth_providers
            .iter()
            .filter(|(_, enabled)| **enabled)
            .map(|(name, _)| name.as_str())
    }

    /// Site URL with an empty string for a missing value.
    #[must_use]
    pub fn site_url_or_empty(&self) -> &str {
        self.site_url.as_deref().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_full_payload() {
        let body = r#"{
            "django": true,
            "redis": true,
            "plugins": false,
            "celery": true,
            "db": true,
            "initiated": true,
            "cloud": false,
            "available_social_auth_providers": {"google-oauth2": false, "github": true, "gitlab": false},
            "can_create_org": false,
            "email_service_available": true,
            "is_clickhouse_enabled": true,
            "ee_available": true,
            "ee_enabled": true,
            "db_backend": "clickhouse",
            "posthog_version": "1.27.0",
            "site_url": "http://localhost:8000",
            "opt_out_capture": false,
            "is_debug": false,
            "available_timezones": {"UTC": 0}
        }"#;
        let status = PreflightStatus::from_json(body).unwrap();
        assert!(status.initiated);
        assert_eq!(status.posthog_version.as_deref(), Some("1.27.0"));
        assert_eq!(status.enabled_social_providers().collect::<Vec<_>>(), vec!["github"]);
        assert_eq!(status.site_url_or_empty(), "http://localhost:8000");
    }

    #[test]
    fn test_decode_sparse_payload_defaults() {
        let status = PreflightStatus::from_json(r#"{"cloud": true}"#).unwrap();
        assert!(status.cloud);
        assert!(!status.initiated);
        assert!(status.available_social_auth_providers.is_empty());
        assert_eq!(status.email_service_available, None);
        assert_eq!(status.site_url_or_empty(), "");
    }

    #[test]
    fn test_decode_rejects_non_object() {
        assert!(PreflightStatus::from_json("[1, 2]").is_err());
    }

    #[test]
    fn test_provider_order_is_preserved() {
        let status = PreflightStatus::from_json(
            r#"{"available_social_auth_providers": {"gitlab": true, "github": true}}"#,
        )
        .unwrap();
        assert_eq!(
            status.enabled_social_providers().collect::<Vec<_>>(),
            vec!["gitlab", "github"]
        );
    }
}
