//! Values derived from the current preflight status.
//!
//! Every function here is pure: it takes the status snapshot (or `None`
//! before the first successful fetch) and returns a fresh value.

use crate::model::{ConfigOption, ConfigValue, PreflightCheck, PreflightStatus, Realm};

/// Whether at least one social login provider is switched on.
#[must_use]
pub fn social_auth_available(status: Option<&PreflightStatus>) -> bool {
    status.is_some_and(|s| s.available_social_auth_providers.values().any(|enabled| *enabled))
}

/// Deployment realm, `None` until a status is loaded.
#[must_use]
pub fn realm(status: Option<&PreflightStatus>) -> Option<Realm> {
    status.map(|s| if s.cloud { Realm::Cloud } else { Realm::Hosted })
}

/// Whether the configured site URL is missing or differs from `origin`.
///
/// Comparison is an exact string match, so a trailing slash counts as a
/// mismatch.
#[must_use]
pub fn site_url_misconfigured(status: Option<&PreflightStatus>, origin: &str) -> bool {
    status.is_some_and(|s| {
        let site_url = s.site_url_or_empty();
        // An unset site URL is misconfigured even against an empty origin.
        site_url.is_empty() || site_url != origin
    })
}

/// Whether new organizations may be created.
///
/// Only an initiated self-hosted instance locks organization creation.
#[must_use]
pub fn organization_creation_allowed(status: Option<&PreflightStatus>) -> bool {
    status.is_none_or(|s| s.cloud || !s.initiated)
}

/// Config rows shown on the instance status page.
///
/// A value the backend did not report is shown as an empty string.
#[must_use]
pub fn config_options(status: Option<&PreflightStatus>) -> Vec<ConfigOption> {
    let Some(s) = status else {
        return Vec::new();
    };
    vec![
        ConfigOption::new(
            "Site URL",
            s.site_url
                .as_deref()
                .map_or_else(|| ConfigValue::Text(String::new()), ConfigValue::from),
        ),
        ConfigOption::new(
            "Email service available",
            s.email_service_available
                .map_or_else(|| ConfigValue::Text(String::new()), ConfigValue::Flag),
        ),
    ]
}

/// Service checks for the preflight screen, in display order.
#[must_use]
pub fn checks(status: Option<&PreflightStatus>) -> Vec<PreflightCheck> {
    let Some(s) = status else {
        return Vec::new();
    };
    vec![
        PreflightCheck {
            id: "django",
            label: "Application server",
            passed: s.django,
            caption: None,
        },
        PreflightCheck {
            id: "db",
            label: "Database",
            passed: s.db,
            caption: s.db_backend.clone(),
        },
        PreflightCheck {
            id: "redis",
            label: "Cache",
            passed: s.redis,
            caption: Some("Redis".to_string()),
        },
        PreflightCheck {
            id: "celery",
            label: "Background jobs",
            passed: s.celery,
            caption: Some("Celery".to_string()),
        },
        PreflightCheck {
            id: "plugins",
            label: "Plugin server",
            passed: s.plugins,
            caption: (!s.plugins).then(|| "Plugins are disabled until it runs".to_string()),
        },
    ]
}

/// Whether every service check passed. `false` with no status.
#[must_use]
pub fn all_checks_passed(status: Option<&PreflightStatus>) -> bool {
    status.is_some() && checks(status).iter().all(|c| c.passed)
}
