//! Derived-view tests against concrete status objects.

use indexmap::IndexMap;
use preflight_tools::model::{ConfigOption, ConfigValue, PreflightStatus, Realm};
use preflight_tools::preflight::selectors::{
    all_checks_passed, checks, config_options, organization_creation_allowed, realm,
    site_url_misconfigured, social_auth_available,
};

const ORIGIN: &str = "http://localhost:8000";

fn providers(entries: &[(&str, bool)]) -> PreflightStatus {
    PreflightStatus {
        available_social_auth_providers: entries
            .iter()
            .map(|(name, enabled)| ((*name).to_string(), *enabled))
            .collect::<IndexMap<_, _>>(),
        ..PreflightStatus::default()
    }
}

#[test]
fn test_social_auth_requires_an_enabled_provider() {
    assert!(!social_auth_available(None));
    assert!(!social_auth_available(Some(&providers(&[]))));
    assert!(!social_auth_available(Some(&providers(&[
        ("github", false),
        ("gitlab", false)
    ]))));
    assert!(social_auth_available(Some(&providers(&[
        ("github", false),
        ("google-oauth2", true)
    ]))));
}

#[test]
fn test_realm() {
    assert_eq!(realm(None), None);
    let cloud = PreflightStatus {
        cloud: true,
        ..PreflightStatus::default()
    };
    assert_eq!(realm(Some(&cloud)), Some(Realm::Cloud));
    assert_eq!(realm(Some(&PreflightStatus::default())), Some(Realm::Hosted));
}

#[test]
fn test_organization_creation_allowed() {
    let status = |cloud, initiated| PreflightStatus {
        cloud,
        initiated,
        ..PreflightStatus::default()
    };
    assert!(organization_creation_allowed(None));
    assert!(organization_creation_allowed(Some(&status(true, true))));
    assert!(!organization_creation_allowed(Some(&status(false, true))));
    assert!(organization_creation_allowed(Some(&status(false, false))));
}

#[test]
fn test_site_url_misconfigured() {
    let with_url = |url: &str| PreflightStatus {
        site_url: Some(url.to_string()),
        ..PreflightStatus::default()
    };
    assert!(!site_url_misconfigured(None, ORIGIN));
    assert!(site_url_misconfigured(Some(&with_url("")), ORIGIN));
    assert!(site_url_misconfigured(Some(&with_url("")), ""));
    assert!(site_url_misconfigured(Some(&PreflightStatus::default()), ORIGIN));
    assert!(!site_url_misconfigured(Some(&with_url(ORIGIN)), ORIGIN));
    assert!(site_url_misconfigured(Some(&with_url("http://other")), ORIGIN));
    assert!(site_url_misconfigured(
        Some(&with_url("http://localhost:8000/")),
        ORIGIN
    ));
}

#[test]
fn test_config_options() {
    assert!(config_options(None).is_empty());

    let status = PreflightStatus {
        site_url: Some("x".to_string()),
        email_service_available: Some(true),
        ..PreflightStatus::default()
    };
    assert_eq!(
        config_options(Some(&status)),
        vec![
            ConfigOption::new("Site URL", "x"),
            ConfigOption::new("Email service available", true),
        ]
    );
}

#[test]
fn test_config_options_missing_keys_are_empty_text() {
    let status = PreflightStatus::from_json("{}").unwrap();
    let options = config_options(Some(&status));
    assert_eq!(options.len(), 2);
    assert!(options
        .iter()
        .all(|o| o.value == ConfigValue::Text(String::new())));
}

#[test]
fn test_config_options_json_shape() {
    let status = PreflightStatus {
        site_url: Some("x".to_string()),
        email_service_available: Some(true),
        ..PreflightStatus::default()
    };
    let json = serde_json::to_value(config_options(Some(&status))).unwrap();
    assert_eq!(
        json,
        serde_json::json!([
            {"metric": "Site URL", "value": "x"},
            {"metric": "Email service available", "value": true}
        ])
    );
}

#[test]
fn test_checks_follow_service_flags() {
    assert!(checks(None).is_empty());
    assert!(!all_checks_passed(None));

    let healthy = PreflightStatus {
        django: true,
        db: true,
        redis: true,
        celery: true,
        plugins: true,
        db_backend: Some("postgres".to_string()),
        ..PreflightStatus::default()
    };
    let rows = checks(Some(&healthy));
    let ids: Vec<_> = rows.iter().map(|c| c.id).collect();
    assert_eq!(ids, vec!["django", "db", "redis", "celery", "plugins"]);
    assert_eq!(rows[1].caption.as_deref(), Some("postgres"));
    assert!(rows[4].caption.is_none());
    assert!(all_checks_passed(Some(&healthy)));

    let no_plugins = PreflightStatus {
        plugins: false,
        ..healthy
    };
    assert!(!all_checks_passed(Some(&no_plugins)));
}
