//! Display rows derived from a preflight status.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Value cell of a config option row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConfigValue {
    Text(String),
    Flag(bool),
}

impl fmt::Display for ConfigValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            Self::Flag(b) => write!(f, "{b}"),
        }
    }
}

impl From<&str> for ConfigValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<bool> for ConfigValue {
    fn from(b: bool) -> Self {
        Self::Flag(b)
    }
}

/// One `{metric, value}` row for the instance status page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigOption {
    pub metric: String,
    pub value: ConfigValue,
}

impl ConfigOption {
    pub fn new(metric: impl Into<String>, value: impl Into<ConfigValue>) -> Self {
        Self {
            metric: metric.into(),
            value: value.into(),
        }
    }
}

/// One service check shown on the preflight screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PreflightCheck {
    /// Stable identifier, e.g. `database`
    pub id: &'static str,
    pub label: &'static str,
    pub passed: bool,
    /// Short explanation shown next to the result
    pub caption: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_value_serializes_untagged() {
        let row = ConfigOption::new("Email service available", true);
        assert_eq!(
            serde_json::to_string(&row).unwrap(),
            r#"{"metric":"Email service available","value":true}"#
        );
        let row = ConfigOption::new("Site URL", "x");
        assert_eq!(
            serde_json::to_string(&row).unwrap(),
            r#"{"metric":"Site URL","value":"x"}"#
        );
    }

    #[test]
    fn test_config_value_display() {
        assert_eq!(ConfigValue::Flag(false).to_string(), "false");
        assert_eq!(ConfigValue::from("http://a").to_string(), "http://a");
    }
}
