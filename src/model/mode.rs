//! Mode selector and deployment realm enumerations.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How the instance is being set up from the preflight screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum PreflightMode {
    /// Trying things out; relaxed checks
    Experimentation,
    /// Production use; every check must pass
    Live,
}

impl PreflightMode {
    /// All modes, in selector order.
    pub const ALL: [Self; 2] = [Self::Experimentation, Self::Live];

    /// Value used in the `mode` query parameter.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Experimentation => "experimentation",
            Self::Live => "live",
        }
    }

    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Experimentation => "Just experimenting",
            Self::Live => "Live implementation",
        }
    }

    /// Next mode in the selector; `None` cycles to the first mode.
    #[must_use]
    pub const fn cycle(current: Option<Self>) -> Self {
        match current {
            None | Some(Self::Live) => Self::Experimentation,
            Some(Self::Experimentation) => Self::Live,
        }
    }
}

impl fmt::Display for PreflightMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string is not a known [`PreflightMode`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown preflight mode '{0}': expected 'experimentation' or 'live'")]
pub struct ParseModeError(pub String);

impl FromStr for PreflightMode {
    type Err = ParseModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "experimentation" => Ok(Self::Experimentation),
            "live" => Ok(Self::Live),
            other => Err(ParseModeError(other.to_string())),
        }
    }
}

/// Deployment classification of the instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Realm {
    /// Managed multi-tenant environment
    Cloud,
    /// Self-hosted instance
    Hosted,
}

impl Realm {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Cloud => "cloud",
            Self::Hosted => "hosted",
        }
    }
}

impl fmt::Display for Realm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_parse() {
        assert_eq!("live".parse::<PreflightMode>(), Ok(PreflightMode::Live));
        assert_eq!(
            "experimentation".parse::<PreflightMode>(),
            Ok(PreflightMode::Experimentation)
        );
        assert!("Live".parse::<PreflightMode>().is_err());
        assert!("".parse::<PreflightMode>().is_err());
    }

    #[test]
    fn test_mode_cycle() {
        assert_eq!(PreflightMode::cycle(None), PreflightMode::Experimentation);
        assert_eq!(
            PreflightMode::cycle(Some(PreflightMode::Experimentation)),
            PreflightMode::Live
        );
        assert_eq!(
            PreflightMode::cycle(Some(PreflightMode::Live)),
            PreflightMode::Experimentation
        );
    }

    #[test]
    fn test_serde_lowercase() {
        assert_eq!(serde_json::to_string(&Realm::Cloud).unwrap(), "\"cloud\"");
        assert_eq!(
            serde_json::from_str::<PreflightMode>("\"live\"").unwrap(),
            PreflightMode::Live
        );
    }
}
