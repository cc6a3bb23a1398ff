//! Unified error types for preflight-tools.
//!
//! This module provides the error hierarchy for the library,
//! with context chaining for debugging and user-friendly messages.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for preflight-tools operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum PreflightError {
    /// Errors while fetching the preflight status
    #[error("Preflight fetch failed: {context}")]
    Fetch {
        context: String,
        #[source]
        source: FetchErrorKind,
    },

    /// Errors delivering telemetry registrations
    #[error("Telemetry registration failed: {0}")]
    Telemetry(String),

    /// IO errors with context
    #[error("IO error at {path:?}: {message}")]
    Io {
        path: Option<PathBuf>,
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Configuration errors
    #[error("Invalid configuration: {0}")]
    Config(String),

}

/// Specific fetch error kinds
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum FetchErrorKind {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Server returned HTTP {0}")]
    Status(u16),

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),

    #[error("Status source unavailable: {0}")]
    Unavailable(String),
}

/// Convenient Result type for preflight-tools operations
pub type Result<T> = std::result::Result<T, PreflightError>;

// ============================================================================
// Error construction helpers
// ============================================================================

impl PreflightError {
    /// Create a fetch error with context
    pub fn fetch(context: impl Into<String>, source: FetchErrorKind) -> Self {
        Self::Fetch {
            context: context.into(),
            source,
        }
    }

    /// Create an IO error with path context
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let message = format!("{source}");
        Self::Io {
            path: Some(path.into()),
            message,
            source,
        }
    }

    /// Create a telemetry error
    pub fn telemetry(message: impl Into<String>) -> Self {
        Self::Telemetry(message.into())
    }

    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Whether this error came from the status fetch path.
    #[must_use]
    pub const fn is_fetch(&self) -> bool {
        matches!(self, Self::Fetch { .. })
    }

    /// The message followed by every source in the chain, joined by ": ".
    ///
    /// Sources whose text already appears in the message are skipped.
    #[must_use]
    pub fn display_chain(&self) -> String {
        let mut out = self.to_string();
        let mut source = std::error::Error::source(self);
        while let Some(err) = source {
            let text = err.to_string();
            if !out.contains(&text) {
                out.push_str(": ");
                out.push_str(&text);
            }
            source = std::error::Error::source(err);
        }
        out
    }
}

// ============================================================================
// Conversions from existing error types
// ============================================================================

impl From<std::io::Error> for PreflightError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            path: None,
            message: format!("{err}"),
            source: err,
        }
    }
}

impl From<serde_json::Error> for PreflightError {
    fn from(err: serde_json::Error) -> Self {
        Self::fetch(
            "JSON deserialization",
            FetchErrorKind::InvalidResponse(err.to_string()),
        )
    }
}

// ============================================================================
// Error context extension trait
// ============================================================================

/// Extension trait for adding context to errors.
///
/// The context string is prepended to the error's existing context,
/// creating a chain that shows the path through the code.
///
/// ```ignore
/// use preflight_tools::error::ErrorContext;
///
/// let status: PreflightStatus = serde_json::from_str(body)
///     .context("decoding preflight response")?;
/// ```
pub trait ErrorContext<T> {
    /// Add context to an error.
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context from a closure, only evaluated on error.
    fn with_context<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>;
}

impl<T, E: Into<PreflightError>> ErrorContext<T> for std::result::Result<T, E> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        let ctx: String = context.into();
        self.map_err(|e| add_context_to_error(e.into(), &ctx))
    }

    fn with_context<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>,
    {
        self.map_err(|e| {
            let ctx: String = f().into();
            add_context_to_error(e.into(), &ctx)
        })
    }
}

fn add_context_to_error(err: PreflightError, new_ctx: &str) -> PreflightError {
    match err {
        PreflightError::Fetch {
            context: existing,
            source,
        } => PreflightError::Fetch {
            context: chain_context(new_ctx, &existing),
            source,
        },
        PreflightError::Io {
            path,
            message,
            source,
        } => PreflightError::Io {
            path,
            message: chain_context(new_ctx, &message),
            source,
        },
        PreflightError::Telemetry(msg) => PreflightError::Telemetry(chain_context(new_ctx, &msg)),
        PreflightError::Config(msg) => PreflightError::Config(chain_context(new_ctx, &msg)),
    }
}

/// Chain two context strings as "`new`: `existing`".
fn chain_context(new: &str, existing: &str) -> String {
    if existing.is_empty() {
        new.to_string()
    } else {
        format!("{new}: {existing}")
    }
}
