//! Where preflight status snapshots come from.

use crate::error::{ErrorContext, FetchErrorKind, PreflightError, Result};
use crate::model::PreflightStatus;
use std::path::{Path, PathBuf};

/// Relative path of the preflight endpoint under the backend base URL.
pub const PREFLIGHT_ENDPOINT: &str = "_preflight/";

/// A source of preflight status snapshots.
pub trait StatusSource: Send {
    /// Fetch the current status. Each call performs a fresh read.
    fn fetch(&self) -> Result<PreflightStatus>;

    /// Short description used in log messages.
    fn describe(&self) -> String {
        "status source".to_string()
    }
}

impl<F> StatusSource for F
where
    F: Fn() -> Result<PreflightStatus> + Send,
{
    fn fetch(&self) -> Result<PreflightStatus> {
        self()
    }
}

/// Serves a status read from a JSON file, or a fixed in-memory value.
#[derive(Debug, Clone)]
pub enum StaticStatusSource {
    File(PathBuf),
    Fixed(PreflightStatus),
}

impl StaticStatusSource {
    pub fn from_file(path: impl AsRef<Path>) -> Self {
        Self::File(path.as_ref().to_path_buf())
    }
}

impl StatusSource for StaticStatusSource {
    fn fetch(&self) -> Result<PreflightStatus> {
        match self {
            Self::Fixed(status) => Ok(status.clone()),
            Self::File(path) => {
                let body =
                    std::fs::read_to_string(path).map_err(|e| PreflightError::io(path, e))?;
                PreflightStatus::from_json(&body)
                    .with_context(|| format!("decoding {}", path.display()))
            }
        }
    }

    fn describe(&self) -> String {
        match self {
            Self::Fixed(_) => "fixed status".to_string(),
            Self::File(path) => format!("file {}", path.display()),
        }
    }
}

/// Fetches `GET <base_url>/_preflight/` with a blocking HTTP client.
#[cfg(feature = "http")]
#[derive(Debug, Clone)]
pub struct HttpStatusSource {
    endpoint: String,
    client: reqwest::blocking::Client,
}

#[cfg(feature = "http")]
impl HttpStatusSource {
    /// Build a source for the backend at `base_url`.
    pub fn new(base_url: &str, timeout: std::time::Duration) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("preflight-tools/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| {
                PreflightError::fetch("building HTTP client", FetchErrorKind::Unavailable(e.to_string()))
            })?;
        Ok(Self {
            endpoint: endpoint_url(base_url),
            client,
        })
    }

    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[cfg(feature = "http")]
impl StatusSource for HttpStatusSource {
    fn fetch(&self) -> Result<PreflightStatus> {
        let context = format!("GET {}", self.endpoint);
        let response = self
            .client
            .get(&self.endpoint)
            .header("Accept", "application/json")
            .send()
            .map_err(|e| PreflightError::fetch(&context, FetchErrorKind::Network(e.to_string())))?;

        if !response.status().is_success() {
            return Err(PreflightError::fetch(
                context,
                FetchErrorKind::Status(response.status().as_u16()),
            ));
        }

        let body = response
            .text()
            .map_err(|e| PreflightError::fetch(&context, FetchErrorKind::Network(e.to_string())))?;
        PreflightStatus::from_json(&body).context(context)
    }

    fn describe(&self) -> String {
        self.endpoint.clone()
    }
}

/// Join the backend base URL and the preflight endpoint.
#[must_use]
pub fn endpoint_url(base_url: &str) -> String {
    format!("{}/{PREFLIGHT_ENDPOINT}", base_url.trim_end_matches('/'))
}
