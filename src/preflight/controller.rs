//! The preflight status controller.

use super::debounce::Debouncer;
use super::route::PreflightRoute;
use super::selectors;
use super::source::StatusSource;
use super::telemetry::{TelemetryProps, TelemetrySink};
use crate::error::Result;
use crate::model::{ConfigOption, PreflightCheck, PreflightMode, PreflightStatus, Realm};
use chrono::{DateTime, Utc};
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

/// Delay between a successful fetch and the telemetry registration.
pub const DEFAULT_REGISTRATION_DELAY: Duration = Duration::from_millis(100);

type SharedStatus = Arc<RwLock<Option<Arc<PreflightStatus>>>>;

/// Construction options for [`PreflightController`].
#[derive(Debug, Clone)]
pub struct ControllerOptions {
    /// Origin the UI is served from, compared against the site URL
    pub origin: String,
    /// Debounce delay for telemetry registration
    pub registration_delay: Duration,
}

impl Default for ControllerOptions {
    fn default() -> Self {
        Self {
            origin: "http://localhost:8000".to_string(),
            registration_delay: DEFAULT_REGISTRATION_DELAY,
        }
    }
}

/// Owns the preflight status, the selected mode and the route mirroring it.
pub struct PreflightController {
    source: Box<dyn StatusSource>,
    telemetry: Option<Arc<dyn TelemetrySink>>,
    status: SharedStatus,
    mode: Option<PreflightMode>,
    route: PreflightRoute,
    origin: String,
    last_error: Option<String>,
    loaded_at: Option<DateTime<Utc>>,
    fetch_count: u64,
    registration: Debouncer,
}

impl PreflightController {
    /// Construct a controller without fetching.
    #[must_use]
    pub fn new(source: Box<dyn StatusSource>, options: ControllerOptions) -> Self {
        Self {
            source,
            telemetry: None,
            status: Arc::new(RwLock::new(None)),
            mode: None,
            route: PreflightRoute::default(),
            origin: options.origin,
            last_error: None,
            loaded_at: None,
            fetch_count: 0,
            registration: Debouncer::new(options.registration_delay),
        }
    }

    /// Construct a controller and issue the initial fetch.
    ///
    /// A failed initial fetch is logged and recorded in [`Self::last_error`].
    #[must_use]
    pub fn init(source: Box<dyn StatusSource>, options: ControllerOptions) -> Self {
        Self::new(source, options).started()
    }

    /// Attach a telemetry sink for instance property registration.
    #[must_use]
    pub fn with_telemetry(mut self, sink: Arc<dyn TelemetrySink>) -> Self {
        self.telemetry = Some(sink);
        self
    }

    /// Issue the initial fetch on an already configured controller.
    #[must_use]
    pub fn started(mut self) -> Self {
        // Failure is already recorded in last_error.
        let _ = self.load_preflight();
        self
    }

    /// Cancel any pending telemetry registration.
    pub fn shutdown(&mut self) {
        if self.registration.cancel() {
            tracing::debug!("cancelled pending instance property registration");
        }
    }

    /// Block until a pending telemetry registration has run.
    ///
    /// Returns `true` if a registration was delivered to the sink.
    pub fn flush_registration(&mut self) -> bool {
        self.registration.wait()
    }

    /// Fetch the status and replace the stored snapshot.
    ///
    /// On failure the previous status is kept and the error is both
    /// recorded and returned.
    pub fn load_preflight(&mut self) -> Result<Arc<PreflightStatus>> {
        self.fetch_count += 1;
        tracing::debug!(source = %self.source.describe(), "loading preflight status");

        match self.source.fetch() {
            Ok(status) => {
                let status = Arc::new(status);
                *self.status.write().unwrap_or_else(PoisonError::into_inner) =
                    Some(Arc::clone(&status));
                self.last_error = None;
                self.loaded_at = Some(Utc::now());
                tracing::debug!(
                    realm = ?selectors::realm(Some(&status)),
                    initiated = status.initiated,
                    "preflight status loaded"
                );
                self.register_instrumentation_props();
                Ok(status)
            }
            Err(e) => {
                let message = e.display_chain();
                tracing::warn!("Failed to load preflight status: {message}");
                self.last_error = Some(message);
                Err(e)
            }
        }
    }

    /// Schedule a debounced registration of instance properties.
    ///
    /// The registration reads whatever status is current when the delay
    /// elapses and is skipped if there is none.
    pub fn register_instrumentation_props(&mut self) {
        let Some(sink) = self.telemetry.clone() else {
            return;
        };
        let status = Arc::clone(&self.status);
        let scheduled = self.registration.trigger(move || {
            let current = status
                .read()
                .unwrap_or_else(PoisonError::into_inner)
                .clone();
            let Some(current) = current else {
                return;
            };
            let props = TelemetryProps::from_status(&current);
            match sink.register(&props) {
                Ok(()) => tracing::debug!("registered instance properties"),
                Err(e) => tracing::warn!("Telemetry sink error: {e}"),
            }
        });
        if let Err(e) = scheduled {
            tracing::warn!("Failed to schedule instance property registration: {e}");
        }
    }

    /// Select a mode and mirror it into the route.
    ///
    /// Selecting `Some` mode reloads the status unless `no_reload` is set.
    pub fn set_preflight_mode(&mut self, mode: Option<PreflightMode>, no_reload: bool) {
        self.mode = mode;
        self.route = PreflightRoute::for_mode(mode);
        tracing::debug!(route = %self.route, no_reload, "preflight mode changed");

        if mode.is_some() && !no_reload {
            // Failure is already recorded in last_error.
            let _ = self.load_preflight();
        }
    }

    /// Apply an incoming route, adopting its mode without reloading.
    ///
    /// Returns the adopted mode. Other paths, missing modes and unknown
    /// mode values leave the controller untouched.
    pub fn apply_route(&mut self, route: &PreflightRoute) -> Option<PreflightMode> {
        if !route.is_preflight() {
            return None;
        }
        match route.mode() {
            Some(Ok(mode)) => {
                self.set_preflight_mode(Some(mode), true);
                Some(mode)
            }
            Some(Err(e)) => {
                tracing::debug!("Ignoring route {route}: {e}");
                None
            }
            None => None,
        }
    }

    // ------------------------------------------------------------------
    // Accessors and derived views
    // ------------------------------------------------------------------

    /// The current status snapshot, if any fetch has succeeded.
    #[must_use]
    pub fn preflight(&self) -> Option<Arc<PreflightStatus>> {
        self.status
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    #[must_use]
    pub const fn preflight_mode(&self) -> Option<PreflightMode> {
        self.mode
    }

    #[must_use]
    pub const fn route(&self) -> &PreflightRoute {
        &self.route
    }

    #[must_use]
    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// Message of the most recent failed fetch, cleared on success.
    #[must_use]
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// When the current status was stored.
    #[must_use]
    pub const fn loaded_at(&self) -> Option<DateTime<Utc>> {
        self.loaded_at
    }

    /// Number of fetch attempts made so far.
    #[must_use]
    pub const fn fetch_count(&self) -> u64 {
        self.fetch_count
    }

    /// Whether a telemetry registration is waiting for its delay.
    #[must_use]
    pub fn registration_pending(&self) -> bool {
        self.registration.is_pending()
    }

    #[must_use]
    pub fn social_auth_available(&self) -> bool {
        selectors::social_auth_available(self.preflight().as_deref())
    }

    #[must_use]
    pub fn realm(&self) -> Option<Realm> {
        selectors::realm(self.preflight().as_deref())
    }

    #[must_use]
    pub fn site_url_misconfigured(&self) -> bool {
        selectors::site_url_misconfigured(self.preflight().as_deref(), &self.origin)
    }

    #[must_use]
    pub fn organization_creation_allowed(&self) -> bool {
        selectors::organization_creation_allowed(self.preflight().as_deref())
    }

    #[must_use]
    pub fn config_options(&self) -> Vec<ConfigOption> {
        selectors::config_options(self.preflight().as_deref())
    }

    #[must_use]
    pub fn checks(&self) -> Vec<PreflightCheck> {
        selectors::checks(self.preflight().as_deref())
    }

    #[must_use]
    pub fn all_checks_passed(&self) -> bool {
        selectors::all_checks_passed(self.preflight().as_deref())
    }
}

impl Drop for PreflightController {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl std::fmt::Debug for PreflightController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PreflightController")
            .field("source", &self.source.describe())
            .field("mode", &self.mode)
            .field("route", &self.route.to_string())
            .field("loaded", &self.preflight().is_some())
            .field("last_error", &self.last_error)
            .field("fetch_count", &self.fetch_count)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{FetchErrorKind, PreflightError};
    use crate::preflight::MemoryTelemetrySink;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counting_source(calls: Arc<AtomicUsize>) -> Box<dyn StatusSource> {
        Box::new(move || -> Result<PreflightStatus> {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok(PreflightStatus {
                cloud: true,
                ..PreflightStatus::default()
            })
        })
    }

    #[test]
    fn test_new_does_not_fetch() {
        let calls = Arc::new(AtomicUsize::new(0));
        let controller =
            PreflightController::new(counting_source(Arc::clone(&calls)), ControllerOptions::default());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert!(controller.preflight().is_none());
        assert_eq!(controller.realm(), None);
        assert!(controller.organization_creation_allowed());
    }

    #[test]
    fn test_init_fetches_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let controller =
            PreflightController::init(counting_source(Arc::clone(&calls)), ControllerOptions::default());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(controller.realm(), Some(Realm::Cloud));
        assert!(controller.loaded_at().is_some());
    }

    #[test]
    fn test_failed_fetch_records_error() {
        let source = Box::new(|| -> Result<PreflightStatus> {
            Err(PreflightError::fetch(
                "GET /_preflight/",
                FetchErrorKind::Status(503),
            ))
        });
        let controller = PreflightController::init(source, ControllerOptions::default());
        assert!(controller.preflight().is_none());
        assert_eq!(
            controller.last_error(),
            Some("Preflight fetch failed: GET /_preflight/: Server returned HTTP 503")
        );
        assert_eq!(controller.fetch_count(), 1);
    }

    #[test]
    fn test_mode_writes_route() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut controller =
            PreflightController::new(counting_source(Arc::clone(&calls)), ControllerOptions::default());
        controller.set_preflight_mode(Some(PreflightMode::Experimentation), true);
        assert_eq!(controller.route().to_string(), "/preflight?mode=experimentation");
        controller.set_preflight_mode(None, false);
        assert_eq!(controller.route().to_string(), "/preflight");
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_no_sink_means_no_pending_registration() {
        let calls = Arc::new(AtomicUsize::new(0));
        let controller =
            PreflightController::init(counting_source(calls), ControllerOptions::default());
        assert!(!controller.registration_pending());
    }

    #[test]
    fn test_flush_delivers_registration() {
        let calls = Arc::new(AtomicUsize::new(0));
        let sink = Arc::new(MemoryTelemetrySink::new());
        let mut controller = PreflightController::new(counting_source(calls), ControllerOptions::default())
            .with_telemetry(sink.clone())
            .started();
        assert!(controller.flush_registration());
        assert_eq!(sink.count(), 1);
        assert_eq!(sink.registrations()[0].realm, Some(Realm::Cloud));
    }

    #[test]
    fn test_shutdown_cancels_registration() {
        let calls = Arc::new(AtomicUsize::new(0));
        let sink = Arc::new(MemoryTelemetrySink::new());
        let options = ControllerOptions {
            registration_delay: Duration::from_millis(100),
            ..ControllerOptions::default()
        };
        let mut controller = PreflightController::new(counting_source(calls), options)
            .with_telemetry(sink.clone())
            .started();
        assert!(controller.registration_pending());
        controller.shutdown();
        std::thread::sleep(Duration::from_millis(250));
        assert_eq!(sink.count(), 0);
    }
}
