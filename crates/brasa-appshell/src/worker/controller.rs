//! Service-worker controller.
//!
//! Owns registration, version handover, and the page-side reaction to a
//! new worker taking control. Registration failure is never fatal: the app
//! keeps running online-only and the failure is surfaced as state.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use brasa_core::events::{EventBus, WorkerEvent};

use crate::platform::{PageHost, PlatformProbe, WorkerContainer, WorkerRegistration};
use crate::worker::scripts::{ROOT_SCOPE, ScriptCatalog, ScriptResolution};

/// Registration lifecycle phases, page-side view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationPhase {
    /// No registration attempted or possible.
    Unregistered,
    /// A registration call is in flight.
    Registering,
    /// A registration exists and is idle.
    Registered,
    /// A new worker version is installing.
    Updating,
    /// The new version is installed and waiting to activate.
    UpdatePending,
    /// The new version took control.
    Activated,
}

/// Mutable controller state behind one lock.
#[derive(Debug)]
struct ControllerState {
    phase: RegistrationPhase,
    update_available: bool,
    last_error: Option<String>,
}

/// Registers and supervises the origin's service worker.
#[derive(Debug)]
pub struct ServiceWorkerController {
    probe: Arc<dyn PlatformProbe>,
    container: Arc<dyn WorkerContainer>,
    host: Arc<dyn PageHost>,
    scripts: ScriptCatalog,
    bus: EventBus,
    /// Suppresses concurrent registration attempts.
    registering: AtomicBool,
    /// Ensures the controller-change reload happens at most once per page
    /// lifetime.
    refreshing: AtomicBool,
    state: Mutex<ControllerState>,
    registration: Mutex<Option<Box<dyn WorkerRegistration>>>,
}

impl ServiceWorkerController {
    /// Create a controller for the current page session.
    pub fn new(
        probe: Arc<dyn PlatformProbe>,
        container: Arc<dyn WorkerContainer>,
        host: Arc<dyn PageHost>,
        scripts: ScriptCatalog,
        bus: EventBus,
    ) -> Self {
        Self {
            probe,
            container,
            host,
            scripts,
            bus,
            registering: AtomicBool::new(false),
            refreshing: AtomicBool::new(false),
            state: Mutex::new(ControllerState {
                phase: RegistrationPhase::Unregistered,
                update_available: false,
                last_error: None,
            }),
            registration: Mutex::new(None),
        }
    }

    /// Register the canonical worker at the root scope.
    ///
    /// Called once per page load. Requires a secure context or a loopback
    /// host, plus platform support; anything else records the reason and
    /// returns without throwing. A second call while one is in flight is
    /// suppressed.
    pub async fn register(&self) -> bool {
        self.register_script(self.scripts.canonical()).await
    }

    /// Register a specific script path, honoring the deprecation catalog.
    pub async fn register_script(&self, script_path: &str) -> bool {
        if !self.probe.supports_service_worker() {
            self.record_failure("Service workers are not supported on this platform")
                .await;
            return false;
        }

        let secure = self.probe.is_secure_context();
        let loopback = self.probe.is_loopback_host();
        if !secure && !loopback {
            self.record_failure("Service workers require a secure (HTTPS) context")
                .await;
            return false;
        }
        if !secure && loopback {
            info!(
                "Registering on a loopback host; production requires HTTPS \
                 or a browser flag for insecure origins"
            );
        }

        if self
            .registering
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            debug!("Registration already in flight, ignoring");
            return false;
        }

        let (script, resolution) = self.scripts.resolve(script_path);
        if let ScriptResolution::Redirected { from } = &resolution {
            info!(from = %from, to = %script, "Redirecting deprecated worker script");
        }

        self.state.lock().await.phase = RegistrationPhase::Registering;

        let result = self.container.register(&script, ROOT_SCOPE).await;
        self.registering.store(false, Ordering::SeqCst);

        match result {
            Ok(registration) => {
                let scope = registration.scope();
                info!(scope = %scope, "Service worker registered");
                *self.registration.lock().await = Some(registration);
                let mut state = self.state.lock().await;
                state.phase = RegistrationPhase::Registered;
                state.last_error = None;
                drop(state);
                self.bus.emit(WorkerEvent::Registered { scope });
                true
            }
            Err(e) => {
                self.record_failure(format!("Service worker registration failed: {e}"))
                    .await;
                false
            }
        }
    }

    /// A new worker version started installing.
    pub async fn on_update_found(&self) {
        let mut state = self.state.lock().await;
        state.phase = RegistrationPhase::Updating;
        debug!("Service worker update found");
    }

    /// The installing worker reached the installed state.
    ///
    /// Only counts as an available update when an active controller
    /// already exists; on first install there is nothing to hand over.
    /// Whether to auto-reload or prompt is the host page's decision.
    pub async fn on_worker_installed(&self) {
        if !self.container.has_controller() {
            debug!("First worker install, no update to surface");
            return;
        }

        let mut state = self.state.lock().await;
        state.phase = RegistrationPhase::UpdatePending;
        state.update_available = true;
        drop(state);
        self.bus.emit(WorkerEvent::UpdateAvailable);
    }

    /// The new worker took control of the page.
    ///
    /// Browsers may fire this more than once; the atomic flag makes the
    /// forced reload idempotent per page lifetime.
    pub async fn on_controller_change(&self) {
        if self
            .refreshing
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            debug!("Reload already performed for this handover");
            return;
        }

        let mut state = self.state.lock().await;
        state.phase = RegistrationPhase::Activated;
        state.update_available = false;
        drop(state);

        info!("New service worker took control, reloading page");
        self.bus.emit(WorkerEvent::ControllerChanged);
        self.host.reload();
    }

    /// Current lifecycle phase.
    pub async fn phase(&self) -> RegistrationPhase {
        self.state.lock().await.phase
    }

    /// Whether a new worker version is installed and waiting.
    pub async fn update_available(&self) -> bool {
        self.state.lock().await.update_available
    }

    /// The most recent registration failure, if any.
    pub async fn last_error(&self) -> Option<String> {
        self.state.lock().await.last_error.clone()
    }

    async fn record_failure(&self, reason: impl Into<String>) {
        let reason = reason.into();
        warn!(reason = %reason, "Continuing without offline support");
        let mut state = self.state.lock().await;
        state.last_error = Some(reason.clone());
        drop(state);
        self.bus.emit(WorkerEvent::RegistrationFailed { reason });
    }
}
