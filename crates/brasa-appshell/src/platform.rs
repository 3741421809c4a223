//! Browser platform seams.
//!
//! Everything the controllers need from the host environment comes through
//! these traits: capability probing, the captured install prompt, page
//! reload, and the worker registration surface. Production bindings adapt
//! the real browser APIs; tests substitute fakes.

use async_trait::async_trait;

use brasa_core::result::AppResult;
use brasa_core::types::Platform;

/// Capability and context probe for the current browsing context.
pub trait PlatformProbe: Send + Sync + std::fmt::Debug + 'static {
    /// Whether the service-worker registration API exists.
    fn supports_service_worker(&self) -> bool;

    /// Whether the notification API exists.
    fn supports_notifications(&self) -> bool;

    /// Whether the page was served over a secure protocol.
    fn is_secure_context(&self) -> bool;

    /// Whether the host is a loopback address (localhost development).
    fn is_loopback_host(&self) -> bool;

    /// Whether the app currently runs in standalone display mode.
    fn is_standalone_display(&self) -> bool;

    /// The platform this context runs on.
    fn platform(&self) -> Platform;

    /// The reported user agent, if any.
    fn user_agent(&self) -> Option<String> {
        None
    }
}

/// The user's choice on an install prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptChoice {
    /// The user accepted installation.
    Accepted,
    /// The user dismissed the prompt.
    Dismissed,
}

/// A captured install-prompt handle.
///
/// The underlying platform event is single-use: the handle is consumed by
/// value, and the manager discards its reference before the user's choice
/// resolves.
#[async_trait]
pub trait InstallPrompt: Send + Sync + std::fmt::Debug {
    /// Show the prompt and wait for the user's choice.
    async fn prompt(self: Box<Self>) -> AppResult<PromptChoice>;
}

/// Page-level actions the controllers may trigger.
pub trait PageHost: Send + Sync + std::fmt::Debug + 'static {
    /// Force a full page reload.
    fn reload(&self);
}

/// An active worker registration handle.
#[async_trait]
pub trait WorkerRegistration: Send + Sync + std::fmt::Debug {
    /// The scope this registration controls.
    fn scope(&self) -> String;

    /// Enable navigation preload for this registration.
    async fn enable_navigation_preload(&self) -> AppResult<()>;

    /// Remove the registration.
    async fn unregister(&self) -> AppResult<()>;
}

/// The registration surface of the browsing context.
#[async_trait]
pub trait WorkerContainer: Send + Sync + std::fmt::Debug + 'static {
    /// Register a worker script for a scope.
    async fn register(
        &self,
        script_path: &str,
        scope: &str,
    ) -> AppResult<Box<dyn WorkerRegistration>>;

    /// Whether a worker currently controls this page.
    fn has_controller(&self) -> bool;
}

/// Plain network access, as seen from inside the worker's fetch handler.
#[async_trait]
pub trait NetworkFetch: Send + Sync + std::fmt::Debug {
    /// Perform the request against the network.
    async fn fetch(
        &self,
        request: &crate::worker::fetch::FetchRequest,
    ) -> AppResult<crate::worker::fetch::FetchResponse>;
}
