//! Push-token manager.
//!
//! Drives the permission → token → registration pipeline: ask for consent
//! at most once, fetch the messaging token with a bounded retry loop,
//! persist it to the subscription store, and install the foreground
//! handler exactly once. Every failure is caught here; the only externally
//! visible effects are state and events.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use brasa_core::config::messaging::MessagingConfig;
use brasa_core::events::{EventBus, PushEvent};
use brasa_core::traits::Clock;
use brasa_core::types::{PermissionState, Platform};

use crate::gateway::{ForegroundMessage, MessagingGateway, NotificationPermissions};
use crate::store::SubscriptionSink;

/// Guidance shown on iOS when push is requested before installation.
const IOS_PUSH_INSTRUCTIONS: &str =
    "Notifications require the app to be added to your home screen first. \
     Install it from the share menu, then enable notifications.";

/// Mutable token state behind one lock.
#[derive(Debug)]
struct TokenState {
    permission: PermissionState,
    token: Option<String>,
    gave_up: bool,
}

/// Read-only snapshot for UI binding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenSnapshot {
    /// Current permission state.
    pub permission: PermissionState,
    /// The registered token, when one exists.
    pub token: Option<String>,
    /// Whether the retry budget was exhausted.
    pub gave_up: bool,
}

/// Owns the messaging token for this page session.
#[derive(Debug)]
pub struct PushTokenManager {
    permissions: Arc<dyn NotificationPermissions>,
    gateway: Arc<dyn MessagingGateway>,
    sink: Arc<dyn SubscriptionSink>,
    pub(crate) clock: Arc<dyn Clock>,
    pub(crate) bus: EventBus,
    pub(crate) config: MessagingConfig,
    platform: Platform,
    state: Mutex<TokenState>,
    /// At most one token pipeline in flight per process.
    loading: AtomicBool,
    /// The foreground handler is installed once, lazily.
    handler_installed: AtomicBool,
}

impl PushTokenManager {
    /// Create a manager for the current page session.
    pub fn new(
        permissions: Arc<dyn NotificationPermissions>,
        gateway: Arc<dyn MessagingGateway>,
        sink: Arc<dyn SubscriptionSink>,
        clock: Arc<dyn Clock>,
        bus: EventBus,
        config: MessagingConfig,
        platform: Platform,
    ) -> Self {
        let permission = if permissions.supported() {
            permissions.current()
        } else {
            PermissionState::Default
        };

        Self {
            permissions,
            gateway,
            sink,
            clock,
            bus,
            config,
            platform,
            state: Mutex::new(TokenState {
                permission,
                token: None,
                gave_up: false,
            }),
            loading: AtomicBool::new(false),
            handler_installed: AtomicBool::new(false),
        }
    }

    /// The permission → token pipeline, entry point for user-triggered and
    /// automatic flows alike.
    ///
    /// Returns the token when the pipeline completes; `None` covers every
    /// benign outcome (unsupported platform, denied permission, already
    /// loading, retries exhausted).
    pub async fn get_permission_and_token(&self) -> Option<String> {
        if !self.config.enabled {
            debug!("Messaging subsystem disabled by configuration");
            return None;
        }

        if !self.permissions.supported() {
            debug!("Notifications unsupported on this platform, skipping");
            return None;
        }

        if self.platform == Platform::Ios && self.permission().await == PermissionState::Default {
            // Web push on iOS only works from the installed app; prompting
            // here would fail silently.
            info!("iOS requires home-screen install before push");
            self.bus.emit(PushEvent::InstallRequired {
                instructions: IOS_PUSH_INSTRUCTIONS.to_string(),
            });
            return None;
        }

        self.load_token().await
    }

    /// Acquire (or re-acquire) the messaging token.
    ///
    /// Guarded by an in-flight flag: a concurrent caller observes the
    /// guard and returns immediately, preventing duplicate registrations
    /// when two components mount at once.
    pub async fn load_token(&self) -> Option<String> {
        if self
            .loading
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            debug!("Token load already in flight");
            return None;
        }

        let result = self.run_pipeline().await;
        self.loading.store(false, Ordering::SeqCst);
        result
    }

    async fn run_pipeline(&self) -> Option<String> {
        if self.permission().await.is_terminal() {
            debug!("Permission denied earlier this session, not re-prompting");
            return None;
        }

        let limit = self.config.fetch_retry_limit.max(1);
        let delay = Duration::from_millis(self.config.retry_delay_ms);

        for attempt in 1..=limit {
            match self.ensure_permission().await {
                PermissionStep::Granted => {}
                PermissionStep::Denied => return None,
                PermissionStep::Undecided => {
                    self.pause_before_retry(attempt, limit, delay).await;
                    continue;
                }
            }

            match self.fetch_and_register().await {
                Ok(token) => {
                    self.install_foreground_handler();
                    let mut state = self.state.lock().await;
                    state.token = Some(token.clone());
                    state.gave_up = false;
                    drop(state);
                    self.bus.emit(PushEvent::TokenReady {
                        token: token.clone(),
                    });
                    return Some(token);
                }
                Err(e) => {
                    warn!(attempt, error = %e, "Token acquisition attempt failed");
                    self.pause_before_retry(attempt, limit, delay).await;
                }
            }
        }

        // Out of retries: one user-visible failure, then halt.
        let mut state = self.state.lock().await;
        state.gave_up = true;
        drop(state);
        warn!(attempts = limit, "Giving up on token acquisition");
        self.bus.emit(PushEvent::TokenFailed {
            reason: "Could not enable notifications".to_string(),
            attempts: limit,
        });
        None
    }

    /// Check permission, asking the user only when it was never decided.
    async fn ensure_permission(&self) -> PermissionStep {
        match self.permissions.current() {
            PermissionState::Granted => {
                self.transition_permission(PermissionState::Granted).await;
                return PermissionStep::Granted;
            }
            PermissionState::Denied => {
                self.transition_permission(PermissionState::Denied).await;
                return PermissionStep::Denied;
            }
            PermissionState::Default => {}
        }

        match self.permissions.request().await {
            Ok(PermissionState::Granted) => {
                self.transition_permission(PermissionState::Granted).await;
                PermissionStep::Granted
            }
            Ok(PermissionState::Denied) => {
                info!("Notification permission denied");
                self.transition_permission(PermissionState::Denied).await;
                PermissionStep::Denied
            }
            Ok(PermissionState::Default) => {
                // Prompt dismissed without a decision.
                PermissionStep::Undecided
            }
            Err(e) => {
                warn!(error = %e, "Permission request failed");
                PermissionStep::Undecided
            }
        }
    }

    /// Fetch the token and persist it to the store.
    async fn fetch_and_register(&self) -> Result<String, brasa_core::AppError> {
        let token = self
            .gateway
            .fetch_token(&self.config.vapid_public_key)
            .await?;

        if token.trim().is_empty() {
            return Err(brasa_core::AppError::transient(
                "Gateway returned an empty token",
            ));
        }

        // Duplicate registrations come back as success from the store.
        let outcome = self.sink.save_token(&token).await?;
        debug!(?outcome, "Token registered with subscription store");

        Ok(token)
    }

    fn install_foreground_handler(&self) {
        if self
            .handler_installed
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return;
        }

        let bus = self.bus.clone();
        self.gateway
            .set_foreground_handler(Box::new(move |message: ForegroundMessage| {
                bus.emit(PushEvent::ForegroundMessage {
                    title: message.title,
                    body: message.body,
                });
            }));
        debug!("Foreground message handler installed");
    }

    async fn transition_permission(&self, next: PermissionState) {
        let mut state = self.state.lock().await;
        if state.permission != next {
            state.permission = next;
            drop(state);
            self.bus.emit(PushEvent::PermissionChanged { state: next });
        }
    }

    async fn pause_before_retry(&self, attempt: u32, limit: u32, delay: Duration) {
        if attempt < limit {
            self.clock.sleep(delay).await;
        }
    }

    /// Current permission state.
    pub async fn permission(&self) -> PermissionState {
        self.state.lock().await.permission
    }

    /// The registered token, when one exists.
    pub async fn token(&self) -> Option<String> {
        self.state.lock().await.token.clone()
    }

    /// Current state snapshot.
    pub async fn snapshot(&self) -> TokenSnapshot {
        let state = self.state.lock().await;
        TokenSnapshot {
            permission: state.permission,
            token: state.token.clone(),
            gave_up: state.gave_up,
        }
    }
}

enum PermissionStep {
    Granted,
    Denied,
    Undecided,
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicUsize;

    use async_trait::async_trait;
    use chrono::{DateTime, Utc};

    use brasa_core::AppError;
    use brasa_core::result::AppResult;
    use brasa_entity::subscription::store::SaveOutcome;

    use super::*;

    #[derive(Debug)]
    struct FakeClock {
        sleeps: AtomicUsize,
    }

    impl FakeClock {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                sleeps: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl Clock for FakeClock {
        fn now(&self) -> DateTime<Utc> {
            Utc::now()
        }
        async fn sleep(&self, _duration: Duration) {
            self.sleeps.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[derive(Debug)]
    struct Permissions {
        supported: bool,
        current: std::sync::Mutex<PermissionState>,
        grant_on_request: bool,
        requests: AtomicUsize,
    }

    impl Permissions {
        fn granted() -> Arc<Self> {
            Arc::new(Self {
                supported: true,
                current: std::sync::Mutex::new(PermissionState::Granted),
                grant_on_request: true,
                requests: AtomicUsize::new(0),
            })
        }

        fn fresh(grant_on_request: bool) -> Arc<Self> {
            Arc::new(Self {
                supported: true,
                current: std::sync::Mutex::new(PermissionState::Default),
                grant_on_request,
                requests: AtomicUsize::new(0),
            })
        }

        fn unsupported() -> Arc<Self> {
            Arc::new(Self {
                supported: false,
                current: std::sync::Mutex::new(PermissionState::Default),
                grant_on_request: false,
                requests: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl NotificationPermissions for Permissions {
        fn supported(&self) -> bool {
            self.supported
        }
        fn current(&self) -> PermissionState {
            *self.current.lock().unwrap()
        }
        async fn request(&self) -> AppResult<PermissionState> {
            self.requests.fetch_add(1, Ordering::SeqCst);
            let next = if self.grant_on_request {
                PermissionState::Granted
            } else {
                PermissionState::Denied
            };
            *self.current.lock().unwrap() = next;
            Ok(next)
        }
    }

    #[derive(Debug)]
    struct Gateway {
        fetches: AtomicUsize,
        handler_installs: AtomicUsize,
        fail: bool,
        slow: bool,
    }

    impl Gateway {
        fn working() -> Arc<Self> {
            Arc::new(Self {
                fetches: AtomicUsize::new(0),
                handler_installs: AtomicUsize::new(0),
                fail: false,
                slow: false,
            })
        }

        fn failing() -> Arc<Self> {
            Arc::new(Self {
                fetches: AtomicUsize::new(0),
                handler_installs: AtomicUsize::new(0),
                fail: true,
                slow: false,
            })
        }

        fn slow() -> Arc<Self> {
            Arc::new(Self {
                fetches: AtomicUsize::new(0),
                handler_installs: AtomicUsize::new(0),
                fail: false,
                slow: true,
            })
        }
    }

    #[async_trait]
    impl MessagingGateway for Gateway {
        async fn fetch_token(&self, _vapid: &str) -> AppResult<String> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            if self.slow {
                tokio::time::sleep(Duration::from_millis(50)).await;
            }
            if self.fail {
                Err(AppError::transient("gateway unavailable"))
            } else {
                Ok("token-abc".to_string())
            }
        }

        fn set_foreground_handler(&self, _handler: crate::gateway::ForegroundHandler) {
            self.handler_installs.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[derive(Debug, Default)]
    struct Sink {
        saves: AtomicUsize,
    }

    #[async_trait]
    impl SubscriptionSink for Sink {
        async fn save_token(&self, _token: &str) -> AppResult<SaveOutcome> {
            self.saves.fetch_add(1, Ordering::SeqCst);
            Ok(SaveOutcome::Created)
        }
    }

    fn config() -> MessagingConfig {
        MessagingConfig {
            project_id: "brasa-test".into(),
            api_key: "key".into(),
            sender_id: "1".into(),
            app_id: "app".into(),
            vapid_public_key: "BTestKey".into(),
            ..MessagingConfig::default()
        }
    }

    fn manager(
        permissions: Arc<Permissions>,
        gateway: Arc<Gateway>,
        sink: Arc<Sink>,
        clock: Arc<FakeClock>,
        platform: Platform,
    ) -> PushTokenManager {
        PushTokenManager::new(
            permissions,
            gateway,
            sink,
            clock,
            EventBus::new(),
            config(),
            platform,
        )
    }

    #[tokio::test]
    async fn unsupported_platform_is_a_no_op() {
        let gateway = Gateway::working();
        let mgr = manager(
            Permissions::unsupported(),
            Arc::clone(&gateway),
            Arc::new(Sink::default()),
            FakeClock::new(),
            Platform::Web,
        );

        assert_eq!(mgr.get_permission_and_token().await, None);
        assert_eq!(gateway.fetches.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn granted_permission_fetches_directly() {
        let permissions = Permissions::granted();
        let gateway = Gateway::working();
        let sink = Arc::new(Sink::default());
        let mgr = manager(
            Arc::clone(&permissions),
            Arc::clone(&gateway),
            Arc::clone(&sink),
            FakeClock::new(),
            Platform::Web,
        );

        let token = mgr.get_permission_and_token().await;
        assert_eq!(token.as_deref(), Some("token-abc"));
        // Already granted: no prompt shown.
        assert_eq!(permissions.requests.load(Ordering::SeqCst), 0);
        assert_eq!(sink.saves.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn denial_is_terminal_for_the_session() {
        let permissions = Permissions::fresh(false);
        let gateway = Gateway::working();
        let sink = Arc::new(Sink::default());
        let mgr = manager(
            Arc::clone(&permissions),
            Arc::clone(&gateway),
            Arc::clone(&sink),
            FakeClock::new(),
            Platform::Web,
        );

        assert_eq!(mgr.get_permission_and_token().await, None);
        assert_eq!(mgr.get_permission_and_token().await, None);

        // Asked exactly once, fetched never, wrote nothing.
        assert_eq!(permissions.requests.load(Ordering::SeqCst), 1);
        assert_eq!(gateway.fetches.load(Ordering::SeqCst), 0);
        assert_eq!(sink.saves.load(Ordering::SeqCst), 0);
        assert_eq!(mgr.permission().await, PermissionState::Denied);
    }

    #[tokio::test]
    async fn concurrent_loads_fetch_once() {
        let gateway = Gateway::slow();
        let mgr = Arc::new(manager(
            Permissions::granted(),
            Arc::clone(&gateway),
            Arc::new(Sink::default()),
            FakeClock::new(),
            Platform::Web,
        ));

        let a = Arc::clone(&mgr);
        let b = Arc::clone(&mgr);
        let (first, second) =
            tokio::join!(tokio::spawn(async move { a.load_token().await }), async move {
                // Give the first task a head start into the fetch.
                tokio::time::sleep(Duration::from_millis(10)).await;
                b.load_token().await
            });

        let first = first.unwrap();
        assert!(first.is_some() || second.is_some());
        assert!(first.is_none() || second.is_none());
        assert_eq!(gateway.fetches.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn exhausted_retries_give_up() {
        let gateway = Gateway::failing();
        let clock = FakeClock::new();
        let mgr = manager(
            Permissions::granted(),
            Arc::clone(&gateway),
            Arc::new(Sink::default()),
            Arc::clone(&clock),
            Platform::Web,
        );

        let failures = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&failures);
        mgr.bus.subscribe(move |event| {
            if let brasa_core::events::EventPayload::Push(PushEvent::TokenFailed { .. }) =
                &event.payload
            {
                seen.fetch_add(1, Ordering::SeqCst);
            }
        });

        assert_eq!(mgr.load_token().await, None);
        assert_eq!(gateway.fetches.load(Ordering::SeqCst), 3);
        // No delay after the final attempt.
        assert_eq!(clock.sleeps.load(Ordering::SeqCst), 2);
        assert_eq!(failures.load(Ordering::SeqCst), 1);
        assert!(mgr.snapshot().await.gave_up);
    }

    #[tokio::test]
    async fn foreground_handler_installs_once() {
        let gateway = Gateway::working();
        let mgr = manager(
            Permissions::granted(),
            Arc::clone(&gateway),
            Arc::new(Sink::default()),
            FakeClock::new(),
            Platform::Web,
        );

        mgr.load_token().await;
        mgr.load_token().await;
        assert_eq!(gateway.handler_installs.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn ios_without_permission_gets_instructions() {
        let gateway = Gateway::working();
        let mgr = manager(
            Permissions::fresh(true),
            Arc::clone(&gateway),
            Arc::new(Sink::default()),
            FakeClock::new(),
            Platform::Ios,
        );

        let guidance = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&guidance);
        mgr.bus.subscribe(move |event| {
            if let brasa_core::events::EventPayload::Push(PushEvent::InstallRequired { .. }) =
                &event.payload
            {
                seen.fetch_add(1, Ordering::SeqCst);
            }
        });

        assert_eq!(mgr.get_permission_and_token().await, None);
        assert_eq!(guidance.load(Ordering::SeqCst), 1);
        assert_eq!(gateway.fetches.load(Ordering::SeqCst), 0);
    }
}
