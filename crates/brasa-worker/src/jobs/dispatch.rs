//! Notification dispatch sweep.
//!
//! Builds the platform payload for every registered subscription and
//! sends each through the push gateway. Repeats of the same content to
//! the same token inside the dedup window are suppressed; individual send
//! failures are logged and never abort the sweep.

use std::sync::Arc;

use tracing::{info, warn};

use brasa_core::result::AppResult;
use brasa_core::traits::Clock;
use brasa_core::types::Platform;
use brasa_entity::subscription::store::SubscriptionStore;
use brasa_push::gateway::PushSender;
use brasa_push::payload::builder::{NotificationContent, PayloadBuilder};

use crate::dedup::SendDeduplicator;

/// Counters describing one dispatch sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct DispatchReport {
    /// Payloads delivered to the gateway.
    pub sent: u64,
    /// Sends suppressed as duplicates.
    pub suppressed: u64,
    /// Sends the gateway rejected.
    pub failed: u64,
}

/// Sends one notification to the whole subscription fleet.
#[derive(Debug)]
pub struct NotificationDispatchJob {
    store: Arc<dyn SubscriptionStore>,
    sender: Arc<dyn PushSender>,
    builder: PayloadBuilder,
    dedup: SendDeduplicator,
    clock: Arc<dyn Clock>,
}

impl NotificationDispatchJob {
    /// Create a dispatch job.
    pub fn new(
        store: Arc<dyn SubscriptionStore>,
        sender: Arc<dyn PushSender>,
        builder: PayloadBuilder,
        dedup: SendDeduplicator,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            store,
            sender,
            builder,
            dedup,
            clock,
        }
    }

    /// Run one sweep for the given content.
    pub async fn run(&self, content: &NotificationContent) -> AppResult<DispatchReport> {
        let subscriptions = self.store.list_active().await?;
        info!(
            targets = subscriptions.len(),
            title = %content.title,
            "Dispatching notification"
        );

        let mut report = DispatchReport::default();
        let now = self.clock.now();

        for subscription in &subscriptions {
            let bundle = self.builder.build(content, Some(&subscription.token), now);

            let key = SendDeduplicator::make_key(&bundle.dedup_key, &subscription.token);
            if !self.dedup.should_send(&key) {
                report.suppressed += 1;
                continue;
            }

            let platform = subscription
                .platform
                .as_deref()
                .and_then(parse_platform)
                .unwrap_or(Platform::Web);
            let payload = bundle.for_platform(platform);

            match self.sender.send(&payload).await {
                Ok(()) => report.sent += 1,
                Err(e) => {
                    warn!(token = %subscription.token, error = %e, "Send failed");
                    report.failed += 1;
                }
            }
        }

        info!(
            sent = report.sent,
            suppressed = report.suppressed,
            failed = report.failed,
            "Dispatch sweep finished"
        );
        Ok(report)
    }
}

fn parse_platform(value: &str) -> Option<Platform> {
    match value {
        "android" => Some(Platform::Android),
        "ios" => Some(Platform::Ios),
        "web" => Some(Platform::Web),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use async_trait::async_trait;

    use brasa_core::AppError;
    use brasa_core::traits::SystemClock;
    use brasa_entity::subscription::model::DeviceSubscription;
    use brasa_entity::subscription::store::SaveOutcome;
    use brasa_push::payload::platforms::PlatformPayload;

    use super::*;

    #[derive(Debug, Default)]
    struct FakeStore {
        rows: Vec<DeviceSubscription>,
    }

    #[async_trait]
    impl SubscriptionStore for FakeStore {
        async fn save(&self, _s: &DeviceSubscription) -> AppResult<SaveOutcome> {
            Ok(SaveOutcome::Created)
        }
        async fn list_active(&self) -> AppResult<Vec<DeviceSubscription>> {
            Ok(self.rows.clone())
        }
        async fn find_by_token(&self, _t: &str) -> AppResult<Option<DeviceSubscription>> {
            Ok(None)
        }
        async fn delete_stale(&self, _c: chrono::DateTime<chrono::Utc>) -> AppResult<u64> {
            Ok(0)
        }
        async fn count(&self) -> AppResult<u64> {
            Ok(self.rows.len() as u64)
        }
        async fn health_check(&self) -> AppResult<bool> {
            Ok(true)
        }
    }

    #[derive(Debug, Default)]
    struct CountingSender {
        sent: AtomicUsize,
        fail_for: Option<String>,
    }

    #[async_trait]
    impl PushSender for CountingSender {
        async fn send(&self, payload: &PlatformPayload) -> AppResult<()> {
            if let (Some(fail), Some(token)) = (&self.fail_for, payload.token()) {
                if fail == token {
                    return Err(AppError::external_service("gateway rejected"));
                }
            }
            self.sent.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    fn store_with(tokens: &[(&str, Option<&str>)]) -> Arc<FakeStore> {
        Arc::new(FakeStore {
            rows: tokens
                .iter()
                .map(|(token, platform)| {
                    DeviceSubscription::new(
                        token.to_string(),
                        platform.map(str::to_string),
                        None,
                    )
                })
                .collect(),
        })
    }

    fn job(store: Arc<FakeStore>, sender: Arc<CountingSender>) -> NotificationDispatchJob {
        NotificationDispatchJob::new(
            store,
            sender,
            PayloadBuilder::new(),
            SendDeduplicator::new(Duration::from_secs(300)),
            Arc::new(SystemClock),
        )
    }

    #[tokio::test]
    async fn sends_to_every_subscription() {
        let sender = Arc::new(CountingSender::default());
        let job = job(
            store_with(&[("tok-a", Some("android")), ("tok-b", Some("ios")), ("tok-c", None)]),
            Arc::clone(&sender),
        );

        let report = job
            .run(&NotificationContent::new("Weekend brunch", "Now booking"))
            .await
            .unwrap();

        assert_eq!(report.sent, 3);
        assert_eq!(report.failed, 0);
        assert_eq!(sender.sent.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn repeat_sweep_is_suppressed_within_the_window() {
        let sender = Arc::new(CountingSender::default());
        let job = job(store_with(&[("tok-a", None)]), Arc::clone(&sender));
        let content = NotificationContent::new("Weekend brunch", "Now booking");

        let first = job.run(&content).await.unwrap();
        let second = job.run(&content).await.unwrap();

        assert_eq!(first.sent, 1);
        assert_eq!(second.sent, 0);
        assert_eq!(second.suppressed, 1);
    }

    #[tokio::test]
    async fn one_failure_does_not_abort_the_sweep() {
        let sender = Arc::new(CountingSender {
            sent: AtomicUsize::new(0),
            fail_for: Some("tok-bad".to_string()),
        });
        let job = job(
            store_with(&[("tok-bad", None), ("tok-good", None)]),
            Arc::clone(&sender),
        );

        let report = job
            .run(&NotificationContent::new("Weekend brunch", "Now booking"))
            .await
            .unwrap();

        assert_eq!(report.failed, 1);
        assert_eq!(report.sent, 1);
    }
}
