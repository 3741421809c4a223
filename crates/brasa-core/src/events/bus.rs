//! In-process event bus with typed subscribers.

use std::sync::{Arc, Mutex};

use tracing::trace;

use super::AppEvent;

/// A registered event subscriber.
type Subscriber = Arc<dyn Fn(&AppEvent) + Send + Sync>;

/// Synchronous in-process event bus.
///
/// Subscribers run inline on the emitting task; handlers must be cheap
/// (state updates, channel sends). Subscription order is delivery order.
#[derive(Clone, Default)]
pub struct EventBus {
    subscribers: Arc<Mutex<Vec<Subscriber>>>,
}

impl EventBus {
    /// Create an empty bus.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a subscriber for all events.
    pub fn subscribe(&self, handler: impl Fn(&AppEvent) + Send + Sync + 'static) {
        let mut subs = self
            .subscribers
            .lock()
            .unwrap_or_else(|e| e.into_inner());
        subs.push(Arc::new(handler));
    }

    /// Emit an event to every subscriber.
    pub fn emit(&self, event: impl Into<AppEvent>) {
        let event = event.into();
        trace!(event_id = %event.id, "Emitting event");

        let subs = {
            let guard = self
                .subscribers
                .lock()
                .unwrap_or_else(|e| e.into_inner());
            guard.clone()
        };

        for sub in subs {
            sub(&event);
        }
    }

    /// Number of registered subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .len()
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::events::InstallEvent;

    #[test]
    fn delivers_to_all_subscribers() {
        let bus = EventBus::new();
        let count = Arc::new(AtomicUsize::new(0));

        for _ in 0..3 {
            let count = Arc::clone(&count);
            bus.subscribe(move |_| {
                count.fetch_add(1, Ordering::SeqCst);
            });
        }

        bus.emit(InstallEvent::PromptCaptured);
        assert_eq!(count.load(Ordering::SeqCst), 3);
    }
}
