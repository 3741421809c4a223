//! Domain events emitted by the app-shell controllers.
//!
//! Events are dispatched through the event bus and consumed by the UI
//! layer (badge/toast rendering, install affordances) and the logs. The
//! install, push, and worker state machines are independent; the bus is
//! the only thing they share, and it never feeds state back into them.

pub mod bus;
pub mod install;
pub mod push;
pub mod worker;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub use bus::EventBus;
pub use install::InstallEvent;
pub use push::PushEvent;
pub use worker::WorkerEvent;

/// Wrapper for all domain events with metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppEvent {
    /// Unique event ID.
    pub id: Uuid,
    /// When the event occurred.
    pub timestamp: DateTime<Utc>,
    /// The event payload.
    pub payload: EventPayload,
}

/// Union of all domain event types.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "domain", content = "event")]
pub enum EventPayload {
    /// An install-prompt event.
    Install(InstallEvent),
    /// A push/notification event.
    Push(PushEvent),
    /// A service-worker lifecycle event.
    Worker(WorkerEvent),
}

impl AppEvent {
    /// Create a new domain event.
    pub fn new(payload: EventPayload) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            payload,
        }
    }
}

impl From<InstallEvent> for AppEvent {
    fn from(event: InstallEvent) -> Self {
        Self::new(EventPayload::Install(event))
    }
}

impl From<PushEvent> for AppEvent {
    fn from(event: PushEvent) -> Self {
        Self::new(EventPayload::Push(event))
    }
}

impl From<WorkerEvent> for AppEvent {
    fn from(event: WorkerEvent) -> Self {
        Self::new(EventPayload::Worker(event))
    }
}
