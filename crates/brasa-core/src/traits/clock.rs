//! The single timing seam used everywhere a flow reads the clock or waits.
//!
//! Retry delays, dedup time buckets, and refresh intervals all go through
//! this trait so tests can drive them with a fake clock instead of real
//! sleeps.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Clock abstraction: current time plus a cooperative sleep.
#[async_trait]
pub trait Clock: Send + Sync + std::fmt::Debug + 'static {
    /// The current wall-clock time.
    fn now(&self) -> DateTime<Utc>;

    /// Suspend the calling task for the given duration.
    async fn sleep(&self, duration: Duration);
}

/// Production clock backed by the system time and the tokio timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

#[async_trait]
impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}
