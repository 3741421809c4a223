//! # brasa-worker
//!
//! Server-side background work: the notification dispatch sweep over all
//! registered subscriptions and the periodic stale-subscription cleanup.

pub mod dedup;
pub mod jobs;
pub mod scheduler;

pub use scheduler::CronScheduler;
