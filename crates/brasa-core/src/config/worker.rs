//! Background worker configuration.

use serde::{Deserialize, Serialize};

/// Background job worker configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerConfig {
    /// Whether the worker is enabled.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Cron expression for the stale-subscription sweep.
    #[serde(default = "default_cleanup_schedule")]
    pub cleanup_schedule: String,
    /// Subscriptions idle longer than this many days are removed.
    #[serde(default = "default_stale_after_days")]
    pub stale_after_days: i64,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            cleanup_schedule: default_cleanup_schedule(),
            stale_after_days: default_stale_after_days(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_cleanup_schedule() -> String {
    // Daily at 2 AM
    "0 0 2 * * *".to_string()
}

fn default_stale_after_days() -> i64 {
    90
}
