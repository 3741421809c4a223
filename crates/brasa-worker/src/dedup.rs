//! Deduplication of repeated sends within a time window.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Deduplication key
type DedupKey = String;

/// Send deduplicator — suppresses repeats within a window.
#[derive(Debug)]
pub struct SendDeduplicator {
    /// Window duration
    window: Duration,
    /// Last seen time per key
    last_seen: Mutex<HashMap<DedupKey, Instant>>,
}

impl SendDeduplicator {
    /// Create a new deduplicator with the given window
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            last_seen: Mutex::new(HashMap::new()),
        }
    }

    /// Check if a send should proceed or be suppressed.
    ///
    /// Returns `true` if the send should proceed, `false` if it's a duplicate.
    pub fn should_send(&self, key: &str) -> bool {
        let mut map = self.last_seen.lock().unwrap_or_else(|e| e.into_inner());
        let now = Instant::now();

        if let Some(last) = map.get(key) {
            if now.duration_since(*last) < self.window {
                return false; // Too recent — suppress
            }
        }

        map.insert(key.to_string(), now);
        true
    }

    /// Build a dedup key from a payload key and its target token
    pub fn make_key(dedup_key: &str, token: &str) -> String {
        format!("{}:{}", dedup_key, token)
    }

    /// Clean up old entries
    pub fn cleanup(&self) {
        let mut map = self.last_seen.lock().unwrap_or_else(|e| e.into_inner());
        let now = Instant::now();
        let cutoff = self.window * 10; // Keep entries for 10x the window
        map.retain(|_, v| now.duration_since(*v) < cutoff);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suppresses_repeats_inside_the_window() {
        let dedup = SendDeduplicator::new(Duration::from_secs(300));
        assert!(dedup.should_send("k1:tok"));
        assert!(!dedup.should_send("k1:tok"));
        assert!(dedup.should_send("k2:tok"));
    }

    #[test]
    fn zero_window_never_suppresses() {
        let dedup = SendDeduplicator::new(Duration::ZERO);
        assert!(dedup.should_send("k1:tok"));
        assert!(dedup.should_send("k1:tok"));
    }
}
