//! Per-platform delivery payloads.
//!
//! One tagged variant per delivery platform, produced by the builder and
//! never mutated afterwards. Field and header names follow each gateway's
//! wire format.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A payload addressed to one platform.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "platform", rename_all = "lowercase")]
pub enum PlatformPayload {
    /// Android delivery.
    Android(AndroidPayload),
    /// iOS (APNs) delivery.
    Ios(IosPayload),
    /// Webpush delivery.
    Web(WebPayload),
}

impl PlatformPayload {
    /// The target token, when one was attached.
    pub fn token(&self) -> Option<&str> {
        match self {
            Self::Android(p) => p.token.as_deref(),
            Self::Ios(p) => p.token.as_deref(),
            Self::Web(p) => p.token.as_deref(),
        }
    }
}

/// Android delivery payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AndroidPayload {
    /// Target token.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    /// Delivery priority.
    pub priority: String,
    /// Native notification block.
    pub notification: AndroidNotification,
    /// Generic data bag.
    pub data: BTreeMap<String, String>,
}

/// Android notification block.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AndroidNotification {
    /// Notification title.
    pub title: String,
    /// Notification body.
    pub body: String,
    /// Fixed notification channel.
    pub channel_id: String,
    /// Notification sound.
    pub sound: String,
    /// Native dedup/grouping key.
    pub tag: String,
}

/// iOS (APNs) delivery payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IosPayload {
    /// Target token.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    /// APNs request headers.
    pub headers: ApnsHeaders,
    /// The `aps` dictionary.
    pub aps: Aps,
    /// Generic data bag.
    pub data: BTreeMap<String, String>,
}

/// APNs request headers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApnsHeaders {
    /// Collapse identifier suppressing duplicate deliveries at the gateway.
    #[serde(rename = "apns-collapse-id")]
    pub collapse_id: String,
    /// Delivery priority ("10" = immediate).
    #[serde(rename = "apns-priority")]
    pub priority: String,
}

/// The APNs `aps` dictionary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Aps {
    /// Alert content.
    pub alert: ApsAlert,
    /// Badge increment.
    pub badge: u32,
    /// Background-content flag.
    #[serde(rename = "content-available")]
    pub content_available: u8,
    /// Grouping thread.
    #[serde(rename = "thread-id")]
    pub thread_id: String,
}

/// APNs alert content.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApsAlert {
    /// Alert title.
    pub title: String,
    /// Alert body.
    pub body: String,
}

/// Webpush delivery payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebPayload {
    /// Target token.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    /// Webpush protocol headers.
    pub headers: WebPushHeaders,
    /// Browser notification options.
    pub notification: WebNotification,
    /// Generic data bag.
    pub data: BTreeMap<String, String>,
}

/// Webpush protocol headers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebPushHeaders {
    /// Message time-to-live in seconds.
    #[serde(rename = "TTL")]
    pub ttl: u64,
}

/// Browser notification options.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebNotification {
    /// Notification title.
    pub title: String,
    /// Notification body.
    pub body: String,
    /// Icon asset path.
    pub icon: String,
    /// Badge asset path.
    pub badge: String,
    /// Vibration pattern.
    pub vibrate: Vec<u32>,
    /// Keep the notification on screen until interacted with.
    #[serde(rename = "requireInteraction")]
    pub require_interaction: bool,
    /// Dedup/update key.
    pub tag: String,
    /// A repeat with the same tag updates silently instead of re-alerting.
    pub renotify: bool,
}
