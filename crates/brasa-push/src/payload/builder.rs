//! Notification payload builder.
//!
//! Pure transformation from a generic notification description to the
//! three platform payloads. Deterministic for a given input and time
//! bucket: two identical notifications built within the same window share
//! a dedup key and collapse at the gateways; outside the window they are
//! distinct notifications.

use std::collections::BTreeMap;
use std::time::Duration;

use chrono::{DateTime, Utc};

use brasa_core::types::Platform;

use super::platforms::{
    AndroidNotification, AndroidPayload, ApnsHeaders, Aps, ApsAlert, IosPayload, PlatformPayload,
    WebNotification, WebPayload, WebPushHeaders,
};

/// A generic notification, before platform projection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationContent {
    /// Notification title.
    pub title: String,
    /// Notification body.
    pub body: String,
    /// Click-through link.
    pub link: Option<String>,
    /// Extra data entries carried to every platform.
    pub data: BTreeMap<String, String>,
}

impl NotificationContent {
    /// A notification with a title and body.
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            link: None,
            data: BTreeMap::new(),
        }
    }

    /// Attach a click-through link.
    pub fn with_link(mut self, link: impl Into<String>) -> Self {
        self.link = Some(link.into());
        self
    }

    /// Attach a data entry.
    pub fn with_data(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.data.insert(key.into(), value.into());
        self
    }
}

/// The immutable result of one build: all three projections plus the
/// shared dedup metadata.
#[derive(Debug, Clone)]
pub struct NotificationBundle {
    /// Shared dedup/collapse key.
    pub dedup_key: String,
    /// Build timestamp.
    pub timestamp: DateTime<Utc>,
    /// Android projection.
    pub android: AndroidPayload,
    /// iOS projection.
    pub ios: IosPayload,
    /// Web projection.
    pub web: WebPayload,
}

impl NotificationBundle {
    /// The projection for one platform.
    pub fn for_platform(&self, platform: Platform) -> PlatformPayload {
        match platform {
            Platform::Android => PlatformPayload::Android(self.android.clone()),
            Platform::Ios => PlatformPayload::Ios(self.ios.clone()),
            Platform::Web => PlatformPayload::Web(self.web.clone()),
        }
    }
}

/// Builds platform payloads from generic notification content.
#[derive(Debug, Clone)]
pub struct PayloadBuilder {
    channel_id: String,
    icon: String,
    badge: String,
    ttl: Duration,
    dedup_window: Duration,
}

impl Default for PayloadBuilder {
    fn default() -> Self {
        Self {
            channel_id: "brasa_updates".to_string(),
            icon: "/icons/icon-192.png".to_string(),
            badge: "/icons/badge-72.png".to_string(),
            ttl: Duration::from_secs(24 * 60 * 60),
            dedup_window: Duration::from_secs(5 * 60),
        }
    }
}

impl PayloadBuilder {
    /// A builder with the default channel, assets, TTL, and window.
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the dedup window.
    pub fn with_dedup_window(mut self, window: Duration) -> Self {
        self.dedup_window = window;
        self
    }

    /// Compute the dedup key for content at a point in time.
    ///
    /// A rolling hash of `title:body:link` combined with the time bucket,
    /// so identical content inside one window collapses and content across
    /// a boundary does not.
    pub fn dedup_key(&self, content: &NotificationContent, now: DateTime<Utc>) -> String {
        let link = content.link.as_deref().unwrap_or("");
        let material = format!("{}:{}:{}", content.title, content.body, link);

        let mut hash: u64 = 0;
        for byte in material.bytes() {
            hash = hash.wrapping_mul(31).wrapping_add(u64::from(byte));
        }

        let bucket = now.timestamp() / self.dedup_window.as_secs() as i64;
        format!("{hash:x}-{bucket}")
    }

    /// Build the three platform projections.
    ///
    /// When a target token is supplied it is attached to all three
    /// identically.
    pub fn build(
        &self,
        content: &NotificationContent,
        token: Option<&str>,
        now: DateTime<Utc>,
    ) -> NotificationBundle {
        let dedup_key = self.dedup_key(content, now);
        let token = token.map(str::to_string);

        // Some platforms hand the worker only the data bag, so the
        // notification fields ride along in it as well.
        let mut data = content.data.clone();
        data.insert("title".to_string(), content.title.clone());
        data.insert("body".to_string(), content.body.clone());
        data.insert("dedup_key".to_string(), dedup_key.clone());
        data.insert("timestamp".to_string(), now.timestamp_millis().to_string());
        if let Some(link) = &content.link {
            data.insert("link".to_string(), link.clone());
        }

        let android = AndroidPayload {
            token: token.clone(),
            priority: "high".to_string(),
            notification: AndroidNotification {
                title: content.title.clone(),
                body: content.body.clone(),
                channel_id: self.channel_id.clone(),
                sound: "default".to_string(),
                tag: dedup_key.clone(),
            },
            data: data.clone(),
        };

        let ios = IosPayload {
            token: token.clone(),
            headers: ApnsHeaders {
                collapse_id: dedup_key.clone(),
                priority: "10".to_string(),
            },
            aps: Aps {
                alert: ApsAlert {
                    title: content.title.clone(),
                    body: content.body.clone(),
                },
                badge: 1,
                content_available: 1,
                thread_id: dedup_key.clone(),
            },
            data: data.clone(),
        };

        let web = WebPayload {
            token,
            headers: WebPushHeaders {
                ttl: self.ttl.as_secs(),
            },
            notification: WebNotification {
                title: content.title.clone(),
                body: content.body.clone(),
                icon: self.icon.clone(),
                badge: self.badge.clone(),
                vibrate: vec![100, 50, 100],
                require_interaction: true,
                tag: dedup_key.clone(),
                renotify: false,
            },
            data,
        };

        NotificationBundle {
            dedup_key,
            timestamp: now,
            android,
            ios,
            web,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn content() -> NotificationContent {
        NotificationContent::new("Live music Friday", "Join us at the patio from 7pm")
            .with_link("/events/live-music")
    }

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    #[test]
    fn key_is_stable_within_a_window() {
        let builder = PayloadBuilder::new();
        // 1_000_000 and 1_000_200 share the same 300s bucket.
        assert_eq!(
            builder.dedup_key(&content(), at(1_000_200)),
            builder.dedup_key(&content(), at(1_000_210))
        );
    }

    #[test]
    fn key_changes_across_the_window_boundary() {
        let builder = PayloadBuilder::new();
        assert_ne!(
            builder.dedup_key(&content(), at(1_000_199)),
            builder.dedup_key(&content(), at(1_000_200))
        );
    }

    #[test]
    fn key_changes_with_content() {
        let builder = PayloadBuilder::new();
        let other = NotificationContent::new("Live music Friday", "Different body");
        assert_ne!(
            builder.dedup_key(&content(), at(1_000_200)),
            builder.dedup_key(&other, at(1_000_200))
        );
    }

    #[test]
    fn build_is_deterministic() {
        let builder = PayloadBuilder::new();
        let now = at(1_000_200);
        let a = builder.build(&content(), Some("tok-1"), now);
        let b = builder.build(&content(), Some("tok-1"), now);
        assert_eq!(a.dedup_key, b.dedup_key);
        assert_eq!(
            serde_json::to_value(&a.web).unwrap(),
            serde_json::to_value(&b.web).unwrap()
        );
    }

    #[test]
    fn token_is_attached_to_all_projections() {
        let bundle = PayloadBuilder::new().build(&content(), Some("tok-9"), at(1_000_000));
        assert_eq!(bundle.android.token.as_deref(), Some("tok-9"));
        assert_eq!(bundle.ios.token.as_deref(), Some("tok-9"));
        assert_eq!(bundle.web.token.as_deref(), Some("tok-9"));
    }

    #[test]
    fn dedup_key_threads_through_every_projection() {
        let bundle = PayloadBuilder::new().build(&content(), None, at(1_000_000));
        assert_eq!(bundle.android.notification.tag, bundle.dedup_key);
        assert_eq!(bundle.ios.headers.collapse_id, bundle.dedup_key);
        assert_eq!(bundle.ios.aps.thread_id, bundle.dedup_key);
        assert_eq!(bundle.web.notification.tag, bundle.dedup_key);
        assert_eq!(bundle.web.data.get("dedup_key"), Some(&bundle.dedup_key));
    }

    #[test]
    fn web_projection_carries_delivery_options() {
        let bundle = PayloadBuilder::new().build(&content(), None, at(1_000_000));
        assert_eq!(bundle.web.headers.ttl, 86_400);
        assert!(bundle.web.notification.require_interaction);
        assert!(!bundle.web.notification.renotify);
        assert_eq!(bundle.web.data.get("link").map(String::as_str), Some("/events/live-music"));
    }
}
