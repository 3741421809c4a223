//! Inbound push message schema and click routing.
//!
//! The worker's push handler receives a notification block plus a loose
//! `data` bag; the click handler resolves where to navigate from that bag,
//! because several senders put the link in different places.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// The notification block of an inbound push message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PushNotification {
    /// Notification title.
    pub title: String,
    /// Notification body.
    #[serde(default)]
    pub body: String,
}

/// Sender options carried outside the data bag by some gateways.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FcmOptions {
    /// Deep link for notification clicks.
    #[serde(default)]
    pub link: Option<String>,
}

/// An inbound push message as delivered to the worker.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PushMessage {
    /// Structured notification fields, when present.
    #[serde(default)]
    pub notification: Option<PushNotification>,
    /// Loose key/value payload.
    #[serde(default)]
    pub data: HashMap<String, String>,
    /// Gateway-level options.
    #[serde(default, rename = "fcmOptions")]
    pub fcm_options: Option<FcmOptions>,
}

impl PushMessage {
    /// Parse a message from its JSON wire form.
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    /// Resolve the navigation target for a notification click.
    ///
    /// Checks `data.link`, then `data.url`, then the gateway link, and
    /// falls back to the site root.
    pub fn click_target(&self) -> String {
        if let Some(link) = self.data.get("link").filter(|l| !l.is_empty()) {
            return link.clone();
        }
        if let Some(url) = self.data.get("url").filter(|u| !u.is_empty()) {
            return url.clone();
        }
        if let Some(link) = self
            .fcm_options
            .as_ref()
            .and_then(|o| o.link.as_ref())
            .filter(|l| !l.is_empty())
        {
            return link.clone();
        }
        "/".to_string()
    }

    /// Title to display, defaulting when the block is absent.
    pub fn display_title(&self) -> &str {
        self.notification
            .as_ref()
            .map(|n| n.title.as_str())
            .unwrap_or("Brasa")
    }

    /// Body to display.
    pub fn display_body(&self) -> &str {
        self.notification
            .as_ref()
            .map(|n| n.body.as_str())
            .unwrap_or("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(data: &[(&str, &str)], gateway_link: Option<&str>) -> PushMessage {
        PushMessage {
            notification: Some(PushNotification {
                title: "Taco Tuesday".into(),
                body: "Half price tonight".into(),
            }),
            data: data
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            fcm_options: gateway_link.map(|link| FcmOptions {
                link: Some(link.to_string()),
            }),
        }
    }

    #[test]
    fn data_link_wins() {
        let msg = message(
            &[("link", "/events/taco-tuesday"), ("url", "/menu")],
            Some("/ignored"),
        );
        assert_eq!(msg.click_target(), "/events/taco-tuesday");
    }

    #[test]
    fn url_is_second_choice() {
        let msg = message(&[("url", "/menu")], Some("/ignored"));
        assert_eq!(msg.click_target(), "/menu");
    }

    #[test]
    fn gateway_link_is_third_choice() {
        let msg = message(&[], Some("/blog"));
        assert_eq!(msg.click_target(), "/blog");
    }

    #[test]
    fn defaults_to_root() {
        let msg = message(&[], None);
        assert_eq!(msg.click_target(), "/");
    }

    #[test]
    fn parses_wire_form() {
        let msg = PushMessage::from_json(
            r#"{"notification":{"title":"Hi","body":"there"},"data":{"link":"/shop"}}"#,
        )
        .unwrap();
        assert_eq!(msg.display_title(), "Hi");
        assert_eq!(msg.click_target(), "/shop");
    }

    #[test]
    fn tolerates_missing_notification_block() {
        let msg = PushMessage::from_json(r#"{"data":{}}"#).unwrap();
        assert_eq!(msg.display_title(), "Brasa");
        assert_eq!(msg.click_target(), "/");
    }
}
