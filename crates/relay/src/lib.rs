//! Notification Relay
//!
//! In-process pub/sub hub keyed by user id. Each user id maps to a
//! `tokio::sync::broadcast` channel; WebSocket handlers subscribe on
//! connect and the rest of the app publishes fire-and-forget. The hub
//! holds no state beyond the live channel map, which is pruned when the
//! last subscriber for a user disconnects.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tokio::sync::broadcast;

/// Per-user buffer of undelivered notifications.
///
/// A slow socket that falls further behind than this loses the oldest
/// messages (broadcast lag), which is acceptable for ephemeral
/// notifications.
const CHANNEL_CAPACITY: usize = 64;

/// A notification pushed to a connected user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    /// Event name, e.g. "interview.scheduled"
    pub event: String,
    /// Event payload, backend-shaped JSON
    pub payload: serde_json::Value,
    pub sent_at: DateTime<Utc>,
}

impl Notification {
    pub fn new(event: impl Into<String>, payload: serde_json::Value) -> Self {
        Self {
            event: event.into(),
            payload,
            sent_at: Utc::now(),
        }
    }
}

/// Pub/sub hub keyed by user id.
#[derive(Debug, Default)]
pub struct NotificationHub {
    channels: RwLock<HashMap<String, broadcast::Sender<Notification>>>,
}

impl NotificationHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe to a user's notification stream, creating the channel on
    /// first subscribe.
    pub async fn subscribe(&self, user_id: &str) -> broadcast::Receiver<Notification> {
        let mut channels = self.channels.write().await;
        channels
            .entry(user_id.to_string())
            .or_insert_with(|| broadcast::channel(CHANNEL_CAPACITY).0)
            .subscribe()
    }

    /// Publish a notification to a user.
    ///
    /// Returns the number of live subscribers it reached; zero when the
    /// user has no open socket. Fire-and-forget: nothing is queued for
    /// offline users.
    pub async fn publish(&self, user_id: &str, notification: Notification) -> usize {
        let channels = self.channels.read().await;
        match channels.get(user_id) {
            Some(sender) => match sender.send(notification) {
                Ok(receivers) => receivers,
                Err(_) => {
                    tracing::debug!(user_id, "Notification dropped, no live subscribers");
                    0
                }
            },
            None => 0,
        }
    }

    /// Drop channels whose last subscriber has disconnected.
    ///
    /// Called by socket handlers on disconnect; cheap enough to run on
    /// every close.
    pub async fn prune(&self) {
        let mut channels = self.channels.write().await;
        channels.retain(|_, sender| sender.receiver_count() > 0);
    }

    /// Number of users with a live channel.
    pub async fn active_users(&self) -> usize {
        self.channels.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_publish_reaches_subscriber() {
        let hub = NotificationHub::new();
        let mut rx = hub.subscribe("u_1").await;

        let sent = hub
            .publish("u_1", Notification::new("interview.scheduled", json!({"id": 7})))
            .await;
        assert_eq!(sent, 1);

        let received = rx.recv().await.unwrap();
        assert_eq!(received.event, "interview.scheduled");
        assert_eq!(received.payload, json!({"id": 7}));
    }

    #[tokio::test]
    async fn test_publish_to_offline_user_is_dropped() {
        let hub = NotificationHub::new();
        let sent = hub
            .publish("nobody", Notification::new("ping", json!(null)))
            .await;
        assert_eq!(sent, 0);
    }

    #[tokio::test]
    async fn test_channels_are_per_user() {
        let hub = NotificationHub::new();
        let mut rx_a = hub.subscribe("a").await;
        let mut rx_b = hub.subscribe("b").await;

        hub.publish("a", Notification::new("only-a", json!(null))).await;

        assert_eq!(rx_a.recv().await.unwrap().event, "only-a");
        assert!(rx_b.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_prune_drops_disconnected_channels() {
        let hub = NotificationHub::new();
        {
            let _rx = hub.subscribe("u_1").await;
            assert_eq!(hub.active_users().await, 1);
        }
        // Receiver dropped; channel is now dead
        hub.prune().await;
        assert_eq!(hub.active_users().await, 0);
    }

    #[tokio::test]
    async fn test_multiple_subscribers_fan_out() {
        let hub = NotificationHub::new();
        let mut rx1 = hub.subscribe("u_1").await;
        let mut rx2 = hub.subscribe("u_1").await;

        let sent = hub
            .publish("u_1", Notification::new("fanout", json!(null)))
            .await;
        assert_eq!(sent, 2);
        assert_eq!(rx1.recv().await.unwrap().event, "fanout");
        assert_eq!(rx2.recv().await.unwrap().event, "fanout");
    }
}
