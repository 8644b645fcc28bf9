/// Live comment fan-out
///
/// One logical room per video (`video:<id>`). A viewer's connection joins the
/// room for the video it is watching and receives new-comment and
/// comment-deleted events as they happen. Delivery is best-effort and
/// at-most-once per connected client: a client that is offline at publish
/// time never receives the event, and there is no replay or backlog.
use crate::metrics;
use crate::models::LiveComment;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{
    mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender},
    RwLock,
};
use uuid::Uuid;

pub mod session;

pub use session::live_comments_ws;

/// Events pushed to viewers of a video
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum LiveCommentEvent {
    NewComment(LiveComment),
    CommentDeleted { comment_id: Uuid },
}

impl LiveCommentEvent {
    fn kind(&self) -> &'static str {
        match self {
            Self::NewComment(_) => "new-comment",
            Self::CommentDeleted { .. } => "comment-deleted",
        }
    }
}

/// Unique identifier for a subscribed connection, used for precise cleanup
/// when the connection closes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriberId(Uuid);

impl SubscriberId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SubscriberId {
    fn default() -> Self {
        Self::new()
    }
}

struct Subscriber {
    id: SubscriberId,
    sender: UnboundedSender<String>,
}

/// Registry of live connections per video room
#[derive(Default, Clone)]
pub struct ConnectionRegistry {
    inner: Arc<RwLock<HashMap<Uuid, Vec<Subscriber>>>>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe a connection to a video's room. Returns the subscriber id
    /// (for cleanup) and the channel the room's events arrive on.
    pub async fn join(&self, video_id: Uuid) -> (SubscriberId, UnboundedReceiver<String>) {
        let (tx, rx) = unbounded_channel();
        let subscriber_id = SubscriberId::new();

        let mut guard = self.inner.write().await;
        guard.entry(video_id).or_default().push(Subscriber {
            id: subscriber_id,
            sender: tx,
        });

        tracing::debug!(
            room = %format!("video:{video_id}"),
            subscribers = guard.get(&video_id).map(|v| v.len()).unwrap_or(0),
            "viewer joined room"
        );

        (subscriber_id, rx)
    }

    /// Drop a subscriber from a room. Must be called when the connection
    /// closes, otherwise the sender leaks until the next broadcast prunes it.
    pub async fn leave(&self, video_id: Uuid, subscriber_id: SubscriberId) {
        let mut guard = self.inner.write().await;
        if let Some(subscribers) = guard.get_mut(&video_id) {
            subscribers.retain(|s| s.id != subscriber_id);
            if subscribers.is_empty() {
                guard.remove(&video_id);
            }
        }
    }

    /// Push an event to every connection in the video's room. Dead senders
    /// (whose receiving session is gone) are pruned on send failure.
    pub async fn publish(&self, video_id: Uuid, event: &LiveCommentEvent) {
        let payload = match serde_json::to_string(event) {
            Ok(payload) => payload,
            Err(e) => {
                tracing::error!(error = %e, "failed to serialize live comment event");
                return;
            }
        };

        metrics::LIVE_COMMENT_BROADCASTS_TOTAL
            .with_label_values(&[event.kind()])
            .inc();

        let mut guard = self.inner.write().await;
        if let Some(subscribers) = guard.get_mut(&video_id) {
            let before = subscribers.len();
            subscribers.retain(|s| s.sender.send(payload.clone()).is_ok());
            let dropped = before - subscribers.len();
            if dropped > 0 {
                tracing::debug!(
                    room = %format!("video:{video_id}"),
                    dropped,
                    "pruned dead subscribers during broadcast"
                );
            }
            if subscribers.is_empty() {
                guard.remove(&video_id);
            }
        }
    }

    pub async fn subscriber_count(&self, video_id: Uuid) -> usize {
        let guard = self.inner.read().await;
        guard.get(&video_id).map(|v| v.len()).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CommentAuthor;
    use chrono::Utc;

    fn comment(video_id: Uuid) -> LiveComment {
        let author_id = Uuid::new_v4();
        LiveComment {
            id: Uuid::new_v4(),
            video_id,
            user_id: author_id,
            content: "hello".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
            user: CommentAuthor {
                id: author_id,
                name: "alice".to_string(),
                channel_name: "alice-channel".to_string(),
                email: "alice@example.com".to_string(),
            },
        }
    }

    #[tokio::test]
    async fn test_publish_reaches_room_members_only() {
        let registry = ConnectionRegistry::new();
        let video_a = Uuid::new_v4();
        let video_b = Uuid::new_v4();

        let (_id_a, mut rx_a) = registry.join(video_a).await;
        let (_id_b, mut rx_b) = registry.join(video_b).await;

        registry
            .publish(video_a, &LiveCommentEvent::NewComment(comment(video_a)))
            .await;

        let received = rx_a.recv().await.unwrap();
        assert!(received.contains("new-comment"));
        assert!(rx_b.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_publish_fans_out_to_all_subscribers() {
        let registry = ConnectionRegistry::new();
        let video_id = Uuid::new_v4();

        let (_id1, mut rx1) = registry.join(video_id).await;
        let (_id2, mut rx2) = registry.join(video_id).await;

        let comment_id = Uuid::new_v4();
        registry
            .publish(video_id, &LiveCommentEvent::CommentDeleted { comment_id })
            .await;

        for rx in [&mut rx1, &mut rx2] {
            let payload = rx.recv().await.unwrap();
            assert!(payload.contains("comment-deleted"));
            assert!(payload.contains(&comment_id.to_string()));
        }
    }

    #[tokio::test]
    async fn test_dead_senders_are_pruned() {
        let registry = ConnectionRegistry::new();
        let video_id = Uuid::new_v4();

        let (_id1, rx1) = registry.join(video_id).await;
        let (_id2, _rx2) = registry.join(video_id).await;
        assert_eq!(registry.subscriber_count(video_id).await, 2);

        drop(rx1);
        registry
            .publish(video_id, &LiveCommentEvent::NewComment(comment(video_id)))
            .await;

        assert_eq!(registry.subscriber_count(video_id).await, 1);
    }

    #[tokio::test]
    async fn test_leave_removes_subscriber_and_empty_room() {
        let registry = ConnectionRegistry::new();
        let video_id = Uuid::new_v4();

        let (id, _rx) = registry.join(video_id).await;
        assert_eq!(registry.subscriber_count(video_id).await, 1);

        registry.leave(video_id, id).await;
        assert_eq!(registry.subscriber_count(video_id).await, 0);
    }

    #[test]
    fn test_event_wire_format() {
        let comment_id = Uuid::new_v4();
        let payload =
            serde_json::to_value(LiveCommentEvent::CommentDeleted { comment_id }).unwrap();

        assert_eq!(payload["event"], "comment-deleted");
        assert_eq!(payload["data"]["comment_id"], comment_id.to_string());
    }
}
