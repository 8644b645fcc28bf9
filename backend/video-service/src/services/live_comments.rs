/// Ephemeral live comments
///
/// An in-memory, per-video list of transient comments shown during live
/// viewing. Nothing here touches the database: entries are lost on process
/// restart, and running multiple instances of this service would give each
/// instance a disjoint list (single-instance limitation; a shared backing
/// store would be needed to scale out).
use crate::error::Result;
use crate::models::{CommentAuthor, LiveComment};
use crate::services::comments::validate_content;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

/// In-process store mapping video id to its transient comments. Injected as
/// an explicit service object wherever needed, never ambient global state.
#[derive(Default, Clone)]
pub struct LiveCommentStore {
    inner: Arc<RwLock<HashMap<Uuid, Vec<LiveComment>>>>,
}

impl LiveCommentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a comment for a video. The author snapshot is denormalized into
    /// the payload so viewers need no user lookup to render it.
    pub async fn add_comment(
        &self,
        video_id: Uuid,
        author: CommentAuthor,
        content: &str,
    ) -> Result<LiveComment> {
        let trimmed = validate_content(content)?;

        let now = Utc::now();
        let comment = LiveComment {
            id: Uuid::new_v4(),
            video_id,
            user_id: author.id,
            content: trimmed.to_string(),
            created_at: now,
            updated_at: now,
            user: author,
        };

        let mut guard = self.inner.write().await;
        guard.entry(video_id).or_default().push(comment.clone());

        Ok(comment)
    }

    /// Point-in-time snapshot of a video's comments, newest first
    pub async fn list_comments(&self, video_id: Uuid) -> Vec<LiveComment> {
        let guard = self.inner.read().await;
        let mut comments = guard.get(&video_id).cloned().unwrap_or_default();
        comments.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        comments
    }

    /// Remove a comment scoped to its author. Returns false when no matching
    /// comment owned by the requester exists in that video.
    pub async fn delete_comment(
        &self,
        video_id: Uuid,
        comment_id: Uuid,
        requester_id: Uuid,
    ) -> bool {
        let mut guard = self.inner.write().await;
        let Some(comments) = guard.get_mut(&video_id) else {
            return false;
        };

        let before = comments.len();
        comments.retain(|c| !(c.id == comment_id && c.user_id == requester_id));
        let deleted = comments.len() < before;

        if comments.is_empty() {
            guard.remove(&video_id);
        }

        deleted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;

    fn author(name: &str) -> CommentAuthor {
        CommentAuthor {
            id: Uuid::new_v4(),
            name: name.to_string(),
            channel_name: format!("{name}-channel"),
            email: format!("{name}@example.com"),
        }
    }

    #[tokio::test]
    async fn test_add_and_list_newest_first() {
        let store = LiveCommentStore::new();
        let video_id = Uuid::new_v4();
        let alice = author("alice");

        for i in 0..3 {
            store
                .add_comment(video_id, alice.clone(), &format!("comment {i}"))
                .await
                .unwrap();
        }

        let comments = store.list_comments(video_id).await;
        assert_eq!(comments.len(), 3);
        assert!(comments
            .windows(2)
            .all(|pair| pair[0].created_at >= pair[1].created_at));
    }

    #[tokio::test]
    async fn test_add_trims_and_validates() {
        let store = LiveCommentStore::new();
        let video_id = Uuid::new_v4();

        let comment = store
            .add_comment(video_id, author("bob"), "  hi there  ")
            .await
            .unwrap();
        assert_eq!(comment.content, "hi there");

        let err = store
            .add_comment(video_id, author("bob"), "   ")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_delete_is_author_scoped() {
        let store = LiveCommentStore::new();
        let video_id = Uuid::new_v4();
        let alice = author("alice");
        let mallory = author("mallory");

        let comment = store
            .add_comment(video_id, alice.clone(), "mine")
            .await
            .unwrap();

        // Another user cannot delete it
        assert!(!store.delete_comment(video_id, comment.id, mallory.id).await);
        assert_eq!(store.list_comments(video_id).await.len(), 1);

        // The author deletes it exactly once
        assert!(store.delete_comment(video_id, comment.id, alice.id).await);
        assert!(!store.delete_comment(video_id, comment.id, alice.id).await);
        assert!(store.list_comments(video_id).await.is_empty());
    }

    #[tokio::test]
    async fn test_videos_are_isolated() {
        let store = LiveCommentStore::new();
        let alice = author("alice");
        let video_a = Uuid::new_v4();
        let video_b = Uuid::new_v4();

        store.add_comment(video_a, alice.clone(), "on a").await.unwrap();

        assert_eq!(store.list_comments(video_a).await.len(), 1);
        assert!(store.list_comments(video_b).await.is_empty());
    }

    #[tokio::test]
    async fn test_add_delete_round_trip_count() {
        let store = LiveCommentStore::new();
        let video_id = Uuid::new_v4();
        let alice = author("alice");

        let mut ids = Vec::new();
        for i in 0..5 {
            let c = store
                .add_comment(video_id, alice.clone(), &format!("c{i}"))
                .await
                .unwrap();
            ids.push(c.id);
        }
        for id in ids.iter().take(2) {
            assert!(store.delete_comment(video_id, *id, alice.id).await);
        }

        let remaining = store.list_comments(video_id).await;
        assert_eq!(remaining.len(), 3);
        assert!(remaining.iter().all(|c| c.content.starts_with('c')));
    }
}
