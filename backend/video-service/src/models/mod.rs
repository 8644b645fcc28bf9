/// Data models for video-service
///
/// This module defines structures for:
/// - Video: uploaded or stream-recorded assets and their lifecycle status
/// - LiveStream: broadcaster sessions on the external platform
/// - SharedVideo: explicit per-user access grants
/// - Comment: durable comments, plus the ephemeral live-comment payload
///
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ========================================
// Status enums
// ========================================

/// Video status in the system lifecycle. Status only advances forward
/// (preparing -> created -> ready), never backward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VideoStatus {
    Preparing,
    Created,
    Ready,
}

impl VideoStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Preparing => "preparing",
            Self::Created => "created",
            Self::Ready => "ready",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "preparing" => Some(Self::Preparing),
            "created" => Some(Self::Created),
            "ready" => Some(Self::Ready),
            _ => None,
        }
    }
}

/// Live stream status. Transitions are idle -> active -> completed and
/// monotonic: a later event never moves a stream backwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LiveStreamStatus {
    Idle,
    Active,
    Completed,
}

impl LiveStreamStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Active => "active",
            Self::Completed => "completed",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "idle" => Some(Self::Idle),
            "active" => Some(Self::Active),
            "completed" => Some(Self::Completed),
            _ => None,
        }
    }

    fn rank(&self) -> u8 {
        match self {
            Self::Idle => 0,
            Self::Active => 1,
            Self::Completed => 2,
        }
    }

    /// Whether moving from `self` to `next` respects the monotonic order.
    pub fn can_advance_to(&self, next: LiveStreamStatus) -> bool {
        next.rank() >= self.rank()
    }
}

// ========================================
// Entities
// ========================================

/// User entity (read-side only; registration lives elsewhere)
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub channel_name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Video database entity
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Video {
    pub id: Uuid,
    pub user_id: Uuid,
    pub upload_id: Option<String>,
    pub asset_id: String,
    pub playback_id: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub channel_name: Option<String>,
    pub live_stream_id: Option<String>,
    pub is_private: bool,
    pub status: String,
    pub duration: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Video {
    pub fn get_status(&self) -> VideoStatus {
        VideoStatus::from_str(&self.status).unwrap_or(VideoStatus::Preparing)
    }
}

/// Live stream database entity
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct LiveStream {
    pub id: Uuid,
    /// Identifier assigned by the external platform
    pub live_stream_id: String,
    pub user_id: Uuid,
    pub title: Option<String>,
    pub is_private: bool,
    pub stream_key: String,
    pub playback_id: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl LiveStream {
    pub fn get_status(&self) -> LiveStreamStatus {
        LiveStreamStatus::from_str(&self.status).unwrap_or(LiveStreamStatus::Idle)
    }
}

/// Access grant: authorizes one user to view another user's video
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct SharedVideo {
    pub id: Uuid,
    pub video_id: Uuid,
    pub shared_with_user_id: Uuid,
    pub shared_by_user_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Durable comment entity
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Comment {
    pub id: Uuid,
    pub video_id: Uuid,
    pub user_id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ========================================
// Live comments (ephemeral)
// ========================================

/// Denormalized author identity carried inside a live comment payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentAuthor {
    pub id: Uuid,
    pub name: String,
    pub channel_name: String,
    pub email: String,
}

impl From<&User> for CommentAuthor {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            channel_name: user.channel_name.clone(),
            email: user.email.clone(),
        }
    }
}

/// Transient comment held only in process memory; lost on restart
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LiveComment {
    pub id: Uuid,
    pub video_id: Uuid,
    pub user_id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub user: CommentAuthor,
}

// ========================================
// Request / response DTOs
// ========================================

/// Video response DTO
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoResponse {
    pub id: String,
    pub user_id: String,
    pub upload_id: Option<String>,
    pub asset_id: String,
    pub playback_id: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub channel_name: Option<String>,
    pub live_stream_id: Option<String>,
    pub is_private: bool,
    pub status: String,
    pub duration: Option<f64>,
    pub created_at: i64,
}

impl From<Video> for VideoResponse {
    fn from(video: Video) -> Self {
        Self {
            id: video.id.to_string(),
            user_id: video.user_id.to_string(),
            upload_id: video.upload_id,
            asset_id: video.asset_id,
            playback_id: video.playback_id,
            title: video.title,
            description: video.description,
            channel_name: video.channel_name,
            live_stream_id: video.live_stream_id,
            is_private: video.is_private,
            status: video.status,
            duration: video.duration,
            created_at: video.created_at.timestamp(),
        }
    }
}

/// Live stream response DTO. The stream key is a broadcast credential and is
/// only included in the create response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LiveStreamResponse {
    pub id: String,
    pub live_stream_id: String,
    pub user_id: String,
    pub title: Option<String>,
    pub is_private: bool,
    pub playback_id: String,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stream_key: Option<String>,
    pub created_at: i64,
}

impl LiveStreamResponse {
    pub fn from_entity(stream: LiveStream, include_key: bool) -> Self {
        Self {
            id: stream.id.to_string(),
            live_stream_id: stream.live_stream_id,
            user_id: stream.user_id.to_string(),
            title: stream.title,
            is_private: stream.is_private,
            playback_id: stream.playback_id,
            status: stream.status,
            stream_key: include_key.then_some(stream.stream_key),
            created_at: stream.created_at.timestamp(),
        }
    }
}

impl From<LiveStream> for LiveStreamResponse {
    fn from(stream: LiveStream) -> Self {
        LiveStreamResponse::from_entity(stream, false)
    }
}

/// Durable comment annotated with author identity, as listed under a video
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct CommentWithAuthor {
    pub id: Uuid,
    pub video_id: Uuid,
    pub user_id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub author_name: String,
    pub author_channel_name: String,
}

/// Grantee entry returned when the owner lists who a video is shared with
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct GranteeEntry {
    pub user_id: Uuid,
    pub name: String,
    pub channel_name: String,
    pub shared_at: DateTime<Utc>,
}

/// A video granted to the requesting user, annotated with who shared it
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct SharedVideoEntry {
    #[sqlx(flatten)]
    pub video: Video,
    pub shared_by_name: String,
    pub shared_by_channel_name: String,
    pub shared_at: DateTime<Utc>,
}

/// Create upload request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUploadRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub is_private: Option<bool>,
}

/// Create upload response: where the client should PUT the file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUploadResponse {
    pub upload_id: String,
    pub url: String,
}

/// Create live stream request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateLiveStreamRequest {
    pub title: Option<String>,
    pub is_private: Option<bool>,
}

/// Update video metadata request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateVideoRequest {
    pub title: Option<String>,
    pub description: Option<String>,
}

/// Create comment request (durable and live variants share the shape)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCommentRequest {
    pub content: String,
}

/// Share video request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShareVideoRequest {
    pub video_id: Uuid,
    pub user_id: Uuid,
}

/// Signed playback tokens for a private video
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaybackTokens {
    pub token_video: String,
    pub token_thumbnail: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_video_status_round_trip() {
        for status in [VideoStatus::Preparing, VideoStatus::Created, VideoStatus::Ready] {
            assert_eq!(VideoStatus::from_str(status.as_str()), Some(status));
        }
        assert_eq!(VideoStatus::from_str("published"), None);
    }

    #[test]
    fn test_live_stream_status_monotonic() {
        use LiveStreamStatus::*;

        assert!(Idle.can_advance_to(Active));
        assert!(Active.can_advance_to(Completed));
        assert!(Idle.can_advance_to(Completed));
        assert!(Active.can_advance_to(Active));

        assert!(!Active.can_advance_to(Idle));
        assert!(!Completed.can_advance_to(Active));
        assert!(!Completed.can_advance_to(Idle));
    }

    #[test]
    fn test_stream_key_only_in_create_response() {
        let stream = LiveStream {
            id: Uuid::new_v4(),
            live_stream_id: "ls123".to_string(),
            user_id: Uuid::new_v4(),
            title: None,
            is_private: false,
            stream_key: "secret".to_string(),
            playback_id: "pb123".to_string(),
            status: "idle".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let with_key = LiveStreamResponse::from_entity(stream.clone(), true);
        assert_eq!(with_key.stream_key.as_deref(), Some("secret"));

        let without_key = LiveStreamResponse::from(stream);
        assert!(without_key.stream_key.is_none());
    }
}
