/// Webhook event vocabulary and signature verification
///
/// The external platform posts lifecycle events whose payload shape varies by
/// origin: direct uploads carry creator metadata, stream-spawned assets carry
/// a live-stream reference instead. The envelope is decoded as one loosely
/// typed record and classified here; per-variant field validation happens in
/// the correlator, which branches on field presence rather than assuming one
/// shape.
use crate::models::LiveStreamStatus;
use hmac::{Hmac, Mac};
use serde::Deserialize;
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

pub const SIGNATURE_HEADER: &str = "mux-signature";

/// Event kinds this service reacts to. Anything else on the wire is
/// acknowledged and ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    AssetCreated,
    AssetReady,
    LiveStreamIdle,
    LiveStreamActive,
    LiveStreamCompleted,
}

impl EventKind {
    pub fn from_wire(event_type: &str) -> Option<Self> {
        match event_type {
            "video.asset.created" => Some(Self::AssetCreated),
            "video.asset.ready" => Some(Self::AssetReady),
            "video.live_stream.idle" => Some(Self::LiveStreamIdle),
            "video.live_stream.active" => Some(Self::LiveStreamActive),
            "video.asset.live_stream_completed" => Some(Self::LiveStreamCompleted),
            _ => None,
        }
    }

    pub fn as_wire(&self) -> &'static str {
        match self {
            Self::AssetCreated => "video.asset.created",
            Self::AssetReady => "video.asset.ready",
            Self::LiveStreamIdle => "video.live_stream.idle",
            Self::LiveStreamActive => "video.live_stream.active",
            Self::LiveStreamCompleted => "video.asset.live_stream_completed",
        }
    }

    /// Internal live-stream status this event maps to, if any
    pub fn stream_status(&self) -> Option<LiveStreamStatus> {
        match self {
            Self::LiveStreamIdle => Some(LiveStreamStatus::Idle),
            Self::LiveStreamActive => Some(LiveStreamStatus::Active),
            Self::LiveStreamCompleted => Some(LiveStreamStatus::Completed),
            Self::AssetCreated | Self::AssetReady => None,
        }
    }
}

/// Inbound webhook envelope
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookEnvelope {
    #[serde(rename = "type")]
    pub event_type: String,
    pub data: EventData,
}

/// Event payload. Fields are present or absent depending on origin.
#[derive(Debug, Clone, Deserialize)]
pub struct EventData {
    pub id: String,
    pub upload_id: Option<String>,
    pub duration: Option<f64>,
    pub meta: Option<EventMeta>,
    #[serde(default)]
    pub playback_ids: Vec<PlaybackId>,
    pub live_stream_id: Option<String>,
}

/// Creator metadata attached to direct one-shot uploads
#[derive(Debug, Clone, Deserialize)]
pub struct EventMeta {
    pub title: Option<String>,
    pub creator_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlaybackId {
    pub id: String,
    pub policy: String,
}

impl EventData {
    pub fn primary_playback_id(&self) -> Option<&PlaybackId> {
        self.playback_ids.first()
    }

    /// Signed playback policy means the asset is private
    pub fn is_private(&self) -> bool {
        self.primary_playback_id()
            .map(|p| p.policy == "signed")
            .unwrap_or(false)
    }
}

/// Verify the webhook signature header against the raw request body.
/// The platform signs with HMAC-SHA256 over the exact bytes it sent.
pub fn verify_signature(raw_body: &[u8], signature: &str, webhook_secret: &str) -> bool {
    let mut mac = match HmacSha256::new_from_slice(webhook_secret.as_bytes()) {
        Ok(mac) => mac,
        Err(_) => return false,
    };
    mac.update(raw_body);
    let expected = hex::encode(mac.finalize().into_bytes());

    signature == expected
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_kind_from_wire() {
        assert_eq!(
            EventKind::from_wire("video.asset.created"),
            Some(EventKind::AssetCreated)
        );
        assert_eq!(
            EventKind::from_wire("video.asset.ready"),
            Some(EventKind::AssetReady)
        );
        assert_eq!(
            EventKind::from_wire("video.asset.live_stream_completed"),
            Some(EventKind::LiveStreamCompleted)
        );
        assert_eq!(EventKind::from_wire("video.upload.cancelled"), None);
    }

    #[test]
    fn test_stream_status_mapping() {
        assert_eq!(
            EventKind::LiveStreamIdle.stream_status(),
            Some(LiveStreamStatus::Idle)
        );
        assert_eq!(
            EventKind::LiveStreamActive.stream_status(),
            Some(LiveStreamStatus::Active)
        );
        assert_eq!(
            EventKind::LiveStreamCompleted.stream_status(),
            Some(LiveStreamStatus::Completed)
        );
        assert_eq!(EventKind::AssetReady.stream_status(), None);
    }

    #[test]
    fn test_envelope_direct_upload_shape() {
        let body = r#"{
            "type": "video.asset.created",
            "data": {
                "id": "a1",
                "upload_id": "u1",
                "meta": { "title": "T", "creator_id": "11111111-2222-3333-4444-555555555555" },
                "playback_ids": [{ "id": "p1", "policy": "public" }]
            }
        }"#;

        let envelope: WebhookEnvelope = serde_json::from_str(body).unwrap();
        assert_eq!(envelope.event_type, "video.asset.created");
        assert_eq!(envelope.data.id, "a1");
        assert_eq!(envelope.data.upload_id.as_deref(), Some("u1"));
        assert!(envelope.data.live_stream_id.is_none());
        assert!(!envelope.data.is_private());
        assert_eq!(envelope.data.primary_playback_id().unwrap().id, "p1");
    }

    #[test]
    fn test_envelope_stream_spawned_shape() {
        // Asset spawned by a live stream: no meta, live_stream_id instead
        let body = r#"{
            "type": "video.asset.created",
            "data": {
                "id": "a2",
                "playback_ids": [{ "id": "p2", "policy": "signed" }],
                "live_stream_id": "ls1"
            }
        }"#;

        let envelope: WebhookEnvelope = serde_json::from_str(body).unwrap();
        assert!(envelope.data.meta.is_none());
        assert_eq!(envelope.data.live_stream_id.as_deref(), Some("ls1"));
        assert!(envelope.data.is_private());
    }

    #[test]
    fn test_envelope_ready_with_fractional_duration() {
        let body = r#"{
            "type": "video.asset.ready",
            "data": { "id": "a1", "duration": 42.5, "playback_ids": [] }
        }"#;

        let envelope: WebhookEnvelope = serde_json::from_str(body).unwrap();
        assert_eq!(envelope.data.duration, Some(42.5));
        assert!(envelope.data.primary_playback_id().is_none());
    }

    #[test]
    fn test_verify_signature() {
        let secret = "whsec_test";
        let body = br#"{"type":"video.asset.ready","data":{"id":"a1"}}"#;

        let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).unwrap();
        mac.update(body);
        let good = hex::encode(mac.finalize().into_bytes());

        assert!(verify_signature(body, &good, secret));
        assert!(!verify_signature(body, &good, "whsec_other"));
        assert!(!verify_signature(b"tampered", &good, secret));
        assert!(!verify_signature(body, "deadbeef", secret));
    }
}
