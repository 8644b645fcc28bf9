/// Lifecycle event correlation
///
/// The external platform notifies us out-of-band when an upload finishes
/// processing, a live stream changes state, or an asset becomes playable.
/// Each event must be correlated with client-side intent captured earlier:
/// which user initiated it, what title/description/privacy they chose, and
/// which live stream it belongs to. No cross-event ordering is guaranteed,
/// so a ready-update that finds no matching video is reported as an
/// operational error rather than silently dropped.
use crate::cache::UploadIntentCache;
use crate::db::{live_stream_repo, user_repo, video_repo};
use crate::error::{AppError, Result};
use crate::metrics;
use crate::models::LiveStreamStatus;
use sqlx::PgPool;
use uuid::Uuid;

pub mod events;

pub use events::{verify_signature, EventData, EventKind, WebhookEnvelope, SIGNATURE_HEADER};

/// How an event was disposed of, for the webhook counters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Processed,
    Ignored,
    Duplicate,
}

impl Outcome {
    fn as_str(&self) -> &'static str {
        match self {
            Self::Processed => "processed",
            Self::Ignored => "ignored",
            Self::Duplicate => "duplicate",
        }
    }
}

/// Webhook business logic: classifies an inbound event, resolves the owning
/// user and any cached intent, and applies the matching create/update to the
/// Video or LiveStream entity.
#[derive(Clone)]
pub struct WebhookProcessor {
    pool: PgPool,
    intent_cache: UploadIntentCache,
}

impl WebhookProcessor {
    pub fn new(pool: PgPool, intent_cache: UploadIntentCache) -> Self {
        Self { pool, intent_cache }
    }

    /// Process one verified event. Never fails the caller: internal errors
    /// are logged and counted so the platform is not driven into a retry
    /// storm over a transient failure on our side.
    pub async fn handle_event(&self, envelope: WebhookEnvelope) {
        let event_type = envelope.event_type.clone();

        match self.dispatch(envelope).await {
            Ok(outcome) => {
                metrics::WEBHOOK_EVENTS_TOTAL
                    .with_label_values(&[&event_type, outcome.as_str()])
                    .inc();
            }
            Err(err) => {
                tracing::error!(event_type = %event_type, error = %err, "webhook processing failed");
                metrics::WEBHOOK_EVENTS_TOTAL
                    .with_label_values(&[&event_type, "failed"])
                    .inc();
            }
        }
    }

    async fn dispatch(&self, envelope: WebhookEnvelope) -> Result<Outcome> {
        let Some(kind) = EventKind::from_wire(&envelope.event_type) else {
            tracing::debug!(event_type = %envelope.event_type, "unhandled webhook event type");
            return Ok(Outcome::Ignored);
        };

        match kind {
            EventKind::AssetCreated => self.handle_asset_created(&envelope.data).await,
            EventKind::AssetReady => self.handle_asset_ready(&envelope.data).await,
            EventKind::LiveStreamIdle | EventKind::LiveStreamActive | EventKind::LiveStreamCompleted => {
                self.handle_stream_event(kind, &envelope.data).await
            }
        }
    }

    /// A new asset exists on the platform. Either a direct one-shot upload
    /// (creator metadata in the event) or an asset spawned by a live stream
    /// (live-stream reference instead); branch on field presence.
    async fn handle_asset_created(&self, data: &EventData) -> Result<Outcome> {
        let playback = data.primary_playback_id().ok_or_else(|| {
            AppError::Validation(format!("asset {} created without playback ids", data.id))
        })?;

        let (user_id, title, description, is_private) = match &data.live_stream_id {
            Some(stream_id) => {
                let stream = live_stream_repo::get_by_external_id(&self.pool, stream_id)
                    .await?
                    .ok_or_else(|| {
                        self.correlation_failure("video.asset.created");
                        AppError::NotFound(format!(
                            "asset {} references unknown live stream {}",
                            data.id, stream_id
                        ))
                    })?;
                (stream.user_id, stream.title.clone(), None, stream.is_private)
            }
            None => {
                let meta = data.meta.as_ref().ok_or_else(|| {
                    AppError::Validation(format!(
                        "asset {} created without creator metadata or live stream reference",
                        data.id
                    ))
                })?;
                let creator_id = meta
                    .creator_id
                    .as_deref()
                    .and_then(|id| Uuid::parse_str(id).ok())
                    .ok_or_else(|| {
                        AppError::Validation(format!("asset {} has no valid creator id", data.id))
                    })?;

                let description = match &data.upload_id {
                    Some(upload_id) => self.consume_intent(upload_id).await,
                    None => None,
                };

                (creator_id, meta.title.clone(), description, data.is_private())
            }
        };

        // Channel name is resolved at event time, not cached at upload time,
        // so a renamed channel is reflected on the new video.
        let owner = user_repo::get_user(&self.pool, user_id)
            .await?
            .ok_or_else(|| {
                self.correlation_failure("video.asset.created");
                AppError::NotFound(format!("asset {} owned by unknown user {}", data.id, user_id))
            })?;

        let inserted = video_repo::insert_created(
            &self.pool,
            owner.id,
            data.upload_id.as_deref(),
            &data.id,
            &playback.id,
            title.as_deref(),
            description.as_deref(),
            Some(&owner.channel_name),
            data.live_stream_id.as_deref(),
            is_private,
        )
        .await?;

        match inserted {
            Some(video) => {
                tracing::info!(
                    video_id = %video.id,
                    asset_id = %data.id,
                    user_id = %owner.id,
                    "video created from lifecycle event"
                );
                Ok(Outcome::Processed)
            }
            None => {
                tracing::warn!(asset_id = %data.id, "duplicate asset-created event skipped");
                Ok(Outcome::Duplicate)
            }
        }
    }

    /// The asset finished processing: advance the video to ready and record
    /// its duration, leaving every other field untouched.
    async fn handle_asset_ready(&self, data: &EventData) -> Result<Outcome> {
        let updated = match &data.live_stream_id {
            Some(stream_id) => {
                video_repo::mark_ready_by_live_stream(&self.pool, stream_id, data.duration).await?
            }
            None => video_repo::mark_ready_by_asset(&self.pool, &data.id, data.duration).await?,
        };

        match updated {
            Some(video) => {
                tracing::info!(video_id = %video.id, asset_id = %data.id, "video ready");
                Ok(Outcome::Processed)
            }
            None => {
                self.correlation_failure("video.asset.ready");
                Err(AppError::NotFound(format!(
                    "ready event for asset {} matches no video",
                    data.id
                )))
            }
        }
    }

    /// A live stream changed state. Statuses advance monotonically; a
    /// completed stream also marks its terminal video as ready.
    async fn handle_stream_event(&self, kind: EventKind, data: &EventData) -> Result<Outcome> {
        let Some(target) = kind.stream_status() else {
            return Ok(Outcome::Ignored);
        };

        // Completion arrives as an asset event carrying the stream reference
        let external_id = data.live_stream_id.as_deref().unwrap_or(&data.id);

        let stream = live_stream_repo::get_by_external_id(&self.pool, external_id)
            .await?
            .ok_or_else(|| {
                self.correlation_failure(kind.as_wire());
                AppError::NotFound(format!("event for unknown live stream {external_id}"))
            })?;

        if !stream.get_status().can_advance_to(target) {
            tracing::warn!(
                live_stream_id = %external_id,
                current = %stream.status,
                target = %target.as_str(),
                "out-of-order live stream event skipped"
            );
            return Ok(Outcome::Ignored);
        }

        live_stream_repo::update_status(&self.pool, stream.id, target.as_str()).await?;
        tracing::info!(
            live_stream_id = %external_id,
            status = %target.as_str(),
            "live stream status updated"
        );

        if target == LiveStreamStatus::Completed {
            let updated =
                video_repo::mark_ready_by_live_stream(&self.pool, external_id, data.duration)
                    .await?;
            if updated.is_none() {
                self.correlation_failure("video.asset.live_stream_completed");
                return Err(AppError::NotFound(format!(
                    "completed stream {external_id} has no terminal video"
                )));
            }
        }

        Ok(Outcome::Processed)
    }

    /// Consume the pending-intent description for an upload. A cache miss or
    /// a cache failure both degrade to an empty description; losing the
    /// free-text intent is preferable to failing the whole correlation.
    async fn consume_intent(&self, upload_id: &str) -> Option<String> {
        match self.intent_cache.take_description(upload_id).await {
            Ok(description) => description,
            Err(err) => {
                tracing::warn!(upload_id = %upload_id, error = %err, "intent cache lookup failed");
                None
            }
        }
    }

    fn correlation_failure(&self, event_type: &str) {
        metrics::WEBHOOK_CORRELATION_FAILURES_TOTAL
            .with_label_values(&[event_type])
            .inc();
    }
}
