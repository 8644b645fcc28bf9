/// Live stream handlers
use actix_web::{web, HttpResponse};
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::live_stream_repo;
use crate::error::{AppError, Result};
use crate::middleware::UserId;
use crate::models::{CreateLiveStreamRequest, LiveStreamResponse};
use crate::services::MuxClient;

/// Start a live stream: created synchronously against the external platform,
/// then recorded locally in `idle` status. The ingest key is a broadcast
/// credential and is only returned here.
pub async fn create_live_stream(
    pool: web::Data<PgPool>,
    mux: web::Data<MuxClient>,
    user_id: UserId,
    req: web::Json<CreateLiveStreamRequest>,
) -> Result<HttpResponse> {
    let req = req.into_inner();
    let is_private = req.is_private.unwrap_or(false);

    let remote = mux.create_live_stream(is_private).await?;
    let playback_id = remote
        .playback_ids
        .first()
        .map(|p| p.id.as_str())
        .ok_or_else(|| {
            AppError::Upstream("Mux live stream created without playback id".to_string())
        })?;

    let stream = live_stream_repo::insert_stream(
        pool.get_ref(),
        &remote.id,
        user_id.0,
        req.title.as_deref(),
        is_private,
        &remote.stream_key,
        playback_id,
    )
    .await?;

    tracing::info!(
        live_stream_id = %stream.live_stream_id,
        user_id = %user_id.0,
        "live stream created"
    );

    Ok(HttpResponse::Created().json(LiveStreamResponse::from_entity(stream, true)))
}

/// The caller's own live streams
pub async fn list_my_live_streams(
    pool: web::Data<PgPool>,
    user_id: UserId,
) -> Result<HttpResponse> {
    let streams = live_stream_repo::list_by_user(pool.get_ref(), user_id.0).await?;
    let responses: Vec<LiveStreamResponse> = streams.into_iter().map(Into::into).collect();
    Ok(HttpResponse::Ok().json(responses))
}

/// Public streams currently on air
pub async fn list_public_active_streams(pool: web::Data<PgPool>) -> Result<HttpResponse> {
    let streams = live_stream_repo::list_public_active(pool.get_ref()).await?;
    let responses: Vec<LiveStreamResponse> = streams.into_iter().map(Into::into).collect();
    Ok(HttpResponse::Ok().json(responses))
}

/// Owner delete: tears down the platform ingest first, then the local row
pub async fn delete_live_stream(
    pool: web::Data<PgPool>,
    mux: web::Data<MuxClient>,
    stream_id: web::Path<Uuid>,
    user_id: UserId,
) -> Result<HttpResponse> {
    let stream_id = stream_id.into_inner();
    let stream = live_stream_repo::get_stream(pool.get_ref(), stream_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Live stream not found".to_string()))?;

    if stream.user_id != user_id.0 {
        return Err(AppError::Forbidden(
            "Only the stream owner can delete it".to_string(),
        ));
    }

    mux.delete_live_stream(&stream.live_stream_id).await?;
    live_stream_repo::delete_stream(pool.get_ref(), stream_id).await?;

    tracing::info!(live_stream_id = %stream.live_stream_id, "live stream deleted");
    Ok(HttpResponse::NoContent().finish())
}
