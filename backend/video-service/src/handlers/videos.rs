/// Video handlers - listings, player data, metadata and deletion
use actix_web::{web, HttpResponse};
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::{live_stream_repo, video_repo};
use crate::error::{AppError, Result};
use crate::middleware::UserId;
use crate::models::{UpdateVideoRequest, VideoResponse};
use crate::services::MuxClient;

const HOME_PAGE_LIMIT_MAX: i64 = 50;

#[derive(Debug, Deserialize)]
pub struct HomeQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

/// The caller's own public videos
pub async fn list_my_videos(pool: web::Data<PgPool>, user_id: UserId) -> Result<HttpResponse> {
    let videos = video_repo::list_by_user(pool.get_ref(), user_id.0, false).await?;
    let responses: Vec<VideoResponse> = videos.into_iter().map(Into::into).collect();
    Ok(HttpResponse::Ok().json(responses))
}

/// The caller's own private videos
pub async fn list_my_private_videos(
    pool: web::Data<PgPool>,
    user_id: UserId,
) -> Result<HttpResponse> {
    let videos = video_repo::list_by_user(pool.get_ref(), user_id.0, true).await?;
    let responses: Vec<VideoResponse> = videos.into_iter().map(Into::into).collect();
    Ok(HttpResponse::Ok().json(responses))
}

/// Paginated public feed of ready videos, newest first
pub async fn list_home_videos(
    pool: web::Data<PgPool>,
    query: web::Query<HomeQuery>,
) -> Result<HttpResponse> {
    let page = query.page.unwrap_or(1).max(1);
    let limit = query.limit.unwrap_or(10).clamp(1, HOME_PAGE_LIMIT_MAX);
    let offset = (page - 1) * limit;

    let videos = video_repo::list_home(pool.get_ref(), limit, offset).await?;
    let responses: Vec<VideoResponse> = videos.into_iter().map(Into::into).collect();
    Ok(HttpResponse::Ok().json(responses))
}

/// A channel's public videos
pub async fn list_channel_videos(
    pool: web::Data<PgPool>,
    channel_name: web::Path<String>,
) -> Result<HttpResponse> {
    let videos = video_repo::list_by_channel(pool.get_ref(), &channel_name).await?;
    let responses: Vec<VideoResponse> = videos.into_iter().map(Into::into).collect();
    Ok(HttpResponse::Ok().json(responses))
}

/// Everything the player needs, looked up by playback id
pub async fn get_player_data(
    pool: web::Data<PgPool>,
    playback_id: web::Path<String>,
) -> Result<HttpResponse> {
    let video = video_repo::get_by_playback_id(pool.get_ref(), &playback_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Video not found".to_string()))?;

    Ok(HttpResponse::Ok().json(VideoResponse::from(video)))
}

/// Signed viewing tokens for a private video's playback id
pub async fn sign_playback(
    mux: web::Data<MuxClient>,
    playback_id: web::Path<String>,
    _user_id: UserId,
) -> Result<HttpResponse> {
    let tokens = mux.sign_playback_tokens(&playback_id)?;
    Ok(HttpResponse::Ok().json(tokens))
}

/// Patch title/description. Owner only.
pub async fn update_video(
    pool: web::Data<PgPool>,
    video_id: web::Path<Uuid>,
    user_id: UserId,
    req: web::Json<UpdateVideoRequest>,
) -> Result<HttpResponse> {
    let video_id = video_id.into_inner();
    let video = video_repo::get_video(pool.get_ref(), video_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Video not found".to_string()))?;

    if video.user_id != user_id.0 {
        return Err(AppError::Forbidden(
            "Only the video owner can update it".to_string(),
        ));
    }

    let updated = video_repo::update_metadata(
        pool.get_ref(),
        video_id,
        req.title.as_deref(),
        req.description.as_deref(),
    )
    .await?
    .ok_or_else(|| AppError::NotFound("Video not found".to_string()))?;

    Ok(HttpResponse::Ok().json(VideoResponse::from(updated)))
}

/// Owner delete: tears down the remote asset, then removes the row. Share
/// grants and comments cascade with it. An upstream failure surfaces to the
/// caller as retryable before anything local is touched.
pub async fn delete_video(
    pool: web::Data<PgPool>,
    mux: web::Data<MuxClient>,
    video_id: web::Path<Uuid>,
    user_id: UserId,
) -> Result<HttpResponse> {
    let video_id = video_id.into_inner();
    let video = video_repo::get_video(pool.get_ref(), video_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Video not found".to_string()))?;

    if video.user_id != user_id.0 {
        return Err(AppError::Forbidden(
            "Only the video owner can delete it".to_string(),
        ));
    }

    mux.delete_asset(&video.asset_id).await?;
    video_repo::delete_video(pool.get_ref(), video_id).await?;

    tracing::info!(video_id = %video_id, asset_id = %video.asset_id, "video deleted");
    Ok(HttpResponse::NoContent().finish())
}

/// Status of the live stream a video was recorded from
pub async fn get_livestream_status(
    pool: web::Data<PgPool>,
    video_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let video = video_repo::get_video(pool.get_ref(), video_id.into_inner())
        .await?
        .ok_or_else(|| AppError::NotFound("Video not found".to_string()))?;

    let stream_id = video
        .live_stream_id
        .as_deref()
        .ok_or_else(|| AppError::NotFound("Video has no live stream".to_string()))?;

    let stream = live_stream_repo::get_by_external_id(pool.get_ref(), stream_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Live stream not found".to_string()))?;

    Ok(HttpResponse::Ok().json(serde_json::json!({ "status": stream.status })))
}
