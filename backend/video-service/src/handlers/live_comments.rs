/// Live comment handlers
///
/// Writes go to the in-memory store, then fan out to the video's room. The
/// broadcast is fire-and-forget: the response returns before every viewer
/// has necessarily received the event.
use actix_web::{web, HttpResponse};
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::user_repo;
use crate::error::{AppError, Result};
use crate::middleware::UserId;
use crate::models::{CommentAuthor, CreateCommentRequest};
use crate::services::LiveCommentStore;
use crate::websocket::{ConnectionRegistry, LiveCommentEvent};

/// Transient comments for a video, newest first
pub async fn list_live_comments(
    store: web::Data<LiveCommentStore>,
    video_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let comments = store.list_comments(video_id.into_inner()).await;
    Ok(HttpResponse::Ok().json(comments))
}

pub async fn create_live_comment(
    pool: web::Data<PgPool>,
    store: web::Data<LiveCommentStore>,
    registry: web::Data<ConnectionRegistry>,
    video_id: web::Path<Uuid>,
    user_id: UserId,
    req: web::Json<CreateCommentRequest>,
) -> Result<HttpResponse> {
    let video_id = video_id.into_inner();

    // Snapshot the author's display identity into the payload
    let user = user_repo::get_user(pool.get_ref(), user_id.0)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    let comment = store
        .add_comment(video_id, CommentAuthor::from(&user), &req.content)
        .await?;

    let registry = registry.get_ref().clone();
    let event = LiveCommentEvent::NewComment(comment.clone());
    tokio::spawn(async move {
        registry.publish(video_id, &event).await;
    });

    Ok(HttpResponse::Created().json(comment))
}

pub async fn delete_live_comment(
    store: web::Data<LiveCommentStore>,
    registry: web::Data<ConnectionRegistry>,
    path: web::Path<(Uuid, Uuid)>,
    user_id: UserId,
) -> Result<HttpResponse> {
    let (video_id, comment_id) = path.into_inner();

    if !store.delete_comment(video_id, comment_id, user_id.0).await {
        return Err(AppError::NotFound(
            "Comment not found or you can only delete your own comments".to_string(),
        ));
    }

    let registry = registry.get_ref().clone();
    tokio::spawn(async move {
        registry
            .publish(video_id, &LiveCommentEvent::CommentDeleted { comment_id })
            .await;
    });

    Ok(HttpResponse::NoContent().finish())
}
