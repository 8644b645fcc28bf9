/// Durable comment handlers
use actix_web::{web, HttpResponse};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::Result;
use crate::middleware::UserId;
use crate::models::CreateCommentRequest;
use crate::services::comments;

/// Comments under a video, newest first, with author identity
pub async fn list_comments(
    pool: web::Data<PgPool>,
    video_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let comments = comments::list_comments(pool.get_ref(), video_id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(comments))
}

pub async fn create_comment(
    pool: web::Data<PgPool>,
    video_id: web::Path<Uuid>,
    user_id: UserId,
    req: web::Json<CreateCommentRequest>,
) -> Result<HttpResponse> {
    let comment =
        comments::add_comment(pool.get_ref(), video_id.into_inner(), user_id.0, &req.content)
            .await?;
    Ok(HttpResponse::Created().json(comment))
}

/// Delete a comment as its author
pub async fn delete_comment(
    pool: web::Data<PgPool>,
    comment_id: web::Path<Uuid>,
    user_id: UserId,
) -> Result<HttpResponse> {
    comments::delete_comment(pool.get_ref(), comment_id.into_inner(), user_id.0).await?;
    Ok(HttpResponse::NoContent().finish())
}
