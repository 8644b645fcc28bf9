/// Share handlers - explicit access grants between a video and other users
use actix_web::{web, HttpResponse};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::Result;
use crate::middleware::UserId;
use crate::models::ShareVideoRequest;
use crate::services::sharing;

/// Grant another user access to one of the caller's videos
pub async fn share_video(
    pool: web::Data<PgPool>,
    user_id: UserId,
    req: web::Json<ShareVideoRequest>,
) -> Result<HttpResponse> {
    let grant = sharing::grant(pool.get_ref(), req.video_id, user_id.0, req.user_id).await?;
    Ok(HttpResponse::Created().json(grant))
}

/// Revoke a grant. Revoking a grant that never existed is a no-op.
pub async fn unshare_video(
    pool: web::Data<PgPool>,
    user_id: UserId,
    path: web::Path<(Uuid, Uuid)>,
) -> Result<HttpResponse> {
    let (video_id, grantee_id) = path.into_inner();
    sharing::revoke(pool.get_ref(), video_id, user_id.0, grantee_id).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Every video shared with the caller, annotated with who shared it
pub async fn list_shared_with_me(pool: web::Data<PgPool>, user_id: UserId) -> Result<HttpResponse> {
    let videos = sharing::list_shared_with_me(pool.get_ref(), user_id.0).await?;
    Ok(HttpResponse::Ok().json(videos))
}

/// Who a video is shared with. Owner only.
pub async fn list_video_grantees(
    pool: web::Data<PgPool>,
    user_id: UserId,
    video_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let grantees =
        sharing::list_grantees(pool.get_ref(), video_id.into_inner(), user_id.0).await?;
    Ok(HttpResponse::Ok().json(grantees))
}
