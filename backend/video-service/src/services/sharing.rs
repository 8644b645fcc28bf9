/// Sharing graph
///
/// Explicit share grants between a video and other users, and the access
/// predicate derived from them. `can_access` is the single source of truth
/// for privileged operations on a private video; the comment and single-video
/// read paths deliberately do not consult it (any caller who knows the video
/// id may read or comment), matching the platform's current behavior.
use crate::db::{share_repo, user_repo, video_repo};
use crate::error::{AppError, Result};
use crate::models::{GranteeEntry, SharedVideo, SharedVideoEntry, Video};
use sqlx::PgPool;
use uuid::Uuid;

async fn owned_video(pool: &PgPool, video_id: Uuid, owner_id: Uuid) -> Result<Video> {
    let video = video_repo::get_video(pool, video_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Video not found".to_string()))?;

    if video.user_id != owner_id {
        return Err(AppError::Forbidden(
            "Only the video owner can manage sharing".to_string(),
        ));
    }

    Ok(video)
}

/// Grant a user access to a video. Idempotent: granting the same pair twice
/// returns the existing grant.
pub async fn grant(
    pool: &PgPool,
    video_id: Uuid,
    granter_id: Uuid,
    grantee_id: Uuid,
) -> Result<SharedVideo> {
    owned_video(pool, video_id, granter_id).await?;

    if !user_repo::user_exists(pool, grantee_id).await? {
        return Err(AppError::NotFound("User not found".to_string()));
    }

    let grant = share_repo::upsert_grant(pool, video_id, grantee_id, granter_id).await?;
    tracing::info!(
        video_id = %video_id,
        grantee_id = %grantee_id,
        "video shared"
    );
    Ok(grant)
}

/// Remove a grant. Revoking a grant that does not exist is a no-op.
pub async fn revoke(
    pool: &PgPool,
    video_id: Uuid,
    granter_id: Uuid,
    grantee_id: Uuid,
) -> Result<()> {
    owned_video(pool, video_id, granter_id).await?;

    if share_repo::delete_grant(pool, video_id, grantee_id).await? {
        tracing::info!(
            video_id = %video_id,
            grantee_id = %grantee_id,
            "video share revoked"
        );
    }
    Ok(())
}

/// Who a video is shared with. Owner only.
pub async fn list_grantees(
    pool: &PgPool,
    video_id: Uuid,
    requester_id: Uuid,
) -> Result<Vec<GranteeEntry>> {
    owned_video(pool, video_id, requester_id).await?;
    Ok(share_repo::list_grantees(pool, video_id).await?)
}

/// Every video granted to a user, annotated with who shared it
pub async fn list_shared_with_me(pool: &PgPool, user_id: Uuid) -> Result<Vec<SharedVideoEntry>> {
    Ok(share_repo::list_shared_with_user(pool, user_id).await?)
}

/// True iff the user owns the video or holds a grant for it
pub async fn can_access(pool: &PgPool, user_id: Uuid, video_id: Uuid) -> Result<bool> {
    if let Some(video) = video_repo::get_video(pool, video_id).await? {
        if video.user_id == user_id {
            return Ok(true);
        }
    } else {
        return Ok(false);
    }

    Ok(share_repo::grant_exists(pool, video_id, user_id).await?)
}
