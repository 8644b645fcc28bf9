/// Share repository - explicit access grants between a video and other users
use crate::models::{GranteeEntry, SharedVideo, SharedVideoEntry};
use sqlx::PgPool;
use uuid::Uuid;

/// Create a grant (idempotent - returns the existing grant if one already
/// exists for this video/grantee pair). The no-op DO UPDATE makes the
/// RETURNING clause yield the existing row on conflict.
pub async fn upsert_grant(
    pool: &PgPool,
    video_id: Uuid,
    grantee_id: Uuid,
    granter_id: Uuid,
) -> Result<SharedVideo, sqlx::Error> {
    sqlx::query_as::<_, SharedVideo>(
        r#"
        INSERT INTO shared_videos (video_id, shared_with_user_id, shared_by_user_id)
        VALUES ($1, $2, $3)
        ON CONFLICT (video_id, shared_with_user_id) DO UPDATE
        SET shared_by_user_id = shared_videos.shared_by_user_id
        RETURNING id, video_id, shared_with_user_id, shared_by_user_id, created_at
        "#,
    )
    .bind(video_id)
    .bind(grantee_id)
    .bind(granter_id)
    .fetch_one(pool)
    .await
}

/// Delete a grant if present; absent grants are a no-op
pub async fn delete_grant(
    pool: &PgPool,
    video_id: Uuid,
    grantee_id: Uuid,
) -> Result<bool, sqlx::Error> {
    let res = sqlx::query(
        r#"DELETE FROM shared_videos WHERE video_id = $1 AND shared_with_user_id = $2"#,
    )
    .bind(video_id)
    .bind(grantee_id)
    .execute(pool)
    .await?;
    Ok(res.rows_affected() > 0)
}

pub async fn grant_exists(
    pool: &PgPool,
    video_id: Uuid,
    user_id: Uuid,
) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar::<_, bool>(
        r#"
        SELECT EXISTS(
            SELECT 1 FROM shared_videos
            WHERE video_id = $1 AND shared_with_user_id = $2
        )
        "#,
    )
    .bind(video_id)
    .bind(user_id)
    .fetch_one(pool)
    .await
}

/// Everyone a video is shared with, with grant timestamps
pub async fn list_grantees(pool: &PgPool, video_id: Uuid) -> Result<Vec<GranteeEntry>, sqlx::Error> {
    sqlx::query_as::<_, GranteeEntry>(
        r#"
        SELECT u.id AS user_id, u.name, u.channel_name, sv.created_at AS shared_at
        FROM shared_videos sv
        JOIN users u ON u.id = sv.shared_with_user_id
        WHERE sv.video_id = $1
        ORDER BY sv.created_at DESC
        "#,
    )
    .bind(video_id)
    .fetch_all(pool)
    .await
}

/// Every video granted to a user, annotated with the granter's identity
pub async fn list_shared_with_user(
    pool: &PgPool,
    user_id: Uuid,
) -> Result<Vec<SharedVideoEntry>, sqlx::Error> {
    sqlx::query_as::<_, SharedVideoEntry>(
        r#"
        SELECT v.id, v.user_id, v.upload_id, v.asset_id, v.playback_id, v.title, v.description,
               v.channel_name, v.live_stream_id, v.is_private, v.status, v.duration,
               v.created_at, v.updated_at,
               u.name AS shared_by_name, u.channel_name AS shared_by_channel_name,
               sv.created_at AS shared_at
        FROM shared_videos sv
        JOIN videos v ON v.id = sv.video_id
        JOIN users u ON u.id = sv.shared_by_user_id
        WHERE sv.shared_with_user_id = $1
        ORDER BY sv.created_at DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
}
