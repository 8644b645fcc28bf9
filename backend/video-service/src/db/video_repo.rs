/// Video repository - database operations for videos
use crate::models::Video;
use sqlx::PgPool;
use uuid::Uuid;

const VIDEO_COLUMNS: &str = "id, user_id, upload_id, asset_id, playback_id, title, description, \
     channel_name, live_stream_id, is_private, status, duration, created_at, updated_at";

/// Insert a video in `created` status.
///
/// The unique index on asset_id doubles as the dedup guard against webhook
/// redelivery: a second insert for the same asset returns None instead of
/// creating a duplicate row.
#[allow(clippy::too_many_arguments)]
pub async fn insert_created(
    pool: &PgPool,
    user_id: Uuid,
    upload_id: Option<&str>,
    asset_id: &str,
    playback_id: &str,
    title: Option<&str>,
    description: Option<&str>,
    channel_name: Option<&str>,
    live_stream_id: Option<&str>,
    is_private: bool,
) -> Result<Option<Video>, sqlx::Error> {
    sqlx::query_as::<_, Video>(&format!(
        r#"
        INSERT INTO videos (
            user_id, upload_id, asset_id, playback_id, title, description,
            channel_name, live_stream_id, is_private, status
        ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, 'created')
        ON CONFLICT (asset_id) DO NOTHING
        RETURNING {VIDEO_COLUMNS}
        "#
    ))
    .bind(user_id)
    .bind(upload_id)
    .bind(asset_id)
    .bind(playback_id)
    .bind(title)
    .bind(description)
    .bind(channel_name)
    .bind(live_stream_id)
    .bind(is_private)
    .fetch_optional(pool)
    .await
}

/// Advance a video to `ready` and record its duration. Applying the same
/// update twice is idempotent; the status never moves backwards because
/// nothing ever writes an earlier status over `ready`.
pub async fn mark_ready_by_asset(
    pool: &PgPool,
    asset_id: &str,
    duration: Option<f64>,
) -> Result<Option<Video>, sqlx::Error> {
    sqlx::query_as::<_, Video>(&format!(
        r#"
        UPDATE videos
        SET status = 'ready', duration = COALESCE($2, duration), updated_at = NOW()
        WHERE asset_id = $1
        RETURNING {VIDEO_COLUMNS}
        "#
    ))
    .bind(asset_id)
    .bind(duration)
    .fetch_optional(pool)
    .await
}

/// Same ready-update, located through the originating live stream instead of
/// the asset id (terminal asset of a completed stream).
pub async fn mark_ready_by_live_stream(
    pool: &PgPool,
    live_stream_id: &str,
    duration: Option<f64>,
) -> Result<Option<Video>, sqlx::Error> {
    sqlx::query_as::<_, Video>(&format!(
        r#"
        UPDATE videos
        SET status = 'ready', duration = COALESCE($2, duration), updated_at = NOW()
        WHERE live_stream_id = $1
        RETURNING {VIDEO_COLUMNS}
        "#
    ))
    .bind(live_stream_id)
    .bind(duration)
    .fetch_optional(pool)
    .await
}

pub async fn get_video(pool: &PgPool, id: Uuid) -> Result<Option<Video>, sqlx::Error> {
    sqlx::query_as::<_, Video>(&format!(
        r#"SELECT {VIDEO_COLUMNS} FROM videos WHERE id = $1"#
    ))
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub async fn get_by_playback_id(
    pool: &PgPool,
    playback_id: &str,
) -> Result<Option<Video>, sqlx::Error> {
    sqlx::query_as::<_, Video>(&format!(
        r#"SELECT {VIDEO_COLUMNS} FROM videos WHERE playback_id = $1"#
    ))
    .bind(playback_id)
    .fetch_optional(pool)
    .await
}

pub async fn list_by_user(
    pool: &PgPool,
    user_id: Uuid,
    is_private: bool,
) -> Result<Vec<Video>, sqlx::Error> {
    sqlx::query_as::<_, Video>(&format!(
        r#"
        SELECT {VIDEO_COLUMNS} FROM videos
        WHERE user_id = $1 AND is_private = $2
        ORDER BY created_at DESC
        "#
    ))
    .bind(user_id)
    .bind(is_private)
    .fetch_all(pool)
    .await
}

/// Public, playable videos for the home feed, newest first
pub async fn list_home(pool: &PgPool, limit: i64, offset: i64) -> Result<Vec<Video>, sqlx::Error> {
    sqlx::query_as::<_, Video>(&format!(
        r#"
        SELECT {VIDEO_COLUMNS} FROM videos
        WHERE is_private = FALSE AND status = 'ready'
        ORDER BY created_at DESC
        LIMIT $1 OFFSET $2
        "#
    ))
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await
}

pub async fn list_by_channel(
    pool: &PgPool,
    channel_name: &str,
) -> Result<Vec<Video>, sqlx::Error> {
    sqlx::query_as::<_, Video>(&format!(
        r#"
        SELECT {VIDEO_COLUMNS} FROM videos
        WHERE channel_name = $1 AND is_private = FALSE
        ORDER BY created_at DESC
        "#
    ))
    .bind(channel_name)
    .fetch_all(pool)
    .await
}

pub async fn update_metadata(
    pool: &PgPool,
    id: Uuid,
    title: Option<&str>,
    description: Option<&str>,
) -> Result<Option<Video>, sqlx::Error> {
    sqlx::query_as::<_, Video>(&format!(
        r#"
        UPDATE videos SET
            title = COALESCE($2, title),
            description = COALESCE($3, description),
            updated_at = NOW()
        WHERE id = $1
        RETURNING {VIDEO_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(title)
    .bind(description)
    .fetch_optional(pool)
    .await
}

/// Hard delete; share grants and comments go with the row via FK cascade
pub async fn delete_video(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
    let res = sqlx::query(r#"DELETE FROM videos WHERE id = $1"#)
        .bind(id)
        .execute(pool)
        .await?;
    Ok(res.rows_affected() > 0)
}

pub async fn video_exists(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar::<_, bool>(r#"SELECT EXISTS(SELECT 1 FROM videos WHERE id = $1)"#)
        .bind(id)
        .fetch_one(pool)
        .await
}
