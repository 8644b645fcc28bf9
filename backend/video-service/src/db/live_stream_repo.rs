/// Live stream repository - database operations for live streams
use crate::models::LiveStream;
use sqlx::PgPool;
use uuid::Uuid;

const STREAM_COLUMNS: &str = "id, live_stream_id, user_id, title, is_private, stream_key, \
     playback_id, status, created_at, updated_at";

pub async fn insert_stream(
    pool: &PgPool,
    live_stream_id: &str,
    user_id: Uuid,
    title: Option<&str>,
    is_private: bool,
    stream_key: &str,
    playback_id: &str,
) -> Result<LiveStream, sqlx::Error> {
    sqlx::query_as::<_, LiveStream>(&format!(
        r#"
        INSERT INTO live_streams (live_stream_id, user_id, title, is_private, stream_key, playback_id, status)
        VALUES ($1, $2, $3, $4, $5, $6, 'idle')
        RETURNING {STREAM_COLUMNS}
        "#
    ))
    .bind(live_stream_id)
    .bind(user_id)
    .bind(title)
    .bind(is_private)
    .bind(stream_key)
    .bind(playback_id)
    .fetch_one(pool)
    .await
}

pub async fn get_by_external_id(
    pool: &PgPool,
    live_stream_id: &str,
) -> Result<Option<LiveStream>, sqlx::Error> {
    sqlx::query_as::<_, LiveStream>(&format!(
        r#"SELECT {STREAM_COLUMNS} FROM live_streams WHERE live_stream_id = $1"#
    ))
    .bind(live_stream_id)
    .fetch_optional(pool)
    .await
}

pub async fn get_stream(pool: &PgPool, id: Uuid) -> Result<Option<LiveStream>, sqlx::Error> {
    sqlx::query_as::<_, LiveStream>(&format!(
        r#"SELECT {STREAM_COLUMNS} FROM live_streams WHERE id = $1"#
    ))
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub async fn list_by_user(pool: &PgPool, user_id: Uuid) -> Result<Vec<LiveStream>, sqlx::Error> {
    sqlx::query_as::<_, LiveStream>(&format!(
        r#"
        SELECT {STREAM_COLUMNS} FROM live_streams
        WHERE user_id = $1
        ORDER BY created_at DESC
        "#
    ))
    .bind(user_id)
    .fetch_all(pool)
    .await
}

pub async fn list_public_active(pool: &PgPool) -> Result<Vec<LiveStream>, sqlx::Error> {
    sqlx::query_as::<_, LiveStream>(&format!(
        r#"
        SELECT {STREAM_COLUMNS} FROM live_streams
        WHERE is_private = FALSE AND status = 'active'
        ORDER BY created_at DESC
        "#
    ))
    .fetch_all(pool)
    .await
}

pub async fn update_status(
    pool: &PgPool,
    id: Uuid,
    status: &str,
) -> Result<LiveStream, sqlx::Error> {
    sqlx::query_as::<_, LiveStream>(&format!(
        r#"
        UPDATE live_streams SET status = $2, updated_at = NOW()
        WHERE id = $1
        RETURNING {STREAM_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(status)
    .fetch_one(pool)
    .await
}

pub async fn delete_stream(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
    let res = sqlx::query(r#"DELETE FROM live_streams WHERE id = $1"#)
        .bind(id)
        .execute(pool)
        .await?;
    Ok(res.rows_affected() > 0)
}
