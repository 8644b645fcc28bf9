/// Comment repository - durable comments attached to a video
use crate::models::{Comment, CommentWithAuthor};
use sqlx::PgPool;
use uuid::Uuid;

pub async fn insert_comment(
    pool: &PgPool,
    video_id: Uuid,
    user_id: Uuid,
    content: &str,
) -> Result<Comment, sqlx::Error> {
    sqlx::query_as::<_, Comment>(
        r#"
        INSERT INTO comments (video_id, user_id, content)
        VALUES ($1, $2, $3)
        RETURNING id, video_id, user_id, content, created_at, updated_at
        "#,
    )
    .bind(video_id)
    .bind(user_id)
    .bind(content)
    .fetch_one(pool)
    .await
}

/// Comments under a video, newest first, annotated with author identity
pub async fn list_by_video(
    pool: &PgPool,
    video_id: Uuid,
) -> Result<Vec<CommentWithAuthor>, sqlx::Error> {
    sqlx::query_as::<_, CommentWithAuthor>(
        r#"
        SELECT c.id, c.video_id, c.user_id, c.content, c.created_at, c.updated_at,
               u.name AS author_name, u.channel_name AS author_channel_name
        FROM comments c
        JOIN users u ON u.id = c.user_id
        WHERE c.video_id = $1
        ORDER BY c.created_at DESC
        "#,
    )
    .bind(video_id)
    .fetch_all(pool)
    .await
}

/// Delete a comment scoped to its author. Returns the video id when a row
/// was removed; a non-author caller matches nothing.
pub async fn delete_owned(
    pool: &PgPool,
    comment_id: Uuid,
    user_id: Uuid,
) -> Result<Option<Uuid>, sqlx::Error> {
    sqlx::query_scalar::<_, Uuid>(
        r#"
        DELETE FROM comments
        WHERE id = $1 AND user_id = $2
        RETURNING video_id
        "#,
    )
    .bind(comment_id)
    .bind(user_id)
    .fetch_optional(pool)
    .await
}
