/// Durable comments attached to a video
///
/// Content validation is shared with the ephemeral live-comment store: both
/// apply the same trim and length rules so a comment accepted in one place is
/// accepted in the other.
use crate::db::{comment_repo, video_repo};
use crate::error::{AppError, Result};
use crate::models::{Comment, CommentWithAuthor};
use sqlx::PgPool;
use uuid::Uuid;

pub const MAX_COMMENT_LENGTH: usize = 1000;

/// Trim and bounds-check comment content. Returns the trimmed text.
pub fn validate_content(content: &str) -> Result<&str> {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return Err(AppError::Validation(
            "Comment content cannot be empty".to_string(),
        ));
    }
    if trimmed.chars().count() > MAX_COMMENT_LENGTH {
        return Err(AppError::Validation(format!(
            "Comment content must not exceed {MAX_COMMENT_LENGTH} characters"
        )));
    }
    Ok(trimmed)
}

/// Persist a comment under an existing video
pub async fn add_comment(
    pool: &PgPool,
    video_id: Uuid,
    author_id: Uuid,
    content: &str,
) -> Result<Comment> {
    let trimmed = validate_content(content)?;

    if !video_repo::video_exists(pool, video_id).await? {
        return Err(AppError::NotFound("Video not found".to_string()));
    }

    let comment = comment_repo::insert_comment(pool, video_id, author_id, trimmed).await?;
    tracing::debug!(comment_id = %comment.id, video_id = %video_id, "comment created");
    Ok(comment)
}

/// Comments under a video, newest first
pub async fn list_comments(pool: &PgPool, video_id: Uuid) -> Result<Vec<CommentWithAuthor>> {
    Ok(comment_repo::list_by_video(pool, video_id).await?)
}

/// Delete a comment as its author. A non-author caller (or an unknown
/// comment id) gets NotFound rather than leaking whose comment it is.
pub async fn delete_comment(pool: &PgPool, comment_id: Uuid, requester_id: Uuid) -> Result<Uuid> {
    comment_repo::delete_owned(pool, comment_id, requester_id)
        .await?
        .ok_or_else(|| {
            AppError::NotFound(
                "Comment not found or you can only delete your own comments".to_string(),
            )
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_content_trims() {
        assert_eq!(validate_content("  hello  ").unwrap(), "hello");
    }

    #[test]
    fn test_validate_content_rejects_empty() {
        assert!(matches!(
            validate_content(""),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            validate_content("   \t\n  "),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_validate_content_length_boundary() {
        let exactly_max = "a".repeat(MAX_COMMENT_LENGTH);
        assert_eq!(validate_content(&exactly_max).unwrap(), exactly_max);

        let one_over = "a".repeat(MAX_COMMENT_LENGTH + 1);
        assert!(matches!(
            validate_content(&one_over),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_validate_content_counts_characters_not_bytes() {
        // 1000 multi-byte characters is still within bounds
        let content = "é".repeat(MAX_COMMENT_LENGTH);
        assert!(validate_content(&content).is_ok());
    }

    #[test]
    fn test_validate_content_length_after_trim() {
        // Surrounding whitespace does not count against the limit
        let content = format!("  {}  ", "a".repeat(MAX_COMMENT_LENGTH));
        assert!(validate_content(&content).is_ok());
    }
}
