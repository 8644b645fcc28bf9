/// Caching layer for video-service
///
/// Holds the pending-intent entries captured at upload-creation time: the
/// free-text description a user typed before the external platform has
/// assigned an asset. The correlated webhook is expected to arrive well
/// inside the TTL; if it never does, the entry silently expires and the
/// description is lost (accepted data-loss mode, not a fatal error).
use crate::error::{AppError, Result};
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use std::sync::Arc;
use tokio::sync::Mutex;

const INTENT_TTL_SECONDS: u64 = 3600;

/// Redis-backed store for upload intent captured ahead of webhook delivery
#[derive(Clone)]
pub struct UploadIntentCache {
    conn: Arc<Mutex<ConnectionManager>>,
    ttl_seconds: u64,
}

impl UploadIntentCache {
    /// Initialize cache from Redis client
    pub async fn new(client: redis::Client, ttl_seconds: Option<u64>) -> Result<Self> {
        let manager = ConnectionManager::new(client)
            .await
            .map_err(|e| AppError::Cache(format!("Failed to connect to Redis: {e}")))?;

        Ok(Self::with_manager(Arc::new(Mutex::new(manager)), ttl_seconds))
    }

    pub fn with_manager(manager: Arc<Mutex<ConnectionManager>>, ttl_seconds: Option<u64>) -> Self {
        Self {
            conn: manager,
            ttl_seconds: ttl_seconds.unwrap_or(INTENT_TTL_SECONDS),
        }
    }

    /// Remember the description a user attached to an in-progress upload
    pub async fn store_description(&self, upload_id: &str, description: &str) -> Result<()> {
        let mut conn = self.conn.lock().await;
        conn.set_ex(Self::intent_key(upload_id), description, self.ttl_seconds)
            .await
            .map_err(|e| AppError::Cache(format!("Failed to write to cache: {e}")))
    }

    /// Consume the cached description for an upload, removing it. A miss is
    /// non-fatal: the caller falls back to an empty description.
    pub async fn take_description(&self, upload_id: &str) -> Result<Option<String>> {
        let key = Self::intent_key(upload_id);
        let mut conn = self.conn.lock().await;

        let value: Option<String> = conn
            .get(&key)
            .await
            .map_err(|e| AppError::Cache(format!("Failed to read from cache: {e}")))?;

        if value.is_some() {
            conn.del::<_, usize>(&key)
                .await
                .map_err(|e| AppError::Cache(format!("Failed to delete cache key: {e}")))?;
        }

        Ok(value)
    }

    fn intent_key(upload_id: &str) -> String {
        format!("video:intent:{upload_id}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intent_key() {
        assert_eq!(
            UploadIntentCache::intent_key("upload123"),
            "video:intent:upload123"
        );
    }
}
