/// Upload handlers - direct-upload URL issuance
use actix_web::{web, HttpResponse};

use crate::cache::UploadIntentCache;
use crate::error::Result;
use crate::middleware::UserId;
use crate::models::{CreateUploadRequest, CreateUploadResponse};
use crate::services::MuxClient;

/// Issue a direct-upload URL on the external platform. The description the
/// user typed has nowhere to live yet (the asset does not exist), so it is
/// parked in the pending-intent cache under the upload id until the
/// asset-created webhook consumes it.
pub async fn create_upload(
    mux: web::Data<MuxClient>,
    intent_cache: web::Data<UploadIntentCache>,
    user_id: UserId,
    req: web::Json<CreateUploadRequest>,
) -> Result<HttpResponse> {
    let req = req.into_inner();
    let is_private = req.is_private.unwrap_or(false);

    let upload = mux
        .create_upload(user_id.0, req.title.as_deref(), is_private)
        .await?;

    if let Some(description) = req.description.as_deref().filter(|d| !d.trim().is_empty()) {
        // Losing the description degrades the eventual video, not the upload
        if let Err(e) = intent_cache.store_description(&upload.id, description).await {
            tracing::warn!(upload_id = %upload.id, error = %e, "failed to cache upload description");
        }
    }

    tracing::info!(upload_id = %upload.id, user_id = %user_id.0, "upload created");

    Ok(HttpResponse::Created().json(CreateUploadResponse {
        upload_id: upload.id,
        url: upload.url,
    }))
}
