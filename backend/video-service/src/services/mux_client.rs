/// External video platform client
///
/// Thin wrapper over the hosting platform's REST API: direct-upload URL
/// issuance, live stream create/delete, asset deletion and signed playback
/// tokens. The platform owns all media processing; this service only
/// records identifiers and credentials the API hands back.
use crate::config::MuxConfig;
use crate::error::{AppError, Result};
use crate::models::PlaybackTokens;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use chrono::{Duration, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

const PLAYBACK_TOKEN_TTL_HOURS: i64 = 24;

/// Playback policy the platform applies to an asset
fn policy_for(is_private: bool) -> &'static str {
    if is_private {
        "signed"
    } else {
        "public"
    }
}

/// Direct upload issued by the platform: where the client PUTs the file
#[derive(Debug, Clone, Deserialize)]
pub struct MuxUpload {
    pub id: String,
    pub url: String,
}

/// Live stream created on the platform
#[derive(Debug, Clone, Deserialize)]
pub struct MuxLiveStream {
    pub id: String,
    pub stream_key: String,
    #[serde(default)]
    pub playback_ids: Vec<MuxPlaybackId>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MuxPlaybackId {
    pub id: String,
    pub policy: String,
}

#[derive(Debug, Deserialize)]
struct MuxEnvelope<T> {
    data: T,
}

#[derive(Debug, Serialize)]
struct PlaybackClaims {
    sub: String,
    aud: String,
    exp: i64,
}

#[derive(Clone)]
pub struct MuxClient {
    http: Client,
    config: MuxConfig,
}

impl MuxClient {
    pub fn new(config: MuxConfig) -> Self {
        Self {
            http: Client::new(),
            config,
        }
    }

    fn basic_credentials(&self) -> String {
        BASE64.encode(format!(
            "{}:{}",
            self.config.token_id, self.config.token_secret
        ))
    }

    async fn check(&self, response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(AppError::Upstream(format!(
            "Mux API error: {status} {body}"
        )))
    }

    /// Request a direct-upload URL. Privacy maps to the playback policy and
    /// the uploader's identity rides along in the asset metadata, which the
    /// lifecycle webhook echoes back for correlation.
    pub async fn create_upload(
        &self,
        user_id: Uuid,
        title: Option<&str>,
        is_private: bool,
    ) -> Result<MuxUpload> {
        let body = json!({
            "cors_origin": "*",
            "new_asset_settings": {
                "playback_policies": [policy_for(is_private)],
                "video_quality": "plus",
                "meta": {
                    "title": title.unwrap_or(""),
                    "creator_id": user_id.to_string(),
                },
            },
        });

        let response = self
            .http
            .post(format!("{}/video/v1/uploads", self.config.api_base_url))
            .header("Authorization", format!("Basic {}", self.basic_credentials()))
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("Mux upload request failed: {e}")))?;

        let envelope: MuxEnvelope<MuxUpload> = self
            .check(response)
            .await?
            .json()
            .await
            .map_err(|e| AppError::Upstream(format!("Invalid Mux upload response: {e}")))?;

        Ok(envelope.data)
    }

    /// Create a live stream with an ingest key and a playback id for viewers
    pub async fn create_live_stream(&self, is_private: bool) -> Result<MuxLiveStream> {
        let policy = policy_for(is_private);
        let body = json!({
            "playback_policies": [policy],
            "new_asset_settings": {
                "playback_policies": [policy],
            },
        });

        let response = self
            .http
            .post(format!("{}/video/v1/live-streams", self.config.api_base_url))
            .header("Authorization", format!("Basic {}", self.basic_credentials()))
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("Mux live stream request failed: {e}")))?;

        let envelope: MuxEnvelope<MuxLiveStream> = self
            .check(response)
            .await?
            .json()
            .await
            .map_err(|e| AppError::Upstream(format!("Invalid Mux live stream response: {e}")))?;

        Ok(envelope.data)
    }

    /// Tear down a live stream's ingest on the platform
    pub async fn delete_live_stream(&self, live_stream_id: &str) -> Result<()> {
        let response = self
            .http
            .delete(format!(
                "{}/video/v1/live-streams/{live_stream_id}",
                self.config.api_base_url
            ))
            .header("Authorization", format!("Basic {}", self.basic_credentials()))
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("Mux live stream delete failed: {e}")))?;

        self.check(response).await?;
        Ok(())
    }

    /// Delete a processed asset from the platform
    pub async fn delete_asset(&self, asset_id: &str) -> Result<()> {
        let response = self
            .http
            .delete(format!(
                "{}/video/v1/assets/{asset_id}",
                self.config.api_base_url
            ))
            .header("Authorization", format!("Basic {}", self.basic_credentials()))
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("Mux asset delete failed: {e}")))?;

        self.check(response).await?;
        Ok(())
    }

    /// Short-lived viewing tokens for a signed-policy playback id, one for
    /// the video stream and one for thumbnails
    pub fn sign_playback_tokens(&self, playback_id: &str) -> Result<PlaybackTokens> {
        Ok(PlaybackTokens {
            token_video: self.sign_playback_token(playback_id, "v")?,
            token_thumbnail: self.sign_playback_token(playback_id, "t")?,
        })
    }

    fn sign_playback_token(&self, playback_id: &str, audience: &str) -> Result<String> {
        if self.config.signing_key_id.is_empty() || self.config.signing_private_key.is_empty() {
            return Err(AppError::Internal(
                "Mux signing key not configured".to_string(),
            ));
        }

        // The private key is shipped base64-encoded PEM
        let pem = BASE64
            .decode(&self.config.signing_private_key)
            .map_err(|e| AppError::Internal(format!("Invalid Mux signing key encoding: {e}")))?;
        let key = EncodingKey::from_rsa_pem(&pem)
            .map_err(|e| AppError::Internal(format!("Invalid Mux signing key: {e}")))?;

        let mut header = Header::new(Algorithm::RS256);
        header.kid = Some(self.config.signing_key_id.clone());

        let claims = PlaybackClaims {
            sub: playback_id.to_string(),
            aud: audience.to_string(),
            exp: (Utc::now() + Duration::hours(PLAYBACK_TOKEN_TTL_HOURS)).timestamp(),
        };

        encode(&header, &claims, &key)
            .map_err(|e| AppError::Internal(format!("Failed to sign playback token: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_mapping() {
        assert_eq!(policy_for(true), "signed");
        assert_eq!(policy_for(false), "public");
    }

    #[test]
    fn test_upload_response_shape() {
        let body = r#"{
            "data": {
                "id": "upload123",
                "url": "https://storage.example.com/put-here",
                "status": "waiting"
            }
        }"#;

        let envelope: MuxEnvelope<MuxUpload> = serde_json::from_str(body).unwrap();
        assert_eq!(envelope.data.id, "upload123");
        assert_eq!(envelope.data.url, "https://storage.example.com/put-here");
    }

    #[test]
    fn test_live_stream_response_shape() {
        let body = r#"{
            "data": {
                "id": "ls1",
                "stream_key": "sk-secret",
                "playback_ids": [{ "id": "pb1", "policy": "public" }]
            }
        }"#;

        let envelope: MuxEnvelope<MuxLiveStream> = serde_json::from_str(body).unwrap();
        assert_eq!(envelope.data.id, "ls1");
        assert_eq!(envelope.data.playback_ids[0].id, "pb1");
    }

    #[test]
    fn test_signing_requires_configured_key() {
        let client = MuxClient::new(MuxConfig {
            api_base_url: "https://api.mux.com".to_string(),
            token_id: "id".to_string(),
            token_secret: "secret".to_string(),
            webhook_secret: "whsec".to_string(),
            signing_key_id: String::new(),
            signing_private_key: String::new(),
        });

        assert!(client.sign_playback_tokens("pb1").is_err());
    }
}
