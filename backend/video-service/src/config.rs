/// Configuration management for video-service
///
/// Loads configuration from environment variables with sensible defaults.
/// Constructed once at startup and passed by reference into the components
/// that need it; business logic never reads the environment directly.
use serde::Deserialize;

#[derive(Clone, Debug, Deserialize)]
pub struct Config {
    pub app: AppConfig,
    pub database: DatabaseConfig,
    pub cache: CacheConfig,
    pub auth: AuthConfig,
    pub mux: MuxConfig,
}

#[derive(Clone, Debug, Deserialize)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub env: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Clone, Debug, Deserialize)]
pub struct CacheConfig {
    pub redis_url: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct AuthConfig {
    pub jwt_secret: String,
}

/// Credentials for the external video hosting platform
#[derive(Clone, Debug, Deserialize)]
pub struct MuxConfig {
    pub api_base_url: String,
    pub token_id: String,
    pub token_secret: String,
    /// Shared secret the platform signs webhook bodies with
    pub webhook_secret: String,
    /// Key pair for signed playback tokens
    pub signing_key_id: String,
    /// Base64-encoded RSA private key PEM
    pub signing_private_key: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        Ok(Config {
            app: AppConfig {
                host: std::env::var("VIDEO_SERVICE_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: std::env::var("VIDEO_SERVICE_PORT")
                    .unwrap_or_else(|_| "8084".to_string())
                    .parse()
                    .unwrap_or(8084),
                env: std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
            },
            database: DatabaseConfig {
                url: std::env::var("DATABASE_URL")
                    .unwrap_or_else(|_| "postgresql://localhost/clipstream".to_string()),
                max_connections: std::env::var("DATABASE_MAX_CONNECTIONS")
                    .unwrap_or_else(|_| "10".to_string())
                    .parse()
                    .unwrap_or(10),
            },
            cache: CacheConfig {
                redis_url: std::env::var("REDIS_URL")
                    .unwrap_or_else(|_| "redis://localhost".to_string()),
            },
            auth: AuthConfig {
                jwt_secret: std::env::var("JWT_SECRET")?,
            },
            mux: MuxConfig {
                api_base_url: std::env::var("MUX_API_BASE_URL")
                    .unwrap_or_else(|_| "https://api.mux.com".to_string()),
                token_id: std::env::var("MUX_TOKEN_ID")?,
                token_secret: std::env::var("MUX_TOKEN_SECRET")?,
                webhook_secret: std::env::var("MUX_WEBHOOK_SECRET")?,
                signing_key_id: std::env::var("MUX_SIGNING_KEY").unwrap_or_default(),
                signing_private_key: std::env::var("MUX_PRIVATE_KEY").unwrap_or_default(),
            },
        })
    }
}
