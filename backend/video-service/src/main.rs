/// Video Service - HTTP server
///
/// Wires configuration, persistence, the pending-intent cache and the live
/// comment fan-out together, and exposes the API surface. Authentication is
/// handled at the scope level; the webhook, player data, live comment list
/// and the WebSocket entry stay public.
use actix_web::{middleware as actix_middleware, web, App, HttpResponse, HttpServer};
use std::io;
use tracing_subscriber::EnvFilter;

use video_service::cache::UploadIntentCache;
use video_service::db;
use video_service::handlers;
use video_service::metrics;
use video_service::middleware::JwtAuthMiddleware;
use video_service::services::{LiveCommentStore, MuxClient, WebhookProcessor};
use video_service::websocket::{live_comments_ws, ConnectionRegistry};
use video_service::Config;

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = Config::from_env()
        .map_err(|e| io::Error::new(io::ErrorKind::Other, format!("Invalid configuration: {e}")))?;

    let bind_address = format!("{}:{}", config.app.host, config.app.port);

    let db_pool = db::create_pool(&config.database.url, config.database.max_connections)
        .await
        .map_err(|e| {
            io::Error::new(
                io::ErrorKind::Other,
                format!("Failed to connect to database: {e}"),
            )
        })?;

    db::run_migrations(&db_pool)
        .await
        .map_err(|e| io::Error::new(io::ErrorKind::Other, format!("Migration failed: {e}")))?;

    let redis_client = redis::Client::open(config.cache.redis_url.as_str())
        .map_err(|e| io::Error::new(io::ErrorKind::Other, format!("Invalid REDIS_URL: {e}")))?;
    let intent_cache = UploadIntentCache::new(redis_client, None).await.map_err(|e| {
        io::Error::new(
            io::ErrorKind::Other,
            format!("Failed to initialize cache: {e}"),
        )
    })?;

    let mux_client = MuxClient::new(config.mux.clone());
    let webhook_processor = WebhookProcessor::new(db_pool.clone(), intent_cache.clone());
    let live_comment_store = LiveCommentStore::new();
    let registry = ConnectionRegistry::new();
    let jwt_auth = JwtAuthMiddleware::new(&config.auth.jwt_secret);

    tracing::info!(%bind_address, "video-service starting");

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(config.clone()))
            .app_data(web::Data::new(db_pool.clone()))
            .app_data(web::Data::new(intent_cache.clone()))
            .app_data(web::Data::new(mux_client.clone()))
            .app_data(web::Data::new(webhook_processor.clone()))
            .app_data(web::Data::new(live_comment_store.clone()))
            .app_data(web::Data::new(registry.clone()))
            .wrap(actix_middleware::Logger::default())
            .route(
                "/health",
                web::get()
                    .to(|| async { HttpResponse::Ok().json(serde_json::json!({"status": "ok"})) }),
            )
            .route(
                "/health/ready",
                web::get().to(|| async { HttpResponse::Ok().finish() }),
            )
            .route(
                "/health/live",
                web::get().to(|| async { HttpResponse::Ok().finish() }),
            )
            .route(
                "/metrics",
                web::get().to(|| async {
                    HttpResponse::Ok()
                        .content_type("text/plain; version=0.0.4")
                        .body(metrics::gather())
                }),
            )
            .route("/ws/live-comments", web::get().to(live_comments_ws))
            .route(
                "/api/v1/webhooks/mux",
                web::post().to(handlers::mux_webhook),
            )
            .route(
                "/api/v1/videos/player/{playback_id}",
                web::get().to(handlers::get_player_data),
            )
            .route(
                "/api/v1/live-comments/{video_id}",
                web::get().to(handlers::list_live_comments),
            )
            .service(
                web::scope("/api/v1")
                    .wrap(jwt_auth.clone())
                    .service(
                        web::scope("/uploads").route("", web::post().to(handlers::create_upload)),
                    )
                    .service(
                        web::scope("/videos")
                            .route("", web::get().to(handlers::list_my_videos))
                            .route("/home", web::get().to(handlers::list_home_videos))
                            .route("/private", web::get().to(handlers::list_my_private_videos))
                            .route(
                                "/channel/{channel_name}",
                                web::get().to(handlers::list_channel_videos),
                            )
                            .route(
                                "/sign/{playback_id}",
                                web::post().to(handlers::sign_playback),
                            )
                            .route("/share", web::post().to(handlers::share_video))
                            .route(
                                "/share/{video_id}/{user_id}",
                                web::delete().to(handlers::unshare_video),
                            )
                            .route("/shared", web::get().to(handlers::list_shared_with_me))
                            .route(
                                "/{video_id}/shared-with",
                                web::get().to(handlers::list_video_grantees),
                            )
                            .route(
                                "/{video_id}/comments",
                                web::get().to(handlers::list_comments),
                            )
                            .route(
                                "/{video_id}/comments",
                                web::post().to(handlers::create_comment),
                            )
                            .route(
                                "/{video_id}/livestream-status",
                                web::get().to(handlers::get_livestream_status),
                            )
                            .route("/{id}", web::patch().to(handlers::update_video))
                            .route("/{id}", web::delete().to(handlers::delete_video)),
                    )
                    .service(
                        web::scope("/live-streams")
                            .route("", web::post().to(handlers::create_live_stream))
                            .route("", web::get().to(handlers::list_my_live_streams))
                            .route(
                                "/active",
                                web::get().to(handlers::list_public_active_streams),
                            )
                            .route("/{id}", web::delete().to(handlers::delete_live_stream)),
                    )
                    .service(
                        web::scope("/live-comments")
                            .route(
                                "/{video_id}",
                                web::post().to(handlers::create_live_comment),
                            )
                            .route(
                                "/{video_id}/{comment_id}",
                                web::delete().to(handlers::delete_live_comment),
                            ),
                    )
                    .service(
                        web::scope("/comments").route(
                            "/{comment_id}",
                            web::delete().to(handlers::delete_comment),
                        ),
                    ),
            )
    })
    .bind(&bind_address)?
    .run()
    .await
}
