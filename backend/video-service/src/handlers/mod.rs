/// HTTP handlers for video-service
///
/// Thin controllers over the services in `crate::services`:
/// - uploads: direct-upload URL issuance and pending-intent capture
/// - videos: listings, player data, metadata, signed tokens, delete
/// - live_streams: broadcaster sessions on the external platform
/// - shares: per-user access grants
/// - comments: durable comments
/// - live_comments: ephemeral comments with room fan-out
/// - webhooks: the lifecycle event entry point
pub mod comments;
pub mod live_comments;
pub mod live_streams;
pub mod shares;
pub mod uploads;
pub mod videos;
pub mod webhooks;

pub use comments::{create_comment, delete_comment, list_comments};
pub use live_comments::{create_live_comment, delete_live_comment, list_live_comments};
pub use live_streams::{
    create_live_stream, delete_live_stream, list_my_live_streams, list_public_active_streams,
};
pub use shares::{list_shared_with_me, list_video_grantees, share_video, unshare_video};
pub use uploads::create_upload;
pub use videos::{
    delete_video, get_livestream_status, get_player_data, list_channel_videos, list_home_videos,
    list_my_private_videos, list_my_videos, sign_playback, update_video,
};
pub use webhooks::mux_webhook;
