/// Business logic for video-service
///
/// - webhook: lifecycle event correlation for the external platform
/// - sharing: share grants and the access predicate
/// - comments: durable per-video comments
/// - live_comments: ephemeral in-memory comments for live viewing
/// - mux_client: outbound calls to the external video platform
pub mod comments;
pub mod live_comments;
pub mod mux_client;
pub mod sharing;
pub mod webhook;

pub use live_comments::LiveCommentStore;
pub use mux_client::MuxClient;
pub use webhook::WebhookProcessor;
