/// WebSocket session for live comment viewers
///
/// A connection joins one video's room for its lifetime. The registry hands
/// back a channel; a forwarding task bridges it to the actor, which writes
/// each event to the socket. Sessions do not need to leave explicitly: actor
/// shutdown removes the subscriber, and a missed removal is cleaned up by the
/// next broadcast's dead-sender pruning.
use crate::websocket::{ConnectionRegistry, SubscriberId};
use actix::{Actor, ActorContext, AsyncContext, Handler, Message as ActixMessage, StreamHandler};
use actix_web::{web, Error, HttpRequest, HttpResponse};
use actix_web_actors::ws;
use serde::Deserialize;
use std::time::{Duration, Instant};
use uuid::Uuid;

const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(5);
const CLIENT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Deserialize)]
pub struct WsParams {
    pub video_id: Uuid,
}

#[derive(ActixMessage)]
#[rtype(result = "()")]
struct RoomEvent(String);

struct LiveCommentSession {
    video_id: Uuid,
    subscriber_id: SubscriberId,
    registry: ConnectionRegistry,
    hb: Instant,
}

impl LiveCommentSession {
    fn new(video_id: Uuid, subscriber_id: SubscriberId, registry: ConnectionRegistry) -> Self {
        Self {
            video_id,
            subscriber_id,
            registry,
            hb: Instant::now(),
        }
    }

    fn hb(&self, ctx: &mut ws::WebsocketContext<Self>) {
        ctx.run_interval(HEARTBEAT_INTERVAL, |act, ctx| {
            if Instant::now().duration_since(act.hb) > CLIENT_TIMEOUT {
                tracing::warn!(
                    room = %format!("video:{}", act.video_id),
                    "live comment viewer heartbeat timed out"
                );
                ctx.stop();
                return;
            }
            ctx.ping(b"");
        });
    }
}

impl Actor for LiveCommentSession {
    type Context = ws::WebsocketContext<Self>;

    fn started(&mut self, ctx: &mut Self::Context) {
        tracing::debug!(room = %format!("video:{}", self.video_id), "viewer session started");
        self.hb(ctx);
    }

    fn stopped(&mut self, _ctx: &mut Self::Context) {
        tracing::debug!(room = %format!("video:{}", self.video_id), "viewer session stopped");

        let registry = self.registry.clone();
        let video_id = self.video_id;
        let subscriber_id = self.subscriber_id;
        actix::spawn(async move {
            registry.leave(video_id, subscriber_id).await;
        });
    }
}

impl Handler<RoomEvent> for LiveCommentSession {
    type Result = ();

    fn handle(&mut self, msg: RoomEvent, ctx: &mut Self::Context) {
        ctx.text(msg.0);
    }
}

impl StreamHandler<Result<ws::Message, ws::ProtocolError>> for LiveCommentSession {
    fn handle(&mut self, msg: Result<ws::Message, ws::ProtocolError>, ctx: &mut Self::Context) {
        match msg {
            Ok(ws::Message::Ping(msg)) => {
                self.hb = Instant::now();
                ctx.pong(&msg);
            }
            Ok(ws::Message::Pong(_)) => {
                self.hb = Instant::now();
            }
            Ok(ws::Message::Text(_)) | Ok(ws::Message::Binary(_)) => {
                // Viewers only receive; comments are written over HTTP
            }
            Ok(ws::Message::Close(reason)) => {
                tracing::debug!(?reason, "viewer closed connection");
                ctx.stop();
            }
            _ => {}
        }
    }
}

/// Entry point: `GET /ws/live-comments?video_id=<uuid>`
pub async fn live_comments_ws(
    req: HttpRequest,
    stream: web::Payload,
    registry: web::Data<ConnectionRegistry>,
    query: web::Query<WsParams>,
) -> Result<HttpResponse, Error> {
    let video_id = query.into_inner().video_id;

    let (subscriber_id, mut rx) = registry.join(video_id).await;
    let session = LiveCommentSession::new(video_id, subscriber_id, registry.get_ref().clone());

    let (addr, resp) = ws::WsResponseBuilder::new(session, &req, stream).start_with_addr()?;

    // Bridge the room channel to the socket; ends when either side goes away
    tokio::spawn(async move {
        while let Some(payload) = rx.recv().await {
            if addr.try_send(RoomEvent(payload)).is_err() {
                break;
            }
        }
    });

    Ok(resp)
}
