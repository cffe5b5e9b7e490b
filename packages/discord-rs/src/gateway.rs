//! Gateway (websocket) connection.
//!
//! Maintains an identified session against the Discord gateway, heartbeats at
//! the cadence the server asks for, and forwards the dispatch events this
//! project cares about over an mpsc channel. Disconnects are handled
//! internally with resume-then-reidentify and jittered backoff.

use futures::{SinkExt, StreamExt};
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_tungstenite::{connect_async, tungstenite::Message as WsMessage};
use tracing::{debug, error, info, warn};

use crate::types::{GuildMember, Interaction, Message, User};
use crate::{DiscordError, Result};

const OP_DISPATCH: u8 = 0;
const OP_HEARTBEAT: u8 = 1;
const OP_IDENTIFY: u8 = 2;
const OP_RESUME: u8 = 6;
const OP_RECONNECT: u8 = 7;
const OP_INVALID_SESSION: u8 = 9;
const OP_HELLO: u8 = 10;
const OP_HEARTBEAT_ACK: u8 = 11;

/// Gateway intent bits.
pub mod intents {
    pub const GUILDS: u64 = 1 << 0;
    pub const GUILD_MEMBERS: u64 = 1 << 1;
    pub const GUILD_MESSAGES: u64 = 1 << 9;
    pub const MESSAGE_CONTENT: u64 = 1 << 15;
}

/// Dispatch events surfaced to consumers. Everything else is dropped.
#[derive(Debug, Clone)]
pub enum GatewayEvent {
    Ready { session_id: String, user: User },
    MessageCreate(Message),
    GuildMemberAdd(GuildMember),
    GuildMemberUpdate(GuildMember),
    InteractionCreate(Interaction),
}

#[derive(Debug, Deserialize)]
struct GatewayPayload {
    op: u8,
    #[serde(default)]
    d: Value,
    #[serde(default)]
    s: Option<u64>,
    #[serde(default)]
    t: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ReadyData {
    session_id: String,
    resume_gateway_url: String,
    user: User,
}

#[derive(Debug, Deserialize)]
struct HelloData {
    heartbeat_interval: u64,
}

/// Map a dispatch (`op: 0`) payload to a [`GatewayEvent`].
fn parse_dispatch(event_type: &str, data: Value) -> Option<GatewayEvent> {
    match event_type {
        "READY" => {
            let ready: ReadyData = serde_json::from_value(data).ok()?;
            Some(GatewayEvent::Ready {
                session_id: ready.session_id,
                user: ready.user,
            })
        }
        "MESSAGE_CREATE" => serde_json::from_value(data)
            .ok()
            .map(GatewayEvent::MessageCreate),
        "GUILD_MEMBER_ADD" => serde_json::from_value(data)
            .ok()
            .map(GatewayEvent::GuildMemberAdd),
        "GUILD_MEMBER_UPDATE" => serde_json::from_value(data)
            .ok()
            .map(GatewayEvent::GuildMemberUpdate),
        "INTERACTION_CREATE" => serde_json::from_value(data)
            .ok()
            .map(GatewayEvent::InteractionCreate),
        _ => None,
    }
}

struct Session {
    id: String,
    resume_url: String,
}

/// What the connection loop should do after a connection ends.
enum NextStep {
    /// Attempt to resume the existing session.
    Resume,
    /// Session is gone; identify from scratch.
    Reidentify,
    /// Consumer dropped the receiver; stop entirely.
    Shutdown,
}

/// Owns the websocket lifecycle for one bot token.
pub struct Gateway {
    token: String,
    intents: u64,
    url: String,
}

impl Gateway {
    pub fn new(token: impl Into<String>, intents: u64, url: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            intents,
            url: url.into(),
        }
    }

    /// Start the connection loop on a background task and return the event
    /// stream. The loop runs until the receiver is dropped.
    pub fn spawn(self) -> mpsc::Receiver<GatewayEvent> {
        let (tx, rx) = mpsc::channel(256);
        tokio::spawn(async move { self.run(tx).await });
        rx
    }

    async fn run(self, tx: mpsc::Sender<GatewayEvent>) {
        let mut session: Option<Session> = None;
        let mut seq: Option<u64> = None;
        let mut attempt: usize = 0;

        loop {
            let url = session
                .as_ref()
                .map(|s| s.resume_url.clone())
                .unwrap_or_else(|| self.url.clone());

            match self.connect_once(&url, &mut session, &mut seq, &tx).await {
                Ok(NextStep::Resume) => {
                    attempt = 0;
                }
                Ok(NextStep::Reidentify) => {
                    session = None;
                    seq = None;
                    attempt = 0;
                }
                Ok(NextStep::Shutdown) => {
                    info!("gateway receiver dropped, stopping connection loop");
                    return;
                }
                Err(e) => {
                    warn!(error = %e, attempt, "gateway connection failed");
                    attempt += 1;
                }
            }

            if tx.is_closed() {
                return;
            }

            let delay = backoff_delay(attempt);
            debug!(delay_ms = delay.as_millis() as u64, "gateway reconnecting");
            tokio::time::sleep(delay).await;
        }
    }

    /// Drive one websocket connection from handshake to disconnect.
    async fn connect_once(
        &self,
        url: &str,
        session: &mut Option<Session>,
        seq: &mut Option<u64>,
        tx: &mpsc::Sender<GatewayEvent>,
    ) -> Result<NextStep> {
        let full_url = format!("{}/?v=10&encoding=json", url.trim_end_matches('/'));
        let (stream, _resp) = connect_async(&full_url)
            .await
            .map_err(|e| DiscordError::Gateway(format!("connect failed: {}", e)))?;
        let (mut sink, mut stream) = stream.split();

        // First frame must be HELLO with the heartbeat cadence.
        let hello = read_payload(&mut stream).await?;
        if hello.op != OP_HELLO {
            return Err(DiscordError::Gateway(format!(
                "expected HELLO, got op {}",
                hello.op
            )));
        }
        let hello: HelloData = serde_json::from_value(hello.d)
            .map_err(|e| DiscordError::Gateway(format!("bad HELLO payload: {}", e)))?;
        let period = Duration::from_millis(hello.heartbeat_interval);

        let handshake = match session.as_ref() {
            Some(existing) => {
                debug!(session_id = %existing.id, "resuming gateway session");
                json!({
                    "op": OP_RESUME,
                    "d": {
                        "token": self.token,
                        "session_id": existing.id,
                        "seq": seq,
                    }
                })
            }
            None => json!({
                "op": OP_IDENTIFY,
                "d": {
                    "token": self.token,
                    "intents": self.intents,
                    "properties": {
                        "os": "linux",
                        "browser": "discord-rs",
                        "device": "discord-rs",
                    }
                }
            }),
        };
        send_json(&mut sink, &handshake).await?;

        let mut heartbeat =
            tokio::time::interval_at(tokio::time::Instant::now() + period, period);
        let mut acked = true;

        loop {
            tokio::select! {
                _ = heartbeat.tick() => {
                    if !acked {
                        warn!("heartbeat went unacknowledged, reconnecting");
                        return Ok(NextStep::Resume);
                    }
                    acked = false;
                    send_json(&mut sink, &json!({ "op": OP_HEARTBEAT, "d": seq })).await?;
                }
                frame = stream.next() => {
                    let frame = match frame {
                        Some(Ok(f)) => f,
                        Some(Err(e)) => {
                            return Err(DiscordError::Gateway(format!("read error: {}", e)));
                        }
                        None => {
                            debug!("gateway stream ended");
                            return Ok(NextStep::Resume);
                        }
                    };

                    match frame {
                        WsMessage::Text(txt) => {
                            let payload: GatewayPayload = match serde_json::from_str(txt.as_str()) {
                                Ok(p) => p,
                                Err(e) => {
                                    error!(error = %e, "unparseable gateway payload");
                                    continue;
                                }
                            };
                            if let Some(s) = payload.s {
                                *seq = Some(s);
                            }

                            match payload.op {
                                OP_DISPATCH => {
                                    let Some(event_type) = payload.t.as_deref() else {
                                        continue;
                                    };
                                    if event_type == "READY" {
                                        if let Ok(ready) =
                                            serde_json::from_value::<ReadyData>(payload.d.clone())
                                        {
                                            info!(
                                                session_id = %ready.session_id,
                                                user = %ready.user.username,
                                                "gateway session established"
                                            );
                                            *session = Some(Session {
                                                id: ready.session_id,
                                                resume_url: ready.resume_gateway_url,
                                            });
                                        }
                                    }
                                    if let Some(event) = parse_dispatch(event_type, payload.d) {
                                        if tx.send(event).await.is_err() {
                                            return Ok(NextStep::Shutdown);
                                        }
                                    }
                                }
                                OP_HEARTBEAT => {
                                    send_json(&mut sink, &json!({ "op": OP_HEARTBEAT, "d": seq }))
                                        .await?;
                                }
                                OP_RECONNECT => {
                                    debug!("server requested reconnect");
                                    return Ok(NextStep::Resume);
                                }
                                OP_INVALID_SESSION => {
                                    let resumable = payload.d.as_bool().unwrap_or(false);
                                    warn!(resumable, "gateway session invalidated");
                                    return Ok(if resumable {
                                        NextStep::Resume
                                    } else {
                                        NextStep::Reidentify
                                    });
                                }
                                OP_HEARTBEAT_ACK => {
                                    acked = true;
                                }
                                other => {
                                    debug!(op = other, "ignoring gateway opcode");
                                }
                            }
                        }
                        WsMessage::Ping(payload) => {
                            sink.send(WsMessage::Pong(payload))
                                .await
                                .map_err(|e| DiscordError::Gateway(e.to_string()))?;
                        }
                        WsMessage::Close(frame) => {
                            let detail = frame
                                .map(|f| format!("{} {}", u16::from(f.code), f.reason))
                                .unwrap_or_default();
                            warn!(close = %detail, "gateway closed connection");
                            return Ok(NextStep::Resume);
                        }
                        _ => {}
                    }
                }
            }
        }
    }
}

type WsStream = futures::stream::SplitStream<
    tokio_tungstenite::WebSocketStream<tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>>,
>;
type WsSink = futures::stream::SplitSink<
    tokio_tungstenite::WebSocketStream<tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>>,
    WsMessage,
>;

async fn read_payload(stream: &mut WsStream) -> Result<GatewayPayload> {
    loop {
        match stream.next().await {
            Some(Ok(WsMessage::Text(txt))) => {
                return serde_json::from_str(txt.as_str())
                    .map_err(|e| DiscordError::Gateway(format!("bad payload: {}", e)));
            }
            Some(Ok(WsMessage::Ping(_) | WsMessage::Pong(_))) => continue,
            Some(Ok(other)) => {
                return Err(DiscordError::Gateway(format!(
                    "unexpected frame during handshake: {:?}",
                    other
                )));
            }
            Some(Err(e)) => return Err(DiscordError::Gateway(e.to_string())),
            None => return Err(DiscordError::Gateway("stream ended during handshake".into())),
        }
    }
}

async fn send_json(sink: &mut WsSink, value: &Value) -> Result<()> {
    let text = serde_json::to_string(value).map_err(|e| DiscordError::Gateway(e.to_string()))?;
    sink.send(WsMessage::Text(text.into()))
        .await
        .map_err(|e| DiscordError::Gateway(e.to_string()))
}

/// Exponential backoff with jitter.
fn backoff_delay(attempt: usize) -> Duration {
    let base = 2u64.saturating_pow(attempt.min(6) as u32);
    let jitter = fastrand::u64(0..(base * 50 + 1));
    Duration::from_millis(200 * base + jitter)
}
