use std::fmt;
use std::sync::Arc;
use std::time::Duration as StdDuration;

use castwatch_registry::LiveRegistry;
use castwatch_store::{CastwatchStore, ChatEvent};
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use futures_util::{SinkExt, StreamExt};
use serde::Deserialize;
use tokio_tungstenite::tungstenite::Message;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

const SUBSCRIPTION_SUCCEEDED: &str = "pusher_internal:subscription_succeeded";
const CHAT_MESSAGE_EVENT_TAG: &str = "App\\Events\\ChatMessageEvent";
const UPSTREAM_CHAT_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%:z";

#[derive(Debug)]
enum SessionError {
    DialFailed(String),
    Io(String),
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::DialFailed(e) => write!(f, "dial failed: {e}"),
            SessionError::Io(e) => write!(f, "transport error: {e}"),
        }
    }
}

/// Long-lived push-messaging subscription for one channel's chatroom.
///
/// State machine: Dialing -> Subscribing -> Streaming, with a 5s retry on
/// initial dial failure and a 1s retry on any read/write failure once
/// connected. Runs until `cancel` fires.
#[allow(clippy::too_many_arguments)]
pub async fn run_chat_subscriber(
    store: Arc<CastwatchStore>,
    registry: Arc<LiveRegistry>,
    transport_url: String,
    channel_id: i64,
    chatroom_id: i64,
    poll_interval: ChronoDuration,
    freshness_leeway: ChronoDuration,
    reconnect_delay: StdDuration,
    dial_retry_delay: StdDuration,
    cancel: CancellationToken,
) {
    info!(channel_id, chatroom_id, "chat subscriber started");

    loop {
        if cancel.is_cancelled() {
            break;
        }

        let result = run_session(
            &store,
            &registry,
            &transport_url,
            channel_id,
            chatroom_id,
            poll_interval,
            freshness_leeway,
            &cancel,
        )
        .await;

        match result {
            Ok(()) => break,
            Err(e) => {
                let delay = match e {
                    SessionError::DialFailed(_) => dial_retry_delay,
                    SessionError::Io(_) => reconnect_delay,
                };
                warn!(channel_id, error = %e, delay_secs = delay.as_secs(), "chat session ended, reconnecting");
                tokio::select! {
                    _ = tokio::time::sleep(delay) => {}
                    _ = cancel.cancelled() => break,
                }
            }
        }
    }

    info!(channel_id, "chat subscriber stopped");
}

#[allow(clippy::too_many_arguments)]
async fn run_session(
    store: &CastwatchStore,
    registry: &LiveRegistry,
    transport_url: &str,
    channel_id: i64,
    chatroom_id: i64,
    poll_interval: ChronoDuration,
    freshness_leeway: ChronoDuration,
    cancel: &CancellationToken,
) -> Result<(), SessionError> {
    let (ws_stream, _) = tokio_tungstenite::connect_async(transport_url)
        .await
        .map_err(|e| SessionError::DialFailed(e.to_string()))?;
    let (mut write, mut read) = ws_stream.split();

    let subscribe = serde_json::json!({
        "event": "pusher:subscribe",
        "data": { "auth": "", "channel": format!("chatrooms.{}.v2", chatroom_id) }
    });
    write
        .send(Message::Text(subscribe.to_string()))
        .await
        .map_err(|e| SessionError::Io(e.to_string()))?;

    loop {
        tokio::select! {
            msg = read.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        handle_frame(store, registry, channel_id, chatroom_id, poll_interval, freshness_leeway, &text);
                    }
                    Some(Ok(Message::Ping(_))) | Some(Ok(Message::Pong(_))) => {}
                    Some(Ok(Message::Close(_))) | None => {
                        return Err(SessionError::Io("connection closed by peer".to_string()));
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => return Err(SessionError::Io(e.to_string())),
                }
            }
            _ = cancel.cancelled() => return Ok(()),
        }
    }
}

#[derive(Debug, Deserialize)]
struct PusherFrame {
    event: String,
    #[serde(default)]
    data: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatMessageData {
    id: String,
    #[serde(default, rename = "type")]
    msg_type: Option<String>,
    content: String,
    created_at: String,
    sender: ChatSender,
}

#[derive(Debug, Deserialize)]
struct ChatSender {
    id: i64,
    username: String,
}

fn handle_frame(
    store: &CastwatchStore,
    registry: &LiveRegistry,
    channel_id: i64,
    chatroom_id: i64,
    poll_interval: ChronoDuration,
    freshness_leeway: ChronoDuration,
    raw: &str,
) {
    let frame: PusherFrame = match serde_json::from_str(raw) {
        Ok(f) => f,
        Err(e) => {
            warn!(channel_id, error = %e, "malformed chat transport frame, ignoring");
            return;
        }
    };

    if frame.event == SUBSCRIPTION_SUCCEEDED {
        info!(channel_id, chatroom_id, "chat subscription acknowledged");
        return;
    }

    if frame.event != CHAT_MESSAGE_EVENT_TAG {
        return;
    }

    let Some(data_str) = frame.data else {
        return;
    };

    let message: ChatMessageData = match serde_json::from_str(&data_str) {
        Ok(m) => m,
        Err(e) => {
            warn!(channel_id, error = %e, "could not parse chat message payload, dropping");
            return;
        }
    };

    if uuid::Uuid::parse_str(&message.id).is_err() {
        warn!(channel_id, id = %message.id, "chat message id is not a valid UUID, dropping");
        return;
    }

    let sent_at = match parse_chat_time(&message.created_at) {
        Some(t) => t,
        None => {
            warn!(channel_id, raw = %message.created_at, "could not parse chat message timestamp, dropping");
            return;
        }
    };

    let now = Utc::now();
    let livestream_id = registry.attribute(channel_id, now, poll_interval, freshness_leeway);

    let event = ChatEvent {
        id: message.id,
        chatroom_id,
        livestream_id,
        sender_id: message.sender.id,
        sender_handle: message.sender.username,
        event_tag: message.msg_type.unwrap_or_else(|| "message".to_string()),
        body: message.content,
        metadata: "{}".to_string(),
        sent_at: sent_at.to_rfc3339(),
        stored_at: now.to_rfc3339(),
    };

    if let Err(e) = store.insert_chat_event(event) {
        warn!(channel_id, error = %e, "failed to persist chat event");
    }
}

fn parse_chat_time(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_str(raw, UPSTREAM_CHAT_TIME_FORMAT)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.with_timezone(&Utc)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_chat_timestamp_with_offset() {
        let parsed = parse_chat_time("2026-03-04T12:00:00+00:00").unwrap();
        assert_eq!(parsed.to_rfc3339(), "2026-03-04T12:00:00+00:00");
    }

    #[test]
    fn rejects_malformed_chat_timestamp() {
        assert!(parse_chat_time("not-a-timestamp").is_none());
    }
}
