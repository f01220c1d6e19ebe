use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use regex::Regex;
use tokio::sync::mpsc;
use tracing::warn;

use castwatch_store::ChatEvent;
use castwatch_text::normalize::normalise;

/// Aggregate per-message signal accumulated across the whole chat log of a
/// livestream. Workers fold their slice of events into this under a mutex;
/// the rest of the report engine reads it once every worker has joined.
#[derive(Debug, Default)]
pub struct MessageMetrics {
    pub total_messages: i64,
    pub messages_with_emotes: i64,
    pub messages_multi_emote_only: i64,
    pub messages_from_apps: i64,
    pub unique_chatters: std::collections::HashSet<String>,
    pub body_occurrences: HashMap<String, i64>,
}

impl MessageMetrics {
    /// Total duplicate messages: for every normalised body seen more than
    /// once, every occurrence past the first counts as a duplicate.
    pub fn duplicate_messages_count(&self) -> i64 {
        self.body_occurrences
            .values()
            .filter(|&&count| count >= 2)
            .map(|&count| count - 1)
            .sum()
    }
}

fn emote_pattern() -> Regex {
    Regex::new(r"\[emote:\d+:\w+\]").expect("static emote pattern is valid")
}

fn multi_emote_only_pattern() -> Regex {
    Regex::new(r"^(\s*\[emote:\d+:\w+\]\s*)+$").expect("static multi-emote pattern is valid")
}

/// Fold a batch of events into the shared metrics accumulator. Run inside a
/// worker task; `app_senders` is matched case-sensitively against the
/// sender handle, as configured.
fn fold_batch(metrics: &Mutex<MessageMetrics>, events: &[ChatEvent], app_senders: &[String]) {
    let emote = emote_pattern();
    let multi_emote_only = multi_emote_only_pattern();

    let mut local = MessageMetrics::default();
    for event in events {
        local.total_messages += 1;
        local.unique_chatters.insert(event.sender_handle.clone());

        if app_senders.iter().any(|s| s == &event.sender_handle) {
            local.messages_from_apps += 1;
        }

        if emote.is_match(&event.body) {
            local.messages_with_emotes += 1;
        }
        if multi_emote_only.is_match(event.body.trim()) {
            local.messages_multi_emote_only += 1;
        }

        let key = normalise(&event.body);
        *local.body_occurrences.entry(key).or_insert(0) += 1;
    }

    let mut shared = metrics.lock().unwrap();
    shared.total_messages += local.total_messages;
    shared.messages_with_emotes += local.messages_with_emotes;
    shared.messages_multi_emote_only += local.messages_multi_emote_only;
    shared.messages_from_apps += local.messages_from_apps;
    shared.unique_chatters.extend(local.unique_chatters);
    for (key, count) in local.body_occurrences {
        *shared.body_occurrences.entry(key).or_insert(0) += count;
    }
}

/// Compute per-message metrics across a chat log using a bounded pool of
/// workers. Events are chunked and handed out over an mpsc channel; each
/// worker folds its chunks into the shared accumulator under a mutex, mirroring
/// the non-blocking fan-out a scheduler uses to route fired jobs to listeners.
pub async fn compute_message_metrics(
    events: Vec<ChatEvent>,
    worker_count: usize,
    app_senders: &[String],
) -> MessageMetrics {
    let worker_count = worker_count.max(1);
    let app_senders: Vec<String> = app_senders.to_vec();
    let metrics = Arc::new(Mutex::new(MessageMetrics::default()));

    if events.is_empty() {
        return Arc::try_unwrap(metrics).unwrap().into_inner().unwrap();
    }

    let chunk_size = (events.len() / worker_count).max(1);
    let (tx, rx) = mpsc::channel::<Vec<ChatEvent>>(worker_count.max(2));
    let rx = Arc::new(tokio::sync::Mutex::new(rx));

    let mut handles = Vec::with_capacity(worker_count);
    for _ in 0..worker_count {
        let rx = rx.clone();
        let metrics = metrics.clone();
        let app_senders = app_senders.clone();
        handles.push(tokio::spawn(async move {
            loop {
                let batch = {
                    let mut guard = rx.lock().await;
                    guard.recv().await
                };
                match batch {
                    Some(batch) => fold_batch(&metrics, &batch, &app_senders),
                    None => break,
                }
            }
        }));
    }

    for chunk in events.chunks(chunk_size) {
        if tx.send(chunk.to_vec()).await.is_err() {
            warn!("report metrics worker pool closed early");
            break;
        }
    }
    drop(tx);

    for handle in handles {
        if let Err(e) = handle.await {
            warn!(error = %e, "report metrics worker panicked");
        }
    }

    Arc::try_unwrap(metrics).unwrap().into_inner().unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(sender: &str, body: &str) -> ChatEvent {
        ChatEvent {
            id: uuid::Uuid::now_v7().to_string(),
            chatroom_id: 1,
            livestream_id: Some(500),
            sender_id: 1,
            sender_handle: sender.to_string(),
            event_tag: "ChatMessageEvent".to_string(),
            body: body.to_string(),
            metadata: "{}".to_string(),
            sent_at: "2026-03-04T12:00:00Z".to_string(),
            stored_at: "2026-03-04T12:00:00Z".to_string(),
        }
    }

    #[tokio::test]
    async fn counts_totals_and_unique_chatters() {
        let events = vec![
            event("alice", "hello"),
            event("bob", "hello"),
            event("alice", "hi"),
        ];
        let metrics = compute_message_metrics(events, 2, &[]).await;
        assert_eq!(metrics.total_messages, 3);
        assert_eq!(metrics.unique_chatters.len(), 2);
    }

    #[tokio::test]
    async fn detects_emotes_and_multi_emote_only() {
        let events = vec![
            event("alice", "nice play [emote:123:PogChamp]"),
            event("bob", "[emote:1:A] [emote:2:B]"),
            event("carol", "no emotes here"),
        ];
        let metrics = compute_message_metrics(events, 2, &[]).await;
        assert_eq!(metrics.messages_with_emotes, 2);
        assert_eq!(metrics.messages_multi_emote_only, 1);
    }

    #[tokio::test]
    async fn flags_app_senders_case_sensitively() {
        let events = vec![
            event("FossaBot", "welcome"),
            event("fossabot", "hi"),
            event("alice", "hey"),
        ];
        let metrics = compute_message_metrics(events, 2, &["fossabot".to_string()]).await;
        assert_eq!(metrics.messages_from_apps, 1);
    }

    #[tokio::test]
    async fn duplicate_count_sums_extra_occurrences_past_first() {
        let events = vec![
            event("alice", "buy now"),
            event("bob", "Buy   Now"),
            event("carol", "buy now"),
            event("dave", "unique message"),
        ];
        let metrics = compute_message_metrics(events, 3, &[]).await;
        assert_eq!(metrics.duplicate_messages_count(), 2);
    }

    #[tokio::test]
    async fn empty_log_yields_zeroed_metrics() {
        let metrics = compute_message_metrics(Vec::new(), 4, &[]).await;
        assert_eq!(metrics.total_messages, 0);
        assert_eq!(metrics.duplicate_messages_count(), 0);
    }
}
