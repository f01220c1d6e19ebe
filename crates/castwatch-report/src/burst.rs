use std::collections::{BTreeMap, HashSet};

use chrono::{DateTime, Duration, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};

use castwatch_core::config::BurstConfig;
use castwatch_store::ChatEvent;
use castwatch_text::{jaccard, normalise, unique_strings};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExactDuplicateBurst {
    pub username: String,
    pub content: String,
    pub count: usize,
    pub timestamps: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SimilarMessageBurst {
    pub username: String,
    pub pattern: String,
    pub count: usize,
    pub timestamps: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct SuspiciousChatter {
    pub username: String,
    pub tags: Vec<String>,
    pub message_timestamps: Vec<String>,
    pub example_messages: Vec<String>,
}

pub struct BurstFindings {
    pub exact_duplicate_bursts: Vec<ExactDuplicateBurst>,
    pub similar_message_bursts: Vec<SimilarMessageBurst>,
    pub suspicious_chatters: Vec<SuspiciousChatter>,
}

fn suspicious_username_pattern() -> Regex {
    Regex::new(
        r"(?i)(bot|spam|ad|free\s*vbucks|nude\s*link|crypto|follow|sub|cash|giveaway|win|join|discord|telegram|link|onlyfans|of|\d{5,}$)",
    )
    .expect("static suspicious-username pattern is valid")
}

struct Timed<'a> {
    event: &'a ChatEvent,
    at: DateTime<Utc>,
}

fn grouped_by_sender(events: &[ChatEvent]) -> BTreeMap<i64, Vec<Timed<'_>>> {
    let mut groups: BTreeMap<i64, Vec<Timed<'_>>> = BTreeMap::new();
    for event in events {
        if let Ok(at) = DateTime::parse_from_rfc3339(&event.sent_at) {
            groups
                .entry(event.sender_id)
                .or_default()
                .push(Timed { event, at: at.with_timezone(&Utc) });
        }
    }
    for group in groups.values_mut() {
        group.sort_by_key(|t| t.at);
    }
    groups
}

/// Greedy non-overlapping windowed scan: anchor at the first unclaimed
/// message, gather everyone within `window` of it that `matches` the anchor,
/// emit a burst if the group clears `min_count`, then advance past every
/// message just claimed (or by one position if the anchor didn't burst).
fn scan_bursts<'a, F>(
    messages: &[Timed<'a>],
    window: Duration,
    min_count: usize,
    matches: F,
) -> Vec<(Vec<&'a ChatEvent>, Vec<String>)>
where
    F: Fn(&ChatEvent, &ChatEvent) -> bool,
{
    let mut bursts = Vec::new();
    let mut i = 0;
    while i < messages.len() {
        let anchor = &messages[i];
        let mut members = vec![i];
        let mut j = i + 1;
        while j < messages.len() && messages[j].at - anchor.at <= window {
            if matches(anchor.event, messages[j].event) {
                members.push(j);
            }
            j += 1;
        }

        if members.len() >= min_count {
            let events: Vec<&ChatEvent> = members.iter().map(|&k| messages[k].event).collect();
            let timestamps: Vec<String> = members.iter().map(|&k| messages[k].event.sent_at.clone()).collect();
            bursts.push((events, timestamps));
            i += members.len();
        } else {
            i += 1;
        }
    }
    bursts
}

fn exact_duplicate_bursts_for_sender(messages: &[Timed<'_>], cfg: &BurstConfig) -> Vec<ExactDuplicateBurst> {
    let window = Duration::seconds(cfg.exact_duplicate_window_secs as i64);
    scan_bursts(messages, window, cfg.exact_duplicate_min_count, |a, b| {
        normalise(&a.body) == normalise(&b.body)
    })
    .into_iter()
    .map(|(events, timestamps)| ExactDuplicateBurst {
        username: events[0].sender_handle.clone(),
        content: events[0].body.clone(),
        count: events.len(),
        timestamps,
    })
    .collect()
}

fn similar_message_bursts_for_sender(messages: &[Timed<'_>], cfg: &BurstConfig) -> Vec<SimilarMessageBurst> {
    let window = Duration::seconds(cfg.similar_message_window_secs as i64);
    let threshold = cfg.similar_message_jaccard_threshold;
    scan_bursts(messages, window, cfg.similar_message_min_count, |a, b| {
        jaccard(&normalise(&a.body), &normalise(&b.body)) >= threshold
    })
    .into_iter()
    .map(|(events, timestamps)| {
        let texts: Vec<String> = events.iter().map(|e| e.body.clone()).collect();
        SimilarMessageBurst {
            username: events[0].sender_handle.clone(),
            pattern: unique_strings(&texts).join(" / "),
            count: events.len(),
            timestamps,
        }
    })
    .collect()
}

/// Cap on how many example messages a suspicious-chatter record carries.
const MAX_EXAMPLE_MESSAGES: usize = 5;

fn rapid_fire_for_sender(messages: &[Timed<'_>], cfg: &BurstConfig) -> Option<SuspiciousChatter> {
    let window = Duration::seconds(cfg.rapid_fire_window_secs as i64);
    let hits = scan_bursts(messages, window, cfg.rapid_fire_min_count, |_, _| true);
    if hits.is_empty() {
        return None;
    }
    let username = messages[0].event.sender_handle.clone();
    let mut message_timestamps = Vec::new();
    let mut example_messages = Vec::new();
    for (events, timestamps) in &hits {
        message_timestamps.extend(timestamps.iter().cloned());
        example_messages.extend(events.iter().map(|e| e.body.clone()));
    }
    dedupe_and_cap(&mut example_messages, MAX_EXAMPLE_MESSAGES);
    Some(SuspiciousChatter {
        username,
        tags: vec!["rapid_message_bursts".to_string()],
        message_timestamps,
        example_messages,
    })
}

fn dedupe_and_cap(items: &mut Vec<String>, cap: usize) {
    let unique = unique_strings(items);
    *items = unique.into_iter().take(cap).collect();
}

fn merge_chatter(into: &mut Vec<SuspiciousChatter>, addition: SuspiciousChatter) {
    if let Some(existing) = into.iter_mut().find(|c| c.username == addition.username) {
        for tag in addition.tags {
            if !existing.tags.contains(&tag) {
                existing.tags.push(tag);
            }
        }
        existing.message_timestamps.extend(addition.message_timestamps);
        existing.message_timestamps = unique_strings(&existing.message_timestamps);
        existing.example_messages.extend(addition.example_messages);
        dedupe_and_cap(&mut existing.example_messages, MAX_EXAMPLE_MESSAGES);
    } else {
        into.push(addition);
    }
}

/// Run all three burst passes plus the suspicious-username scan over a
/// livestream's chat log, grouped per sender and ordered by send time.
pub fn detect_bursts(events: &[ChatEvent], cfg: &BurstConfig) -> BurstFindings {
    let groups = grouped_by_sender(events);
    let username_pattern = suspicious_username_pattern();

    let mut exact_duplicate_bursts = Vec::new();
    let mut similar_message_bursts = Vec::new();
    let mut suspicious_chatters: Vec<SuspiciousChatter> = Vec::new();
    let mut seen_usernames: HashSet<String> = HashSet::new();

    for messages in groups.values() {
        if messages.is_empty() {
            continue;
        }
        exact_duplicate_bursts.extend(exact_duplicate_bursts_for_sender(messages, cfg));
        similar_message_bursts.extend(similar_message_bursts_for_sender(messages, cfg));
        if let Some(chatter) = rapid_fire_for_sender(messages, cfg) {
            merge_chatter(&mut suspicious_chatters, chatter);
        }

        let username = &messages[0].event.sender_handle;
        if seen_usernames.insert(username.clone()) && username_pattern.is_match(username) {
            merge_chatter(
                &mut suspicious_chatters,
                SuspiciousChatter {
                    username: username.clone(),
                    tags: vec!["suspicious_username".to_string()],
                    message_timestamps: Vec::new(),
                    example_messages: Vec::new(),
                },
            );
        }
    }

    exact_duplicate_bursts.sort_by(|a, b| b.count.cmp(&a.count));
    similar_message_bursts.sort_by(|a, b| b.count.cmp(&a.count));

    BurstFindings {
        exact_duplicate_bursts,
        similar_message_bursts,
        suspicious_chatters,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg() -> BurstConfig {
        BurstConfig {
            exact_duplicate_window_secs: 5,
            exact_duplicate_min_count: 3,
            similar_message_window_secs: 10,
            similar_message_min_count: 4,
            similar_message_jaccard_threshold: 0.7,
            rapid_fire_window_secs: 3,
            rapid_fire_min_count: 5,
        }
    }

    fn event(sender_id: i64, handle: &str, body: &str, secs: i64) -> ChatEvent {
        ChatEvent {
            id: uuid::Uuid::now_v7().to_string(),
            chatroom_id: 1,
            livestream_id: Some(500),
            sender_id,
            sender_handle: handle.to_string(),
            event_tag: "ChatMessageEvent".to_string(),
            body: body.to_string(),
            metadata: "{}".to_string(),
            sent_at: format!("2026-03-04T12:00:{:02}Z", secs),
            stored_at: format!("2026-03-04T12:00:{:02}Z", secs),
        }
    }

    #[test]
    fn exact_duplicate_burst_detected_within_window() {
        let events = vec![
            event(1, "alice", "buy now", 0),
            event(1, "alice", "buy now", 1),
            event(1, "alice", "buy now", 2),
        ];
        let findings = detect_bursts(&events, &cfg());
        assert_eq!(findings.exact_duplicate_bursts.len(), 1);
        assert_eq!(findings.exact_duplicate_bursts[0].count, 3);
    }

    #[test]
    fn similar_message_burst_detected_on_reordered_tokens() {
        let events = vec![
            event(1, "alice", "buy now link", 0),
            event(1, "alice", "buy link now", 2),
            event(1, "alice", "now buy link", 4),
            event(1, "alice", "link buy now", 6),
        ];
        let findings = detect_bursts(&events, &cfg());
        assert_eq!(findings.similar_message_bursts.len(), 1);
        assert_eq!(findings.similar_message_bursts[0].count, 4);
    }

    #[test]
    fn rapid_fire_marks_sender_suspicious() {
        let events = vec![
            event(1, "alice", "a", 0),
            event(1, "alice", "b", 1),
            event(1, "alice", "c", 1),
            event(1, "alice", "d", 2),
            event(1, "alice", "e", 2),
        ];
        let findings = detect_bursts(&events, &cfg());
        assert_eq!(findings.suspicious_chatters.len(), 1);
        assert!(findings.suspicious_chatters[0].tags.contains(&"rapid_message_bursts".to_string()));
        assert_eq!(findings.suspicious_chatters[0].example_messages.len(), 5);
    }

    #[test]
    fn rapid_fire_example_messages_are_capped_and_deduped_on_merge() {
        let mut events = vec![
            event(1, "alice", "dup", 0),
            event(1, "alice", "dup", 1),
            event(1, "alice", "c", 1),
            event(1, "alice", "d", 2),
            event(1, "alice", "e", 2),
        ];
        // A second rapid-fire hit further out, repeating one prior body.
        events.extend([
            event(1, "alice", "dup", 10),
            event(1, "alice", "f", 11),
            event(1, "alice", "g", 11),
            event(1, "alice", "h", 12),
            event(1, "alice", "i", 12),
        ]);
        let findings = detect_bursts(&events, &cfg());
        assert_eq!(findings.suspicious_chatters.len(), 1);
        let examples = &findings.suspicious_chatters[0].example_messages;
        assert!(examples.len() <= 5);
        let unique: std::collections::HashSet<_> = examples.iter().collect();
        assert_eq!(unique.len(), examples.len());
    }

    #[test]
    fn suspicious_username_is_flagged_case_insensitively() {
        let events = vec![event(1, "Free_Crypto_Giveaway", "hi", 0)];
        let findings = detect_bursts(&events, &cfg());
        assert_eq!(findings.suspicious_chatters.len(), 1);
        assert!(findings.suspicious_chatters[0].tags.contains(&"suspicious_username".to_string()));
    }

    #[test]
    fn multiple_signals_merge_tags_on_one_chatter() {
        let mut events = vec![event(1, "cryptobot", "a", 0)];
        for i in 1..5 {
            events.push(event(1, "cryptobot", &format!("msg{}", i), i));
        }
        let findings = detect_bursts(&events, &cfg());
        assert_eq!(findings.suspicious_chatters.len(), 1);
        assert!(findings.suspicious_chatters[0].tags.contains(&"rapid_message_bursts".to_string()));
        assert!(findings.suspicious_chatters[0].tags.contains(&"suspicious_username".to_string()));
    }

    #[test]
    fn below_threshold_counts_produce_no_bursts() {
        let events = vec![event(1, "alice", "buy now", 0), event(1, "alice", "buy now", 1)];
        let findings = detect_bursts(&events, &cfg());
        assert!(findings.exact_duplicate_bursts.is_empty());
    }
}
