use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MonitoredChannel {
    pub channel_id: i64,
    pub chatroom_id: i64,
    pub username: String,
    pub is_active: bool,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChannelSnapshot {
    pub id: String,
    pub channel_id: i64,
    pub raw_json: String,
    pub captured_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LivestreamSnapshot {
    pub channel_id: i64,
    pub livestream_id: i64,
    pub captured_at: String,
    pub slug: String,
    pub start_time: String,
    pub session_title: String,
    pub viewer_count: i64,
    pub livestream_created_at: String,
    /// Opaque JSON array of tags.
    pub tags: String,
    pub is_live: bool,
    pub duration_seconds: i64,
    pub lang_iso: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatEvent {
    pub id: String,
    pub chatroom_id: i64,
    pub livestream_id: Option<i64>,
    pub sender_id: i64,
    pub sender_handle: String,
    pub event_tag: String,
    pub body: String,
    /// Opaque JSON object of any extra fields the event carried.
    pub metadata: String,
    pub sent_at: String,
    pub stored_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LivestreamReport {
    pub id: String,
    pub livestream_id: i64,
    pub channel_id: i64,
    pub username: String,
    pub title: String,
    pub window_start: String,
    pub window_end: String,
    pub duration_minutes: i64,
    pub avg_viewers: f64,
    pub peak_viewers: i64,
    pub lowest_viewers: i64,
    pub engagement_pct: f64,
    pub hours_watched: f64,
    pub total_messages: i64,
    pub unique_chatters: i64,
    pub messages_from_apps: i64,
    pub spam_report_id: Option<String>,
    /// Opaque JSON array of `{t, count}`.
    pub viewer_series: String,
    /// Opaque JSON array of `{t, count}`.
    pub message_series: String,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SpamReport {
    pub id: String,
    pub livestream_report_id: Option<String>,
    pub channel_id: i64,
    pub livestream_id: i64,
    pub messages_with_emotes: i64,
    pub messages_multi_emote_only: i64,
    pub duplicate_messages_count: i64,
    pub repetitive_phrases_count: i64,
    /// Opaque JSON array of exact-duplicate burst records.
    pub exact_duplicate_bursts: String,
    /// Opaque JSON array of similar-message burst records.
    pub similar_message_bursts: String,
    /// Opaque JSON array of suspicious-chatter records.
    pub suspicious_chatters: String,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StreamerProfile {
    pub channel_id: i64,
    pub username: String,
    pub verified: bool,
    pub is_banned: bool,
    pub vod_enabled: bool,
    pub is_affiliate: bool,
    pub subscription_enabled: bool,
    /// Opaque JSON array of `{captured_at, followers_count}`, re-derived from
    /// every historical channel snapshot each time the profile is rebuilt.
    pub followers_series: String,
    /// Opaque JSON array of report ids, duplicate-free, time-ordered.
    pub livestream_report_ids: String,
    pub bio: String,
    pub city: String,
    pub state: String,
    pub country: String,
    /// Opaque JSON object.
    pub socials: String,
    pub profile_pic: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}
