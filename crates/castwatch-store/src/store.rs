use std::sync::Mutex;

use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use tracing::instrument;

use castwatch_core::RecordId;

use crate::db::init_db;
use crate::error::{is_unique_violation, Result, StoreError};
use crate::types::{
    ChannelSnapshot, ChatEvent, LivestreamReport, LivestreamSnapshot, MonitoredChannel,
    SpamReport, StreamerProfile,
};

/// Persistence gateway for every entity this system tracks.
///
/// A single `Mutex<Connection>` is sufficient for the single-node deployment
/// target this crate assumes — there is no multi-writer contention to hide
/// behind a connection pool.
pub struct CastwatchStore {
    conn: Mutex<Connection>,
}

impl CastwatchStore {
    pub fn open(path: &str) -> Result<Self> {
        let conn = Connection::open(path)?;
        init_db(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        init_db(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    // --- monitored channels -------------------------------------------------

    #[instrument(skip(self))]
    pub fn insert_channel(
        &self,
        channel_id: i64,
        chatroom_id: i64,
        username: &str,
        is_active: bool,
    ) -> Result<MonitoredChannel> {
        let conn = self.conn.lock().unwrap();
        let now = Utc::now().to_rfc3339();
        let result = conn.execute(
            "INSERT INTO monitored_channels
             (channel_id, chatroom_id, username, is_active, created_at, updated_at)
             VALUES (?1,?2,?3,?4,?5,?5)",
            params![channel_id, chatroom_id, username, is_active as i32, now],
        );

        match result {
            Ok(_) => Ok(MonitoredChannel {
                channel_id,
                chatroom_id,
                username: username.to_string(),
                is_active,
                created_at: now.clone(),
                updated_at: now,
            }),
            Err(e) if is_unique_violation(&e) => Err(StoreError::Conflict(format!(
                "channel {} or chatroom {} already monitored",
                channel_id, chatroom_id
            ))),
            Err(e) => Err(e.into()),
        }
    }

    pub fn find_channel_by_username(&self, username: &str) -> Result<Option<MonitoredChannel>> {
        let conn = self.conn.lock().unwrap();
        conn.query_row(
            "SELECT channel_id, chatroom_id, username, is_active, created_at, updated_at
             FROM monitored_channels WHERE username = ?1",
            [username],
            row_to_channel,
        )
        .optional()
        .map_err(Into::into)
    }

    pub fn find_channel_by_chatroom_id(&self, chatroom_id: i64) -> Result<Option<MonitoredChannel>> {
        let conn = self.conn.lock().unwrap();
        conn.query_row(
            "SELECT channel_id, chatroom_id, username, is_active, created_at, updated_at
             FROM monitored_channels WHERE chatroom_id = ?1",
            [chatroom_id],
            row_to_channel,
        )
        .optional()
        .map_err(Into::into)
    }

    pub fn find_channel_by_id(&self, channel_id: i64) -> Result<Option<MonitoredChannel>> {
        let conn = self.conn.lock().unwrap();
        conn.query_row(
            "SELECT channel_id, chatroom_id, username, is_active, created_at, updated_at
             FROM monitored_channels WHERE channel_id = ?1",
            [channel_id],
            row_to_channel,
        )
        .optional()
        .map_err(Into::into)
    }

    pub fn list_active_channels(&self) -> Result<Vec<MonitoredChannel>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT channel_id, chatroom_id, username, is_active, created_at, updated_at
             FROM monitored_channels WHERE is_active = 1",
        )?;
        let rows = stmt
            .query_map([], row_to_channel)?
            .filter_map(|r| r.ok())
            .collect();
        Ok(rows)
    }

    #[instrument(skip(self))]
    pub fn set_channel_active(&self, channel_id: i64, is_active: bool) -> Result<MonitoredChannel> {
        let conn = self.conn.lock().unwrap();
        let now = Utc::now().to_rfc3339();
        let n = conn.execute(
            "UPDATE monitored_channels SET is_active = ?1, updated_at = ?2 WHERE channel_id = ?3",
            params![is_active as i32, now, channel_id],
        )?;
        if n == 0 {
            return Err(StoreError::NotFound(format!(
                "channel {} not monitored",
                channel_id
            )));
        }
        drop(conn);
        self.find_channel_by_id(channel_id)?
            .ok_or_else(|| StoreError::NotFound(format!("channel {} not monitored", channel_id)))
    }

    // --- channel snapshots ---------------------------------------------------

    #[instrument(skip(self, raw_json))]
    pub fn insert_channel_snapshot(&self, channel_id: i64, raw_json: &str) -> Result<ChannelSnapshot> {
        let conn = self.conn.lock().unwrap();
        let id = RecordId::new().to_string();
        let now = Utc::now().to_rfc3339();
        conn.execute(
            "INSERT INTO channel_snapshots (id, channel_id, raw_json, captured_at)
             VALUES (?1,?2,?3,?4)",
            params![id, channel_id, raw_json, now],
        )?;
        Ok(ChannelSnapshot {
            id,
            channel_id,
            raw_json: raw_json.to_string(),
            captured_at: now,
        })
    }

    /// All historical snapshots for a channel, ascending by capture time —
    /// the profile builder re-derives the followers series from this on
    /// every poll.
    pub fn list_channel_snapshots(&self, channel_id: i64) -> Result<Vec<ChannelSnapshot>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT id, channel_id, raw_json, captured_at FROM channel_snapshots
             WHERE channel_id = ?1 ORDER BY captured_at ASC",
        )?;
        let rows = stmt
            .query_map([channel_id], |row| {
                Ok(ChannelSnapshot {
                    id: row.get(0)?,
                    channel_id: row.get(1)?,
                    raw_json: row.get(2)?,
                    captured_at: row.get(3)?,
                })
            })?
            .filter_map(|r| r.ok())
            .collect();
        Ok(rows)
    }

    // --- livestream snapshots -------------------------------------------------

    #[instrument(skip(self, snapshot))]
    pub fn insert_livestream_snapshot(&self, snapshot: LivestreamSnapshot) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT OR REPLACE INTO livestream_snapshots
             (channel_id, livestream_id, captured_at, slug, start_time, session_title,
              viewer_count, livestream_created_at, tags, is_live, duration_seconds, lang_iso)
             VALUES (?1,?2,?3,?4,?5,?6,?7,?8,?9,?10,?11,?12)",
            params![
                snapshot.channel_id,
                snapshot.livestream_id,
                snapshot.captured_at,
                snapshot.slug,
                snapshot.start_time,
                snapshot.session_title,
                snapshot.viewer_count,
                snapshot.livestream_created_at,
                snapshot.tags,
                snapshot.is_live as i32,
                snapshot.duration_seconds,
                snapshot.lang_iso,
            ],
        )?;
        Ok(())
    }

    pub fn list_livestream_snapshots_in_range(
        &self,
        channel_id: i64,
        lo: &str,
        hi: &str,
    ) -> Result<Vec<LivestreamSnapshot>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT channel_id, livestream_id, captured_at, slug, start_time, session_title,
                    viewer_count, livestream_created_at, tags, is_live, duration_seconds, lang_iso
             FROM livestream_snapshots
             WHERE channel_id = ?1 AND captured_at BETWEEN ?2 AND ?3
             ORDER BY captured_at ASC",
        )?;
        let rows = stmt
            .query_map(params![channel_id, lo, hi], row_to_livestream_snapshot)?
            .filter_map(|r| r.ok())
            .collect();
        Ok(rows)
    }

    /// Latest snapshot recorded for a given livestream id — the
    /// window-function-equivalent "most recent row per partition" query,
    /// expressed as an ORDER BY + LIMIT 1 since SQLite's window functions
    /// would otherwise require materialising the whole partition anyway.
    pub fn latest_livestream_snapshot(&self, livestream_id: i64) -> Result<Option<LivestreamSnapshot>> {
        let conn = self.conn.lock().unwrap();
        conn.query_row(
            "SELECT channel_id, livestream_id, captured_at, slug, start_time, session_title,
                    viewer_count, livestream_created_at, tags, is_live, duration_seconds, lang_iso
             FROM livestream_snapshots
             WHERE livestream_id = ?1
             ORDER BY captured_at DESC LIMIT 1",
            [livestream_id],
            row_to_livestream_snapshot,
        )
        .optional()
        .map_err(Into::into)
    }

    // --- chat events -----------------------------------------------------------

    #[instrument(skip(self, event))]
    pub fn insert_chat_event(&self, event: ChatEvent) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        let result = conn.execute(
            "INSERT INTO chat_events
             (id, chatroom_id, livestream_id, sender_id, sender_handle, event_tag, body,
              metadata, sent_at, stored_at)
             VALUES (?1,?2,?3,?4,?5,?6,?7,?8,?9,?10)",
            params![
                event.id,
                event.chatroom_id,
                event.livestream_id,
                event.sender_id,
                event.sender_handle,
                event.event_tag,
                event.body,
                event.metadata,
                event.sent_at,
                event.stored_at,
            ],
        );
        match result {
            Ok(_) => Ok(()),
            // Duplicate delivery of the same chat-transport frame is expected
            // on reconnect; treat re-insertion of a known id as a no-op.
            Err(e) if is_unique_violation(&e) => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    pub fn list_chat_events_for_livestream(&self, livestream_id: i64) -> Result<Vec<ChatEvent>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT id, chatroom_id, livestream_id, sender_id, sender_handle, event_tag, body,
                    metadata, sent_at, stored_at
             FROM chat_events WHERE livestream_id = ?1 ORDER BY sent_at ASC",
        )?;
        let rows = stmt
            .query_map([livestream_id], row_to_chat_event)?
            .filter_map(|r| r.ok())
            .collect();
        Ok(rows)
    }

    /// Minimum and maximum `sent_at` for a livestream's chat events, used to
    /// derive the report window. `None` when there are no events.
    pub fn chat_event_time_bounds(&self, livestream_id: i64) -> Result<Option<(String, String)>> {
        let conn = self.conn.lock().unwrap();
        conn.query_row(
            "SELECT MIN(sent_at), MAX(sent_at) FROM chat_events WHERE livestream_id = ?1",
            [livestream_id],
            |row| {
                let lo: Option<String> = row.get(0)?;
                let hi: Option<String> = row.get(1)?;
                Ok(lo.zip(hi))
            },
        )
        .map_err(Into::into)
    }

    // --- streamer profiles -----------------------------------------------------

    #[instrument(skip(self, profile))]
    pub fn upsert_streamer_profile(&self, profile: StreamerProfile) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO streamer_profiles
             (channel_id, username, verified, is_banned, vod_enabled, is_affiliate,
              subscription_enabled, followers_series, livestream_report_ids, bio, city,
              state, country, socials, profile_pic, created_at, updated_at)
             VALUES (?1,?2,?3,?4,?5,?6,?7,?8,?9,?10,?11,?12,?13,?14,?15,?16,?16)
             ON CONFLICT(channel_id) DO UPDATE SET
                username = excluded.username,
                verified = excluded.verified,
                is_banned = excluded.is_banned,
                vod_enabled = excluded.vod_enabled,
                is_affiliate = excluded.is_affiliate,
                subscription_enabled = excluded.subscription_enabled,
                followers_series = excluded.followers_series,
                bio = excluded.bio,
                city = excluded.city,
                state = excluded.state,
                country = excluded.country,
                socials = excluded.socials,
                profile_pic = excluded.profile_pic,
                updated_at = excluded.updated_at",
            params![
                profile.channel_id,
                profile.username,
                profile.verified as i32,
                profile.is_banned as i32,
                profile.vod_enabled as i32,
                profile.is_affiliate as i32,
                profile.subscription_enabled as i32,
                profile.followers_series,
                profile.livestream_report_ids,
                profile.bio,
                profile.city,
                profile.state,
                profile.country,
                profile.socials,
                profile.profile_pic,
                profile.created_at,
            ],
        )?;
        Ok(())
    }

    pub fn get_streamer_profile(&self, channel_id: i64) -> Result<Option<StreamerProfile>> {
        let conn = self.conn.lock().unwrap();
        conn.query_row(
            "SELECT channel_id, username, verified, is_banned, vod_enabled, is_affiliate,
                    subscription_enabled, followers_series, livestream_report_ids, bio, city,
                    state, country, socials, profile_pic, created_at, updated_at
             FROM streamer_profiles WHERE channel_id = ?1",
            [channel_id],
            row_to_profile,
        )
        .optional()
        .map_err(Into::into)
    }

    /// Every report id recorded for a channel, oldest-first by
    /// `window_start` — the profile builder re-derives
    /// `livestream_report_ids` from this on every rebuild, the same way it
    /// re-derives `followers_series` from the channel snapshot history.
    pub fn list_livestream_report_ids_for_channel(&self, channel_id: i64) -> Result<Vec<String>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT id FROM livestream_reports WHERE channel_id = ?1 ORDER BY window_start ASC",
        )?;
        let rows = stmt
            .query_map([channel_id], |row| row.get(0))?
            .filter_map(|r| r.ok())
            .collect();
        Ok(rows)
    }

    #[instrument(skip(self))]
    pub fn append_profile_livestream_report_id(&self, channel_id: i64, report_id: &str) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        let existing: Option<String> = conn
            .query_row(
                "SELECT livestream_report_ids FROM streamer_profiles WHERE channel_id = ?1",
                [channel_id],
                |row| row.get(0),
            )
            .optional()?;

        let Some(existing) = existing else {
            return Err(StoreError::NotFound(format!(
                "no streamer profile for channel {}",
                channel_id
            )));
        };

        let mut ids: Vec<String> = serde_json::from_str(&existing)?;
        if !ids.iter().any(|id| id == report_id) {
            ids.push(report_id.to_string());
        }
        let now = Utc::now().to_rfc3339();
        conn.execute(
            "UPDATE streamer_profiles SET livestream_report_ids = ?1, updated_at = ?2
             WHERE channel_id = ?3",
            params![serde_json::to_string(&ids)?, now, channel_id],
        )?;
        Ok(())
    }

    // --- reports -----------------------------------------------------------------

    #[instrument(skip(self, report))]
    pub fn insert_spam_report(&self, report: SpamReport) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO spam_reports
             (id, livestream_report_id, channel_id, livestream_id, messages_with_emotes,
              messages_multi_emote_only, duplicate_messages_count, repetitive_phrases_count,
              exact_duplicate_bursts, similar_message_bursts, suspicious_chatters, created_at)
             VALUES (?1,?2,?3,?4,?5,?6,?7,?8,?9,?10,?11,?12)",
            params![
                report.id,
                report.livestream_report_id,
                report.channel_id,
                report.livestream_id,
                report.messages_with_emotes,
                report.messages_multi_emote_only,
                report.duplicate_messages_count,
                report.repetitive_phrases_count,
                report.exact_duplicate_bursts,
                report.similar_message_bursts,
                report.suspicious_chatters,
                report.created_at,
            ],
        )?;
        Ok(())
    }

    #[instrument(skip(self, report))]
    pub fn insert_livestream_report(&self, report: LivestreamReport) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO livestream_reports
             (id, livestream_id, channel_id, username, title, window_start, window_end,
              duration_minutes, avg_viewers, peak_viewers, lowest_viewers, engagement_pct,
              hours_watched, total_messages, unique_chatters, messages_from_apps,
              spam_report_id, viewer_series, message_series, created_at)
             VALUES (?1,?2,?3,?4,?5,?6,?7,?8,?9,?10,?11,?12,?13,?14,?15,?16,?17,?18,?19,?20)",
            params![
                report.id,
                report.livestream_id,
                report.channel_id,
                report.username,
                report.title,
                report.window_start,
                report.window_end,
                report.duration_minutes,
                report.avg_viewers,
                report.peak_viewers,
                report.lowest_viewers,
                report.engagement_pct,
                report.hours_watched,
                report.total_messages,
                report.unique_chatters,
                report.messages_from_apps,
                report.spam_report_id,
                report.viewer_series,
                report.message_series,
                report.created_at,
            ],
        )?;
        Ok(())
    }

    #[instrument(skip(self))]
    pub fn set_spam_report_livestream_report_id(
        &self,
        spam_report_id: &str,
        livestream_report_id: &str,
    ) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        let n = conn.execute(
            "UPDATE spam_reports SET livestream_report_id = ?1 WHERE id = ?2",
            params![livestream_report_id, spam_report_id],
        )?;
        if n == 0 {
            return Err(StoreError::NotFound(format!(
                "spam report {} not found",
                spam_report_id
            )));
        }
        Ok(())
    }
}

fn row_to_channel(row: &rusqlite::Row<'_>) -> rusqlite::Result<MonitoredChannel> {
    Ok(MonitoredChannel {
        channel_id: row.get(0)?,
        chatroom_id: row.get(1)?,
        username: row.get(2)?,
        is_active: row.get::<_, i32>(3)? != 0,
        created_at: row.get(4)?,
        updated_at: row.get(5)?,
    })
}

fn row_to_livestream_snapshot(row: &rusqlite::Row<'_>) -> rusqlite::Result<LivestreamSnapshot> {
    Ok(LivestreamSnapshot {
        channel_id: row.get(0)?,
        livestream_id: row.get(1)?,
        captured_at: row.get(2)?,
        slug: row.get(3)?,
        start_time: row.get(4)?,
        session_title: row.get(5)?,
        viewer_count: row.get(6)?,
        livestream_created_at: row.get(7)?,
        tags: row.get(8)?,
        is_live: row.get::<_, i32>(9)? != 0,
        duration_seconds: row.get(10)?,
        lang_iso: row.get(11)?,
    })
}

fn row_to_chat_event(row: &rusqlite::Row<'_>) -> rusqlite::Result<ChatEvent> {
    Ok(ChatEvent {
        id: row.get(0)?,
        chatroom_id: row.get(1)?,
        livestream_id: row.get(2)?,
        sender_id: row.get(3)?,
        sender_handle: row.get(4)?,
        event_tag: row.get(5)?,
        body: row.get(6)?,
        metadata: row.get(7)?,
        sent_at: row.get(8)?,
        stored_at: row.get(9)?,
    })
}

fn row_to_profile(row: &rusqlite::Row<'_>) -> rusqlite::Result<StreamerProfile> {
    Ok(StreamerProfile {
        channel_id: row.get(0)?,
        username: row.get(1)?,
        verified: row.get::<_, i32>(2)? != 0,
        is_banned: row.get::<_, i32>(3)? != 0,
        vod_enabled: row.get::<_, i32>(4)? != 0,
        is_affiliate: row.get::<_, i32>(5)? != 0,
        subscription_enabled: row.get::<_, i32>(6)? != 0,
        followers_series: row.get(7)?,
        livestream_report_ids: row.get(8)?,
        bio: row.get(9)?,
        city: row.get(10)?,
        state: row.get(11)?,
        country: row.get(12)?,
        socials: row.get(13)?,
        profile_pic: row.get(14)?,
        created_at: row.get(15)?,
        updated_at: row.get(16)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(channel_id: i64, livestream_id: i64, captured_at: &str, viewer_count: i64) -> LivestreamSnapshot {
        LivestreamSnapshot {
            channel_id,
            livestream_id,
            captured_at: captured_at.to_string(),
            slug: "test".to_string(),
            start_time: "2026-01-01 00:00:00".to_string(),
            session_title: "Test stream".to_string(),
            viewer_count,
            livestream_created_at: "2026-01-01 00:00:00".to_string(),
            tags: "[]".to_string(),
            is_live: true,
            duration_seconds: 0,
            lang_iso: Some("en".to_string()),
        }
    }

    fn event(id: &str, livestream_id: Option<i64>, sent_at: &str) -> ChatEvent {
        ChatEvent {
            id: id.to_string(),
            chatroom_id: 1,
            livestream_id,
            sender_id: 1,
            sender_handle: "alice".to_string(),
            event_tag: "ChatMessageEvent".to_string(),
            body: "hello".to_string(),
            metadata: "{}".to_string(),
            sent_at: sent_at.to_string(),
            stored_at: sent_at.to_string(),
        }
    }

    #[test]
    fn channel_insert_then_conflict() {
        let store = CastwatchStore::open_in_memory().unwrap();
        store.insert_channel(1, 10, "alice", true).unwrap();
        let err = store.insert_channel(1, 11, "bob", true).unwrap_err();
        assert_eq!(err.code(), "CONFLICT");
    }

    #[test]
    fn find_channel_roundtrip() {
        let store = CastwatchStore::open_in_memory().unwrap();
        store.insert_channel(1, 10, "alice", true).unwrap();
        let found = store.find_channel_by_username("alice").unwrap().unwrap();
        assert_eq!(found.channel_id, 1);
        assert_eq!(found.chatroom_id, 10);
        assert!(found.is_active);
    }

    #[test]
    fn set_active_on_missing_channel_is_not_found() {
        let store = CastwatchStore::open_in_memory().unwrap();
        let err = store.set_channel_active(99, false).unwrap_err();
        assert_eq!(err.code(), "NOT_FOUND");
    }

    #[test]
    fn latest_livestream_snapshot_picks_most_recent() {
        let store = CastwatchStore::open_in_memory().unwrap();
        store.insert_channel(1, 10, "alice", true).unwrap();
        store
            .insert_livestream_snapshot(snapshot(1, 500, "2026-01-01T00:00:00Z", 10))
            .unwrap();
        store
            .insert_livestream_snapshot(snapshot(1, 500, "2026-01-01T00:02:00Z", 25))
            .unwrap();
        let latest = store.latest_livestream_snapshot(500).unwrap().unwrap();
        assert_eq!(latest.viewer_count, 25);
    }

    #[test]
    fn chat_event_insert_is_idempotent_on_duplicate_id() {
        let store = CastwatchStore::open_in_memory().unwrap();
        store.insert_chat_event(event("evt-1", Some(500), "2026-01-01T00:00:00Z")).unwrap();
        store.insert_chat_event(event("evt-1", Some(500), "2026-01-01T00:00:00Z")).unwrap();
        let events = store.list_chat_events_for_livestream(500).unwrap();
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn chat_event_time_bounds_reports_min_max() {
        let store = CastwatchStore::open_in_memory().unwrap();
        store.insert_chat_event(event("evt-1", Some(500), "2026-01-01T00:05:00Z")).unwrap();
        store.insert_chat_event(event("evt-2", Some(500), "2026-01-01T00:10:00Z")).unwrap();
        let (lo, hi) = store.chat_event_time_bounds(500).unwrap().unwrap();
        assert_eq!(lo, "2026-01-01T00:05:00Z");
        assert_eq!(hi, "2026-01-01T00:10:00Z");
    }

    #[test]
    fn profile_append_report_id_is_dedup_preserving() {
        let store = CastwatchStore::open_in_memory().unwrap();
        let now = Utc::now().to_rfc3339();
        store
            .upsert_streamer_profile(StreamerProfile {
                channel_id: 1,
                username: "alice".to_string(),
                verified: false,
                is_banned: false,
                vod_enabled: false,
                is_affiliate: false,
                subscription_enabled: false,
                followers_series: "[]".to_string(),
                livestream_report_ids: "[]".to_string(),
                bio: String::new(),
                city: String::new(),
                state: String::new(),
                country: String::new(),
                socials: "{}".to_string(),
                profile_pic: None,
                created_at: now.clone(),
                updated_at: now,
            })
            .unwrap();
        store.append_profile_livestream_report_id(1, "r1").unwrap();
        store.append_profile_livestream_report_id(1, "r1").unwrap();
        store.append_profile_livestream_report_id(1, "r2").unwrap();
        let profile = store.get_streamer_profile(1).unwrap().unwrap();
        let ids: Vec<String> = serde_json::from_str(&profile.livestream_report_ids).unwrap();
        assert_eq!(ids, vec!["r1".to_string(), "r2".to_string()]);
    }
}
