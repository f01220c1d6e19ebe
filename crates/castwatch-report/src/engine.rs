use chrono::{DateTime, Utc};
use tracing::{instrument, warn};

use castwatch_core::config::ReportConfig;
use castwatch_core::RecordId;
use castwatch_store::{CastwatchStore, LivestreamReport, SpamReport};

use crate::burst::detect_bursts;
use crate::error::{ReportError, Result};
use crate::metrics::compute_message_metrics;
use crate::series::{build_message_series, build_viewer_series, hours_watched, viewer_analytics};
use crate::windowing::compute_window;

pub struct ReportEngine<'a> {
    store: &'a CastwatchStore,
    config: &'a ReportConfig,
}

impl<'a> ReportEngine<'a> {
    pub fn new(store: &'a CastwatchStore, config: &'a ReportConfig) -> Self {
        Self { store, config }
    }

    /// Build and persist a full authenticity report for a livestream.
    ///
    /// Fails with `NoData` if the livestream has no recorded chat activity —
    /// there is nothing to window or analyse. Persistence happens in three
    /// steps (spam report, then livestream report referencing it, then the
    /// spam report back-patched with the livestream report's id, then the
    /// streamer profile appended); a failure after the first insert is
    /// logged rather than rolled back, since a partially linked report is
    /// still useful and SQLite has no cross-statement transaction here.
    #[instrument(skip(self), fields(livestream_id))]
    pub async fn generate(&self, livestream_id: i64) -> Result<LivestreamReport> {
        if livestream_id == 0 {
            return Err(ReportError::PayloadInvalid(livestream_id));
        }

        let (lo, hi) = self
            .store
            .chat_event_time_bounds(livestream_id)?
            .ok_or(ReportError::NoData(livestream_id))?;

        let min_t = parse_time(livestream_id, &lo)?;
        let max_t = parse_time(livestream_id, &hi)?;

        let events = self.store.list_chat_events_for_livestream(livestream_id)?;

        let latest_snapshot = self.store.latest_livestream_snapshot(livestream_id)?;
        let (channel_id, title, snapshot_start) = match &latest_snapshot {
            Some(snap) => (
                snap.channel_id,
                snap.session_title.clone(),
                DateTime::parse_from_rfc3339(&snap.start_time)
                    .ok()
                    .map(|dt| dt.with_timezone(&Utc)),
            ),
            None => {
                // No livestream snapshot was ever recorded for this stream (the
                // poller may have missed it entirely), but chat activity is
                // enough on its own to build a report. Fall back to the
                // channel behind the chatroom the chat events came from.
                let chatroom_id = events.first().map(|e| e.chatroom_id).unwrap_or_default();
                let channel_id = self
                    .store
                    .find_channel_by_chatroom_id(chatroom_id)?
                    .map(|c| c.channel_id)
                    .unwrap_or_default();
                (channel_id, String::new(), None)
            }
        };

        let channel = self.store.find_channel_by_id(channel_id)?;
        let username = channel.map(|c| c.username).unwrap_or_default();

        let window = compute_window(
            min_t,
            max_t,
            self.config.message_block_secs as i64,
            snapshot_start,
        );

        let snapshots = self.store.list_livestream_snapshots_in_range(
            channel_id,
            &window.start.to_rfc3339(),
            &window.end.to_rfc3339(),
        )?;

        let viewer_series = build_viewer_series(
            &snapshots,
            window.start,
            window.end,
            self.config.viewer_block_secs as i64,
        );
        let message_series = build_message_series(
            &events,
            window.start,
            window.end,
            self.config.message_block_secs as i64,
        );
        let (avg_viewers, peak_viewers, lowest_viewers) = viewer_analytics(&snapshots);
        let hours = hours_watched(&viewer_series);

        let burst_findings = detect_bursts(&events, &self.config.burst);
        let metrics = compute_message_metrics(
            events,
            self.config.worker_count,
            &self.config.app_senders,
        )
        .await;

        let engagement_pct = if avg_viewers > 0.0 {
            metrics.unique_chatters.len() as f64 / avg_viewers * 100.0
        } else {
            0.0
        };

        let now = Utc::now().to_rfc3339();
        let spam_report_id = RecordId::new().to_string();
        let spam_report = SpamReport {
            id: spam_report_id.clone(),
            livestream_report_id: None,
            channel_id,
            livestream_id,
            messages_with_emotes: metrics.messages_with_emotes,
            messages_multi_emote_only: metrics.messages_multi_emote_only,
            duplicate_messages_count: metrics.duplicate_messages_count(),
            // No reusable detector for cross-message phrase repetition beyond
            // the duplicate/similar-burst passes above; left unimplemented.
            repetitive_phrases_count: 0,
            exact_duplicate_bursts: serde_json::to_string(&burst_findings.exact_duplicate_bursts)?,
            similar_message_bursts: serde_json::to_string(&burst_findings.similar_message_bursts)?,
            suspicious_chatters: serde_json::to_string(&burst_findings.suspicious_chatters)?,
            created_at: now.clone(),
        };
        self.store.insert_spam_report(spam_report)?;

        let report_id = RecordId::new().to_string();
        let report = LivestreamReport {
            id: report_id.clone(),
            livestream_id,
            channel_id,
            username,
            title,
            window_start: window.start.to_rfc3339(),
            window_end: window.end.to_rfc3339(),
            duration_minutes: window.duration_minutes,
            avg_viewers,
            peak_viewers,
            lowest_viewers,
            engagement_pct,
            hours_watched: hours,
            total_messages: metrics.total_messages,
            unique_chatters: metrics.unique_chatters.len() as i64,
            messages_from_apps: metrics.messages_from_apps,
            spam_report_id: Some(spam_report_id.clone()),
            viewer_series: serde_json::to_string(&viewer_series)?,
            message_series: serde_json::to_string(&message_series)?,
            created_at: now,
        };
        self.store.insert_livestream_report(report.clone())?;

        if let Err(e) = self
            .store
            .set_spam_report_livestream_report_id(&spam_report_id, &report_id)
        {
            warn!(livestream_id, error = %e, "failed to back-patch spam report with report id");
        }
        if let Err(e) = self
            .store
            .append_profile_livestream_report_id(channel_id, &report_id)
        {
            warn!(livestream_id, error = %e, "failed to append report id to streamer profile");
        }

        Ok(report)
    }
}

fn parse_time(livestream_id: i64, raw: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| ReportError::BadTimestamp(livestream_id, raw.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use castwatch_core::config::BurstConfig;
    use castwatch_store::{ChatEvent, LivestreamSnapshot};

    fn report_config() -> ReportConfig {
        ReportConfig {
            message_block_secs: 600,
            viewer_block_secs: 120,
            worker_count: 2,
            burst: BurstConfig {
                exact_duplicate_window_secs: 5,
                exact_duplicate_min_count: 3,
                similar_message_window_secs: 10,
                similar_message_min_count: 4,
                similar_message_jaccard_threshold: 0.7,
                rapid_fire_window_secs: 3,
                rapid_fire_min_count: 5,
            },
            app_senders: vec!["fossabot".to_string()],
        }
    }

    fn chat_event(id: &str, sent_at: &str) -> ChatEvent {
        ChatEvent {
            id: id.to_string(),
            chatroom_id: 1,
            livestream_id: Some(500),
            sender_id: 1,
            sender_handle: "alice".to_string(),
            event_tag: "ChatMessageEvent".to_string(),
            body: "hello".to_string(),
            metadata: "{}".to_string(),
            sent_at: sent_at.to_string(),
            stored_at: sent_at.to_string(),
        }
    }

    #[tokio::test]
    async fn generate_fails_with_no_data_when_no_chat_events() {
        let store = CastwatchStore::open_in_memory().unwrap();
        store.insert_channel(1, 10, "alice", true).unwrap();
        let cfg = report_config();
        let engine = ReportEngine::new(&store, &cfg);
        let err = engine.generate(500).await.unwrap_err();
        assert!(matches!(err, ReportError::NoData(500)));
    }

    #[tokio::test]
    async fn generate_rejects_zero_livestream_id() {
        let store = CastwatchStore::open_in_memory().unwrap();
        let cfg = report_config();
        let engine = ReportEngine::new(&store, &cfg);
        let err = engine.generate(0).await.unwrap_err();
        assert!(matches!(err, ReportError::PayloadInvalid(0)));
    }

    #[tokio::test]
    async fn generate_succeeds_without_a_livestream_snapshot() {
        let store = CastwatchStore::open_in_memory().unwrap();
        store.insert_channel(1, 1, "alice", true).unwrap();
        store
            .insert_chat_event(chat_event("evt-1", "2026-03-04T12:03:15Z"))
            .unwrap();
        store
            .insert_chat_event(chat_event("evt-2", "2026-03-04T12:47:42Z"))
            .unwrap();

        let cfg = report_config();
        let engine = ReportEngine::new(&store, &cfg);
        let report = engine.generate(500).await.unwrap();

        assert_eq!(report.channel_id, 1);
        assert_eq!(report.username, "alice");
        assert_eq!(report.title, "");
        assert_eq!(report.total_messages, 2);
    }

    #[tokio::test]
    async fn generate_persists_a_report_with_expected_window() {
        let store = CastwatchStore::open_in_memory().unwrap();
        store.insert_channel(1, 10, "alice", true).unwrap();
        store
            .insert_livestream_snapshot(LivestreamSnapshot {
                channel_id: 1,
                livestream_id: 500,
                captured_at: "2026-03-04T12:00:00Z".to_string(),
                slug: "alice-stream".to_string(),
                start_time: "2026-03-04T12:00:00Z".to_string(),
                session_title: "Chatting".to_string(),
                viewer_count: 42,
                livestream_created_at: "2026-03-04T12:00:00Z".to_string(),
                tags: "[]".to_string(),
                is_live: true,
                duration_seconds: 0,
                lang_iso: None,
            })
            .unwrap();
        store
            .insert_chat_event(chat_event("evt-1", "2026-03-04T12:03:15Z"))
            .unwrap();
        store
            .insert_chat_event(chat_event("evt-2", "2026-03-04T12:47:42Z"))
            .unwrap();

        let cfg = report_config();
        let engine = ReportEngine::new(&store, &cfg);
        let report = engine.generate(500).await.unwrap();

        assert_eq!(report.window_start, "2026-03-04T12:00:00+00:00");
        assert_eq!(report.window_end, "2026-03-04T12:50:00+00:00");
        assert_eq!(report.duration_minutes, 50);
        assert_eq!(report.total_messages, 2);
        assert_eq!(report.username, "alice");
        assert!(report.spam_report_id.is_some());
    }
}
