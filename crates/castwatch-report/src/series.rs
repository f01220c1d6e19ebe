use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use castwatch_store::{ChatEvent, LivestreamSnapshot};

use crate::windowing::floor_to_block;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SeriesPoint {
    pub t: DateTime<Utc>,
    pub count: i64,
}

/// Viewer count per `viewer_block`-sized interval across the window. Each
/// interval takes the *last* snapshot observed within it; empty intervals
/// carry the previous value forward, or 0 before any snapshot is seen.
pub fn build_viewer_series(
    snapshots: &[LivestreamSnapshot],
    window_start: DateTime<Utc>,
    window_end: DateTime<Utc>,
    viewer_block_secs: i64,
) -> Vec<SeriesPoint> {
    let block = Duration::seconds(viewer_block_secs);
    let mut points = Vec::new();
    let mut carried = 0i64;
    let mut t = window_start;

    while t < window_end {
        let next = t + block;
        let in_range: Vec<&LivestreamSnapshot> = snapshots
            .iter()
            .filter(|s| {
                parse_rfc3339(&s.captured_at)
                    .map(|c| c >= t && c < next)
                    .unwrap_or(false)
            })
            .collect();

        let count = if let Some(last) = in_range.last() {
            let value = last.viewer_count;
            carried = value;
            value
        } else {
            carried
        };

        points.push(SeriesPoint { t, count });
        t = next;
    }

    points
}

/// Message count per `message_block`-sized interval, by block start.
pub fn build_message_series(
    events: &[ChatEvent],
    window_start: DateTime<Utc>,
    window_end: DateTime<Utc>,
    message_block_secs: i64,
) -> Vec<SeriesPoint> {
    let mut counts: std::collections::BTreeMap<DateTime<Utc>, i64> = std::collections::BTreeMap::new();
    for event in events {
        if let Some(sent_at) = parse_rfc3339(&event.sent_at) {
            let block_start = floor_to_block(sent_at, message_block_secs);
            *counts.entry(block_start).or_insert(0) += 1;
        }
    }

    let block = Duration::seconds(message_block_secs);
    let mut points = Vec::new();
    let mut t = floor_to_block(window_start, message_block_secs);
    while t < window_end {
        points.push(SeriesPoint {
            t,
            count: *counts.get(&t).unwrap_or(&0),
        });
        t = t + block;
    }
    points
}

/// Average/peak/lowest viewer count across the snapshots fetched for the
/// window. All zero when no snapshots were observed.
pub fn viewer_analytics(snapshots: &[LivestreamSnapshot]) -> (f64, i64, i64) {
    if snapshots.is_empty() {
        return (0.0, 0, 0);
    }
    let sum: i64 = snapshots.iter().map(|s| s.viewer_count).sum();
    let avg = sum as f64 / snapshots.len() as f64;
    let peak = snapshots.iter().map(|s| s.viewer_count).max().unwrap_or(0);
    let lowest = snapshots.iter().map(|s| s.viewer_count).min().unwrap_or(0);
    (avg, peak, lowest)
}

/// Approximate total viewer-hours by a left-Riemann sum over the viewer
/// series: each point's count is held constant until the next point.
pub fn hours_watched(series: &[SeriesPoint]) -> f64 {
    if series.len() < 2 {
        return 0.0;
    }
    let mut total_seconds = 0.0;
    for pair in series.windows(2) {
        let (a, b) = (&pair[0], &pair[1]);
        let dt = (b.t - a.t).num_seconds() as f64;
        total_seconds += a.count as f64 * dt;
    }
    total_seconds / 3600.0
}

fn parse_rfc3339(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn dt(h: u32, m: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 4, h, m, s).unwrap()
    }

    fn snapshot(captured_at: DateTime<Utc>, viewer_count: i64) -> LivestreamSnapshot {
        LivestreamSnapshot {
            channel_id: 1,
            livestream_id: 500,
            captured_at: captured_at.to_rfc3339(),
            slug: "s".to_string(),
            start_time: String::new(),
            session_title: String::new(),
            viewer_count,
            livestream_created_at: String::new(),
            tags: "[]".to_string(),
            is_live: true,
            duration_seconds: 0,
            lang_iso: None,
        }
    }

    #[test]
    fn viewer_series_carries_forward_empty_intervals() {
        let snaps = vec![snapshot(dt(12, 0, 30), 10)];
        let series = build_viewer_series(&snaps, dt(12, 0, 0), dt(12, 6, 0), 120);
        assert_eq!(series.len(), 3);
        assert_eq!(series[0].count, 10);
        assert_eq!(series[1].count, 10);
        assert_eq!(series[2].count, 10);
    }

    #[test]
    fn viewer_series_defaults_to_zero_before_first_snapshot() {
        let snaps = vec![snapshot(dt(12, 4, 0), 20)];
        let series = build_viewer_series(&snaps, dt(12, 0, 0), dt(12, 6, 0), 120);
        assert_eq!(series[0].count, 0);
        assert_eq!(series[1].count, 0);
        assert_eq!(series[2].count, 20);
    }

    #[test]
    fn viewer_series_length_matches_window_over_block() {
        let series = build_viewer_series(&[], dt(12, 0, 0), dt(12, 50, 0), 120);
        assert_eq!(series.len(), 25);
    }

    #[test]
    fn message_series_literal_scenario_has_five_blocks() {
        let events: Vec<ChatEvent> = Vec::new();
        let series = build_message_series(&events, dt(12, 0, 0), dt(12, 50, 0), 600);
        assert_eq!(series.len(), 5);
        assert_eq!(series[0].t, dt(12, 0, 0));
        assert_eq!(series[4].t, dt(12, 40, 0));
    }

    #[test]
    fn hours_watched_is_zero_for_short_series() {
        assert_eq!(hours_watched(&[]), 0.0);
        assert_eq!(hours_watched(&[SeriesPoint { t: dt(12, 0, 0), count: 5 }]), 0.0);
    }

    #[test]
    fn hours_watched_integrates_constant_viewer_count() {
        let series = vec![
            SeriesPoint { t: dt(12, 0, 0), count: 100 },
            SeriesPoint { t: dt(13, 0, 0), count: 100 },
        ];
        assert_eq!(hours_watched(&series), 100.0);
    }
}
