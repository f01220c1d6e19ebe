use std::sync::Arc;
use std::time::Duration as StdDuration;

use castwatch_proxy::ProxyClient;
use castwatch_registry::LiveRegistry;
use castwatch_store::{CastwatchStore, LivestreamSnapshot};
use chrono::{NaiveDateTime, Utc};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::profile::build_and_upsert_profile;

const UPSTREAM_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Periodically fetches a channel's payload, persists what it observes, and
/// keeps the live-state registry current for chat attribution.
///
/// Ticks immediately on start (tokio's interval fires its first tick right
/// away) then on `poll_interval`. Any failure for a single tick is logged
/// and the loop continues — a transient proxy error should not end the
/// monitor for the whole channel.
pub async fn run_poller(
    store: Arc<CastwatchStore>,
    registry: Arc<LiveRegistry>,
    proxy: Arc<ProxyClient>,
    channel_id: i64,
    username: String,
    poll_interval: StdDuration,
    cancel: CancellationToken,
) {
    info!(channel_id, %username, "poller started");
    let mut interval = tokio::time::interval(poll_interval);

    loop {
        tokio::select! {
            _ = interval.tick() => {
                if let Err(e) = poll_once(&store, &registry, &proxy, channel_id, &username).await {
                    error!(channel_id, error = %e, "poll tick failed");
                }
            }
            _ = cancel.cancelled() => {
                info!(channel_id, "poller cancelled");
                break;
            }
        }
    }
}

async fn poll_once(
    store: &CastwatchStore,
    registry: &LiveRegistry,
    proxy: &ProxyClient,
    channel_id: i64,
    username: &str,
) -> crate::error::Result<()> {
    let fetch = proxy.fetch_channel(username).await?;
    let payload = fetch.payload;
    store.insert_channel_snapshot(channel_id, &fetch.raw_json)?;

    match &payload.livestream {
        Some(ls) if ls.is_live => {
            let start_time = parse_upstream_time(&ls.start_time).unwrap_or_else(Utc::now);
            let created_at = parse_upstream_time(&ls.created_at).unwrap_or(start_time);
            let now = Utc::now();

            store.insert_livestream_snapshot(LivestreamSnapshot {
                channel_id,
                livestream_id: ls.id,
                captured_at: now.to_rfc3339(),
                slug: ls.slug.clone(),
                start_time: start_time.to_rfc3339(),
                session_title: ls.session_title.clone(),
                viewer_count: ls.viewer_count,
                livestream_created_at: created_at.to_rfc3339(),
                tags: serde_json::to_string(&ls.tags).unwrap_or_else(|_| "[]".to_string()),
                is_live: true,
                duration_seconds: ls.duration,
                lang_iso: ls.lang_iso.clone(),
            })?;

            registry.mark_live(channel_id, ls.id, now);
        }
        _ => {
            registry.mark_offline(channel_id);
        }
    }

    if let Err(e) = build_and_upsert_profile(store, channel_id, username, &payload) {
        warn!(channel_id, error = %e, "profile rebuild failed after poll");
    }

    Ok(())
}

fn parse_upstream_time(raw: &str) -> Option<chrono::DateTime<Utc>> {
    NaiveDateTime::parse_from_str(raw, UPSTREAM_TIME_FORMAT)
        .ok()
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_upstream_time_format() {
        let parsed = parse_upstream_time("2026-03-04 12:00:00").unwrap();
        assert_eq!(parsed.to_rfc3339(), "2026-03-04T12:00:00+00:00");
    }

    #[test]
    fn rejects_malformed_upstream_time() {
        assert!(parse_upstream_time("not-a-date").is_none());
    }
}
