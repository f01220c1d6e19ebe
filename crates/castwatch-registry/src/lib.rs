use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;

/// What the poller last observed for a channel.
#[derive(Debug, Clone)]
pub struct LiveState {
    pub livestream_id: i64,
    pub fetched_at: DateTime<Utc>,
    pub is_live: bool,
}

/// Process-wide `channel_id -> last observed livestream state` map.
///
/// Concurrent single-key overwrites are expected and fine: the poller is the
/// only writer per channel, and a stale read just means a chat event goes
/// unattributed until the next poll re-stamps the entry.
#[derive(Default)]
pub struct LiveRegistry {
    channels: DashMap<i64, LiveState>,
}

impl LiveRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mark_live(&self, channel_id: i64, livestream_id: i64, fetched_at: DateTime<Utc>) {
        self.channels.insert(
            channel_id,
            LiveState {
                livestream_id,
                fetched_at,
                is_live: true,
            },
        );
    }

    pub fn mark_offline(&self, channel_id: i64) {
        self.channels.remove(&channel_id);
    }

    /// The livestream a chat event arriving `now` should be attributed to,
    /// or `None` if the channel isn't live or the last poll is stale beyond
    /// `poll_interval + freshness_leeway`.
    pub fn attribute(
        &self,
        channel_id: i64,
        now: DateTime<Utc>,
        poll_interval: Duration,
        freshness_leeway: Duration,
    ) -> Option<i64> {
        let state = self.channels.get(&channel_id)?;
        if !state.is_live {
            return None;
        }
        let max_age = poll_interval + freshness_leeway;
        if now - state.fetched_at > max_age {
            return None;
        }
        Some(state.livestream_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn attributes_fresh_live_state() {
        let registry = LiveRegistry::new();
        let t0 = Utc.timestamp_opt(0, 0).unwrap();
        registry.mark_live(1, 500, t0);

        let now = t0 + Duration::seconds(60);
        let attributed = registry.attribute(1, now, Duration::seconds(120), Duration::seconds(20));
        assert_eq!(attributed, Some(500));
    }

    #[test]
    fn stale_state_is_not_attributed() {
        let registry = LiveRegistry::new();
        let t0 = Utc.timestamp_opt(0, 0).unwrap();
        registry.mark_live(1, 500, t0);

        // poll_interval(120) + leeway(20) + 1s past the boundary
        let now = t0 + Duration::seconds(141);
        let attributed = registry.attribute(1, now, Duration::seconds(120), Duration::seconds(20));
        assert_eq!(attributed, None);
    }

    #[test]
    fn offline_channel_is_not_attributed() {
        let registry = LiveRegistry::new();
        registry.mark_live(1, 500, Utc::now());
        registry.mark_offline(1);
        let attributed = registry.attribute(1, Utc::now(), Duration::seconds(120), Duration::seconds(20));
        assert_eq!(attributed, None);
    }

    #[test]
    fn unknown_channel_is_not_attributed() {
        let registry = LiveRegistry::new();
        let attributed = registry.attribute(42, Utc::now(), Duration::seconds(120), Duration::seconds(20));
        assert_eq!(attributed, None);
    }
}
