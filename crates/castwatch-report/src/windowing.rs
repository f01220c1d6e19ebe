use chrono::{DateTime, Duration, Utc};

/// Round `t` down to the most recent multiple of `block_secs` since the
/// Unix epoch.
pub fn floor_to_block(t: DateTime<Utc>, block_secs: i64) -> DateTime<Utc> {
    let ts = t.timestamp();
    let floored = ts - ts.rem_euclid(block_secs);
    DateTime::from_timestamp(floored, 0).unwrap_or(t)
}

/// Round `t` up to the nearest multiple of `block_secs`; a `t` already on a
/// boundary is returned unchanged.
pub fn ceil_to_block(t: DateTime<Utc>, block_secs: i64) -> DateTime<Utc> {
    let floored = floor_to_block(t, block_secs);
    if floored == t {
        floored
    } else {
        floored + Duration::seconds(block_secs)
    }
}

pub struct Window {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub duration_minutes: i64,
}

pub fn compute_window(
    min_t: DateTime<Utc>,
    max_t: DateTime<Utc>,
    message_block_secs: i64,
    snapshot_start_time: Option<DateTime<Utc>>,
) -> Window {
    let mut start = floor_to_block(min_t, message_block_secs);
    if let Some(snap_start) = snapshot_start_time {
        if snap_start < start {
            start = snap_start;
        }
    }
    let end = ceil_to_block(max_t, message_block_secs);
    let duration_minutes = (end - start).num_minutes();
    Window {
        start,
        end,
        duration_minutes,
    }
}
