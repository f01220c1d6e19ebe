use castwatch_proxy::ChannelPayload;
use castwatch_store::{CastwatchStore, StreamerProfile};
use chrono::Utc;
use serde::Serialize;
use tracing::instrument;

use crate::error::Result;

#[derive(Serialize)]
struct FollowersPoint {
    captured_at: String,
    followers_count: i64,
}

/// Read-modify-write the streamer profile for a channel.
///
/// The followers series and the livestream report id list are both
/// re-derived from their source tables on each call rather than appended to
/// incrementally — simpler to reason about, and cheap at the row volumes
/// this system deals with (one snapshot per channel per poll interval, one
/// report per livestream).
#[instrument(skip(store, payload), fields(channel_id))]
pub fn build_and_upsert_profile(
    store: &CastwatchStore,
    channel_id: i64,
    username: &str,
    payload: &ChannelPayload,
) -> Result<()> {
    let snapshots = store.list_channel_snapshots(channel_id)?;
    let mut series = Vec::with_capacity(snapshots.len());
    for snap in &snapshots {
        let followers_count = serde_json::from_str::<serde_json::Value>(&snap.raw_json)
            .ok()
            .and_then(|v| v.get("followers_count").and_then(|f| f.as_i64()))
            .unwrap_or(0);
        series.push(FollowersPoint {
            captured_at: snap.captured_at.clone(),
            followers_count,
        });
    }

    let existing = store.get_streamer_profile(channel_id)?;
    let now = Utc::now().to_rfc3339();
    let created_at = existing.map(|p| p.created_at).unwrap_or_else(|| now.clone());

    let report_ids = store.list_livestream_report_ids_for_channel(channel_id)?;
    let report_ids = serde_json::to_string(&report_ids)?;

    let (bio, city, state, country, profile_pic, socials) = match &payload.user {
        Some(u) => (
            u.bio.clone().into_string(),
            u.city.clone().into_string(),
            u.state.clone().into_string(),
            u.country.clone().into_string(),
            u.profile_pic.clone(),
            u.socials.clone(),
        ),
        None => (
            String::new(),
            String::new(),
            String::new(),
            String::new(),
            None,
            serde_json::json!({}),
        ),
    };

    store.upsert_streamer_profile(StreamerProfile {
        channel_id,
        username: username.to_string(),
        verified: payload.verified,
        is_banned: payload.is_banned,
        vod_enabled: payload.vod_enabled,
        is_affiliate: payload.is_affiliate,
        subscription_enabled: payload.subscription_enabled,
        followers_series: serde_json::to_string(&series)?,
        livestream_report_ids: report_ids,
        bio,
        city,
        state,
        country,
        socials: serde_json::to_string(&socials)?,
        profile_pic,
        created_at,
        updated_at: now,
    })?;

    Ok(())
}
