use castwatch_core::MaybeString;
use serde::Deserialize;

/// Channel payload as extracted from the solver's response body.
///
/// Dynamically-typed upstream fields (bio/city/state/country can each
/// arrive as a string, an object, or be absent entirely) are kept as
/// [`MaybeString`] so a shape we didn't anticipate is preserved rather than
/// silently dropped; callers that only need a display string call
/// `.into_string()` at the point of use.
#[derive(Debug, Clone, Deserialize)]
pub struct ChannelPayload {
    pub id: i64,
    pub user_id: i64,
    pub slug: String,
    #[serde(default)]
    pub is_banned: bool,
    #[serde(default)]
    pub vod_enabled: bool,
    #[serde(default)]
    pub subscription_enabled: bool,
    #[serde(default)]
    pub is_affiliate: bool,
    #[serde(default)]
    pub followers_count: i64,
    #[serde(default)]
    pub verified: bool,
    #[serde(default)]
    pub livestream: Option<LivestreamPayload>,
    #[serde(default)]
    pub chatroom: Option<ChatroomPayload>,
    #[serde(default)]
    pub user: Option<UserProfilePayload>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LivestreamPayload {
    pub id: i64,
    pub slug: String,
    pub channel_id: i64,
    /// `"YYYY-MM-DD HH:MM:SS"`, UTC.
    pub created_at: String,
    #[serde(default)]
    pub session_title: String,
    #[serde(default)]
    pub is_live: bool,
    /// `"YYYY-MM-DD HH:MM:SS"`, UTC.
    pub start_time: String,
    #[serde(default)]
    pub duration: i64,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub is_mature: bool,
    #[serde(default)]
    pub viewer_count: i64,
    #[serde(default)]
    pub lang_iso: Option<String>,
    #[serde(default)]
    pub tags: serde_json::Value,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatroomPayload {
    pub id: i64,
    #[serde(default)]
    pub channel_id: i64,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct UserProfilePayload {
    #[serde(default)]
    pub bio: MaybeString,
    #[serde(default)]
    pub city: MaybeString,
    #[serde(default)]
    pub state: MaybeString,
    #[serde(default)]
    pub country: MaybeString,
    #[serde(default)]
    pub profile_pic: Option<String>,
    #[serde(default)]
    pub socials: serde_json::Value,
}
