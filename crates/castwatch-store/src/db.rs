use rusqlite::{Connection, Result};

/// Initialise every table this crate owns. Safe to call on every startup —
/// each statement uses `IF NOT EXISTS`.
pub fn init_db(conn: &Connection) -> Result<()> {
    create_channels_table(conn)?;
    create_channel_snapshots_table(conn)?;
    create_livestream_snapshots_table(conn)?;
    create_chat_events_table(conn)?;
    create_livestream_reports_table(conn)?;
    create_spam_reports_table(conn)?;
    create_streamer_profiles_table(conn)?;
    Ok(())
}

fn create_channels_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS monitored_channels (
            channel_id      INTEGER PRIMARY KEY NOT NULL,
            chatroom_id     INTEGER NOT NULL UNIQUE,
            username        TEXT NOT NULL UNIQUE,
            is_active       INTEGER NOT NULL DEFAULT 0,
            created_at      TEXT NOT NULL,
            updated_at      TEXT NOT NULL
        );",
    )
}

fn create_channel_snapshots_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS channel_snapshots (
            id              TEXT PRIMARY KEY NOT NULL,
            channel_id      INTEGER NOT NULL REFERENCES monitored_channels(channel_id),
            raw_json        TEXT NOT NULL,
            captured_at     TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_channel_snapshots_channel
            ON channel_snapshots(channel_id, captured_at);",
    )
}

fn create_livestream_snapshots_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS livestream_snapshots (
            channel_id              INTEGER NOT NULL REFERENCES monitored_channels(channel_id),
            livestream_id           INTEGER NOT NULL,
            captured_at             TEXT NOT NULL,
            slug                    TEXT NOT NULL DEFAULT '',
            start_time              TEXT NOT NULL DEFAULT '',
            session_title           TEXT NOT NULL DEFAULT '',
            viewer_count            INTEGER NOT NULL DEFAULT 0,
            livestream_created_at   TEXT NOT NULL DEFAULT '',
            tags                    TEXT NOT NULL DEFAULT '[]',
            is_live                 INTEGER NOT NULL DEFAULT 0,
            duration_seconds        INTEGER NOT NULL DEFAULT 0,
            lang_iso                TEXT,
            PRIMARY KEY (channel_id, livestream_id, captured_at)
        );
        CREATE INDEX IF NOT EXISTS idx_livestream_snapshots_livestream
            ON livestream_snapshots(livestream_id, captured_at);
        CREATE INDEX IF NOT EXISTS idx_livestream_snapshots_channel_time
            ON livestream_snapshots(channel_id, captured_at);",
    )
}

fn create_chat_events_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS chat_events (
            id              TEXT PRIMARY KEY NOT NULL,
            chatroom_id     INTEGER NOT NULL,
            livestream_id   INTEGER,
            sender_id       INTEGER NOT NULL,
            sender_handle   TEXT NOT NULL,
            event_tag       TEXT NOT NULL,
            body            TEXT NOT NULL DEFAULT '',
            metadata        TEXT NOT NULL DEFAULT '{}',
            sent_at         TEXT NOT NULL,
            stored_at       TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_chat_events_livestream
            ON chat_events(livestream_id, sent_at);",
    )
}

fn create_livestream_reports_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS livestream_reports (
            id                  TEXT PRIMARY KEY NOT NULL,
            livestream_id       INTEGER NOT NULL,
            channel_id          INTEGER NOT NULL,
            username            TEXT NOT NULL,
            title               TEXT NOT NULL DEFAULT '',
            window_start        TEXT NOT NULL,
            window_end          TEXT NOT NULL,
            duration_minutes    INTEGER NOT NULL,
            avg_viewers         REAL NOT NULL DEFAULT 0,
            peak_viewers        INTEGER NOT NULL DEFAULT 0,
            lowest_viewers      INTEGER NOT NULL DEFAULT 0,
            engagement_pct      REAL NOT NULL DEFAULT 0,
            hours_watched       REAL NOT NULL DEFAULT 0,
            total_messages      INTEGER NOT NULL DEFAULT 0,
            unique_chatters     INTEGER NOT NULL DEFAULT 0,
            messages_from_apps  INTEGER NOT NULL DEFAULT 0,
            spam_report_id      TEXT,
            viewer_series       TEXT NOT NULL DEFAULT '[]',
            message_series      TEXT NOT NULL DEFAULT '[]',
            created_at          TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_livestream_reports_channel
            ON livestream_reports(channel_id, window_start);",
    )
}

fn create_spam_reports_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS spam_reports (
            id                          TEXT PRIMARY KEY NOT NULL,
            livestream_report_id        TEXT,
            channel_id                  INTEGER NOT NULL,
            livestream_id               INTEGER NOT NULL,
            messages_with_emotes        INTEGER NOT NULL DEFAULT 0,
            messages_multi_emote_only   INTEGER NOT NULL DEFAULT 0,
            duplicate_messages_count    INTEGER NOT NULL DEFAULT 0,
            repetitive_phrases_count    INTEGER NOT NULL DEFAULT 0,
            exact_duplicate_bursts      TEXT NOT NULL DEFAULT '[]',
            similar_message_bursts      TEXT NOT NULL DEFAULT '[]',
            suspicious_chatters         TEXT NOT NULL DEFAULT '[]',
            created_at                  TEXT NOT NULL
        );",
    )
}

fn create_streamer_profiles_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS streamer_profiles (
            channel_id              INTEGER PRIMARY KEY NOT NULL,
            username                TEXT NOT NULL,
            verified                INTEGER NOT NULL DEFAULT 0,
            is_banned               INTEGER NOT NULL DEFAULT 0,
            vod_enabled             INTEGER NOT NULL DEFAULT 0,
            is_affiliate            INTEGER NOT NULL DEFAULT 0,
            subscription_enabled    INTEGER NOT NULL DEFAULT 0,
            followers_series        TEXT NOT NULL DEFAULT '[]',
            livestream_report_ids   TEXT NOT NULL DEFAULT '[]',
            bio                     TEXT NOT NULL DEFAULT '',
            city                    TEXT NOT NULL DEFAULT '',
            state                   TEXT NOT NULL DEFAULT '',
            country                 TEXT NOT NULL DEFAULT '',
            socials                 TEXT NOT NULL DEFAULT '{}',
            profile_pic             TEXT,
            created_at              TEXT NOT NULL,
            updated_at              TEXT NOT NULL
        );",
    )
}
