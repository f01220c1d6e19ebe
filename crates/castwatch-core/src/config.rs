use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 120;
pub const DEFAULT_FRESHNESS_LEEWAY_SECS: u64 = 20;
pub const DEFAULT_MESSAGE_BLOCK_SECS: u64 = 600;
pub const DEFAULT_VIEWER_BLOCK_SECS: u64 = 120;
pub const DEFAULT_REPORT_WORKERS: usize = 4;
pub const DEFAULT_CHAT_RECONNECT_SECS: u64 = 1;
pub const DEFAULT_CHAT_DIAL_RETRY_SECS: u64 = 5;

/// Top-level config (castwatch.toml + CASTWATCH_* env overrides).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CastwatchConfig {
    pub proxy: ProxyConfig,
    #[serde(default)]
    pub poll: PollConfig,
    #[serde(default)]
    pub chat: ChatConfig,
    #[serde(default)]
    pub report: ReportConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
}

impl Default for CastwatchConfig {
    fn default() -> Self {
        Self {
            proxy: ProxyConfig {
                url: String::new(),
                timeout_ms: default_proxy_timeout_ms(),
            },
            poll: PollConfig::default(),
            chat: ChatConfig::default(),
            report: ReportConfig::default(),
            database: DatabaseConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProxyConfig {
    /// Solver endpoint the proxy client posts fetch envelopes to.
    /// Empty is rejected at startup — see `CastwatchConfig::load`.
    pub url: String,
    #[serde(default = "default_proxy_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_proxy_timeout_ms() -> u64 {
    60_000
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollConfig {
    #[serde(default = "default_poll_interval")]
    pub interval_secs: u64,
    #[serde(default = "default_freshness_leeway")]
    pub freshness_leeway_secs: u64,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_poll_interval(),
            freshness_leeway_secs: default_freshness_leeway(),
        }
    }
}

fn default_poll_interval() -> u64 {
    DEFAULT_POLL_INTERVAL_SECS
}
fn default_freshness_leeway() -> u64 {
    DEFAULT_FRESHNESS_LEEWAY_SECS
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    #[serde(default = "default_chat_transport_url")]
    pub transport_url: String,
    #[serde(default = "default_reconnect_secs")]
    pub reconnect_secs: u64,
    #[serde(default = "default_dial_retry_secs")]
    pub dial_retry_secs: u64,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            transport_url: default_chat_transport_url(),
            reconnect_secs: default_reconnect_secs(),
            dial_retry_secs: default_dial_retry_secs(),
        }
    }
}

fn default_chat_transport_url() -> String {
    "wss://ws-us2.pusher.com/app/chat-key?protocol=7&client=js&version=7.4.0&flash=false".to_string()
}
fn default_reconnect_secs() -> u64 {
    DEFAULT_CHAT_RECONNECT_SECS
}
fn default_dial_retry_secs() -> u64 {
    DEFAULT_CHAT_DIAL_RETRY_SECS
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    #[serde(default = "default_message_block")]
    pub message_block_secs: u64,
    #[serde(default = "default_viewer_block")]
    pub viewer_block_secs: u64,
    #[serde(default = "default_workers")]
    pub worker_count: usize,
    #[serde(default)]
    pub burst: BurstConfig,
    #[serde(default = "default_app_senders")]
    pub app_senders: Vec<String>,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            message_block_secs: default_message_block(),
            viewer_block_secs: default_viewer_block(),
            worker_count: default_workers(),
            burst: BurstConfig::default(),
            app_senders: default_app_senders(),
        }
    }
}

fn default_message_block() -> u64 {
    DEFAULT_MESSAGE_BLOCK_SECS
}
fn default_viewer_block() -> u64 {
    DEFAULT_VIEWER_BLOCK_SECS
}
fn default_workers() -> usize {
    DEFAULT_REPORT_WORKERS
}
fn default_app_senders() -> Vec<String> {
    vec![
        "botrix".to_string(),
        "@fossabot".to_string(),
        "fossabot".to_string(),
        "kicbot".to_string(),
    ]
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BurstConfig {
    #[serde(default = "default_exact_window")]
    pub exact_duplicate_window_secs: u64,
    #[serde(default = "default_exact_min")]
    pub exact_duplicate_min_count: usize,
    #[serde(default = "default_similar_window")]
    pub similar_message_window_secs: u64,
    #[serde(default = "default_similar_min")]
    pub similar_message_min_count: usize,
    #[serde(default = "default_similar_threshold")]
    pub similar_message_jaccard_threshold: f64,
    #[serde(default = "default_rapid_window")]
    pub rapid_fire_window_secs: u64,
    #[serde(default = "default_rapid_min")]
    pub rapid_fire_min_count: usize,
}

impl Default for BurstConfig {
    fn default() -> Self {
        Self {
            exact_duplicate_window_secs: default_exact_window(),
            exact_duplicate_min_count: default_exact_min(),
            similar_message_window_secs: default_similar_window(),
            similar_message_min_count: default_similar_min(),
            similar_message_jaccard_threshold: default_similar_threshold(),
            rapid_fire_window_secs: default_rapid_window(),
            rapid_fire_min_count: default_rapid_min(),
        }
    }
}

fn default_exact_window() -> u64 {
    5
}
fn default_exact_min() -> usize {
    3
}
fn default_similar_window() -> u64 {
    10
}
fn default_similar_min() -> usize {
    4
}
fn default_similar_threshold() -> f64 {
    0.7
}
fn default_rapid_window() -> u64 {
    3
}
fn default_rapid_min() -> usize {
    5
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_db_path")]
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

fn default_db_path() -> String {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    format!("{}/.castwatch/castwatch.db", home)
}

impl CastwatchConfig {
    /// Load config from a TOML file with CASTWATCH_* env var overrides.
    ///
    /// Fails with `ConfigMissing` if the resolved `proxy.url` is empty —
    /// there is no way to monitor a channel without a solver endpoint.
    pub fn load(config_path: Option<&str>) -> crate::error::Result<Self> {
        let path = config_path
            .map(String::from)
            .unwrap_or_else(default_config_path);

        let config: CastwatchConfig = Figment::new()
            .merge(Toml::file(&path))
            .merge(Env::prefixed("CASTWATCH_").split("_"))
            .extract()
            .map_err(|e| crate::error::CastwatchError::Config(e.to_string()))?;

        if config.proxy.url.trim().is_empty() {
            return Err(crate::error::CastwatchError::ConfigMissing(
                "proxy.url".to_string(),
            ));
        }

        Ok(config)
    }
}

fn default_config_path() -> String {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    format!("{}/.castwatch/castwatch.toml", home)
}
