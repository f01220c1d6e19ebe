use std::sync::Arc;
use std::time::Duration as StdDuration;

use castwatch_core::config::ChatConfig;
use castwatch_proxy::ProxyClient;
use castwatch_registry::LiveRegistry;
use castwatch_store::CastwatchStore;
use chrono::Duration as ChronoDuration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::chat::run_chat_subscriber;
use crate::poll::run_poller;

/// The two running tasks for one monitored channel, plus the means to stop
/// them. Held by the supervisor's registry of active monitors.
pub struct MonitorHandle {
    pub cancel: CancellationToken,
    poller: JoinHandle<()>,
    chat: JoinHandle<()>,
}

impl MonitorHandle {
    /// Signal both tasks to stop. Does not wait for them to finish —
    /// in-flight persistence for either task completes on its own.
    pub fn stop(&self) {
        self.cancel.cancel();
    }

    pub async fn join(self) {
        let _ = tokio::join!(self.poller, self.chat);
    }
}

/// Launch the poller and chat subscriber for a channel.
#[allow(clippy::too_many_arguments)]
pub fn spawn_channel_monitor(
    store: Arc<CastwatchStore>,
    registry: Arc<LiveRegistry>,
    proxy: Arc<ProxyClient>,
    chat_config: &ChatConfig,
    channel_id: i64,
    chatroom_id: i64,
    username: String,
    poll_interval_secs: u64,
    freshness_leeway_secs: u64,
) -> MonitorHandle {
    let cancel = CancellationToken::new();

    let poller = tokio::spawn(run_poller(
        store.clone(),
        registry.clone(),
        proxy,
        channel_id,
        username,
        StdDuration::from_secs(poll_interval_secs),
        cancel.clone(),
    ));

    let chat = tokio::spawn(run_chat_subscriber(
        store,
        registry,
        chat_config.transport_url.clone(),
        channel_id,
        chatroom_id,
        ChronoDuration::seconds(poll_interval_secs as i64),
        ChronoDuration::seconds(freshness_leeway_secs as i64),
        StdDuration::from_secs(chat_config.reconnect_secs),
        StdDuration::from_secs(chat_config.dial_retry_secs),
        cancel.clone(),
    ));

    MonitorHandle {
        cancel,
        poller,
        chat,
    }
}
