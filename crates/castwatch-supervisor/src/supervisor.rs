use std::sync::Arc;

use dashmap::DashMap;
use tracing::{info, instrument, warn};

use castwatch_core::config::{ChatConfig, PollConfig};
use castwatch_monitor::{spawn_channel_monitor, MonitorHandle};
use castwatch_proxy::ProxyClient;
use castwatch_registry::LiveRegistry;
use castwatch_store::{CastwatchStore, MonitoredChannel, StoreError};

use crate::error::{Result, SupervisorError};

/// Owns one running monitor per actively-watched channel and reacts to
/// add/reactivate commands from whatever outer surface drives this system.
pub struct Supervisor {
    store: Arc<CastwatchStore>,
    registry: Arc<LiveRegistry>,
    proxy: Arc<ProxyClient>,
    poll: PollConfig,
    chat: ChatConfig,
    handles: DashMap<i64, MonitorHandle>,
}

impl Supervisor {
    pub fn new(
        store: Arc<CastwatchStore>,
        registry: Arc<LiveRegistry>,
        proxy: Arc<ProxyClient>,
        poll: PollConfig,
        chat: ChatConfig,
    ) -> Self {
        Self {
            store,
            registry,
            proxy,
            poll,
            chat,
            handles: DashMap::new(),
        }
    }

    /// Launch a monitor for every channel already marked active, typically
    /// called once at startup before this process starts accepting commands.
    #[instrument(skip(self))]
    pub fn scan_and_start(&self) -> Result<usize> {
        let channels = self.store.list_active_channels()?;
        let count = channels.len();
        for channel in channels {
            self.start(channel);
        }
        info!(count, "startup scan launched monitors");
        Ok(count)
    }

    fn start(&self, channel: MonitoredChannel) {
        if self.handles.contains_key(&channel.channel_id) {
            return;
        }
        let handle = spawn_channel_monitor(
            self.store.clone(),
            self.registry.clone(),
            self.proxy.clone(),
            &self.chat,
            channel.channel_id,
            channel.chatroom_id,
            channel.username.clone(),
            self.poll.interval_secs,
            self.poll.freshness_leeway_secs,
        );
        self.handles.insert(channel.channel_id, handle);
    }

    /// Start or stop monitoring a channel by username, creating its record
    /// via a fresh proxy fetch if this username has never been seen before.
    /// Returns `AlreadyMonitored` if another caller inserted the same
    /// channel between the lookup and the insert.
    #[instrument(skip(self))]
    pub async fn add_or_reactivate(
        &self,
        username: &str,
        is_active: bool,
    ) -> Result<MonitoredChannel> {
        let channel = match self.store.find_channel_by_username(username)? {
            Some(existing) if existing.is_active == is_active => existing,
            Some(existing) => self.store.set_channel_active(existing.channel_id, is_active)?,
            None => {
                let fetch = self.proxy.fetch_channel(username).await?;
                let chatroom_id = fetch
                    .payload
                    .chatroom
                    .as_ref()
                    .map(|c| c.id)
                    .ok_or_else(|| SupervisorError::PayloadInvalid(username.to_string()))?;
                match self
                    .store
                    .insert_channel(fetch.payload.id, chatroom_id, username, is_active)
                {
                    Ok(channel) => channel,
                    Err(StoreError::Conflict(_)) => {
                        return Err(SupervisorError::AlreadyMonitored(fetch.payload.id))
                    }
                    Err(e) => return Err(e.into()),
                }
            }
        };

        if channel.is_active {
            self.start(channel.clone());
        } else if let Some((_, handle)) = self.handles.remove(&channel.channel_id) {
            handle.stop();
        }
        Ok(channel)
    }

    /// Stop and drop the monitor for a channel, and mark it inactive in
    /// storage. A no-op if the channel isn't currently monitored.
    #[instrument(skip(self))]
    pub fn deactivate(&self, channel_id: i64) -> Result<()> {
        if let Some((_, handle)) = self.handles.remove(&channel_id) {
            handle.stop();
        }
        if let Err(e) = self.store.set_channel_active(channel_id, false) {
            warn!(channel_id, error = %e, "failed to mark channel inactive");
        }
        Ok(())
    }

    pub fn active_count(&self) -> usize {
        self.handles.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn supervisor() -> Supervisor {
        let store = Arc::new(CastwatchStore::open_in_memory().unwrap());
        let registry = Arc::new(LiveRegistry::new());
        let proxy = Arc::new(ProxyClient::new("http://localhost:1".to_string(), 1000));
        Supervisor::new(store, registry, proxy, PollConfig::default(), ChatConfig::default())
    }

    /// Seeds an already-monitored channel directly in storage, bypassing the
    /// proxy fetch path that `add_or_reactivate` takes for unseen usernames —
    /// that path needs a live solver endpoint and isn't exercised here.
    fn seed_channel(sup: &Supervisor, channel_id: i64, chatroom_id: i64, username: &str) {
        sup.store
            .insert_channel(channel_id, chatroom_id, username, false)
            .unwrap();
    }

    #[tokio::test]
    async fn add_or_reactivate_activates_existing_channel_and_starts_monitor() {
        let sup = supervisor();
        seed_channel(&sup, 1, 10, "alice");
        let channel = sup.add_or_reactivate("alice", true).await.unwrap();
        assert_eq!(channel.channel_id, 1);
        assert!(channel.is_active);
        assert_eq!(sup.active_count(), 1);
    }

    #[tokio::test]
    async fn add_or_reactivate_is_idempotent_for_already_active_channel() {
        let sup = supervisor();
        seed_channel(&sup, 1, 10, "alice");
        sup.add_or_reactivate("alice", true).await.unwrap();
        let channel = sup.add_or_reactivate("alice", true).await.unwrap();
        assert!(channel.is_active);
        assert_eq!(sup.active_count(), 1);
    }

    #[tokio::test]
    async fn add_or_reactivate_with_active_false_stops_monitor() {
        let sup = supervisor();
        seed_channel(&sup, 1, 10, "alice");
        sup.add_or_reactivate("alice", true).await.unwrap();
        let channel = sup.add_or_reactivate("alice", false).await.unwrap();
        assert!(!channel.is_active);
        assert_eq!(sup.active_count(), 0);
    }

    #[tokio::test]
    async fn deactivate_stops_monitor_and_marks_inactive() {
        let sup = supervisor();
        seed_channel(&sup, 1, 10, "alice");
        sup.add_or_reactivate("alice", true).await.unwrap();
        sup.deactivate(1).unwrap();
        assert_eq!(sup.active_count(), 0);
        let channel = sup.store.find_channel_by_id(1).unwrap().unwrap();
        assert!(!channel.is_active);
    }

    #[tokio::test]
    async fn reactivate_after_deactivate_restarts_monitor() {
        let sup = supervisor();
        seed_channel(&sup, 1, 10, "alice");
        sup.add_or_reactivate("alice", true).await.unwrap();
        sup.deactivate(1).unwrap();
        let channel = sup.add_or_reactivate("alice", true).await.unwrap();
        assert!(channel.is_active);
        assert_eq!(sup.active_count(), 1);
    }
}
