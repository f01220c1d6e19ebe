pub mod db;
pub mod error;
pub mod store;
pub mod types;

pub use error::{Result, StoreError};
pub use store::CastwatchStore;
pub use types::{
    ChannelSnapshot, ChatEvent, LivestreamReport, LivestreamSnapshot, MonitoredChannel,
    SpamReport, StreamerProfile,
};
