pub mod chat;
pub mod error;
pub mod monitor;
pub mod poll;
pub mod profile;

pub use error::{MonitorError, Result};
pub use monitor::{spawn_channel_monitor, MonitorHandle};
