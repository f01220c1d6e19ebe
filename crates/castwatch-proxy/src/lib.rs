pub mod client;
pub mod error;
pub mod types;

pub use client::{ChannelFetch, ProxyClient};
pub use error::{ProxyError, Result};
pub use types::{ChannelPayload, ChatroomPayload, LivestreamPayload, UserProfilePayload};
