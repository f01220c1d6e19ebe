use thiserror::Error;

#[derive(Debug, Error)]
pub enum SupervisorError {
    #[error(transparent)]
    Store(#[from] castwatch_store::StoreError),

    #[error(transparent)]
    Proxy(#[from] castwatch_proxy::ProxyError),

    #[error("channel {0} is already monitored")]
    AlreadyMonitored(i64),

    #[error("channel payload for {0} is missing chatroom info")]
    PayloadInvalid(String),
}

pub type Result<T> = std::result::Result<T, SupervisorError>;
