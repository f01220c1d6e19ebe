use thiserror::Error;

#[derive(Debug, Error)]
pub enum MonitorError {
    #[error(transparent)]
    Proxy(#[from] castwatch_proxy::ProxyError),

    #[error(transparent)]
    Store(#[from] castwatch_store::StoreError),

    #[error("chat transport error: {0}")]
    Transport(String),

    #[error("invalid payload: {0}")]
    PayloadInvalid(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, MonitorError>;
