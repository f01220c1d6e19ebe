use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error(transparent)]
    Store(#[from] castwatch_store::StoreError),

    #[error("no chat data for livestream {0}")]
    NoData(i64),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("invalid timestamp stored for livestream {0}: {1}")]
    BadTimestamp(i64, String),

    #[error("invalid livestream id: {0}")]
    PayloadInvalid(i64),
}

pub type Result<T> = std::result::Result<T, ReportError>;
