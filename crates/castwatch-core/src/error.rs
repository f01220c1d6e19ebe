use thiserror::Error;

#[derive(Debug, Error)]
pub enum CastwatchError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Missing required configuration: {0}")]
    ConfigMissing(String),

    #[error("Proxy rejected request: {0}")]
    ProxyRejected(String),

    #[error("Invalid payload: {0}")]
    PayloadInvalid(String),

    #[error("Record not found: {0}")]
    NotFound(String),

    #[error("Conflicting record: {0}")]
    Conflict(String),

    #[error("Persistence error: {0}")]
    Persistence(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("No data available for report: {0}")]
    NoData(String),
}

impl CastwatchError {
    /// Short error code string for callers that want a stable identifier
    /// rather than matching on the display message.
    pub fn code(&self) -> &'static str {
        match self {
            CastwatchError::Config(_) => "CONFIG_ERROR",
            CastwatchError::ConfigMissing(_) => "CONFIG_MISSING",
            CastwatchError::ProxyRejected(_) => "PROXY_REJECTED",
            CastwatchError::PayloadInvalid(_) => "PAYLOAD_INVALID",
            CastwatchError::NotFound(_) => "NOT_FOUND",
            CastwatchError::Conflict(_) => "CONFLICT",
            CastwatchError::Persistence(_) => "PERSISTENCE_ERROR",
            CastwatchError::Transport(_) => "TRANSPORT_ERROR",
            CastwatchError::NoData(_) => "NO_DATA",
        }
    }
}

pub type Result<T> = std::result::Result<T, CastwatchError>;
