use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProxyError {
    #[error("solver request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("solver rejected request: {0}")]
    Rejected(String),

    #[error("could not extract payload from solver response: {0}")]
    Extract(#[from] castwatch_text::TextError),

    #[error("could not parse extracted payload: {0}")]
    Parse(#[from] serde_json::Error),
}

impl ProxyError {
    pub fn code(&self) -> &'static str {
        match self {
            ProxyError::Request(_) => "PROXY_REQUEST_FAILED",
            ProxyError::Rejected(_) => "PROXY_REJECTED",
            ProxyError::Extract(_) => "PAYLOAD_INVALID",
            ProxyError::Parse(_) => "PAYLOAD_INVALID",
        }
    }
}

pub type Result<T> = std::result::Result<T, ProxyError>;
