use thiserror::Error;

#[derive(Debug, Error)]
pub enum TextError {
    #[error("no JSON-shaped text node found in HTML payload")]
    NoJsonNode,
}

pub type Result<T> = std::result::Result<T, TextError>;
