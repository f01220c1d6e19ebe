use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Internally generated identifier (UUIDv7 — time-sortable for log correlation
/// and for ordering rows inserted within the same second).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecordId(pub String);

impl RecordId {
    pub fn new() -> Self {
        Self(Uuid::now_v7().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for RecordId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for RecordId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for RecordId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// A value the upstream platform sometimes sends typed, sometimes omits, and
/// sometimes sends as an unexpected shape (numbers where strings are usual,
/// nested objects, etc). Rather than fail parsing, unexpected shapes are kept
/// as raw JSON so nothing is silently discarded.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MaybeString {
    Value(String),
    Unknown(serde_json::Value),
    #[serde(skip)]
    Absent,
}

impl MaybeString {
    /// Coerce to a plain string for storage — non-string shapes collapse to
    /// empty rather than carrying partial JSON into a text column.
    pub fn into_string(self) -> String {
        match self {
            MaybeString::Value(s) => s,
            MaybeString::Unknown(_) | MaybeString::Absent => String::new(),
        }
    }
}

impl Default for MaybeString {
    fn default() -> Self {
        MaybeString::Absent
    }
}
