use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{ProxyError, Result};
use crate::types::ChannelPayload;

const CHANNEL_ENDPOINT_BASE: &str = "https://kick.com/api/v2/channels";

/// Wraps upstream GETs behind a solver proxy that performs whatever
/// anti-bot negotiation the target site requires and hands back the raw
/// response wrapped in an HTML envelope.
pub struct ProxyClient {
    client: reqwest::Client,
    solver_url: String,
    timeout_ms: u64,
}

impl ProxyClient {
    pub fn new(solver_url: String, timeout_ms: u64) -> Self {
        Self {
            client: reqwest::Client::new(),
            solver_url,
            timeout_ms,
        }
    }

    /// Fetch a channel's public payload by username, along with the raw JSON
    /// text the solver response was extracted from — callers that persist an
    /// opaque snapshot of the upstream payload need the original text, not a
    /// re-serialization of the parsed struct.
    pub async fn fetch_channel(&self, username: &str) -> Result<ChannelFetch> {
        let target_url = format!("{}/{}", CHANNEL_ENDPOINT_BASE, username);
        let envelope = SolveRequest {
            cmd: "request.get",
            url: &target_url,
            max_timeout: self.timeout_ms,
        };

        debug!(username, "posting fetch envelope to solver");

        let resp = self
            .client
            .post(&self.solver_url)
            .json(&envelope)
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            warn!(%status, body = %text, "solver endpoint returned non-success status");
            return Err(ProxyError::Rejected(format!(
                "solver HTTP {}: {}",
                status, text
            )));
        }

        let envelope: SolveResponse = resp.json().await?;
        if envelope.status != "ok" {
            return Err(ProxyError::Rejected(envelope.message));
        }

        let raw = envelope
            .solution
            .map(|s| s.response)
            .unwrap_or_default();

        let json_text = castwatch_text::extract_first_json_text(&raw)?;
        let payload: ChannelPayload = serde_json::from_str(&json_text)?;
        Ok(ChannelFetch {
            raw_json: json_text,
            payload,
        })
    }
}

/// A channel payload together with the raw JSON text it was parsed from.
#[derive(Debug, Clone)]
pub struct ChannelFetch {
    pub raw_json: String,
    pub payload: ChannelPayload,
}

#[derive(Debug, Serialize)]
struct SolveRequest<'a> {
    cmd: &'a str,
    url: &'a str,
    #[serde(rename = "maxTimeout")]
    max_timeout: u64,
}

#[derive(Debug, Deserialize)]
struct SolveResponse {
    status: String,
    #[serde(default)]
    message: String,
    #[serde(default)]
    solution: Option<Solution>,
}

#[derive(Debug, Deserialize)]
struct Solution {
    response: String,
}
