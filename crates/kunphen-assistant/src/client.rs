//! Transport the chat widget uses to reach the proxy endpoint.

use serde::{Deserialize, Serialize};

use crate::error::ClientError;
use crate::history::ChatMessage;

/// Path the proxy endpoint is mounted on.
pub const DEFAULT_ENDPOINT_PATH: &str = "/api/ai-chat";

#[derive(Debug, Serialize)]
struct ProxyRequest<'a> {
    message: &'a str,
    history: &'a [ChatMessage],
}

#[derive(Debug, Deserialize)]
struct ProxyReply {
    #[serde(default)]
    reply: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ProxyClient {
    http: reqwest::Client,
    endpoint: String,
}

impl ProxyClient {
    /// `endpoint` is the full URL of the proxy route.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self { http: reqwest::Client::new(), endpoint: endpoint.into() }
    }

    /// Client for a proxy served at `base_url` under [`DEFAULT_ENDPOINT_PATH`].
    pub fn for_origin(base_url: &str) -> Self {
        Self::new(format!("{}{}", base_url.trim_end_matches('/'), DEFAULT_ENDPOINT_PATH))
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub async fn send(&self, message: &str, history: &[ChatMessage]) -> Result<String, ClientError> {
        let response = self
            .http
            .post(&self.endpoint)
            .json(&ProxyRequest { message, history })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ClientError::Unavailable);
        }

        let body: ProxyReply = response.json().await.map_err(|_| ClientError::InvalidResponse)?;
        match body.reply {
            Some(reply) if !reply.is_empty() => Ok(reply),
            _ => Err(ClientError::InvalidResponse),
        }
    }
}
