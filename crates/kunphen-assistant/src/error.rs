use thiserror::Error;

/// Failures talking to the upstream completion service.
///
/// Display output may contain upstream response bodies, so it is meant for
/// server logs only and never for HTTP clients.
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("upstream transport error: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("upstream request timed out")]
    Timeout,

    #[error("upstream returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("upstream response could not be decoded: {0}")]
    Decode(#[from] serde_json::Error),
}

impl From<reqwest::Error> for UpstreamError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            UpstreamError::Timeout
        } else {
            UpstreamError::Transport(e)
        }
    }
}

/// Errors produced by [`crate::AssistantService::reply`].
#[derive(Debug, Error)]
pub enum AssistantError {
    /// The user message was empty after trimming. No upstream call was made.
    #[error("Message is required.")]
    Validation,

    /// The model answered but produced no usable text.
    #[error("empty model response")]
    EmptyResponse,

    /// The upstream call exceeded the configured timeout.
    #[error("upstream completion timed out")]
    Timeout,

    #[error("upstream completion failed: {0}")]
    Upstream(#[source] UpstreamError),
}

impl From<UpstreamError> for AssistantError {
    fn from(e: UpstreamError) -> Self {
        match e {
            UpstreamError::Timeout => AssistantError::Timeout,
            other => AssistantError::Upstream(other),
        }
    }
}

/// Errors seen by the chat widget when calling the proxy endpoint.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("AI assistant is currently unavailable.")]
    Unavailable,

    #[error("Invalid AI response.")]
    InvalidResponse,

    #[error("request to assistant failed: {0}")]
    Transport(#[from] reqwest::Error),
}
