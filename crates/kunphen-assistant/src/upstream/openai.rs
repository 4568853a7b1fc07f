//! OpenAI-compatible completion client.
//!
//! Works against the official API and any provider exposing the same
//! `/v1/chat/completions` endpoint.

use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, error};

use super::{CompletionRequest, CompletionResponse, CompletionService};
use crate::error::UpstreamError;
use crate::history::truncate_chars;

/// Upper bound on how much of an upstream error body ends up in the logs.
const MAX_LOGGED_BODY_CHARS: usize = 512;

pub struct OpenAiCompletionClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl std::fmt::Debug for OpenAiCompletionClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiCompletionClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl OpenAiCompletionClient {
    /// `timeout` of `None` leaves requests unbounded.
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Option<Duration>,
    ) -> Result<Self, UpstreamError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(UpstreamError::Transport)?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_owned(),
            api_key: api_key.into(),
        })
    }

    fn completions_url(&self) -> String {
        format!("{}/v1/chat/completions", self.base_url)
    }
}

#[async_trait]
impl CompletionService for OpenAiCompletionClient {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, UpstreamError> {
        debug!(model = %request.model, turns = request.messages.len(), "sending completion request");

        let response = self
            .http
            .post(self.completions_url())
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            error!(status = status.as_u16(), "completion request rejected upstream");
            return Err(UpstreamError::Status {
                status: status.as_u16(),
                body: truncate_chars(&body, MAX_LOGGED_BODY_CHARS).to_owned(),
            });
        }

        Ok(serde_json::from_str(&body)?)
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod test {
    use super::*;
    use crate::upstream::Turn;
    use mockito::Matcher;
    use serde_json::json;

    fn request() -> CompletionRequest {
        CompletionRequest {
            model: "gpt-4o-mini".into(),
            messages: vec![Turn::system("be kind"), Turn::user("What herbs help digestion?")],
            temperature: 0.3,
        }
    }

    #[tokio::test]
    async fn posts_to_chat_completions_with_bearer_auth() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/chat/completions")
            .match_header("authorization", "Bearer sk-test")
            .match_body(Matcher::PartialJson(json!({
                "model": "gpt-4o-mini",
                "messages": [
                    { "role": "system", "content": "be kind" },
                    { "role": "user", "content": "What herbs help digestion?" }
                ]
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "choices": [{ "index": 0, "message": { "role": "assistant", "content": "Warm ginger tea." } }]
                })
                .to_string(),
            )
            .create_async()
            .await;

        let client = OpenAiCompletionClient::new(server.url(), "sk-test", None).unwrap();
        let resp = client.complete(request()).await.unwrap();

        assert_eq!(resp.first_text(), Some("Warm ginger tea."));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn trailing_slash_in_base_url_is_ignored() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/chat/completions")
            .with_status(200)
            .with_body(r#"{"choices":[]}"#)
            .create_async()
            .await;

        let client = OpenAiCompletionClient::new(format!("{}/", server.url()), "k", None).unwrap();
        let resp = client.complete(request()).await.unwrap();

        assert_eq!(resp.first_text(), None);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn non_success_status_is_an_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/v1/chat/completions")
            .with_status(401)
            .with_body(r#"{"error":{"message":"Incorrect API key provided"}}"#)
            .create_async()
            .await;

        let client = OpenAiCompletionClient::new(server.url(), "bad", None).unwrap();
        let err = client.complete(request()).await.unwrap_err();

        match err {
            UpstreamError::Status { status, body } => {
                assert_eq!(status, 401);
                assert!(body.contains("Incorrect API key"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn malformed_body_is_a_decode_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/v1/chat/completions")
            .with_status(200)
            .with_body("<html>gateway</html>")
            .create_async()
            .await;

        let client = OpenAiCompletionClient::new(server.url(), "k", None).unwrap();
        let err = client.complete(request()).await.unwrap_err();

        assert!(matches!(err, UpstreamError::Decode(_)), "got {err:?}");
    }

    #[tokio::test]
    async fn unreachable_upstream_is_a_transport_error() {
        // Bind then drop to get a local port with nothing listening.
        let addr = {
            let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
            listener.local_addr().unwrap()
        };

        let client = OpenAiCompletionClient::new(format!("http://{addr}"), "k", None).unwrap();
        let err = client.complete(request()).await.unwrap_err();

        assert!(matches!(err, UpstreamError::Transport(_)), "got {err:?}");
    }

    #[tokio::test]
    async fn configured_timeout_surfaces_as_timeout() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        // Accept the connection and never answer.
        let hold = tokio::spawn(async move {
            let (socket, _) = listener.accept().await.unwrap();
            tokio::time::sleep(Duration::from_secs(30)).await;
            drop(socket);
        });

        let client = OpenAiCompletionClient::new(
            format!("http://{addr}"),
            "k",
            Some(Duration::from_millis(200)),
        )
        .unwrap();
        let err = client.complete(request()).await.unwrap_err();

        assert!(matches!(err, UpstreamError::Timeout), "got {err:?}");
        hold.abort();
    }
}
