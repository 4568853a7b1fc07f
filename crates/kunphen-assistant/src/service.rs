//! The proxy's single operation: one user message in, one reply out.

use std::sync::Arc;

use tracing::{debug, info};

use crate::error::AssistantError;
use crate::history::ChatHistoryWindow;
use crate::prompt::build_messages;
use crate::upstream::{CompletionRequest, CompletionService};

/// Sampling temperature for every upstream call. Kept low so answers stay on
/// the guardrail prompt.
pub const TEMPERATURE: f32 = 0.3;

/// Stateless reply generator shared by all requests.
///
/// Calls the upstream service at most once per [`reply`](Self::reply), with
/// no retry or backoff.
pub struct AssistantService {
    upstream: Arc<dyn CompletionService>,
    model: String,
}

impl std::fmt::Debug for AssistantService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AssistantService").field("model", &self.model).finish()
    }
}

impl AssistantService {
    pub fn new(upstream: Arc<dyn CompletionService>, model: impl Into<String>) -> Self {
        Self { upstream, model: model.into() }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Generate a reply to `message` given the already-sanitized `history`.
    ///
    /// Returns [`AssistantError::Validation`] without contacting upstream when
    /// `message` is blank. On success the reply is trimmed and non-empty.
    pub async fn reply(
        &self,
        message: &str,
        history: &ChatHistoryWindow,
    ) -> Result<String, AssistantError> {
        let message = message.trim();
        if message.is_empty() {
            return Err(AssistantError::Validation);
        }

        let request = CompletionRequest {
            model: self.model.clone(),
            messages: build_messages(history, message),
            temperature: TEMPERATURE,
        };
        debug!(model = %self.model, history_len = history.len(), "requesting completion");

        let response = self.upstream.complete(request).await?;

        let reply = response.first_text().map(str::trim).unwrap_or_default();
        if reply.is_empty() {
            return Err(AssistantError::EmptyResponse);
        }

        info!(model = %self.model, reply_len = reply.len(), "completion done");
        Ok(reply.to_owned())
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
