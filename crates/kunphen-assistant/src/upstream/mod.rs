//! Upstream chat-completion service port.
//!
//! [`CompletionService`] is the seam between the assistant and the language
//! model provider. The wire types follow the OpenAI chat completions format,
//! which [`openai::OpenAiCompletionClient`] sends as-is.

pub mod openai;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::UpstreamError;
use crate::history::{ChatMessage, Role};

pub use openai::OpenAiCompletionClient;

/// Role of an outbound turn. Unlike [`Role`], this includes `system`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnRole {
    System,
    User,
    Assistant,
}

/// A role-tagged turn in an upstream request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub role: TurnRole,
    pub content: String,
}

impl Turn {
    pub fn system(content: impl Into<String>) -> Self {
        Self { role: TurnRole::System, content: content.into() }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self { role: TurnRole::User, content: content.into() }
    }
}

impl From<&ChatMessage> for Turn {
    fn from(m: &ChatMessage) -> Self {
        let role = match m.role {
            Role::User => TurnRole::User,
            Role::Assistant => TurnRole::Assistant,
        };
        Self { role, content: m.content.clone() }
    }
}

/// Request body for `POST /v1/chat/completions`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompletionRequest {
    pub model: String,
    pub messages: Vec<Turn>,
    pub temperature: f32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CompletionMessage {
    #[serde(default)]
    pub content: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CompletionChoice {
    #[serde(default)]
    pub message: Option<CompletionMessage>,
}

/// The subset of a chat completion response the assistant reads.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CompletionResponse {
    #[serde(default)]
    pub choices: Vec<CompletionChoice>,
}

impl CompletionResponse {
    /// Content of the first candidate, if there is one.
    pub fn first_text(&self) -> Option<&str> {
        self.choices.first()?.message.as_ref()?.content.as_deref()
    }

    /// Single-choice response, mostly useful for fakes in tests.
    pub fn with_text(text: impl Into<String>) -> Self {
        Self {
            choices: vec![CompletionChoice {
                message: Some(CompletionMessage { content: Some(text.into()) }),
            }],
        }
    }
}

/// A provider that turns an ordered list of turns into candidate completions.
#[async_trait]
pub trait CompletionService: Send + Sync {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, UpstreamError>;
}
