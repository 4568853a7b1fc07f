//! Bodies for `POST /api/ai-chat`.

use kunphen_assistant::ChatMessage;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

/// Request body for `POST /api/ai-chat`.
///
/// Deserialization is loose: a missing or non-string `message`
/// becomes empty (and fails validation later), and `history` is kept as raw
/// JSON until it is sanitized.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct AiChatRequest {
    /// The user's new message.
    #[serde(default, deserialize_with = "lenient_string")]
    pub message: String,
    /// Prior turns, oldest first. Malformed entries are dropped.
    #[serde(default)]
    #[schema(value_type = Vec<ChatMessage>)]
    pub history: Value,
}

/// Response body for a successful `POST /api/ai-chat`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AiChatResponse {
    /// The assistant's reply, trimmed and non-empty.
    pub reply: String,
}

/// Body of every error response.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    pub error: String,
}

fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        _ => String::new(),
    })
}
