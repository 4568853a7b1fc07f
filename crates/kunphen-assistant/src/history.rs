//! Chat messages and the sanitized history window.
//!
//! History arrives from the browser as untrusted JSON. [`sanitize_history`]
//! is the only way to turn it into a [`ChatHistoryWindow`], and prompt
//! assembly only accepts that typed value.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;
use utoipa::ToSchema;

/// Maximum number of prior turns forwarded upstream.
pub const MAX_HISTORY_MESSAGES: usize = 12;

/// Maximum length of a single history entry, in characters.
pub const MAX_MESSAGE_CHARS: usize = 1000;

/// Author of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    fn parse(s: &str) -> Option<Self> {
        match s {
            "user" => Some(Role::User),
            "assistant" => Some(Role::Assistant),
            _ => None,
        }
    }
}

/// A single conversation turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ChatMessage {
    /// `"user"` or `"assistant"`.
    pub role: Role,
    /// Plain-text message body.
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self { role: Role::User, content: content.into() }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self { role: Role::Assistant, content: content.into() }
    }
}

/// Ordered, bounded slice of prior turns, most recent last.
///
/// Holds at most [`MAX_HISTORY_MESSAGES`] entries of at most
/// [`MAX_MESSAGE_CHARS`] characters each.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChatHistoryWindow(Vec<ChatMessage>);

impl ChatHistoryWindow {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ChatMessage> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[ChatMessage] {
        &self.0
    }
}

impl<'a> IntoIterator for &'a ChatHistoryWindow {
    type Item = &'a ChatMessage;
    type IntoIter = std::slice::Iter<'a, ChatMessage>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Build a [`ChatHistoryWindow`] from untrusted request JSON.
///
/// Anything other than an array yields an empty window. Array elements that
/// are not objects with a `user`/`assistant` role and a string `content` are
/// dropped. The last [`MAX_HISTORY_MESSAGES`] survivors are kept in order and
/// each is truncated to [`MAX_MESSAGE_CHARS`].
pub fn sanitize_history(raw: &Value) -> ChatHistoryWindow {
    let Some(entries) = raw.as_array() else {
        return ChatHistoryWindow::default();
    };

    let valid: Vec<(Role, &str)> = entries.iter().filter_map(parse_entry).collect();
    let skip = valid.len().saturating_sub(MAX_HISTORY_MESSAGES);

    let window: Vec<ChatMessage> = valid
        .into_iter()
        .skip(skip)
        .map(|(role, content)| ChatMessage {
            role,
            content: truncate_chars(content, MAX_MESSAGE_CHARS).to_owned(),
        })
        .collect();

    if window.len() != entries.len() {
        debug!(received = entries.len(), kept = window.len(), "history entries dropped");
    }

    ChatHistoryWindow(window)
}

fn parse_entry(value: &Value) -> Option<(Role, &str)> {
    let obj = value.as_object()?;
    let role = Role::parse(obj.get("role")?.as_str()?)?;
    let content = obj.get("content")?.as_str()?;
    Some((role, content))
}

/// Longest prefix of `s` holding at most `max` characters.
pub fn truncate_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
