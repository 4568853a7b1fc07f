//! Chat widget state machine.
//!
//! ```text
//!   Closed ──open──▶ OpenIdle ──begin_send──▶ OpenSending
//!     ▲                │  ▲                        │
//!     └─────close──────┘  └──────finish_send───────┘
//!
//!   OpenSending ──close──▶ Closed      (the pending reply still lands)
//! ```
//!
//! Visibility and the in-flight request are tracked apart: closing during a
//! send hides the widget, and the reply still lands in the transcript. The
//! transcript lives only as long as the widget (one browser session).

use tracing::warn;

use crate::client::ProxyClient;
use crate::error::ClientError;
use crate::history::{ChatMessage, MAX_HISTORY_MESSAGES};

/// First message shown when the widget is created.
pub const GREETING: &str = "Tashi Delek. I am your Tibetan medicine assistant. I can answer questions related to Sowa Rigpa, traditional remedies, lifestyle guidance, and preparation for consultation. I cannot help with unrelated topics.";

/// Shown in place of a reply when the proxy call fails for any reason.
pub const FALLBACK_REPLY: &str = "I cannot answer right now. Please try again in a moment, or contact the clinic directly for medical guidance.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WidgetState {
    Closed,
    OpenIdle,
    OpenSending,
}

/// Payload for one proxy call, captured at send time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMessage {
    pub message: String,
    /// Trailing window of the transcript, including `message` itself.
    pub history: Vec<ChatMessage>,
}

#[derive(Debug, Clone)]
pub struct ChatWidget {
    open: bool,
    sending: bool,
    transcript: Vec<ChatMessage>,
}

impl Default for ChatWidget {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatWidget {
    pub fn new() -> Self {
        Self {
            open: false,
            sending: false,
            transcript: vec![ChatMessage::assistant(GREETING)],
        }
    }

    pub fn state(&self) -> WidgetState {
        match (self.open, self.sending) {
            (false, _) => WidgetState::Closed,
            (true, true) => WidgetState::OpenSending,
            (true, false) => WidgetState::OpenIdle,
        }
    }

    /// Whether a proxy call is outstanding, regardless of visibility.
    pub fn is_sending(&self) -> bool {
        self.sending
    }

    pub fn transcript(&self) -> &[ChatMessage] {
        &self.transcript
    }

    pub fn open(&mut self) {
        self.open = true;
    }

    /// Hide the widget. An in-flight send keeps running.
    pub fn close(&mut self) {
        self.open = false;
    }

    pub fn can_send(&self, input: &str) -> bool {
        self.state() == WidgetState::OpenIdle && !input.trim().is_empty()
    }

    /// Record the user's message and move to `OpenSending`.
    ///
    /// Returns `None` (and changes nothing) when the input is blank or the
    /// widget is not idle, which blocks double submission.
    pub fn begin_send(&mut self, input: &str) -> Option<OutgoingMessage> {
        if !self.can_send(input) {
            return None;
        }
        let text = input.trim().to_owned();
        self.transcript.push(ChatMessage::user(text.clone()));
        self.sending = true;

        let start = self.transcript.len().saturating_sub(MAX_HISTORY_MESSAGES);
        Some(OutgoingMessage {
            message: text,
            history: self.transcript[start..].to_vec(),
        })
    }

    /// Apply the proxy outcome and clear the in-flight flag.
    ///
    /// The reply is appended even if the widget was closed meanwhile.
    /// Returns `false` if no send was in flight.
    pub fn finish_send(&mut self, outcome: Result<String, ClientError>) -> bool {
        if !self.sending {
            return false;
        }
        let reply = match outcome {
            Ok(reply) => reply,
            Err(e) => {
                warn!(error = %e, "assistant request failed");
                FALLBACK_REPLY.to_owned()
            }
        };
        self.transcript.push(ChatMessage::assistant(reply));
        self.sending = false;
        true
    }

    /// Full send cycle against the proxy. Returns `false` if the send was
    /// not accepted.
    pub async fn send(&mut self, client: &ProxyClient, input: &str) -> bool {
        let Some(outgoing) = self.begin_send(input) else {
            return false;
        };
        let outcome = client.send(&outgoing.message, &outgoing.history).await;
        self.finish_send(outcome)
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
