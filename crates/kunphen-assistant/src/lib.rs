//! Core of the Kunphen clinic chat assistant.
//!
//! The crate holds everything that is not HTTP-server plumbing:
//! - [`history`]: typed chat messages and the sanitized history window
//! - [`persona`]: the fixed guardrail system prompt
//! - [`prompt`]: assembly of the outbound turn list
//! - [`upstream`]: the completion-service port and its OpenAI-compatible client
//! - [`service`]: the single-shot reply operation used by the proxy endpoint
//! - [`widget`] / [`client`]: the browser-side chat widget state machine and
//!   the transport it uses to reach the proxy

pub mod client;
pub mod error;
pub mod history;
pub mod persona;
pub mod prompt;
pub mod service;
pub mod upstream;
pub mod widget;

pub use error::{AssistantError, ClientError, UpstreamError};
pub use history::{sanitize_history, ChatHistoryWindow, ChatMessage, Role};
pub use service::AssistantService;
