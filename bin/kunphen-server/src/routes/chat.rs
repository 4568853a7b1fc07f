//! The assistant chat proxy route.
//!
//! Sanitizes the browser-supplied history, forwards it with the new message
//! to the upstream completion service exactly once, and returns the reply.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use kunphen_assistant::sanitize_history;
use tracing::debug;
use utoipa::OpenApi;

use crate::error::ServerError;
use crate::schemas::chat::{AiChatRequest, AiChatResponse, ErrorBody};
use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(
    paths(ai_chat),
    components(schemas(AiChatRequest, AiChatResponse, ErrorBody, kunphen_assistant::ChatMessage, kunphen_assistant::Role))
)]
pub struct ChatApi;

/// Register the chat proxy route.
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/api/ai-chat", post(ai_chat))
}

/// Assistant chat (`POST /api/ai-chat`).
///
/// `history` may be any JSON value. Only `user`/`assistant` entries with
/// string content survive, capped to the 12 most recent and 1000 characters
/// each.
#[utoipa::path(
    post,
    path = "/api/ai-chat",
    tag = "chat",
    request_body = AiChatRequest,
    responses(
        (status = 200, description = "Assistant reply", body = AiChatResponse),
        (status = 400, description = "Missing or empty message", body = ErrorBody),
        (status = 413, description = "Request body over 1 MB", body = ErrorBody),
        (status = 500, description = "Upstream failure or empty model output", body = ErrorBody),
    )
)]
pub async fn ai_chat(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<AiChatRequest>, JsonRejection>,
) -> Result<Json<AiChatResponse>, ServerError> {
    let Json(req) = payload?;

    let history = sanitize_history(&req.history);
    debug!(message_len = req.message.len(), history_len = history.len(), "ai chat request");

    let reply = state.assistant.reply(&req.message, &history).await?;
    Ok(Json(AiChatResponse { reply }))
}

// ── Tests ──────────────────────────────────────────────────────────────────────
