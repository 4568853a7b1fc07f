//! Unified server error type.
//!
//! Every handler returns `Result<T, ServerError>`, which implements
//! [`axum::response::IntoResponse`] so errors become a JSON
//! `{"error": "..."}` body with an appropriate status code.
//!
//! Upstream failures are logged with full detail, but the caller only ever
//! sees a fixed message. Provider error bodies, credentials and transport
//! details stay in the server logs.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use kunphen_assistant::AssistantError;
use thiserror::Error;
use tracing::{error, warn};

use crate::schemas::chat::ErrorBody;

pub const MESSAGE_REQUIRED: &str = "Message is required.";
pub const EMPTY_MODEL_RESPONSE: &str = "Empty model response.";
pub const UPSTREAM_FAILED: &str = "Failed to get AI response.";
pub const INVALID_BODY: &str = "Invalid request body.";
pub const BODY_TOO_LARGE: &str = "Request body too large.";

/// All errors that can occur in the kunphen-server request lifecycle.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error(transparent)]
    Assistant(#[from] AssistantError),

    /// The body was not acceptable JSON.
    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("request body exceeds the size limit")]
    PayloadTooLarge,
}

impl From<JsonRejection> for ServerError {
    fn from(rejection: JsonRejection) -> Self {
        warn!(status = rejection.status().as_u16(), reason = %rejection.body_text(), "rejected chat request body");
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            return ServerError::PayloadTooLarge;
        }
        match rejection {
            // Well-formed JSON of the wrong shape (e.g. a top-level array)
            // carries no usable message.
            JsonRejection::JsonDataError(_) => ServerError::BadRequest(MESSAGE_REQUIRED.to_owned()),
            _ => ServerError::BadRequest(INVALID_BODY.to_owned()),
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, client_message) = match &self {
            ServerError::BadRequest(m) => (StatusCode::BAD_REQUEST, m.clone()),
            ServerError::PayloadTooLarge => (StatusCode::PAYLOAD_TOO_LARGE, BODY_TOO_LARGE.to_owned()),

            ServerError::Assistant(AssistantError::Validation) => {
                (StatusCode::BAD_REQUEST, MESSAGE_REQUIRED.to_owned())
            }
            ServerError::Assistant(AssistantError::EmptyResponse) => {
                error!("AI chat error: model returned no text");
                (StatusCode::INTERNAL_SERVER_ERROR, EMPTY_MODEL_RESPONSE.to_owned())
            }
            ServerError::Assistant(e) => {
                error!(error = %e, "AI chat error");
                (StatusCode::INTERNAL_SERVER_ERROR, UPSTREAM_FAILED.to_owned())
            }
        };
        (status, Json(ErrorBody { error: client_message })).into_response()
    }
}
