//! Liveness endpoint.

use std::sync::Arc;

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use utoipa::{OpenApi, ToSchema};

use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(paths(get_health), components(schemas(HealthStatus)))]
pub struct HealthApi;

/// What the proxy is configured to talk to. Never includes the credential.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthStatus {
    pub status: String,
    pub version: String,
    /// Model every chat request is sent to.
    pub model: String,
    /// Base URL of the completion API.
    pub upstream: String,
    /// Upstream request timeout; absent when requests wait indefinitely.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upstream_timeout_secs: Option<u64>,
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/health", get(get_health))
}

/// Report that the proxy is up and which upstream it forwards to.
///
/// Does not contact the upstream completion service.
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Proxy is serving", body = HealthStatus)
    )
)]
pub async fn get_health(State(state): State<Arc<AppState>>) -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "ok".to_owned(),
        version: env!("CARGO_PKG_VERSION").to_owned(),
        model: state.assistant.model().to_owned(),
        upstream: state.config.base_url.clone(),
        upstream_timeout_secs: state.config.upstream_timeout.map(|t| t.as_secs()),
    })
}
