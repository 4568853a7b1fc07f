//! Shared application state injected into every Axum handler.

use std::sync::Arc;

use kunphen_assistant::AssistantService;

use crate::config::Config;

/// Read-only state shared across all HTTP handlers. Nothing in here changes
/// after startup, so handlers never lock.
#[derive(Clone, Debug)]
pub struct AppState {
    /// Server configuration (env-derived).
    pub config: Arc<Config>,
    /// Reply generator backed by the upstream completion service.
    pub assistant: Arc<AssistantService>,
}
