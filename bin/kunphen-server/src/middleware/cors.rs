use axum::http::{HeaderName, HeaderValue, Method};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tracing::warn;

use crate::config::Config;
use crate::middleware::trace::X_TRACE_ID;

/// CORS for the chat endpoint.
///
/// `CORS_ORIGIN` may hold one origin or a comma-separated list. When it is
/// unset, contains `*`, or none of its entries parse, every origin is allowed.
pub fn cors_layer(config: &Config) -> CorsLayer {
    let base = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any)
        .expose_headers([HeaderName::from_static(X_TRACE_ID)]);

    let Some(origins_str) = config.cors_origin.as_deref() else {
        return base.allow_origin(Any);
    };

    let entries: Vec<&str> = origins_str
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();

    // `AllowOrigin::list` refuses a wildcard entry.
    if entries.contains(&"*") {
        return base.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = entries.iter().filter_map(|s| s.parse().ok()).collect();

    if origins.is_empty() {
        warn!(cors_origin = %origins_str, "no usable CORS origins configured; allowing any origin");
        return base.allow_origin(Any);
    }
    base.allow_origin(AllowOrigin::list(origins))
}
