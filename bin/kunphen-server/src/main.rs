//! kunphen-server – entry point.
//!
//! Startup order:
//! 1. Parse configuration from environment variables (fails without `OPENAI_API_KEY`).
//! 2. Initialise structured tracing (JSON in production, pretty in dev).
//! 3. Build the upstream completion client and the assistant service.
//! 4. Build the Axum router and start the HTTP server with graceful shutdown.

mod config;
mod error;
mod middleware;
mod routes;
mod schemas;
mod state;

use std::sync::Arc;

use kunphen_assistant::upstream::OpenAiCompletionClient;
use kunphen_assistant::AssistantService;
use tracing::{info, warn};

use crate::config::Config;
use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ── 1. Configuration ───────────────────────────────────────────────────────
    let cfg = Config::from_env()?;

    // ── 2. Tracing ─────────────────────────────────────────────────────────────
    init_tracing(&cfg);

    info!(version = env!("CARGO_PKG_VERSION"), "kunphen-server starting");

    // ── 3. Assistant ───────────────────────────────────────────────────────────
    let upstream = OpenAiCompletionClient::new(&cfg.base_url, &cfg.api_key, cfg.upstream_timeout)?;
    match cfg.upstream_timeout {
        Some(t) => info!(model = %cfg.model, base_url = %cfg.base_url, timeout_secs = t.as_secs(), "upstream client ready"),
        None => info!(model = %cfg.model, base_url = %cfg.base_url, "upstream client ready (no timeout)"),
    }
    let assistant = AssistantService::new(Arc::new(upstream), cfg.model.clone());

    let state = Arc::new(AppState {
        config: Arc::new(cfg.clone()),
        assistant: Arc::new(assistant),
    });

    // ── 4. HTTP server with graceful shutdown ──────────────────────────────────
    let app = routes::build(Arc::clone(&state));
    let listener = bind(&cfg).await?;
    info!(addr = %listener.local_addr()?, "AI chat server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("kunphen-server stopped");
    Ok(())
}

/// Resolve `host` through the system resolver, so names such as
/// `localhost` and bare IPv6 addresses such as `::` both work.
async fn bind(cfg: &Config) -> std::io::Result<tokio::net::TcpListener> {
    tokio::net::TcpListener::bind((cfg.host.as_str(), cfg.port)).await
}

/// `RUST_LOG` wins over `KUNPHEN_LOG`; an unparsable `KUNPHEN_LOG` falls
/// back to `info` with a warning on stderr.
fn init_tracing(cfg: &Config) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        cfg.log_level.parse().unwrap_or_else(|e| {
            eprintln!(
                "WARN: KUNPHEN_LOG='{}' is not a valid tracing filter ({e}); falling back to 'info'",
                cfg.log_level
            );
            tracing_subscriber::EnvFilter::new("info")
        })
    });

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true);

    if cfg.log_json {
        subscriber.json().init();
    } else {
        subscriber.init();
    }
}

/// Returns a future that resolves when SIGINT (Ctrl-C) or SIGTERM is received.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "failed to install CTRL+C signal handler");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut s) => {
                s.recv().await;
            }
            Err(e) => warn!(error = %e, "failed to install SIGTERM handler"),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }

    info!("shutdown signal received; starting graceful shutdown");
}

#[cfg(test)]
mod test {
    use super::*;

    fn config(host: &str) -> Config {
        Config::from_lookup(|k| match k {
            "OPENAI_API_KEY" => Some("sk-test".to_owned()),
            "AI_SERVER_HOST" => Some(host.to_owned()),
            "AI_SERVER_PORT" => Some("0".to_owned()),
            _ => None,
        })
        .expect("test config")
    }

    #[tokio::test]
    async fn binds_to_a_host_name() {
        let listener = bind(&config("localhost")).await.unwrap();
        let addr = listener.local_addr().unwrap();
        assert!(addr.ip().is_loopback());
        assert_ne!(addr.port(), 0);
    }

    #[tokio::test]
    async fn binds_to_an_ip_literal() {
        let listener = bind(&config("127.0.0.1")).await.unwrap();
        assert_eq!(listener.local_addr().unwrap().ip().to_string(), "127.0.0.1");
    }
}
