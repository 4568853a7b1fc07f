//! Server configuration, loaded from environment variables at startup.

use std::time::Duration;

use thiserror::Error;

/// Fatal startup configuration problems.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),

    #[error("invalid value '{value}' for {key}: expected {expected}")]
    Invalid {
        key: &'static str,
        value: String,
        expected: &'static str,
    },
}

/// Runtime configuration for kunphen-server.
///
/// Built once in `main` and shared read-only with every handler. Only the
/// upstream credential is required.
#[derive(Clone)]
pub struct Config {
    /// Interface to bind (default: `"0.0.0.0"`).
    pub host: String,

    /// TCP port (default: `8787`).
    pub port: u16,

    /// Bearer credential for the upstream completion API.
    pub api_key: String,

    /// Upstream model identifier (default: `"gpt-4o-mini"`).
    pub model: String,

    /// Base URL of the OpenAI-compatible API (default: `"https://api.openai.com"`).
    pub base_url: String,

    /// Upstream request timeout. `None` waits indefinitely.
    pub upstream_timeout: Option<Duration>,

    /// Comma-separated allowed CORS origins. `None` allows any origin.
    pub cors_origin: Option<String>,

    /// `tracing` filter string, e.g. `"info"` or `"debug,tower_http=warn"`.
    pub log_level: String,

    /// When `true`, emit log records as newline-delimited JSON.
    pub log_json: bool,

    /// Serve Swagger UI and the OpenAPI document.
    pub enable_swagger: bool,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("upstream_timeout", &self.upstream_timeout)
            .field("cors_origin", &self.cors_origin)
            .field("log_level", &self.log_level)
            .field("log_json", &self.log_json)
            .field("enable_swagger", &self.enable_swagger)
            .finish()
    }
}

impl Config {
    /// Build [`Config`] from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build [`Config`] from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let api_key = get("OPENAI_API_KEY").ok_or(ConfigError::Missing("OPENAI_API_KEY"))?;

        let port = match get("AI_SERVER_PORT") {
            Some(v) => v.trim().parse().map_err(|_| ConfigError::Invalid {
                key: "AI_SERVER_PORT",
                value: v,
                expected: "a TCP port number",
            })?,
            None => 8787,
        };

        let upstream_timeout = match get("OPENAI_TIMEOUT_SECS") {
            Some(v) => match v.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => Some(Duration::from_secs(secs)),
                _ => {
                    return Err(ConfigError::Invalid {
                        key: "OPENAI_TIMEOUT_SECS",
                        value: v,
                        expected: "a positive number of seconds",
                    });
                }
            },
            None => None,
        };

        Ok(Self {
            host: get("AI_SERVER_HOST").unwrap_or_else(|| "0.0.0.0".to_owned()),
            port,
            api_key,
            model: get("OPENAI_MODEL").unwrap_or_else(|| "gpt-4o-mini".to_owned()),
            base_url: get("OPENAI_BASE_URL").unwrap_or_else(|| "https://api.openai.com".to_owned()),
            upstream_timeout,
            cors_origin: get("CORS_ORIGIN"),
            log_level: get("KUNPHEN_LOG").unwrap_or_else(|| "info".to_owned()),
            log_json: get("KUNPHEN_LOG_JSON").is_some_and(|v| flag(&v)),
            enable_swagger: get("KUNPHEN_ENABLE_SWAGGER").is_none_or(|v| flag(&v)),
        })
    }
}

// ── private helpers ──────────────────────────────────────────────────────────

fn flag(v: &str) -> bool {
    v == "1" || v.eq_ignore_ascii_case("true")
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod test {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let map: HashMap<String, String> =
            vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        Config::from_lookup(|k| map.get(k).cloned())
    }

    #[test]
    fn missing_api_key_is_fatal() {
        let err = load(&[]).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("OPENAI_API_KEY")));
        assert!(err.to_string().contains("OPENAI_API_KEY"));
    }

    #[test]
    fn blank_api_key_counts_as_missing() {
        assert!(matches!(
            load(&[("OPENAI_API_KEY", "   ")]),
            Err(ConfigError::Missing(_))
        ));
    }

    #[test]
    fn defaults_apply() {
        let cfg = load(&[("OPENAI_API_KEY", "sk-test")]).unwrap();
        assert_eq!(cfg.port, 8787);
        assert_eq!(cfg.model, "gpt-4o-mini");
        assert_eq!(cfg.base_url, "https://api.openai.com");
        assert_eq!(cfg.host, "0.0.0.0");
        assert!(cfg.upstream_timeout.is_none());
        assert!(cfg.cors_origin.is_none());
        assert!(cfg.enable_swagger);
        assert!(!cfg.log_json);
    }

    #[test]
    fn overrides_are_read() {
        let cfg = load(&[
            ("OPENAI_API_KEY", "sk-test"),
            ("OPENAI_MODEL", "gpt-4.1-mini"),
            ("AI_SERVER_PORT", "9000"),
            ("AI_SERVER_HOST", "127.0.0.1"),
            ("CORS_ORIGIN", "https://kunphen.example"),
            ("OPENAI_TIMEOUT_SECS", "30"),
            ("KUNPHEN_LOG_JSON", "true"),
            ("KUNPHEN_ENABLE_SWAGGER", "false"),
        ])
        .unwrap();
        assert_eq!(cfg.model, "gpt-4.1-mini");
        assert_eq!((cfg.host.as_str(), cfg.port), ("127.0.0.1", 9000));
        assert_eq!(cfg.cors_origin.as_deref(), Some("https://kunphen.example"));
        assert_eq!(cfg.upstream_timeout, Some(Duration::from_secs(30)));
        assert!(cfg.log_json);
        assert!(!cfg.enable_swagger);
    }

    #[test]
    fn host_names_and_ipv6_are_kept_verbatim() {
        for host in ["localhost", "::", "::1"] {
            let cfg = load(&[("OPENAI_API_KEY", "k"), ("AI_SERVER_HOST", host)]).unwrap();
            assert_eq!(cfg.host, host);
        }
    }

    #[test]
    fn invalid_port_is_rejected() {
        let err = load(&[("OPENAI_API_KEY", "k"), ("AI_SERVER_PORT", "eighty")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "AI_SERVER_PORT", .. }));
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let err = load(&[("OPENAI_API_KEY", "k"), ("OPENAI_TIMEOUT_SECS", "0")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "OPENAI_TIMEOUT_SECS", .. }));
    }

    #[test]
    fn debug_output_redacts_api_key() {
        let cfg = load(&[("OPENAI_API_KEY", "sk-very-secret")]).unwrap();
        let rendered = format!("{cfg:?}");
        assert!(!rendered.contains("sk-very-secret"));
        assert!(rendered.contains("<redacted>"));
    }
}
