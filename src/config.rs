//! Application constants and environment-driven settings.

pub const APP_NAME: &str = "Harbinger";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default tracing filter when RUST_LOG is unset.
pub fn default_log_filter() -> &'static str {
    "info,harbinger=debug"
}

/// Runtime settings, read once at startup. Every knob has a default so
/// the service runs with no environment at all.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Bind address for the HTTP API.
    pub host: String,
    pub port: u16,
    /// Base URL of the local Ollama instance used for reasoning.
    pub ollama_url: String,
    pub ollama_model: String,
    /// Bound on each reasoning call; there are no retries.
    pub reason_timeout_secs: u64,
    /// Session lifetime before eviction.
    pub session_ttl_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 8000,
            ollama_url: "http://localhost:11434".into(),
            ollama_model: "llama3.1:8b".into(),
            reason_timeout_secs: 120,
            session_ttl_secs: 3600,
        }
    }
}

impl Settings {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            host: env_or("HOST", defaults.host),
            port: env_parse_or("PORT", defaults.port),
            ollama_url: env_or("OLLAMA_URL", defaults.ollama_url),
            ollama_model: env_or("OLLAMA_MODEL", defaults.ollama_model),
            reason_timeout_secs: env_parse_or("REASON_TIMEOUT_SECS", defaults.reason_timeout_secs),
            session_ttl_secs: env_parse_or("SESSION_TTL_SECS", defaults.session_ttl_secs),
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn env_or(key: &str, default: String) -> String {
    std::env::var(key).ok().filter(|v| !v.is_empty()).unwrap_or(default)
}

fn env_parse_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let settings = Settings::default();
        assert_eq!(settings.port, 8000);
        assert_eq!(settings.ollama_url, "http://localhost:11434");
        assert!(settings.reason_timeout_secs > 0);
        assert!(settings.session_ttl_secs > 0);
    }

    #[test]
    fn bind_addr_joins_host_and_port() {
        let settings = Settings::default();
        assert_eq!(settings.bind_addr(), "0.0.0.0:8000");
    }

    #[test]
    fn app_version_matches_cargo() {
        assert_eq!(APP_VERSION, env!("CARGO_PKG_VERSION"));
    }
}
