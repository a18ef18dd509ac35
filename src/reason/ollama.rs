//! Ollama-backed reasoner: blocking HTTP client for a locally-run model.

use serde::{Deserialize, Serialize};

use crate::config::Settings;
use crate::reason::{ReasonError, Reasoner};

/// Reasoner backed by a local Ollama instance's `/api/generate` endpoint.
///
/// One non-streaming request per judgment, bounded by `timeout_secs`;
/// retries are the caller's concern (and no caller retries — failures
/// trigger stage-specific fallbacks instead).
pub struct OllamaReasoner {
    base_url: String,
    model: String,
    client: reqwest::blocking::Client,
    timeout_secs: u64,
}

impl OllamaReasoner {
    /// Build a client. Must be constructed outside an async runtime (the
    /// blocking reqwest client spawns its own I/O thread).
    pub fn new(base_url: &str, model: &str, timeout_secs: u64) -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .expect("failed to build reasoning HTTP client");

        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            client,
            timeout_secs,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(
            &settings.ollama_url,
            &settings.ollama_model,
            settings.reason_timeout_secs,
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

/// Request body for `/api/generate`.
#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    system: &'a str,
    stream: bool,
}

/// Response body from `/api/generate`.
#[derive(Deserialize)]
struct GenerateResponse {
    response: String,
}

impl Reasoner for OllamaReasoner {
    fn complete(&self, system: &str, prompt: &str) -> Result<String, ReasonError> {
        let url = format!("{}/api/generate", self.base_url);
        let body = GenerateRequest {
            model: &self.model,
            prompt,
            system,
            stream: false,
        };

        let response = self.client.post(&url).json(&body).send().map_err(|e| {
            if e.is_connect() {
                ReasonError::Connection(self.base_url.clone())
            } else if e.is_timeout() {
                ReasonError::Timeout(self.timeout_secs)
            } else {
                ReasonError::Decode(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(ReasonError::Service {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: GenerateResponse = response
            .json()
            .map_err(|e| ReasonError::Decode(e.to_string()))?;

        Ok(parsed.response)
    }
}
