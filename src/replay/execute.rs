//! Replay executor: runs a parsed curl command against the live endpoint
//! and renders the response safely for display.
//!
//! Rendering policy: JSON pretty-printed when it parses, text passed
//! through, anything unprintable summarized with a hexdump preview
//! instead of dumping raw bytes at a terminal.

use std::collections::HashMap;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};

use crate::replay::curl::ParsedCurl;
use crate::replay::ReplayError;

/// Replayed requests get this long before being abandoned.
const REPLAY_TIMEOUT_SECS: u64 = 30;

/// Proportion of printable characters above which a body counts as text.
const READABLE_THRESHOLD: f64 = 0.8;

/// Bytes of binary content shown in the hexdump preview.
const HEXDUMP_PREVIEW_BYTES: usize = 200;

/// Outcome of one replayed request.
#[derive(Debug, Clone)]
pub struct ReplayOutcome {
    pub status_code: u16,
    pub headers: HashMap<String, String>,
    pub response: String,
}

/// Execute a parsed curl command. Only the verbs the original capture can
/// produce through a data API are supported.
pub async fn execute(parsed: &ParsedCurl) -> Result<ReplayOutcome, ReplayError> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(REPLAY_TIMEOUT_SECS))
        .build()
        .map_err(|e| ReplayError::Request(e.to_string()))?;

    let mut request = match parsed.method.as_str() {
        "GET" => client.get(&parsed.url),
        "POST" => client.post(&parsed.url),
        "PUT" => client.put(&parsed.url),
        "DELETE" => client.delete(&parsed.url),
        other => return Err(ReplayError::UnsupportedMethod(other.to_string())),
    };

    request = request.headers(header_map(&parsed.headers));
    if let Some(body) = &parsed.body {
        request = request.body(body.clone());
    }

    let response = request
        .send()
        .await
        .map_err(|e| ReplayError::Request(e.to_string()))?;

    let status_code = response.status().as_u16();
    let headers = response
        .headers()
        .iter()
        .map(|(name, value)| {
            (
                name.to_string(),
                value.to_str().unwrap_or_default().to_string(),
            )
        })
        .collect::<HashMap<_, _>>();
    let content_type = headers
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case("content-type"))
        .map(|(_, value)| value.clone())
        .unwrap_or_default();

    let bytes = response
        .bytes()
        .await
        .map_err(|e| ReplayError::Request(e.to_string()))?;

    Ok(ReplayOutcome {
        status_code,
        headers,
        response: render_body(&bytes, &content_type),
    })
}

fn header_map(headers: &HashMap<String, String>) -> HeaderMap {
    let mut map = HeaderMap::new();
    for (name, value) in headers {
        if let (Ok(name), Ok(value)) = (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            map.insert(name, value);
        }
    }
    map
}

/// Render a response body for display.
pub fn render_body(bytes: &[u8], content_type: &str) -> String {
    let ct_lower = content_type.to_lowercase();
    let text = String::from_utf8_lossy(bytes);

    if ct_lower.contains("application/json") {
        if let Ok(value) = serde_json::from_str::<serde_json::Value>(&text) {
            if let Ok(pretty) = serde_json::to_string_pretty(&value) {
                return pretty;
            }
        }
        return text.into_owned();
    }

    if ct_lower.starts_with("text/") || is_readable_text(&text) {
        return text.into_owned();
    }

    let mut rendered = format!("Binary data ({} bytes, {content_type})\n", bytes.len());
    rendered.push_str(&hexdump(&bytes[..bytes.len().min(HEXDUMP_PREVIEW_BYTES)]));
    if bytes.len() > HEXDUMP_PREVIEW_BYTES {
        rendered.push_str("\n... (truncated)");
    }
    rendered
}

/// Whether a string looks like human-readable text: at least 80% of its
/// characters are printable ASCII or whitespace.
pub fn is_readable_text(text: &str) -> bool {
    if text.is_empty() {
        return true;
    }
    let printable = text
        .chars()
        .filter(|c| c.is_ascii() && (!c.is_control() || c.is_whitespace()))
        .count();
    printable as f64 / text.chars().count() as f64 >= READABLE_THRESHOLD
}

/// Classic hexdump: offset, 16 hex bytes, ASCII gutter.
pub fn hexdump(data: &[u8]) -> String {
    const BYTES_PER_LINE: usize = 16;
    data.chunks(BYTES_PER_LINE)
        .enumerate()
        .map(|(i, chunk)| {
            let hex: Vec<String> = chunk.iter().map(|b| format!("{b:02X}")).collect();
            let ascii: String = chunk
                .iter()
                .map(|&b| {
                    if (32..=126).contains(&b) {
                        b as char
                    } else {
                        '.'
                    }
                })
                .collect();
            format!(
                "{:08X}:  {:<width$}  {}",
                i * BYTES_PER_LINE,
                hex.join(" "),
                ascii,
                width = BYTES_PER_LINE * 3
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}
