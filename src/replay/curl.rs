//! curl command formatting and parsing.
//!
//! Formatting turns a selected request record into a copy-pasteable curl
//! invocation; parsing turns such an invocation back into its parts so
//! the replay executor can run it. No core invariant depends on the exact
//! formatting — it only has to round-trip through the parser.

use std::collections::HashMap;

use serde_json::Value;

use crate::har::types::CanonicalRequest;
use crate::replay::ReplayError;

/// Transport headers that must not be replayed: curl (or the HTTP
/// client) recomputes them, and HTTP/2 pseudo-headers are not real
/// headers at all.
const DENYLISTED_HEADERS: &[&str] = &["content-length"];

// ═══════════════════════════════════════════════════════════
// ReplayRequest — the replayable view of a selection
// ═══════════════════════════════════════════════════════════

/// The parts of a request that matter for replay. Built from the exact
/// canonical record when reconciliation matched, or from the service's
/// object when it did not.
#[derive(Debug, Clone)]
pub struct ReplayRequest {
    pub method: String,
    pub url: String,
    pub headers: HashMap<String, String>,
    pub body_text: Option<String>,
}

impl From<&CanonicalRequest> for ReplayRequest {
    fn from(req: &CanonicalRequest) -> Self {
        Self {
            method: req.method.as_str().to_string(),
            url: req.url.clone(),
            headers: req.headers.clone(),
            body_text: req.body.as_ref().map(|b| b.text.clone()),
        }
    }
}

impl TryFrom<&Value> for ReplayRequest {
    type Error = ReplayError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        let method = value
            .get("method")
            .and_then(Value::as_str)
            .ok_or_else(|| ReplayError::InvalidCommand("selection has no method".into()))?;
        let url = value
            .get("url")
            .and_then(Value::as_str)
            .ok_or_else(|| ReplayError::InvalidCommand("selection has no url".into()))?;

        let headers = value
            .get("headers")
            .and_then(Value::as_object)
            .map(|map| {
                map.iter()
                    .filter_map(|(k, v)| v.as_str().map(|s| (k.clone(), s.to_string())))
                    .collect()
            })
            .unwrap_or_default();

        let body_text = value
            .get("body")
            .and_then(|b| b.get("text"))
            .and_then(Value::as_str)
            .map(str::to_string);

        Ok(Self {
            method: method.to_uppercase(),
            url: url.to_string(),
            headers,
            body_text,
        })
    }
}

// ═══════════════════════════════════════════════════════════
// Formatting
// ═══════════════════════════════════════════════════════════

/// Render a replayable curl command, one option per continuation line.
pub fn curl_command(req: &ReplayRequest) -> String {
    let mut parts = vec![format!("curl '{}'", req.url)];

    if req.method != "GET" {
        parts.push(format!("  -X {}", req.method));
    }

    for (name, value) in &req.headers {
        if name.starts_with(':') || DENYLISTED_HEADERS.contains(&name.to_lowercase().as_str())
        {
            continue;
        }
        parts.push(format!("  -H '{}: {}'", name, escape_single_quotes(value)));
    }

    if let Some(body) = req.body_text.as_deref() {
        if !body.is_empty() {
            parts.push(format!("  -d '{}'", escape_single_quotes(body)));
        }
    }

    parts.join(" \\\n")
}

fn escape_single_quotes(value: &str) -> String {
    value.replace('\'', "'\\''")
}

// ═══════════════════════════════════════════════════════════
// Parsing
// ═══════════════════════════════════════════════════════════

/// A curl command decomposed back into its parts.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedCurl {
    pub method: String,
    pub url: String,
    pub headers: HashMap<String, String>,
    pub body: Option<String>,
}

/// Parse a curl command. Tolerates quoting, line continuations, and
/// header lists copied from browser devtools (pseudo-headers and
/// `accept-encoding` are dropped so the replayed response stays
/// decodable).
pub fn parse_curl_command(command: &str) -> Result<ParsedCurl, ReplayError> {
    let tokens = shell_split(command);
    if tokens.is_empty() || tokens[0] != "curl" {
        return Err(ReplayError::InvalidCommand(
            "command does not start with curl".into(),
        ));
    }

    let mut method = "GET".to_string();
    let mut headers = HashMap::new();
    let mut body = None;
    let mut url = None;

    let mut i = 1;
    while i < tokens.len() {
        match tokens[i].as_str() {
            "-X" | "--request" => {
                if let Some(value) = tokens.get(i + 1) {
                    method = value.to_uppercase();
                    i += 1;
                }
            }
            "-H" | "--header" => {
                if let Some(raw) = tokens.get(i + 1) {
                    if let Some((name, value)) = raw.split_once(':') {
                        let name = name.trim();
                        // HTTP/2 pseudo-headers start with ':' and split to
                        // an empty name here.
                        if !name.is_empty()
                            && !name.eq_ignore_ascii_case("accept-encoding")
                        {
                            headers.insert(name.to_string(), value.trim().to_string());
                        }
                    }
                    i += 1;
                }
            }
            "-d" | "--data" | "--data-raw" => {
                if let Some(value) = tokens.get(i + 1) {
                    body = Some(value.clone());
                    i += 1;
                }
            }
            token if !token.starts_with('-') => {
                url = Some(token.to_string());
            }
            _ => {}
        }
        i += 1;
    }

    let url = url.ok_or_else(|| ReplayError::InvalidCommand("no URL found".into()))?;

    Ok(ParsedCurl {
        method,
        url,
        headers,
        body,
    })
}

/// Split a shell command into tokens, honoring single quotes, double
/// quotes, backslash escapes, and backslash-newline continuations.
fn shell_split(command: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut has_token = false;
    let mut chars = command.chars().peekable();

    #[derive(PartialEq)]
    enum State {
        Normal,
        Single,
        Double,
    }
    let mut state = State::Normal;

    while let Some(c) = chars.next() {
        match state {
            State::Normal => match c {
                '\'' => {
                    state = State::Single;
                    has_token = true;
                }
                '"' => {
                    state = State::Double;
                    has_token = true;
                }
                '\\' => {
                    match chars.next() {
                        // Line continuation: swallowed entirely.
                        Some('\n') | None => {}
                        Some(next) => {
                            current.push(next);
                            has_token = true;
                        }
                    }
                }
                c if c.is_whitespace() => {
                    if has_token {
                        tokens.push(std::mem::take(&mut current));
                        has_token = false;
                    }
                }
                c => {
                    current.push(c);
                    has_token = true;
                }
            },
            State::Single => match c {
                '\'' => state = State::Normal,
                c => current.push(c),
            },
            State::Double => match c {
                '"' => state = State::Normal,
                '\\' => {
                    if let Some(&next) = chars.peek() {
                        if next == '"' || next == '\\' {
                            current.push(next);
                            chars.next();
                        } else {
                            current.push('\\');
                        }
                    }
                }
                c => current.push(c),
            },
        }
    }
    if has_token {
        tokens.push(current);
    }
    tokens
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::har::types::Method;

    fn canonical(method: Method, url: &str) -> CanonicalRequest {
        CanonicalRequest {
            method,
            url: url.into(),
            headers: HashMap::new(),
            query_params: HashMap::new(),
            body: None,
            response_status: 200,
            response_content_type: "application/json".into(),
            response_body: None,
            response_parsed: None,
            relevance_score: 0,
        }
    }

    #[test]
    fn get_without_headers_is_one_line() {
        let req = ReplayRequest::from(&canonical(Method::Get, "https://x.com/api/a"));
        assert_eq!(curl_command(&req), "curl 'https://x.com/api/a'");
    }

    #[test]
    fn non_get_adds_method_flag() {
        let req = ReplayRequest::from(&canonical(Method::Post, "https://x.com/api/a"));
        let cmd = curl_command(&req);
        assert!(cmd.contains("-X POST"));
    }

    #[test]
    fn headers_render_with_continuations() {
        let mut canonical = canonical(Method::Get, "https://x.com/api/a");
        canonical
            .headers
            .insert("Accept".into(), "application/json".into());
        let cmd = curl_command(&ReplayRequest::from(&canonical));
        assert!(cmd.contains(" \\\n  -H 'Accept: application/json'"));
    }

    #[test]
    fn denylisted_and_pseudo_headers_are_dropped() {
        let mut canonical = canonical(Method::Get, "https://x.com/api/a");
        canonical.headers.insert("Content-Length".into(), "42".into());
        canonical.headers.insert(":authority".into(), "x.com".into());
        canonical.headers.insert("Accept".into(), "text/plain".into());
        let cmd = curl_command(&ReplayRequest::from(&canonical));
        assert!(!cmd.contains("Content-Length"));
        assert!(!cmd.contains(":authority"));
        assert!(cmd.contains("Accept"));
    }

    #[test]
    fn single_quotes_in_values_are_escaped() {
        let req = ReplayRequest {
            method: "POST".into(),
            url: "https://x.com/api/a".into(),
            headers: HashMap::new(),
            body_text: Some("{\"note\":\"it's here\"}".into()),
        };
        let cmd = curl_command(&req);
        assert!(cmd.contains(r#"it'\''s here"#));
    }

    #[test]
    fn replay_request_from_service_object() {
        let value = serde_json::json!({
            "method": "post",
            "url": "https://x.com/api/b",
            "headers": {"X-Api-Key": "k"},
            "body": {"mime_type": "application/json", "text": "{\"id\":1}", "format": "json"}
        });
        let req = ReplayRequest::try_from(&value).unwrap();
        assert_eq!(req.method, "POST");
        assert_eq!(req.headers["X-Api-Key"], "k");
        assert_eq!(req.body_text.as_deref(), Some("{\"id\":1}"));
    }

    #[test]
    fn service_object_without_url_is_invalid() {
        let value = serde_json::json!({"method": "GET"});
        assert!(ReplayRequest::try_from(&value).is_err());
    }

    // ── Parsing ─────────────────────────────────────────────

    #[test]
    fn parse_simple_get() {
        let parsed = parse_curl_command("curl 'https://x.com/api/a'").unwrap();
        assert_eq!(parsed.method, "GET");
        assert_eq!(parsed.url, "https://x.com/api/a");
        assert!(parsed.headers.is_empty());
        assert!(parsed.body.is_none());
    }

    #[test]
    fn parse_full_command_with_continuations() {
        let cmd = "curl 'https://x.com/api/items' \\\n  -X POST \\\n  -H 'Content-Type: application/json' \\\n  -d '{\"id\":42}'";
        let parsed = parse_curl_command(cmd).unwrap();
        assert_eq!(parsed.method, "POST");
        assert_eq!(parsed.url, "https://x.com/api/items");
        assert_eq!(parsed.headers["Content-Type"], "application/json");
        assert_eq!(parsed.body.as_deref(), Some("{\"id\":42}"));
    }

    #[test]
    fn parse_drops_pseudo_and_encoding_headers() {
        let cmd = "curl -H ':authority: x.com' -H 'Accept-Encoding: gzip' -H 'Accept: */*' 'https://x.com/a/b'";
        let parsed = parse_curl_command(cmd).unwrap();
        assert_eq!(parsed.headers.len(), 1);
        assert_eq!(parsed.headers["Accept"], "*/*");
    }

    #[test]
    fn parse_rejects_non_curl_command() {
        assert!(parse_curl_command("wget https://x.com").is_err());
        assert!(parse_curl_command("").is_err());
    }

    #[test]
    fn parse_rejects_command_without_url() {
        assert!(parse_curl_command("curl -X POST").is_err());
    }

    #[test]
    fn format_then_parse_round_trips() {
        let mut canonical = canonical(Method::Post, "https://x.com/api/items/42");
        canonical
            .headers
            .insert("Authorization".into(), "Bearer it's-a-token".into());
        canonical.body = Some(crate::har::types::RequestBody {
            mime_type: "application/json".into(),
            text: r#"{"name":"o'brien"}"#.into(),
            format: crate::har::types::BodyFormat::Json,
            parsed_json: None,
            form_params: vec![],
        });

        let cmd = curl_command(&ReplayRequest::from(&canonical));
        let parsed = parse_curl_command(&cmd).unwrap();

        assert_eq!(parsed.method, "POST");
        assert_eq!(parsed.url, "https://x.com/api/items/42");
        assert_eq!(parsed.headers["Authorization"], "Bearer it's-a-token");
        assert_eq!(parsed.body.as_deref(), Some(r#"{"name":"o'brien"}"#));
    }

    #[test]
    fn shell_split_joins_adjacent_quoted_parts() {
        let tokens = shell_split(r#"curl 'a'\''b'"#);
        assert_eq!(tokens, vec!["curl", "a'b"]);
    }
}
