//! Canonical request records derived from raw HAR entries.
//!
//! `CanonicalRequest` is immutable after extraction; downstream stages
//! produce reduced copies (`BudgetedRequest`), never mutate in place.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

// ═══════════════════════════════════════════════════════════
// Method
// ═══════════════════════════════════════════════════════════

/// Standard HTTP verbs. Serializes as the uppercase token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
    Patch,
    Head,
    Options,
    Connect,
    Trace,
}

impl Method {
    /// Parse a verb case-insensitively. Non-standard verbs are not
    /// representable and yield `None`.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "GET" => Some(Self::Get),
            "POST" => Some(Self::Post),
            "PUT" => Some(Self::Put),
            "DELETE" => Some(Self::Delete),
            "PATCH" => Some(Self::Patch),
            "HEAD" => Some(Self::Head),
            "OPTIONS" => Some(Self::Options),
            "CONNECT" => Some(Self::Connect),
            "TRACE" => Some(Self::Trace),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
            Self::Patch => "PATCH",
            Self::Head => "HEAD",
            Self::Options => "OPTIONS",
            Self::Connect => "CONNECT",
            Self::Trace => "TRACE",
        }
    }

    pub fn is_get(&self) -> bool {
        matches!(self, Self::Get)
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ═══════════════════════════════════════════════════════════
// Request body
// ═══════════════════════════════════════════════════════════

/// How a captured request body was encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BodyFormat {
    Json,
    Form,
    Text,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct FormParam {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub value: String,
}

/// Captured request body. Carried verbatim through every stage — replay
/// fidelity depends on the exact text, so it is never truncated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestBody {
    #[serde(default)]
    pub mime_type: String,
    #[serde(default)]
    pub text: String,
    pub format: BodyFormat,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parsed_json: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub form_params: Vec<FormParam>,
}

// ═══════════════════════════════════════════════════════════
// CanonicalRequest
// ═══════════════════════════════════════════════════════════

/// Normalized record of one candidate API request.
///
/// `relevance_score` is computed once at extraction time and is the sole
/// ordering key for the candidate list; it is never recomputed downstream.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CanonicalRequest {
    pub method: Method,
    pub url: String,
    pub headers: HashMap<String, String>,
    pub query_params: HashMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<RequestBody>,
    pub response_status: u16,
    pub response_content_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_body: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_parsed: Option<serde_json::Value>,
    pub relevance_score: i32,
}

// ═══════════════════════════════════════════════════════════
// BudgetedRequest
// ═══════════════════════════════════════════════════════════

/// Reduced projection of a `CanonicalRequest`, sized for a bounded-context
/// reasoning call. Method, url, query params and body are carried verbatim
/// so the selection can be reconciled back to its source record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BudgetedRequest {
    pub method: Method,
    pub url: String,
    pub response_status: u16,
    pub response_content_type: String,
    #[serde(default)]
    pub headers: HashMap<String, String>,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub query_params: HashMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<RequestBody>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_body: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_parsed: Option<serde_json::Value>,
}
