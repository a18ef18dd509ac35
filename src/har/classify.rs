//! Entry classifier: decides whether one captured entry is a candidate
//! data-API request and assigns its relevance score.
//!
//! Scoring is data, not conditionals: a policy table maps classification
//! signals to score deltas, so the ranking behavior can be inspected and
//! swapped wholesale in tests.

use std::collections::HashMap;

use crate::har::entry::{HarParam, RawEntry};
use crate::har::types::{
    BodyFormat, CanonicalRequest, FormParam, Method, RequestBody,
};

/// URL substrings that mark an endpoint as API-shaped.
pub const API_MARKERS: &[&str] =
    &["/api/", "api.", "/graphql", "/v1/", "/v2/", "/rest/", ".json"];

/// Extensions that identify static assets rather than entity resources.
const STATIC_ASSET_EXTENSIONS: &[&str] = &[".js", ".css", ".jpg", ".png", ".gif"];

/// Response bodies are capped at this many characters at extraction time.
pub const RESPONSE_BODY_CAP: usize = 2000;

pub const TRUNCATION_MARKER: &str = "... [truncated]";

// ═══════════════════════════════════════════════════════════
// Signals
// ═══════════════════════════════════════════════════════════

/// Classification signals for one entry, computed once from
/// (method, url, response content-type) and shared by the rejection test,
/// the acceptance test and the scoring policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntrySignals {
    /// URL contains one of [`API_MARKERS`].
    pub api_marker: bool,
    /// URL path is exactly the `/data/<collection>/<id>` convention.
    pub data_resource: bool,
    /// URL ends in a `/<collection>/<id>`-shaped pair and is not a static
    /// asset. Only holds when neither stronger URL signal does — the
    /// entity shape is the weak fallback, not an additive bonus.
    pub entity_resource: bool,
    /// URL contains `/data/` or `/common/` anywhere.
    pub data_path: bool,
    pub json_response: bool,
    pub octet_stream: bool,
    /// JavaScript content-type or a `.js` URL.
    pub javascript: bool,
    pub non_get: bool,
}

impl EntrySignals {
    pub fn compute(method: Method, url: &str, content_type: &str) -> Self {
        let url_lower = url.to_lowercase();
        let ct_lower = content_type.to_lowercase();
        let path = url_path(&url_lower);
        let segments: Vec<&str> = path
            .split('/')
            .filter(|s| !s.is_empty())
            .collect();

        let api_marker = API_MARKERS.iter().any(|m| url_lower.contains(m));
        let data_resource = segments.len() == 3 && segments[0] == "data";
        let is_static_asset = STATIC_ASSET_EXTENSIONS
            .iter()
            .any(|ext| path.ends_with(ext));
        let entity_resource = !api_marker
            && !data_resource
            && !is_static_asset
            && segments.len() >= 2;

        Self {
            api_marker,
            data_resource,
            entity_resource,
            data_path: url_lower.contains("/data/") || url_lower.contains("/common/"),
            json_response: ct_lower.contains("json"),
            octet_stream: ct_lower.contains("application/octet-stream"),
            javascript: ct_lower.contains("javascript") || path.ends_with(".js"),
            non_get: !method.is_get(),
        }
    }

    /// Any of the three URL-shape signals.
    pub fn any_url_shape(&self) -> bool {
        self.api_marker || self.data_resource || self.entity_resource
    }
}

/// The path component of a URL: scheme and host stripped, query and
/// fragment dropped. Accepts bare paths as-is.
fn url_path(url: &str) -> &str {
    let after_host = match url.find("://") {
        Some(idx) => {
            let rest = &url[idx + 3..];
            match rest.find('/') {
                Some(slash) => &rest[slash..],
                None => "",
            }
        }
        None => url,
    };
    let end = after_host
        .find(['?', '#'])
        .unwrap_or(after_host.len());
    &after_host[..end]
}

// ═══════════════════════════════════════════════════════════
// Scoring policy
// ═══════════════════════════════════════════════════════════

/// One scoring input the policy can react to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    DataResource,
    EntityResource,
    ApiMarker,
    DataPath,
    JsonResponse,
    JavascriptResource,
    NonGetMethod,
}

impl Signal {
    fn holds(&self, s: &EntrySignals) -> bool {
        match self {
            Self::DataResource => s.data_resource,
            Self::EntityResource => s.entity_resource,
            Self::ApiMarker => s.api_marker,
            Self::DataPath => s.data_path,
            Self::JsonResponse => s.json_response,
            Self::JavascriptResource => s.javascript,
            Self::NonGetMethod => s.non_get,
        }
    }
}

/// Relevance scoring as a table of (signal, delta) rules.
#[derive(Debug, Clone)]
pub struct ScoringPolicy {
    rules: Vec<(Signal, i32)>,
}

impl ScoringPolicy {
    pub fn new(rules: Vec<(Signal, i32)>) -> Self {
        Self { rules }
    }

    /// Signed sum of every rule whose signal holds.
    pub fn score(&self, signals: &EntrySignals) -> i32 {
        self.rules
            .iter()
            .filter(|(signal, _)| signal.holds(signals))
            .map(|(_, delta)| delta)
            .sum()
    }
}

impl Default for ScoringPolicy {
    fn default() -> Self {
        Self::new(vec![
            (Signal::DataResource, 15),
            (Signal::EntityResource, 12),
            (Signal::ApiMarker, 10),
            (Signal::DataPath, 8),
            (Signal::JsonResponse, 5),
            (Signal::JavascriptResource, -5),
            (Signal::NonGetMethod, 3),
        ])
    }
}

// ═══════════════════════════════════════════════════════════
// Classification
// ═══════════════════════════════════════════════════════════

/// Classify one raw entry. Returns the canonical record with its relevance
/// score, or `None` when the entry is rejected.
///
/// Pure function of the entry and policy; deterministic on re-runs.
pub fn classify_entry(
    entry: &RawEntry,
    policy: &ScoringPolicy,
) -> Option<CanonicalRequest> {
    // No discoverable content-type — nothing to classify against.
    let content_type = entry.response_content_type()?.to_string();
    let ct_lower = content_type.to_lowercase();

    let method = Method::parse(&entry.request.method)?;
    let url = entry.request.url.clone();
    let signals = EntrySignals::compute(method, &url, &content_type);

    // HTML pages and static asset types are rejected unless the URL shape
    // says otherwise.
    if ct_lower.contains("text/html") && !signals.any_url_shape() {
        return None;
    }
    if !signals.any_url_shape()
        && ["image/", "font/", "text/css"]
            .iter()
            .any(|t| ct_lower.contains(t))
    {
        return None;
    }

    // Broader inclusion test: anything that behaves like a data exchange.
    let is_candidate = signals.non_get
        || signals.json_response
        || signals.octet_stream
        || signals.any_url_shape()
        || url.to_lowercase().contains("/data/");
    if !is_candidate {
        return None;
    }

    let response_body = entry
        .response
        .content
        .as_ref()
        .and_then(|c| c.text.as_deref())
        .map(|text| truncate_chars(text, RESPONSE_BODY_CAP));

    let response_parsed = if ct_lower.contains("application/json") {
        response_body
            .as_deref()
            .and_then(|text| serde_json::from_str(text).ok())
    } else {
        None
    };

    Some(CanonicalRequest {
        method,
        url,
        headers: header_map(&entry.request.headers),
        query_params: param_map(&entry.request.query_string),
        body: entry.request.post_data.as_ref().map(request_body),
        response_status: entry.response.status,
        response_content_type: content_type,
        response_body,
        response_parsed,
        relevance_score: policy.score(&signals),
    })
}

fn header_map(headers: &[crate::har::entry::HarHeader]) -> HashMap<String, String> {
    headers
        .iter()
        .map(|h| (h.name.clone(), h.value.clone()))
        .collect()
}

fn param_map(params: &[HarParam]) -> HashMap<String, String> {
    params
        .iter()
        .map(|p| (p.name.clone(), p.value.clone()))
        .collect()
}

fn request_body(post: &crate::har::entry::HarPostData) -> RequestBody {
    let mime_lower = post.mime_type.to_lowercase();
    let (format, parsed_json) = if mime_lower.contains("application/json") {
        match serde_json::from_str(&post.text) {
            Ok(value) => (BodyFormat::Json, Some(value)),
            Err(_) => (BodyFormat::Text, None),
        }
    } else if mime_lower.contains("form") {
        (BodyFormat::Form, None)
    } else {
        (BodyFormat::Text, None)
    };

    RequestBody {
        mime_type: post.mime_type.clone(),
        text: post.text.clone(),
        format,
        parsed_json,
        form_params: post
            .params
            .iter()
            .map(|p| FormParam {
                name: p.name.clone(),
                value: p.value.clone(),
            })
            .collect(),
    }
}

/// Truncate to `cap` characters, appending the truncation marker when
/// anything was cut. Character-based so multi-byte text never splits.
pub fn truncate_chars(text: &str, cap: usize) -> String {
    if text.chars().count() <= cap {
        return text.to_string();
    }
    let mut out: String = text.chars().take(cap).collect();
    out.push_str(TRUNCATION_MARKER);
    out
}
