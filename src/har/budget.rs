//! Token budgeter: shrinks the candidate list into a projection small
//! enough for a bounded-context reasoning call.
//!
//! Two phases: bucket re-ranking (data APIs first, static resources last,
//! overriding relevance order), then per-candidate field reduction.
//! Request bodies are exempt from truncation — misrepresenting body
//! content would make the eventual replay command wrong, and that
//! correctness requirement outweighs the budget savings.

use serde_json::Value;

use crate::har::classify::{truncate_chars, API_MARKERS};
use crate::har::types::{BudgetedRequest, CanonicalRequest};

/// Headers worth showing to the reasoning service.
const HEADER_ALLOW_LIST: &[&str] = &[
    "content-type",
    "authorization",
    "accept",
    "user-agent",
    "origin",
    "referer",
];

/// Header-name fragments that mark credential-bearing headers.
const CREDENTIAL_FRAGMENTS: &[&str] = &["auth", "token", "key"];

/// Non-JSON (or unparseable) response bodies are cut to this many chars.
const RESPONSE_SNIPPET_CAP: usize = 500;

/// JSON arrays keep this many leading elements.
const ARRAY_SAMPLE_LEN: usize = 3;

/// JSON objects larger than this get the priority-key treatment.
const OBJECT_KEY_LIMIT: usize = 10;

/// Number of non-priority keys kept from an oversized object.
const EXTRA_KEY_LIMIT: usize = 7;

/// Key names preserved first when an oversized JSON object is reduced —
/// identifiers, outcomes and payload containers that keep the response
/// re-identifiable.
const PRIORITY_KEYS: &[&str] = &[
    "id", "name", "type", "status", "code", "message", "error", "data",
    "result", "results", "items", "count", "total",
];

// ═══════════════════════════════════════════════════════════
// Buckets
// ═══════════════════════════════════════════════════════════

/// Coarse priority class used to re-rank candidates before reduction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bucket {
    /// API-or-data-marked URL returning JSON.
    DataApi,
    /// JSON response, non-GET method, or an API-marked URL.
    PossibleApi,
    /// Everything else; all JavaScript lands here regardless of flags.
    Static,
}

/// Bucket assignment for one candidate. Pure, so re-budgeting a
/// candidate always lands it in the same bucket.
pub fn bucket_for(candidate: &CanonicalRequest) -> Bucket {
    let url = candidate.url.to_lowercase();
    let content_type = candidate.response_content_type.to_lowercase();

    if url.ends_with(".js") || content_type.contains("javascript") {
        return Bucket::Static;
    }

    let data_marked = API_MARKERS.iter().any(|m| url.contains(m))
        || url.contains("/data/")
        || url.contains("/common/");
    let is_json = content_type.contains("json");

    if data_marked && is_json {
        return Bucket::DataApi;
    }
    if is_json || !candidate.method.is_get() || data_marked {
        return Bucket::PossibleApi;
    }
    Bucket::Static
}

// ═══════════════════════════════════════════════════════════
// Budgeting
// ═══════════════════════════════════════════════════════════

/// Re-rank candidates into bucket order and reduce each one.
/// Relative order inside each bucket is preserved.
pub fn budget_candidates(candidates: &[CanonicalRequest]) -> Vec<BudgetedRequest> {
    let mut data_api = Vec::new();
    let mut possible_api = Vec::new();
    let mut static_resources = Vec::new();

    for candidate in candidates {
        match bucket_for(candidate) {
            Bucket::DataApi => data_api.push(candidate),
            Bucket::PossibleApi => possible_api.push(candidate),
            Bucket::Static => static_resources.push(candidate),
        }
    }

    data_api
        .into_iter()
        .chain(possible_api)
        .chain(static_resources)
        .map(reduce)
        .collect()
}

fn reduce(candidate: &CanonicalRequest) -> BudgetedRequest {
    let headers = candidate
        .headers
        .iter()
        .filter(|(name, _)| header_is_relevant(name))
        .map(|(name, value)| (name.clone(), value.clone()))
        .collect();

    let response_body = candidate.response_body.as_deref().map(|text| {
        reduce_response_body(text, &candidate.response_content_type)
    });

    BudgetedRequest {
        method: candidate.method,
        url: candidate.url.clone(),
        response_status: candidate.response_status,
        response_content_type: candidate.response_content_type.clone(),
        headers,
        query_params: candidate.query_params.clone(),
        // Carried verbatim: replay must see the exact body bytes.
        body: candidate.body.clone(),
        response_body,
        response_parsed: candidate.response_parsed.clone(),
    }
}

fn header_is_relevant(name: &str) -> bool {
    let lower = name.to_lowercase();
    HEADER_ALLOW_LIST.contains(&lower.as_str())
        || CREDENTIAL_FRAGMENTS.iter().any(|f| lower.contains(f))
}

/// Structure-aware response truncation. Naive cutting risks splitting
/// structured data mid-token, so JSON is reduced shape-first and only
/// unparseable text gets the hard cut.
fn reduce_response_body(text: &str, content_type: &str) -> String {
    if content_type.to_lowercase().contains("json") {
        if let Ok(value) = serde_json::from_str::<Value>(text) {
            let reduced = reduce_json_value(value);
            if let Ok(compact) = serde_json::to_string(&reduced) {
                return compact;
            }
        }
    }
    truncate_chars(text, RESPONSE_SNIPPET_CAP)
}

fn reduce_json_value(value: Value) -> Value {
    match value {
        Value::Array(items) => {
            Value::Array(items.into_iter().take(ARRAY_SAMPLE_LEN).collect())
        }
        Value::Object(map) if map.len() > OBJECT_KEY_LIMIT => {
            let mut reduced = serde_json::Map::new();
            for key in PRIORITY_KEYS {
                if let Some(v) = map.get(*key) {
                    reduced.insert((*key).to_string(), v.clone());
                }
            }
            let mut extra = 0;
            for (key, v) in &map {
                if extra >= EXTRA_KEY_LIMIT {
                    break;
                }
                if !reduced.contains_key(key) {
                    reduced.insert(key.clone(), v.clone());
                    extra += 1;
                }
            }
            Value::Object(reduced)
        }
        other => other,
    }
}
