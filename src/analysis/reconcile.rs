//! Reconciler: maps the service's (possibly reformatted) selection back
//! to the exact original record.
//!
//! The reasoning service may reorder, drop or paraphrase fields; replay
//! needs the untouched original so headers, body encoding and parameter
//! order are preserved exactly. Matching is by (method, url) — together
//! they identify a candidate unambiguously within one capture.

use serde_json::Value;

use crate::har::types::CanonicalRequest;

/// Find the canonical record the selection refers to, if any.
pub fn reconcile<'a>(
    candidates: &'a [CanonicalRequest],
    selected: &Value,
) -> Option<&'a CanonicalRequest> {
    let method = selected.get("method")?.as_str()?;
    let url = selected.get("url")?.as_str()?;

    candidates
        .iter()
        .find(|c| c.method.as_str().eq_ignore_ascii_case(method) && c.url == url)
}

/// The record to hand onward: the exact original on a match, otherwise
/// the service's object verbatim.
pub fn reconcile_value(candidates: &[CanonicalRequest], selected: &Value) -> Value {
    match reconcile(candidates, selected) {
        Some(original) => serde_json::to_value(original).unwrap_or_else(|_| selected.clone()),
        None => selected.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::har::types::{BodyFormat, Method, RequestBody};
    use std::collections::HashMap;

    fn candidate(method: Method, url: &str) -> CanonicalRequest {
        CanonicalRequest {
            method,
            url: url.into(),
            headers: HashMap::from([
                ("Authorization".to_string(), "Bearer abc".to_string()),
                ("Cookie".to_string(), "session=s3cr3t".to_string()),
            ]),
            query_params: HashMap::new(),
            body: Some(RequestBody {
                mime_type: "application/json".into(),
                text: r#"{"exact":"bytes"}"#.into(),
                format: BodyFormat::Json,
                parsed_json: None,
                form_params: vec![],
            }),
            response_status: 200,
            response_content_type: "application/json".into(),
            response_body: Some("full response body".into()),
            response_parsed: None,
            relevance_score: 23,
        }
    }

    #[test]
    fn matching_method_and_url_returns_the_original() {
        let candidates = vec![
            candidate(Method::Get, "https://x.com/api/a"),
            candidate(Method::Post, "https://x.com/api/b"),
        ];
        // Budgeter-stripped echo: no Cookie header, no response body.
        let selected = serde_json::json!({
            "method": "POST",
            "url": "https://x.com/api/b"
        });

        let original = reconcile(&candidates, &selected).unwrap();
        assert_eq!(original.method, Method::Post);
        // Fields the budgeter strips come back from the original.
        assert!(original.headers.contains_key("Cookie"));
        assert_eq!(original.response_body.as_deref(), Some("full response body"));
        assert_eq!(original.relevance_score, 23);
    }

    #[test]
    fn method_match_is_case_insensitive() {
        let candidates = vec![candidate(Method::Get, "https://x.com/api/a")];
        let selected = serde_json::json!({"method": "get", "url": "https://x.com/api/a"});
        assert!(reconcile(&candidates, &selected).is_some());
    }

    #[test]
    fn url_mismatch_returns_none() {
        let candidates = vec![candidate(Method::Get, "https://x.com/api/a")];
        let selected = serde_json::json!({"method": "GET", "url": "https://x.com/api/other"});
        assert!(reconcile(&candidates, &selected).is_none());
    }

    #[test]
    fn method_mismatch_returns_none() {
        let candidates = vec![candidate(Method::Get, "https://x.com/api/a")];
        let selected = serde_json::json!({"method": "POST", "url": "https://x.com/api/a"});
        assert!(reconcile(&candidates, &selected).is_none());
    }

    #[test]
    fn malformed_selection_returns_none() {
        let candidates = vec![candidate(Method::Get, "https://x.com/api/a")];
        assert!(reconcile(&candidates, &serde_json::json!({})).is_none());
        assert!(reconcile(&candidates, &serde_json::json!({"method": 5, "url": 7})).is_none());
    }

    #[test]
    fn reconcile_value_passes_unmatched_object_through_verbatim() {
        let candidates = vec![candidate(Method::Get, "https://x.com/api/a")];
        let selected = serde_json::json!({
            "method": "GET",
            "url": "https://elsewhere.com/api/z",
            "note": "service invention"
        });
        let value = reconcile_value(&candidates, &selected);
        assert_eq!(value, selected);
    }

    #[test]
    fn reconcile_value_serializes_the_full_original() {
        let candidates = vec![candidate(Method::Get, "https://x.com/api/a")];
        let selected = serde_json::json!({"method": "GET", "url": "https://x.com/api/a"});
        let value = reconcile_value(&candidates, &selected);
        assert_eq!(value["body"]["text"], r#"{"exact":"bytes"}"#);
        assert_eq!(value["relevance_score"], 23);
    }
}
