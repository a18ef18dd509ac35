//! Candidate extractor: HAR bytes in, ranked canonical records out.

use crate::har::classify::{classify_entry, ScoringPolicy};
use crate::har::entry::HarDocument;
use crate::har::types::CanonicalRequest;
use crate::har::HarError;

/// Parse a HAR document and extract every candidate API request, ordered
/// by descending relevance score. Ties keep their original capture order
/// (the sort is stable).
///
/// An unparseable document is `MalformedInput`; a parseable document with
/// zero candidates is a legal empty list.
pub fn extract_candidates(bytes: &[u8]) -> Result<Vec<CanonicalRequest>, HarError> {
    extract_candidates_with_policy(bytes, &ScoringPolicy::default())
}

pub fn extract_candidates_with_policy(
    bytes: &[u8],
    policy: &ScoringPolicy,
) -> Result<Vec<CanonicalRequest>, HarError> {
    let document: HarDocument = serde_json::from_slice(bytes)
        .map_err(|e| HarError::MalformedInput(e.to_string()))?;

    let total = document.log.entries.len();
    let mut candidates: Vec<CanonicalRequest> = document
        .log
        .entries
        .iter()
        .filter_map(|entry| classify_entry(entry, policy))
        .collect();

    // Stable sort: equal scores retain capture order.
    candidates.sort_by_key(|c| std::cmp::Reverse(c.relevance_score));

    tracing::debug!(
        entries = total,
        candidates = candidates.len(),
        "extracted candidate API requests from capture"
    );

    Ok(candidates)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::har::types::Method;

    fn har_with_entries(entries: &str) -> String {
        format!(r#"{{"log":{{"entries":[{entries}]}}}}"#)
    }

    fn json_entry(method: &str, url: &str, content_type: &str) -> String {
        format!(
            r#"{{"request":{{"method":"{method}","url":"{url}"}},"response":{{"status":200,"headers":[{{"name":"Content-Type","value":"{content_type}"}}]}}}}"#
        )
    }

    #[test]
    fn malformed_bytes_raise_before_extraction() {
        let err = extract_candidates(b"this is not json").unwrap_err();
        assert!(matches!(err, HarError::MalformedInput(_)));
    }

    #[test]
    fn non_object_document_is_malformed() {
        let err = extract_candidates(b"[1, 2, 3]").unwrap_err();
        assert!(matches!(err, HarError::MalformedInput(_)));
    }

    #[test]
    fn empty_capture_yields_empty_list() {
        let candidates = extract_candidates(b"{\"log\":{\"entries\":[]}}").unwrap();
        assert!(candidates.is_empty());
    }

    #[test]
    fn capture_of_only_pages_yields_empty_list() {
        let har = har_with_entries(&json_entry("GET", "https://x.com/home", "text/html"));
        let candidates = extract_candidates(har.as_bytes()).unwrap();
        assert!(candidates.is_empty());
    }

    #[test]
    fn single_data_api_entry_is_extracted() {
        let har = har_with_entries(&json_entry(
            "GET",
            "https://x.com/api/data/items/42",
            "application/json",
        ));
        let candidates = extract_candidates(har.as_bytes()).unwrap();
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].method, Method::Get);
        assert_eq!(candidates[0].relevance_score, 23);
    }

    #[test]
    fn candidates_sort_by_score_descending() {
        let har = har_with_entries(&[
            json_entry("GET", "https://x.com/api/bundle.js", "application/javascript"),
            json_entry("GET", "https://x.com/data/items/42", "application/json"),
            json_entry("GET", "https://x.com/api/items", "application/json"),
        ]
        .join(","));
        let candidates = extract_candidates(har.as_bytes()).unwrap();
        let scores: Vec<i32> = candidates.iter().map(|c| c.relevance_score).collect();
        assert_eq!(scores, vec![28, 15, 5]);
    }

    #[test]
    fn equal_scores_keep_capture_order() {
        let har = har_with_entries(&[
            json_entry("GET", "https://x.com/api/first", "application/json"),
            json_entry("GET", "https://x.com/api/second", "application/json"),
            json_entry("GET", "https://x.com/api/third", "application/json"),
        ]
        .join(","));
        let candidates = extract_candidates(har.as_bytes()).unwrap();
        let urls: Vec<&str> = candidates.iter().map(|c| c.url.as_str()).collect();
        assert_eq!(
            urls,
            vec![
                "https://x.com/api/first",
                "https://x.com/api/second",
                "https://x.com/api/third"
            ]
        );
    }
}
