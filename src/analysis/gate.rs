//! Relevance gate: cheap rejection filter run before selection.
//!
//! False negatives (rejecting a query the capture could answer) are far
//! costlier than false positives, so every uncertainty resolves to
//! "in scope": small captures pass unconditionally and a failed
//! reasoning call passes too.

use serde::Serialize;

use crate::analysis::prompt::{build_gate_prompt, GATE_SYSTEM_PROMPT};
use crate::har::classify::truncate_chars;
use crate::har::types::CanonicalRequest;
use crate::reason::extract_json::verdict_is_no;
use crate::reason::Reasoner;

/// Below this many candidates there is not enough evidence to reject.
pub const GATE_MIN_CANDIDATES: usize = 5;

/// At most this many candidates (in relevance order) are sampled.
pub const GATE_SAMPLE_LIMIT: usize = 20;

const SNIPPET_CAP: usize = 150;

/// Per-candidate projection shown to the gate.
#[derive(Serialize)]
struct GateSample<'a> {
    method: &'static str,
    url: &'a str,
    content_type: &'a str,
    query_param_names: Vec<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_snippet: Option<String>,
}

/// Decide whether the capture plausibly covers the query's domain.
pub fn query_in_scope(
    reasoner: &dyn Reasoner,
    candidates: &[CanonicalRequest],
    description: &str,
) -> bool {
    if candidates.len() < GATE_MIN_CANDIDATES {
        tracing::debug!(
            candidates = candidates.len(),
            "too few candidates to reject any query"
        );
        return true;
    }

    let samples: Vec<GateSample<'_>> = candidates
        .iter()
        .take(GATE_SAMPLE_LIMIT)
        .map(|c| GateSample {
            method: c.method.as_str(),
            url: &c.url,
            content_type: &c.response_content_type,
            query_param_names: c.query_params.keys().map(String::as_str).collect(),
            response_snippet: c
                .response_body
                .as_deref()
                .map(|text| truncate_chars(text, SNIPPET_CAP)),
        })
        .collect();

    let samples_json = match serde_json::to_string_pretty(&samples) {
        Ok(json) => json,
        Err(_) => return true,
    };

    match reasoner.complete(
        GATE_SYSTEM_PROMPT,
        &build_gate_prompt(&samples_json, description),
    ) {
        Ok(reply) => {
            let rejected = verdict_is_no(&reply);
            if rejected {
                tracing::info!(description, "query gated out as unrelated to capture");
            }
            !rejected
        }
        Err(e) => {
            // Availability over precision: never block a user because the
            // reasoning service is down.
            tracing::warn!(error = %e, "relevance gate unavailable, allowing query");
            true
        }
    }
}
