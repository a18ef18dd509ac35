//! Selector: picks the single candidate that best matches the query.
//!
//! The matching judgment is delegated to the reasoning service; parsing
//! of its reply is lenient and every parse failure degrades to the
//! highest-ranked candidate at rock-bottom confidence rather than an
//! error. The only hard failure is an empty candidate list.

use serde_json::Value;

use crate::analysis::prompt::{build_selector_prompt, SELECTOR_SYSTEM_PROMPT};
use crate::analysis::AnalysisError;
use crate::har::types::BudgetedRequest;
use crate::reason::extract_json::{extract_json_object, first_confidence};
use crate::reason::Reasoner;

/// Confidence assigned when the reply yields no usable JSON and the
/// top-ranked candidate is returned instead.
pub const FALLBACK_CONFIDENCE: f64 = 0.1;

/// Confidence assigned when a request was extracted but no confidence
/// value accompanied it — the middle of the "partial match" band.
const DEFAULT_CONFIDENCE: f64 = 0.5;

/// Selection outcome: the service's candidate object (possibly
/// reformatted — reconciliation handles that) plus a [0,1] confidence.
#[derive(Debug, Clone)]
pub struct Selection {
    pub request: Value,
    pub confidence: f64,
}

/// Ask the reasoning service for the best-matching candidate.
pub fn select_candidate(
    reasoner: &dyn Reasoner,
    budgeted: &[BudgetedRequest],
    description: &str,
) -> Result<Selection, AnalysisError> {
    if budgeted.is_empty() {
        return Err(AnalysisError::NoCandidates);
    }

    let candidates_json = serde_json::to_string_pretty(budgeted)
        .unwrap_or_else(|_| "[]".to_string());
    let prompt = build_selector_prompt(&candidates_json, description);

    let reply = match reasoner.complete(SELECTOR_SYSTEM_PROMPT, &prompt) {
        Ok(reply) => reply,
        Err(e) => {
            tracing::warn!(error = %e, "selection judgment unavailable, falling back to top candidate");
            return Ok(fallback(budgeted));
        }
    };

    match parse_selection(&reply) {
        Some(selection) => Ok(selection),
        None => {
            tracing::warn!("no JSON object in selection reply, falling back to top candidate");
            Ok(fallback(budgeted))
        }
    }
}

/// Lenient reply parsing: first JSON object, then a confidence from the
/// object's `confidence` field or the first decimal outside the JSON span.
fn parse_selection(reply: &str) -> Option<Selection> {
    let (value, span) = extract_json_object(reply)?;

    // Preferred shape: {"request": {...}, "confidence": 0.x}. A bare
    // request object (older-style reply) is accepted too.
    let (request, embedded_confidence) = match value {
        Value::Object(ref map) if map.contains_key("request") => {
            let confidence = map.get("confidence").and_then(Value::as_f64);
            (map.get("request").cloned()?, confidence)
        }
        other @ Value::Object(_) => (other, None),
        _ => return None,
    };

    if !request.is_object() {
        return None;
    }

    let outside = format!("{}{}", &reply[..span.start], &reply[span.end..]);
    let confidence = embedded_confidence
        .or_else(|| first_confidence(&outside))
        .unwrap_or(DEFAULT_CONFIDENCE)
        .clamp(0.0, 1.0);

    Some(Selection {
        request,
        confidence,
    })
}

fn fallback(budgeted: &[BudgetedRequest]) -> Selection {
    Selection {
        request: serde_json::to_value(&budgeted[0]).unwrap_or(Value::Null),
        confidence: FALLBACK_CONFIDENCE,
    }
}
