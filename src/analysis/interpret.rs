//! Interpreter: plain-language explanation of a replayed API response.
//!
//! Unlike the other reasoning call sites there is no meaningful local
//! fallback — an interpretation either exists or the service error is
//! surfaced to the caller.

use crate::analysis::prompt::{build_interpret_prompt, INTERPRET_SYSTEM_PROMPT};
use crate::reason::{ReasonError, Reasoner};

/// Ask the reasoning service to explain a response. The reply is Markdown
/// and is returned as-is.
pub fn interpret_response(
    reasoner: &dyn Reasoner,
    api_response: &str,
    api_description: &str,
) -> Result<String, ReasonError> {
    reasoner.complete(
        INTERPRET_SYSTEM_PROMPT,
        &build_interpret_prompt(api_response, api_description),
    )
}
