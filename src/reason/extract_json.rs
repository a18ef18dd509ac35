//! Lenient payload extraction from free-form reasoning replies.
//!
//! One adapter shared by every call site: strict JSON first, then a
//! fenced ```json``` block, then the first balanced `{...}` substring.
//! Malformed JSON in a reply is not an error class — each caller falls
//! back per its own policy when nothing extracts.

use std::ops::Range;
use std::sync::OnceLock;

use regex::Regex;
use serde_json::Value;

fn decimal_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\d+(?:\.\d+)?").expect("valid regex"))
}

/// Extract the first well-formed JSON object from a reply, along with the
/// byte range it occupied. Tries, in order: the whole (trimmed) reply, the
/// first ```json``` fence, the first balanced-brace substring.
pub fn extract_json_object(text: &str) -> Option<(Value, Range<usize>)> {
    let trimmed = text.trim();
    if let Ok(value @ Value::Object(_)) = serde_json::from_str::<Value>(trimmed) {
        let start = text.len() - text.trim_start().len();
        return Some((value, start..start + trimmed.len()));
    }

    if let Some(range) = fenced_json_range(text) {
        if let Ok(value @ Value::Object(_)) =
            serde_json::from_str::<Value>(&text[range.clone()])
        {
            return Some((value, range));
        }
    }

    balanced_object(text)
}

/// Convenience wrapper when the span is not needed.
pub fn parse_json_lenient(text: &str) -> Option<Value> {
    extract_json_object(text).map(|(value, _)| value)
}

/// The first decimal number in `text`, clamped to [0, 1]. Used to salvage
/// a confidence value from prose around (or instead of) the JSON payload.
pub fn first_confidence(text: &str) -> Option<f64> {
    decimal_re()
        .find(text)
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .map(|v| v.clamp(0.0, 1.0))
}

/// Read a YES/NO verdict out of a reply. Returns `true` only for an
/// unambiguous NO — a reply containing YES anywhere, or neither token,
/// counts as assent. This is deliberately lenient: the callers treat
/// rejection as the expensive mistake.
pub fn verdict_is_no(text: &str) -> bool {
    let mut saw_no = false;
    for token in text.split(|c: char| !c.is_ascii_alphabetic()) {
        if token.eq_ignore_ascii_case("yes") {
            return false;
        }
        if token.eq_ignore_ascii_case("no") {
            saw_no = true;
        }
    }
    saw_no
}

/// Content range of the first ```json fenced block, if any.
fn fenced_json_range(text: &str) -> Option<Range<usize>> {
    let fence_start = text.find("```json")?;
    let content_start = fence_start + "```json".len();
    let fence_end = text[content_start..].find("```")?;
    Some(content_start..content_start + fence_end)
}

/// First balanced `{...}` substring that parses as a JSON object. Brace
/// depth tracking skips string contents and escapes so nested payloads
/// survive intact.
fn balanced_object(text: &str) -> Option<(Value, Range<usize>)> {
    let bytes = text.as_bytes();
    let mut start = None;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, &b) in bytes.iter().enumerate() {
        if in_string {
            if escaped {
                escaped = false;
            } else if b == b'\\' {
                escaped = true;
            } else if b == b'"' {
                in_string = false;
            }
            continue;
        }
        match b {
            b'"' if start.is_some() => in_string = true,
            b'{' => {
                if start.is_none() {
                    start = Some(i);
                }
                depth += 1;
            }
            b'}' if start.is_some() => {
                depth -= 1;
                if depth == 0 {
                    let range = start.unwrap()..i + 1;
                    if let Ok(value @ Value::Object(_)) =
                        serde_json::from_str::<Value>(&text[range.clone()])
                    {
                        return Some((value, range));
                    }
                    // Unparseable span: keep scanning after it.
                    start = None;
                }
            }
            _ => {}
        }
    }
    None
}
