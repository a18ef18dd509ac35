//! Reasoning boundary: every natural-language judgment the pipeline
//! delegates (relevance gate, candidate selection, API description,
//! response interpretation) goes through the `Reasoner` trait.
//!
//! Calls are blocking, attempted once with a bounded timeout, and never
//! retried — each call site documents its own fallback on failure.

pub mod extract_json;
pub mod ollama;

use std::collections::VecDeque;
use std::sync::Mutex;

use thiserror::Error;

/// Errors from the reasoning boundary. Always recovered locally by the
/// calling stage (gate → allow, selector → first candidate, descriptor →
/// sentinel); only the interpreter surfaces them.
#[derive(Error, Debug)]
pub enum ReasonError {
    #[error("reasoning service is not reachable at {0}")]
    Connection(String),

    #[error("reasoning request timed out after {0}s")]
    Timeout(u64),

    #[error("reasoning service returned status {status}: {body}")]
    Service { status: u16, body: String },

    #[error("reasoning response could not be decoded: {0}")]
    Decode(String),
}

/// A natural-language reasoning capability: system instructions plus a
/// prompt in, free-form text out. The reply is expected (not guaranteed)
/// to contain an embedded JSON object, a YES/NO token, or a decimal
/// confidence; callers must tolerate extraneous text around the payload.
pub trait Reasoner: Send + Sync {
    fn complete(&self, system: &str, prompt: &str) -> Result<String, ReasonError>;
}

// ═══════════════════════════════════════════════════════════
// MockReasoner — scripted replies for tests
// ═══════════════════════════════════════════════════════════

/// Mock reasoner that plays back scripted replies in order, repeating the
/// last one once the script runs out. `failing()` simulates an
/// unreachable service.
pub struct MockReasoner {
    replies: Mutex<VecDeque<String>>,
    last: Mutex<String>,
    fail: bool,
}

impl MockReasoner {
    pub fn new(reply: &str) -> Self {
        Self::with_replies(vec![reply.to_string()])
    }

    pub fn with_replies(replies: Vec<String>) -> Self {
        let last = replies.last().cloned().unwrap_or_default();
        Self {
            replies: Mutex::new(replies.into()),
            last: Mutex::new(last),
            fail: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            replies: Mutex::new(VecDeque::new()),
            last: Mutex::new(String::new()),
            fail: true,
        }
    }
}

impl Reasoner for MockReasoner {
    fn complete(&self, _system: &str, _prompt: &str) -> Result<String, ReasonError> {
        if self.fail {
            return Err(ReasonError::Connection("mock://down".into()));
        }
        let mut queue = self.replies.lock().unwrap();
        match queue.pop_front() {
            Some(reply) => {
                *self.last.lock().unwrap() = reply.clone();
                Ok(reply)
            }
            None => Ok(self.last.lock().unwrap().clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mock_plays_replies_in_order() {
        let mock = MockReasoner::with_replies(vec!["first".into(), "second".into()]);
        assert_eq!(mock.complete("s", "p").unwrap(), "first");
        assert_eq!(mock.complete("s", "p").unwrap(), "second");
    }

    #[test]
    fn mock_repeats_last_reply_when_exhausted() {
        let mock = MockReasoner::new("only");
        assert_eq!(mock.complete("s", "p").unwrap(), "only");
        assert_eq!(mock.complete("s", "p").unwrap(), "only");
    }

    #[test]
    fn failing_mock_errors() {
        let mock = MockReasoner::failing();
        assert!(matches!(
            mock.complete("s", "p"),
            Err(ReasonError::Connection(_))
        ));
    }
}
