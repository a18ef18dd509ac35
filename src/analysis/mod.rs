//! Query analysis: resolve a plain-language description against the
//! budgeted candidate list and shape the outcome for callers.
//!
//! gate → selector → reconcile → describe, each stage consuming the
//! previous stage's full output. The reasoning service is consulted by
//! gate, selector, descriptor and interpreter through one shared
//! extraction adapter; its failures never propagate past a stage that
//! has a documented fallback.

pub mod describe;
pub mod gate;
pub mod interpret;
pub mod prompt;
pub mod reconcile;
pub mod selector;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalysisError {
    /// A selection was attempted against zero extracted candidates.
    #[error("no candidate API requests were found in the capture")]
    NoCandidates,
}
