//! HAR ingestion pipeline: parse a browser traffic capture, classify each
//! entry, and produce a ranked, token-budgeted candidate list.
//!
//! Stages are pure functions over their inputs:
//! entries → classify → extract (rank) → budget (reduce). Nothing here
//! talks to the network or the reasoning service.

pub mod budget;
pub mod classify;
pub mod entry;
pub mod extract;
pub mod types;

use thiserror::Error;

/// Errors from HAR ingestion.
#[derive(Error, Debug)]
pub enum HarError {
    /// The uploaded bytes could not be decoded as a HAR document at all.
    /// Distinct from "zero candidates found", which is a valid outcome.
    #[error("not a parseable HAR document: {0}")]
    MalformedInput(String),
}
