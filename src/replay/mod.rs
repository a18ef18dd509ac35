//! Replay boundary: turn a reconciled request into a runnable curl
//! command, and run such a command against the live endpoint.

pub mod curl;
pub mod execute;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReplayError {
    #[error("invalid curl command: {0}")]
    InvalidCommand(String),

    #[error("unsupported HTTP method: {0}")]
    UnsupportedMethod(String),

    #[error("request failed: {0}")]
    Request(String),
}
