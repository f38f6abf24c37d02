//! Typed failures for each pipeline boundary
//!
//! Every fallible step converts lower-level errors into one of these values
//! before crossing into the next component; the session loop never sees a
//! raw driver or transport fault. The `Display` strings double as the text
//! surfaced to the user (and, for execution failures, as the `result` slot
//! fed back into the response prompt).

use thiserror::Error;

/// A connect attempt failed. Non-fatal; any previously opened handle is
/// left untouched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Failed to connect to the database: {message}")]
pub struct ConnectionError {
    pub message: String,
}

impl ConnectionError {
    pub fn new(message: impl Into<String>) -> Self {
        ConnectionError {
            message: message.into(),
        }
    }
}

/// A query could not be executed. Never fatal: the session feeds the error
/// into the response step so the user gets an explanation instead of
/// silence.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExecutionError {
    #[error("Please connect to the database first.")]
    NotConnected,

    #[error("Error executing query: {message}")]
    Driver { message: String },

    #[error("Query timed out after {seconds} seconds")]
    Timeout { seconds: u64 },
}

/// The completion capability could not be reached or did not answer.
/// Aborts the current turn with a visible notice; the transcript stays
/// consistent.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TranslationError {
    #[error("The language model request failed: {message}")]
    Completion { message: String },

    #[error("The language model did not answer within {seconds} seconds")]
    Timeout { seconds: u64 },
}
