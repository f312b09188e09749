pub mod engine;
pub mod llm;
pub mod parser;
pub mod prompt;

pub use engine::*;
pub use llm::*;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ComplianceError {
    #[error("LLM API key not configured (set {0})")]
    MissingApiKey(&'static str),

    #[error("Cannot reach LLM API at {0}")]
    Connection(String),

    #[error("LLM request timed out after {0}s")]
    Timeout(u64),

    #[error("LLM API error {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Failed to decode LLM HTTP response: {0}")]
    ResponseDecoding(String),

    #[error("Malformed LLM response: {0}")]
    MalformedResponse(String),

    #[error("Failed to parse JSON from LLM response: {0}")]
    JsonParsing(String),

    #[error("LLM echoed the wrong id: expected {expected}, got {got}")]
    MismatchedId { expected: String, got: String },

    #[error("Unknown {field} label in LLM response: {value}")]
    UnknownLabel { field: &'static str, value: String },
}

impl ComplianceError {
    /// Parse-level failures are worth one retry — the model may produce
    /// valid JSON on a second attempt. Transport and auth failures are not.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::MalformedResponse(_)
                | Self::JsonParsing(_)
                | Self::MismatchedId { .. }
                | Self::UnknownLabel { .. }
        )
    }
}
