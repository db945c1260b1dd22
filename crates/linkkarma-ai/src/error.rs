use linkkarma_core::ParseError;
use thiserror::Error;

use crate::llm::LlmError;

/// One failed call-and-parse cycle.
#[derive(Error, Debug)]
pub enum AttemptError {
    #[error("model call failed: {0}")]
    Llm(#[from] LlmError),
    #[error("model response unusable: {0}")]
    Parse(#[from] ParseError),
}

impl AttemptError {
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Llm(e) => e.is_retryable(),
            Self::Parse(_) => true,
        }
    }
}
