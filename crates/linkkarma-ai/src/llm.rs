//! The seam between LinkKarma and a hosted generative model.

use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

/// Server-side tools the model may use while answering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tool {
    WebSearch,
    UrlContext,
}

#[derive(Debug, Clone)]
pub struct GenerateRequest {
    pub system_prompt: Option<String>,
    pub user_prompt: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub tools: Vec<Tool>,
}

#[derive(Debug, Clone)]
pub struct GenerateResponse {
    pub text: String,
    pub tokens_used: u32,
    pub model: String,
    pub finish_reason: Option<String>,
}

#[derive(Error, Debug)]
pub enum LlmError {
    #[cfg(feature = "gemini")]
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("model API returned {status}: {body}")]
    Api { status: u16, body: String },
    #[error("model call timed out after {0:?}")]
    Timeout(Duration),
    #[error("model returned no text")]
    EmptyResponse,
    #[error("unexpected model API payload: {0}")]
    Payload(String),
}

impl LlmError {
    /// Client errors other than timeouts and throttling will fail the same way
    /// on every attempt.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Api { status, .. } => !(400..500).contains(status) || matches!(status, 408 | 429),
            _ => true,
        }
    }
}

#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Model identifier, for logs.
    fn model(&self) -> &str;

    async fn generate(&self, request: &GenerateRequest) -> Result<GenerateResponse, LlmError>;
}

/// Replays queued outcomes in order and records every request it receives.
///
/// Once the queue is drained every call fails with [`LlmError::EmptyResponse`].
#[derive(Default)]
pub struct ScriptedClient {
    outcomes: Mutex<VecDeque<Result<String, LlmError>>>,
    requests: Mutex<Vec<GenerateRequest>>,
}

impl ScriptedClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(self, text: impl Into<String>) -> Self {
        self.push(Ok(text.into()))
    }

    pub fn fail(self, error: LlmError) -> Self {
        self.push(Err(error))
    }

    fn push(self, outcome: Result<String, LlmError>) -> Self {
        self.outcomes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(outcome);
        self
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn requests(&self) -> Vec<GenerateRequest> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl LlmClient for ScriptedClient {
    fn model(&self) -> &str {
        "scripted"
    }

    async fn generate(&self, request: &GenerateRequest) -> Result<GenerateResponse, LlmError> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request.clone());
        let next = self
            .outcomes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
            .unwrap_or(Err(LlmError::EmptyResponse))?;
        Ok(GenerateResponse {
            tokens_used: next.split_whitespace().count() as u32,
            text: next,
            model: "scripted".to_string(),
            finish_reason: Some("STOP".to_string()),
        })
    }
}
