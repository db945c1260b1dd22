//! Model-backed services: showcase copy generation and link verification.

pub mod error;
#[cfg(feature = "gemini")]
pub mod gemini;
pub mod generator;
pub mod llm;
pub mod prompts;
pub mod rate_limit;
pub mod retry;
pub mod verifier;

pub use error::AttemptError;
pub use generator::{ContentGenerator, GenerationError};
pub use llm::{GenerateRequest, GenerateResponse, LlmClient, LlmError, ScriptedClient, Tool};
pub use rate_limit::{RateLimitExceeded, RateLimiter, TierLimits};
pub use retry::{RetryError, RetryPolicy};
pub use verifier::SecurityVerifier;
