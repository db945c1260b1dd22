//! Showcase copy generation from an extracted referral page.

use std::sync::Arc;

use linkkarma_core::domain::{extract_domain, service_name};
use linkkarma_core::{Category, ExtractedPage, GeneratedShowcase, UserTier, parse_generated_showcase};
use thiserror::Error;
use tracing::{info, warn};

use crate::error::AttemptError;
use crate::llm::{GenerateRequest, LlmClient, Tool};
use crate::prompts::{CONTENT_SYSTEM_PROMPT, build_content_prompt};
use crate::rate_limit::{RateLimitExceeded, RateLimiter};
use crate::retry::{RetryError, RetryPolicy};

#[derive(Error, Debug)]
pub enum GenerationError {
    #[error(transparent)]
    RateLimited(#[from] RateLimitExceeded),
    #[error("content generation failed after {attempts} attempts: {last}")]
    Exhausted { attempts: u32, last: AttemptError },
    #[error("content generation failed: {0}")]
    Failed(AttemptError),
}

impl From<RetryError<AttemptError>> for GenerationError {
    fn from(err: RetryError<AttemptError>) -> Self {
        match err {
            RetryError::Exhausted { attempts, last } => Self::Exhausted { attempts, last },
            RetryError::Fatal(e) => Self::Failed(e),
        }
    }
}

pub struct ContentGenerator {
    llm: Arc<dyn LlmClient>,
    limiter: Arc<RateLimiter>,
    retry: RetryPolicy,
    max_tokens: u32,
    temperature: f32,
}

impl ContentGenerator {
    pub fn new(llm: Arc<dyn LlmClient>, limiter: Arc<RateLimiter>) -> Self {
        Self {
            llm,
            limiter,
            retry: RetryPolicy::default(),
            max_tokens: 2048,
            temperature: 0.7,
        }
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Quota left for `(user_id, tier)`, without charging it.
    pub fn check_quota(&self, user_id: &str, tier: UserTier) -> Result<u32, GenerationError> {
        Ok(self.limiter.check(user_id, tier)?)
    }

    /// Produce showcase copy for `page`.
    ///
    /// The quota for `(user_id, tier)` is charged before the model is called.
    pub async fn generate(
        &self,
        page: &ExtractedPage,
        category: Category,
        user_id: &str,
        tier: UserTier,
    ) -> Result<GeneratedShowcase, GenerationError> {
        let remaining = self.limiter.check_and_record(user_id, tier)?;

        let request = GenerateRequest {
            system_prompt: Some(CONTENT_SYSTEM_PROMPT.to_string()),
            user_prompt: build_content_prompt(page, category),
            max_tokens: self.max_tokens,
            temperature: self.temperature,
            tools: vec![Tool::WebSearch, Tool::UrlContext],
        };

        info!(
            url = %page.url,
            %category,
            user_id,
            remaining,
            model = self.llm.model(),
            "generating showcase content"
        );

        let result = self
            .retry
            .run(
                |attempt| {
                    let request = &request;
                    async move {
                        let response = self.llm.generate(request).await?;
                        let parsed = parse_generated_showcase(&response.text)?;
                        info!(attempt = attempt + 1, tokens_used = response.tokens_used, "showcase content parsed");
                        Ok::<_, AttemptError>(parsed)
                    }
                },
                AttemptError::is_retryable,
            )
            .await;

        let mut generated = match result {
            Ok(generated) => generated,
            Err(e) => {
                warn!(url = %page.url, error = %e, "showcase generation failed");
                return Err(e.into());
            }
        };

        if generated.service_name.is_empty() {
            generated.service_name = extract_domain(&page.url)
                .map(|d| service_name(&d))
                .unwrap_or_default();
        }
        Ok(generated)
    }
}
