use std::sync::Arc;

use linkkarma_ai::gemini::GeminiClient;
use linkkarma_ai::{ContentGenerator, LlmClient, LlmError, RateLimiter, SecurityVerifier};
use linkkarma_fetch::{ContentExtractor, FetchError};
use linkkarma_store::{MemoryStore, ShowcaseRepository};
use thiserror::Error;
use tracing::info;

use crate::config::Config;

#[derive(Error, Debug)]
pub enum StartupError {
    #[error("failed to build model client: {0}")]
    Llm(#[from] LlmError),
    #[error("failed to build page extractor: {0}")]
    Fetch(#[from] FetchError),
    #[error("invalid listen address: {0}")]
    Address(#[from] std::net::AddrParseError),
    #[error("server I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Services shared by every request handler.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ShowcaseRepository>,
    pub extractor: Arc<ContentExtractor>,
    pub generator: Arc<ContentGenerator>,
    pub verifier: Arc<SecurityVerifier>,
}

impl AppState {
    pub fn new(
        store: Arc<dyn ShowcaseRepository>,
        extractor: Arc<ContentExtractor>,
        generator: Arc<ContentGenerator>,
        verifier: Arc<SecurityVerifier>,
    ) -> Self {
        Self {
            store,
            extractor,
            generator,
            verifier,
        }
    }

    /// Wire the production services: Gemini for both model roles, the
    /// in-memory store and a fresh rate limiter.
    pub fn from_config(config: &Config) -> Result<Self, StartupError> {
        let llm: Arc<dyn LlmClient> = Arc::new(GeminiClient::new(config.llm.gemini())?);
        info!(model = llm.model(), "model client ready");

        let store: Arc<dyn ShowcaseRepository> = if config.seed_showcases {
            Arc::new(MemoryStore::with_seed_data(config.store_latency()))
        } else {
            Arc::new(MemoryStore::new(config.store_latency()))
        };

        let limiter = Arc::new(RateLimiter::default());
        Ok(Self::new(
            store,
            Arc::new(ContentExtractor::new(config.fetch.timeout())?),
            Arc::new(ContentGenerator::new(llm.clone(), limiter)),
            Arc::new(SecurityVerifier::new(llm)),
        ))
    }
}
