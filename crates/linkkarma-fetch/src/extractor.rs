//! HTTP fetch of referral target pages.
//!
//! Extraction never fails the caller for network or HTTP reasons: a page
//! that cannot be fetched degrades to a title/description synthesized from
//! the hostname, and the content prompt works from that.

use std::time::Duration;

use linkkarma_core::ExtractedPage;
use linkkarma_core::domain::{extract_domain, parse_http_url, service_name};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::html::{extract_meta_description, extract_title, html_to_text};

pub const USER_AGENT: &str = "Mozilla/5.0 (compatible; LinkKarmaBot/1.0; +https://linkkarma.app)";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_MAX_CHARS: usize = 5000;

/// Bytes read beyond the text budget, for `<head>` and markup.
const MARKUP_ALLOWANCE: usize = 64 * 1024;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("invalid URL: {0}")]
    InvalidUrl(String),
    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

pub struct ContentExtractor {
    client: reqwest::Client,
    max_chars: usize,
}

impl ContentExtractor {
    pub fn new(timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;
        Ok(Self {
            client,
            max_chars: DEFAULT_MAX_CHARS,
        })
    }

    /// Override the text budget (characters).
    pub fn with_max_chars(mut self, max_chars: usize) -> Self {
        self.max_chars = max_chars;
        self
    }

    /// Most bytes of a page body that are read; UTF-8 needs up to 4 per char.
    fn body_limit(&self) -> usize {
        self.max_chars.saturating_mul(4).saturating_add(MARKUP_ALLOWANCE)
    }

    /// Fetch `url` and reduce it to readable text.
    ///
    /// Only an unparsable URL is an error; everything after that degrades.
    pub async fn extract(&self, url: &str) -> Result<ExtractedPage, FetchError> {
        let parsed = parse_http_url(url).ok_or_else(|| FetchError::InvalidUrl(url.to_string()))?;

        info!(url = %parsed, "fetching referral page");
        let resp = match self.client.get(parsed.clone()).send().await {
            Ok(resp) => resp,
            Err(e) => {
                warn!(url = %parsed, error = %e, "page fetch failed, using fallback");
                return Ok(fallback_page(url));
            }
        };

        let status = resp.status();
        if !status.is_success() {
            warn!(url = %parsed, status = status.as_u16(), "page returned error status, using fallback");
            return Ok(fallback_page(url));
        }

        let body = match read_capped(resp, self.body_limit()).await {
            Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
            Err(e) => {
                warn!(url = %parsed, error = %e, "page body unreadable, using fallback");
                return Ok(fallback_page(url));
            }
        };

        let fallback = fallback_page(url);
        let page = ExtractedPage {
            url: url.to_string(),
            title: extract_title(&body).unwrap_or(fallback.title),
            description: extract_meta_description(&body).unwrap_or(fallback.description),
            text: html_to_text(&body, self.max_chars),
            degraded: false,
        };
        info!(url = %parsed, chars = page.text.chars().count(), "extracted page text");
        Ok(page)
    }
}

/// Read at most `limit` bytes of the body, dropping the connection after.
async fn read_capped(mut resp: reqwest::Response, limit: usize) -> Result<Vec<u8>, reqwest::Error> {
    let mut body = Vec::new();
    while let Some(chunk) = resp.chunk().await? {
        body.extend_from_slice(&chunk);
        if body.len() >= limit {
            body.truncate(limit);
            debug!(limit, "page body truncated");
            break;
        }
    }
    Ok(body)
}

/// Page data synthesized from the hostname alone.
pub fn fallback_page(url: &str) -> ExtractedPage {
    let name = extract_domain(url)
        .map(|d| service_name(&d))
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| "Serviço".to_string());
    ExtractedPage {
        url: url.to_string(),
        description: format!("Página de indicação do serviço {name}"),
        title: name,
        text: String::new(),
        degraded: true,
    }
}
