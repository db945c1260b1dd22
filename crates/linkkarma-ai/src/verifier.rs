//! Reputation check for referral links.
//!
//! The model searches for the service's reputation and returns a verdict;
//! deterministic domain rules then override it. Verification never fails
//! the caller: when the model cannot produce a usable verdict the link is
//! marked `SUSPEITO` for manual review.

use std::sync::{Arc, LazyLock};

use linkkarma_core::domain::{domain_matches, extract_domain, service_name};
use linkkarma_core::{SecurityCheckResult, SecurityDetails, SecurityStatus, parse_security_verdict};
use regex::Regex;
use tracing::{info, warn};

use crate::error::AttemptError;
use crate::llm::{GenerateRequest, LlmClient, Tool};
use crate::prompts::{SECURITY_SYSTEM_PROMPT, build_security_prompt};
use crate::retry::RetryPolicy;

pub const KNOWN_SAFE_DOMAINS: &[&str] = &[
    "nubank.com.br",
    "inter.co",
    "c6bank.com.br",
    "picpay.com",
    "mercadopago.com.br",
    "mercadolivre.com.br",
    "amazon.com.br",
    "amazon.com",
    "ifood.com.br",
    "uber.com",
    "99app.com",
    "airbnb.com",
    "booking.com",
    "binance.com",
    "coinbase.com",
    "rappi.com.br",
    "xpi.com.br",
    "btgpactual.com",
    "rico.com.vc",
    "paypal.com",
    "google.com",
    "apple.com",
    "spotify.com",
    "netflix.com",
];

const SUSPICIOUS_FRAGMENTS: &[&str] = &["free-money", "gratis", "bonus-", "-login", "verify-", "secure-"];
const SUSPICIOUS_TLDS: &[&str] = &[".tk", ".ml", ".ga", ".cf", ".gq", ".xyz"];

const KNOWN_SAFE_CONFIDENCE: u8 = 90;
const SUSPICIOUS_CONFIDENCE_CAP: u8 = 70;

const MANUAL_REVIEW: &str =
    "Não foi possível verificar este link automaticamente. Revise manualmente antes de compartilhar.";

static IPV4_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{1,3}(\.\d{1,3}){3}$").unwrap());
static DIGIT_RUN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d{4,}").unwrap());

/// True when `domain` is, or is a subdomain of, an allowlisted service.
pub fn is_known_safe(domain: &str) -> bool {
    KNOWN_SAFE_DOMAINS
        .iter()
        .any(|root| domain_matches(domain, root))
}

/// First lexical red flag found in `domain`, if any.
pub fn suspicious_pattern(domain: &str) -> Option<String> {
    if let Some(fragment) = SUSPICIOUS_FRAGMENTS.iter().find(|f| domain.contains(*f)) {
        return Some((*fragment).to_string());
    }
    if let Some(tld) = SUSPICIOUS_TLDS.iter().find(|t| domain.ends_with(*t)) {
        return Some(format!("tld {tld}"));
    }
    if domain.starts_with('[') || IPV4_RE.is_match(domain) {
        return Some("ip host".to_string());
    }
    // Brand names glued to other words, like `nubank-premio.com`.
    let tokens: Vec<&str> = domain
        .split('.')
        .filter(|label| label.contains('-'))
        .flat_map(|label| label.split('-'))
        .collect();
    for root in KNOWN_SAFE_DOMAINS {
        let brand = root.split('.').next().unwrap_or_default();
        if tokens.contains(&brand) {
            return Some(format!("hyphenated brand {brand}"));
        }
    }
    if let Some(run) = DIGIT_RUN_RE.find(domain) {
        return Some(format!("digit run {}", run.as_str()));
    }
    None
}

/// Apply the allowlist, then the suspicious patterns, to a model verdict.
pub fn apply_overrides(domain: &str, mut result: SecurityCheckResult) -> SecurityCheckResult {
    if is_known_safe(domain) {
        if result.status != SecurityStatus::Approved {
            info!(domain, model_status = %result.status, "allowlisted domain, forcing approval");
        }
        result.status = SecurityStatus::Approved;
        result.confidence = result.confidence.max(KNOWN_SAFE_CONFIDENCE);
        result
            .findings
            .push("Domínio oficial de um serviço amplamente conhecido".to_string());
        return result;
    }

    if result.status == SecurityStatus::Approved
        && let Some(pattern) = suspicious_pattern(domain)
    {
        warn!(domain, pattern = %pattern, "suspicious domain pattern, downgrading approval");
        result.status = SecurityStatus::Suspicious;
        result.confidence = result.confidence.min(SUSPICIOUS_CONFIDENCE_CAP);
        result
            .findings
            .push(format!("Padrão suspeito no domínio: {pattern}"));
        result
            .details
            .get_or_insert_with(SecurityDetails::default)
            .scam_indicators
            .push(pattern);
    }
    result
}

pub struct SecurityVerifier {
    llm: Arc<dyn LlmClient>,
    retry: RetryPolicy,
    max_tokens: u32,
}

impl SecurityVerifier {
    pub fn new(llm: Arc<dyn LlmClient>) -> Self {
        Self {
            llm,
            retry: RetryPolicy::default(),
            max_tokens: 1024,
        }
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub async fn verify(&self, url: &str) -> SecurityCheckResult {
        let Some(domain) = extract_domain(url) else {
            warn!(url, "cannot verify unparsable URL");
            return SecurityCheckResult::inconclusive("invalid_url", MANUAL_REVIEW);
        };
        let name = service_name(&domain);

        info!(url, domain = %domain, model = self.llm.model(), "verifying link reputation");
        let result = self
            .retry
            .run(
                |attempt| {
                    let request = GenerateRequest {
                        system_prompt: Some(SECURITY_SYSTEM_PROMPT.to_string()),
                        user_prompt: build_security_prompt(url, &domain, &name, attempt),
                        max_tokens: self.max_tokens,
                        temperature: 0.1,
                        tools: vec![Tool::WebSearch],
                    };
                    async move {
                        let response = self.llm.generate(&request).await?;
                        Ok::<_, AttemptError>(parse_security_verdict(&response.text)?)
                    }
                },
                AttemptError::is_retryable,
            )
            .await;

        match result {
            Ok(verdict) => {
                let verdict = apply_overrides(&domain, verdict);
                info!(
                    domain = %domain,
                    status = %verdict.status,
                    confidence = verdict.confidence,
                    "link verified"
                );
                verdict
            }
            Err(e) => {
                warn!(domain = %domain, error = %e, "verification failed, marking link for review");
                SecurityCheckResult::inconclusive("verification_failed", MANUAL_REVIEW)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::ScriptedClient;
    use chrono::Utc;

    fn verdict(status: &str, confidence: u8) -> String {
        format!(
            r#"{{"status": "{status}", "confidence": {confidence},
                "sources_checked": ["Reclame Aqui"], "findings": ["ok"],
                "recommendation": "Pode compartilhar"}}"#
        )
    }

    fn result(status: SecurityStatus, confidence: u8) -> SecurityCheckResult {
        SecurityCheckResult {
            status,
            confidence,
            sources_checked: vec![],
            findings: vec![],
            recommendation: String::new(),
            details: None,
            checked_at: Utc::now(),
        }
    }

    fn verifier(llm: Arc<ScriptedClient>) -> SecurityVerifier {
        SecurityVerifier::new(llm).with_retry(RetryPolicy::immediate(3))
    }

    #[test]
    fn allowlist_matches_subdomains_only() {
        assert!(is_known_safe("nubank.com.br"));
        assert!(is_known_safe("app.nubank.com.br"));
        assert!(!is_known_safe("fakenubank.com.br"));
        assert!(!is_known_safe("nubank.com.br.evil.xyz"));
    }

    #[test]
    fn suspicious_patterns() {
        assert!(suspicious_pattern("free-money-now.com").is_some());
        assert!(suspicious_pattern("premio.tk").is_some());
        assert!(suspicious_pattern("192.168.0.10").is_some());
        assert!(suspicious_pattern("nubank-premio.com").is_some());
        assert!(suspicious_pattern("loja12345.com.br").is_some());
        assert_eq!(suspicious_pattern("meusite.com.br"), None);
    }

    #[test]
    fn brand_must_be_a_whole_hyphen_token() {
        assert_eq!(
            suspicious_pattern("promo-nubank.com").as_deref(),
            Some("hyphenated brand nubank")
        );
        assert_eq!(suspicious_pattern("super-interessante.com.br"), None);
        assert_eq!(suspicious_pattern("mapple-store.com"), None);
    }

    #[test]
    fn allowlist_forces_approval() {
        let out = apply_overrides("nubank.com.br", result(SecurityStatus::Blocked, 40));
        assert_eq!(out.status, SecurityStatus::Approved);
        assert_eq!(out.confidence, 90);

        let out = apply_overrides("nubank.com.br", result(SecurityStatus::Approved, 97));
        assert_eq!(out.confidence, 97);
    }

    #[test]
    fn suspicious_domain_downgrades_approval_only() {
        let out = apply_overrides("bonus-pix.xyz", result(SecurityStatus::Approved, 95));
        assert_eq!(out.status, SecurityStatus::Suspicious);
        assert_eq!(out.confidence, 70);
        assert_eq!(out.scam_indicators(), ["bonus-".to_string()]);

        let out = apply_overrides("bonus-pix.xyz", result(SecurityStatus::Blocked, 95));
        assert_eq!(out.status, SecurityStatus::Blocked);
        assert_eq!(out.confidence, 95);
    }

    #[tokio::test]
    async fn verified_link_gets_overrides() {
        let llm = Arc::new(ScriptedClient::new().reply(verdict("SUSPEITO", 60)));
        let out = verifier(llm.clone()).verify("https://www.picpay.com/convite?c=ABC").await;
        assert_eq!(out.status, SecurityStatus::Approved);
        assert!(out.confidence >= 90);
        assert_eq!(llm.calls(), 1);
        assert!(llm.requests()[0].user_prompt.contains("Domínio: picpay.com"));
    }

    #[tokio::test]
    async fn blocked_verdict_passes_through() {
        let llm = Arc::new(ScriptedClient::new().reply(verdict("BLOQUEADO", 88)));
        let out = verifier(llm).verify("https://premios-pix.com/r/1").await;
        assert!(out.is_blocked());
        assert_eq!(out.confidence, 88);
    }

    #[tokio::test]
    async fn second_attempt_uses_stricter_prompt() {
        let llm = Arc::new(
            ScriptedClient::new()
                .reply("não encontrei nada")
                .reply(verdict("APROVADO", 80)),
        );
        let out = verifier(llm.clone()).verify("https://meusite.com.br/r").await;
        assert_eq!(out.status, SecurityStatus::Approved);

        let requests = llm.requests();
        assert_eq!(requests.len(), 2);
        assert!(!requests[0].user_prompt.contains("ATENÇÃO"));
        assert!(requests[1].user_prompt.contains("ATENÇÃO"));
    }

    #[tokio::test]
    async fn failure_is_fail_safe() {
        let llm = Arc::new(ScriptedClient::new());
        let out = verifier(llm.clone()).verify("https://meusite.com.br/r").await;
        assert_eq!(out.status, SecurityStatus::Suspicious);
        assert_eq!(out.confidence, 50);
        assert_eq!(out.scam_indicators(), ["verification_failed".to_string()]);
        assert_eq!(llm.calls(), 3);
    }

    #[tokio::test]
    async fn invalid_url_skips_the_model() {
        let llm = Arc::new(ScriptedClient::new());
        let out = verifier(llm.clone()).verify("not a url").await;
        assert_eq!(out.scam_indicators(), ["invalid_url".to_string()]);
        assert_eq!(llm.calls(), 0);
    }
}
