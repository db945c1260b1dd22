//! Typed parsing of model responses: repair, validate, deserialize.

use chrono::Utc;
use serde::Deserialize;

use crate::repair::{ParseError, repair_json};
use crate::schema::{CONTENT_SCHEMA, SECURITY_SCHEMA};
use crate::security::{SecurityCheckResult, SecurityDetails, SecurityStatus};
use crate::showcase::{FaqItem, GeneratedShowcase, ShowcaseContent};

#[derive(Deserialize)]
struct ContentPayload {
    title: String,
    short_description: String,
    #[serde(default)]
    service_name: Option<String>,
    what_is: String,
    advantages: Vec<String>,
    steps: Vec<String>,
    faq: Vec<FaqItem>,
}

#[derive(Deserialize)]
struct VerdictPayload {
    status: String,
    confidence: f64,
    sources_checked: Vec<String>,
    findings: Vec<String>,
    recommendation: String,
    #[serde(default)]
    details: Option<DetailsPayload>,
}

#[derive(Deserialize)]
struct DetailsPayload {
    #[serde(default)]
    positive_mentions: f64,
    #[serde(default)]
    negative_mentions: f64,
    #[serde(default)]
    scam_indicators: Vec<String>,
    #[serde(default)]
    trustworthiness_score: f64,
}

/// Clamp a model-reported score into 0–100.
fn score(v: f64) -> u8 {
    if v.is_nan() {
        return 0;
    }
    v.round().clamp(0.0, 100.0) as u8
}

fn count(v: f64) -> u32 {
    if v.is_nan() || v < 0.0 {
        return 0;
    }
    v.round().min(u32::MAX as f64) as u32
}

/// Parse generated showcase copy. `service_name` may come back empty; the
/// caller fills it in.
pub fn parse_generated_showcase(raw: &str) -> Result<GeneratedShowcase, ParseError> {
    let value = repair_json(raw)?;
    CONTENT_SCHEMA.validate(&value)?;
    let payload: ContentPayload = serde_json::from_value(value)?;

    Ok(GeneratedShowcase {
        title: payload.title.trim().to_string(),
        short_description: payload.short_description.trim().to_string(),
        service_name: payload
            .service_name
            .map(|s| s.trim().to_string())
            .unwrap_or_default(),
        content: ShowcaseContent {
            what_is: payload.what_is.trim().to_string(),
            advantages: payload.advantages,
            steps: payload.steps,
            faq: payload.faq,
        },
    })
}

/// Parse a reputation verdict as reported by the model, before any
/// deterministic overrides.
pub fn parse_security_verdict(raw: &str) -> Result<SecurityCheckResult, ParseError> {
    let value = repair_json(raw)?;
    SECURITY_SCHEMA.validate(&value)?;
    let payload: VerdictPayload = serde_json::from_value(value)?;

    let status = SecurityStatus::parse(&payload.status)
        .ok_or_else(|| ParseError::validation("status", "unknown verdict"))?;

    Ok(SecurityCheckResult {
        status,
        confidence: score(payload.confidence),
        sources_checked: payload.sources_checked,
        findings: payload.findings,
        recommendation: payload.recommendation,
        details: payload.details.map(|d| SecurityDetails {
            positive_mentions: count(d.positive_mentions),
            negative_mentions: count(d.negative_mentions),
            scam_indicators: d.scam_indicators,
            trustworthiness_score: score(d.trustworthiness_score),
        }),
        checked_at: Utc::now(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONTENT: &str = r#"{
        "title": "Ganhe R$ 20 no Inter",
        "short_description": "Conta digital gratuita",
        "service_name": " Inter ",
        "what_is": "Banco digital completo",
        "advantages": ["Sem tarifas", "Cashback", "Investimentos"],
        "steps": ["Baixe o app", "Use o convite", "Abra a conta"],
        "faq": [
            {"question": "É grátis?", "answer": "Sim"},
            {"question": "Tem cartão?", "answer": "Sim"}
        ]
    }"#;

    #[test]
    fn content_from_fenced_output() {
        let raw = format!("```json\n{CONTENT}\n```");
        let parsed = parse_generated_showcase(&raw).unwrap();
        assert_eq!(parsed.service_name, "Inter");
        assert_eq!(parsed.content.advantages.len(), 3);
        assert_eq!(parsed.content.steps.len(), 3);
        assert_eq!(parsed.content.faq.len(), 2);
    }

    #[test]
    fn content_violation_names_field() {
        let raw = CONTENT.replace(r#""Cashback", "#, "");
        match parse_generated_showcase(&raw) {
            Err(ParseError::Validation { field, rule }) => {
                assert_eq!(field, "advantages");
                assert!(rule.contains("exactly 3"), "{rule}");
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn missing_service_name_is_empty() {
        let raw = CONTENT.replace(r#""service_name": " Inter ","#, "");
        let parsed = parse_generated_showcase(&raw).unwrap();
        assert_eq!(parsed.service_name, "");
    }

    #[test]
    fn verdict_clamps_scores() {
        let raw = r#"{
            "status": "aprovado",
            "confidence": 140.2,
            "sources_checked": ["Reclame Aqui", "Trustpilot"],
            "findings": ["Empresa regulada"],
            "recommendation": "Seguro",
            "details": {"positive_mentions": 12, "negative_mentions": -3, "trustworthiness_score": 92.6}
        }"#;
        let verdict = parse_security_verdict(raw).unwrap();
        assert_eq!(verdict.status, SecurityStatus::Approved);
        assert_eq!(verdict.confidence, 100);
        let details = verdict.details.unwrap();
        assert_eq!(details.positive_mentions, 12);
        assert_eq!(details.negative_mentions, 0);
        assert_eq!(details.trustworthiness_score, 93);
        assert!(details.scam_indicators.is_empty());
    }

    #[test]
    fn verdict_without_details() {
        let raw = "{'status': 'BLOQUEADO', 'confidence': 95, 'sources_checked': [], 'findings': ['Phishing'], 'recommendation': 'Não use'}";
        let verdict = parse_security_verdict(raw).unwrap();
        assert!(verdict.is_blocked());
        assert!(verdict.details.is_none());
    }

    #[test]
    fn verdict_missing_recommendation() {
        let raw = r#"{"status": "SUSPEITO", "confidence": 40, "sources_checked": [], "findings": []}"#;
        assert!(matches!(
            parse_security_verdict(raw),
            Err(ParseError::Validation { field, .. }) if field == "recommendation"
        ));
    }

    #[test]
    fn verdict_bad_details_field_is_named() {
        let raw = r#"{"status": "SUSPEITO", "confidence": 40, "sources_checked": [],
            "findings": [], "recommendation": "",
            "details": {"positive_mentions": "varias", "scam_indicators": null}}"#;
        assert!(matches!(
            parse_security_verdict(raw),
            Err(ParseError::Validation { field, .. }) if field == "details.positive_mentions"
        ));
    }
}
