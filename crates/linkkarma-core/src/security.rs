//! Security verdicts for referral URLs.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Reputation verdict. Wire names are the product's Portuguese labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SecurityStatus {
    #[serde(rename = "APROVADO")]
    Approved,
    #[serde(rename = "SUSPEITO")]
    Suspicious,
    #[serde(rename = "BLOQUEADO")]
    Blocked,
}

impl SecurityStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Approved => "APROVADO",
            Self::Suspicious => "SUSPEITO",
            Self::Blocked => "BLOQUEADO",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "APROVADO" => Some(Self::Approved),
            "SUSPEITO" => Some(Self::Suspicious),
            "BLOQUEADO" => Some(Self::Blocked),
            _ => None,
        }
    }
}

impl fmt::Display for SecurityStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecurityDetails {
    #[serde(default)]
    pub positive_mentions: u32,
    #[serde(default)]
    pub negative_mentions: u32,
    #[serde(default)]
    pub scam_indicators: Vec<String>,
    #[serde(default)]
    pub trustworthiness_score: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SecurityCheckResult {
    pub status: SecurityStatus,
    /// 0–100.
    pub confidence: u8,
    pub sources_checked: Vec<String>,
    pub findings: Vec<String>,
    pub recommendation: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<SecurityDetails>,
    pub checked_at: DateTime<Utc>,
}

impl SecurityCheckResult {
    pub fn is_blocked(&self) -> bool {
        self.status == SecurityStatus::Blocked
    }

    /// Cautious verdict used when the reputation check could not complete.
    pub fn inconclusive(indicator: &str, recommendation: &str) -> Self {
        Self {
            status: SecurityStatus::Suspicious,
            confidence: 50,
            sources_checked: Vec::new(),
            findings: vec!["Não foi possível concluir a verificação automática".to_string()],
            recommendation: recommendation.to_string(),
            details: Some(SecurityDetails {
                positive_mentions: 0,
                negative_mentions: 0,
                scam_indicators: vec![indicator.to_string()],
                trustworthiness_score: 50,
            }),
            checked_at: Utc::now(),
        }
    }

    pub fn scam_indicators(&self) -> &[String] {
        self.details
            .as_ref()
            .map(|d| d.scam_indicators.as_slice())
            .unwrap_or(&[])
    }
}
