//! Showcase generation endpoint plus health and method fallbacks.

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use linkkarma_core::domain::parse_http_url;
use linkkarma_core::{Category, GeneratedShowcase, SecurityCheckResult, UserTier};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::{info, warn};

use crate::error::ApiError;
use crate::state::AppState;

const ANONYMOUS_USER: &str = "anonymous";

/// Body of `POST /api/generate-showcase`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateShowcaseRequest {
    pub url: Option<String>,
    pub category: Option<String>,
    pub user_id: Option<String>,
    pub user_tier: Option<String>,
}

/// A request that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedRequest {
    pub url: String,
    pub category: Category,
    pub user_id: String,
    pub tier: UserTier,
}

impl GenerateShowcaseRequest {
    pub fn validate(self) -> Result<ValidatedRequest, ApiError> {
        let url = self
            .url
            .map(|u| u.trim().to_string())
            .filter(|u| !u.is_empty())
            .ok_or(ApiError::UrlRequired)?;
        if parse_http_url(&url).is_none() {
            return Err(ApiError::InvalidUrl);
        }

        let category = self
            .category
            .filter(|c| !c.trim().is_empty())
            .ok_or(ApiError::CategoryRequired)?;
        let category = category
            .parse::<Category>()
            .map_err(|e| ApiError::InvalidCategory(e.0))?;

        let tier = match self.user_tier.as_deref().map(str::trim) {
            None | Some("") => UserTier::default(),
            Some(tier) => tier
                .parse::<UserTier>()
                .map_err(|e| ApiError::InvalidBody(format!("userTier: {e}")))?,
        };

        let user_id = self
            .user_id
            .map(|u| u.trim().to_string())
            .filter(|u| !u.is_empty())
            .unwrap_or_else(|| ANONYMOUS_USER.to_string());

        Ok(ValidatedRequest {
            url,
            category,
            user_id,
            tier,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct GenerateShowcaseResponse {
    pub success: bool,
    pub data: GeneratedShowcase,
    pub security_check: SecurityCheckResult,
}

/// Verify the link, read the page, then generate copy.
///
/// An exhausted quota is rejected before any model call. A blocked link stops
/// with 403 and its verdict; extraction and verification problems degrade,
/// generation failures do not.
pub async fn generate_showcase(
    State(state): State<AppState>,
    payload: Result<Json<GenerateShowcaseRequest>, JsonRejection>,
) -> Result<Json<GenerateShowcaseResponse>, ApiError> {
    let Json(body) = payload.map_err(|e| ApiError::InvalidBody(e.body_text()))?;
    let request = body.validate()?;
    info!(
        url = %request.url,
        category = %request.category,
        user_id = %request.user_id,
        tier = %request.tier,
        "showcase generation requested"
    );

    state.generator.check_quota(&request.user_id, request.tier)?;

    let security_check = state.verifier.verify(&request.url).await;
    if security_check.is_blocked() {
        warn!(url = %request.url, confidence = security_check.confidence, "link blocked");
        return Err(ApiError::LinkBlocked(Box::new(security_check)));
    }

    let page = state
        .extractor
        .extract(&request.url)
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    let data = state
        .generator
        .generate(&page, request.category, &request.user_id, request.tier)
        .await?;

    info!(url = %request.url, title = %data.title, "showcase generated");
    Ok(Json(GenerateShowcaseResponse {
        success: true,
        data,
        security_check,
    }))
}

pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

pub async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(url: Option<&str>, category: Option<&str>) -> GenerateShowcaseRequest {
        GenerateShowcaseRequest {
            url: url.map(Into::into),
            category: category.map(Into::into),
            ..Default::default()
        }
    }

    #[test]
    fn validates_required_fields_in_order() {
        assert!(matches!(
            request(None, None).validate(),
            Err(ApiError::UrlRequired)
        ));
        assert!(matches!(
            request(Some("   "), Some("crypto")).validate(),
            Err(ApiError::UrlRequired)
        ));
        assert!(matches!(
            request(Some("ftp://files.example.com"), Some("crypto")).validate(),
            Err(ApiError::InvalidUrl)
        ));
        assert!(matches!(
            request(Some("https://binance.com/r/1"), None).validate(),
            Err(ApiError::CategoryRequired)
        ));
        assert!(matches!(
            request(Some("https://binance.com/r/1"), Some("casino")).validate(),
            Err(ApiError::InvalidCategory(c)) if c == "casino"
        ));
    }

    #[test]
    fn defaults_user_and_tier() {
        let valid = request(Some(" https://binance.com/r/1 "), Some("Crypto"))
            .validate()
            .unwrap();
        assert_eq!(valid.url, "https://binance.com/r/1");
        assert_eq!(valid.category, Category::Crypto);
        assert_eq!(valid.user_id, ANONYMOUS_USER);
        assert_eq!(valid.tier, UserTier::Free);
    }

    #[test]
    fn rejects_unknown_tier() {
        let mut req = request(Some("https://binance.com/r/1"), Some("crypto"));
        req.user_tier = Some("gold".into());
        assert!(matches!(req.validate(), Err(ApiError::InvalidBody(_))));
    }
}
