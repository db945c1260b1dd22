use axum::Json;
use axum::http::{HeaderValue, StatusCode, header::RETRY_AFTER};
use axum::response::{IntoResponse, Response};
use linkkarma_ai::{GenerationError, RateLimitExceeded};
use linkkarma_core::SecurityCheckResult;
use linkkarma_store::StoreError;
use serde::Serialize;
use thiserror::Error;
use tracing::error;

/// Request failures. `Display` is the user-facing message.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Informe a URL do link de indicação.")]
    UrlRequired,

    #[error("URL inválida. Use um link completo começando com http:// ou https://.")]
    InvalidUrl,

    #[error("Informe a categoria do serviço.")]
    CategoryRequired,

    #[error("Categoria inválida: {0}.")]
    InvalidCategory(String),

    #[error("Corpo da requisição inválido: {0}")]
    InvalidBody(String),

    #[error("Parâmetros de consulta inválidos: {0}")]
    InvalidQuery(String),

    #[error("Este link foi bloqueado pela verificação de segurança.")]
    LinkBlocked(Box<SecurityCheckResult>),

    #[error("Você atingiu o limite de {} gerações por hora do plano {}. Tente novamente mais tarde.", .0.limit, .0.tier)]
    RateLimited(RateLimitExceeded),

    #[error("O serviço de IA está indisponível no momento. Tente novamente em alguns minutos.")]
    AiUnavailable(#[source] GenerationError),

    #[error("Vitrine não encontrada.")]
    NotFound(String),

    #[error("Dados da vitrine inválidos: {0}")]
    Validation(String),

    #[error("Método não permitido.")]
    MethodNotAllowed,

    #[error("Erro interno do servidor.")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::UrlRequired
            | Self::InvalidUrl
            | Self::CategoryRequired
            | Self::InvalidCategory(_)
            | Self::InvalidBody(_)
            | Self::InvalidQuery(_)
            | Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::LinkBlocked(_) => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Self::RateLimited(_) => StatusCode::TOO_MANY_REQUESTS,
            Self::AiUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::UrlRequired => "URL_REQUIRED",
            Self::InvalidUrl => "INVALID_URL",
            Self::CategoryRequired => "CATEGORY_REQUIRED",
            Self::InvalidCategory(_) => "INVALID_CATEGORY",
            Self::InvalidBody(_) => "INVALID_BODY",
            Self::InvalidQuery(_) => "INVALID_QUERY",
            Self::LinkBlocked(_) => "LINK_BLOCKED",
            Self::RateLimited(_) => "RATE_LIMIT_EXCEEDED",
            Self::AiUnavailable(_) => "AI_SERVICE_UNAVAILABLE",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::MethodNotAllowed => "METHOD_NOT_ALLOWED",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    success: bool,
    error: &'static str,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    security_check: Option<SecurityCheckResult>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            Self::Internal(detail) => error!(detail = %detail, "internal error"),
            Self::AiUnavailable(source) => error!(error = %source, "AI service unavailable"),
            _ => {}
        }

        let retry_after = match &self {
            Self::RateLimited(e) => Some(e.retry_after.as_secs().max(1)),
            _ => None,
        };
        let message = self.to_string();
        let code = self.code();
        let security_check = match self {
            Self::LinkBlocked(check) => Some(*check),
            _ => None,
        };

        let mut response = (
            status,
            Json(ErrorBody {
                success: false,
                error: code,
                message,
                security_check,
            }),
        )
            .into_response();
        if let Some(secs) = retry_after {
            response
                .headers_mut()
                .insert(RETRY_AFTER, HeaderValue::from(secs));
        }
        response
    }
}

impl From<GenerationError> for ApiError {
    fn from(err: GenerationError) -> Self {
        match err {
            GenerationError::RateLimited(e) => Self::RateLimited(e),
            other => Self::AiUnavailable(other),
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(id) => Self::NotFound(id),
            StoreError::Invalid(reason) => Self::Validation(reason),
        }
    }
}
