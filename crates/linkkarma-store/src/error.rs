use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("showcase not found: {0}")]
    NotFound(String),

    #[error("invalid showcase data: {0}")]
    Invalid(String),
}
