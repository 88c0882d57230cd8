use super::dispatch::EvaluatorError;
use super::repository::StoreError;
use axum::http::StatusCode;

/// Error taxonomy for the recruiting workflow. Callers branch on kind rather
/// than catching generic failures; a duplicate evaluation result is *not* an
/// error, it is resolved by replacement.
#[derive(Debug, thiserror::Error)]
pub enum RecruitingError {
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("evaluator call failed: {0}")]
    Evaluator(#[from] EvaluatorError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("serialization failure: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl RecruitingError {
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Evaluator(_) => StatusCode::BAD_GATEWAY,
            Self::Store(_) | Self::Serialization(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
