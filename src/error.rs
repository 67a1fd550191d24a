use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::models::ItemId;

/// Body returned for every failed recommendation request. Internals are logged,
/// never sent to the caller.
pub const GENERIC_FAILURE: &str = "Problem with request";

/// Scoring failures
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum RankError {
    #[error("Model produced a non-finite score for item {item_id}: {score}")]
    NonFiniteScore { item_id: ItemId, score: f64 },

    #[error("Model error: {0}")]
    Model(String),
}

/// Failures of the blending pipeline as a whole
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum BlendError {
    #[error("Ranking failed: {0}")]
    Ranking(#[from] RankError),
}

/// Failures while fetching or decoding artifacts at start-up
#[derive(thiserror::Error, Debug)]
pub enum ArtifactError {
    #[error("Failed to read artifact {key}: {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to download artifact {key}: {source}")]
    Http {
        key: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Failed to fetch artifact {key} from object storage: {source}")]
    S3 {
        key: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Failed to decode artifact {key}: {source}")]
    Decode {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid model artifact: {0}")]
    InvalidModel(String),

    #[error("No artifact source configured: set ARTIFACT_S3_BUCKET, ARTIFACT_BASE_URL or ARTIFACT_DIR")]
    NoSource,
}

/// Application-level errors
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Blending failed: {0}")]
    Blend(#[from] BlendError),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AppError::Blend(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        tracing::warn!(error = %self, status = status.as_u16(), "Request failed");

        let body = Json(json!({
            "error": GENERIC_FAILURE
        }));

        (status, body).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
