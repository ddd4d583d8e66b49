use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

use crate::domain::RecommendationState;

#[derive(Error, Debug)]
pub enum TravelokiError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Recommendation {id} is {state}, only pending records can be resolved")]
    InvalidTransition {
        id: uuid::Uuid,
        state: RecommendationState,
    },

    #[error("Administrator privileges required")]
    Unauthorized,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Location source unavailable: {0}")]
    LocationUnavailable(String),

    #[error("No location fix received yet")]
    NoLocation,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON deserialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, TravelokiError>;

impl IntoResponse for TravelokiError {
    fn into_response(self) -> Response {
        let status = match self {
            TravelokiError::Validation(_) => StatusCode::BAD_REQUEST,
            TravelokiError::Unauthorized => StatusCode::UNAUTHORIZED,
            TravelokiError::NotFound(_) => StatusCode::NOT_FOUND,
            TravelokiError::InvalidTransition { .. } => StatusCode::CONFLICT,
            TravelokiError::NoLocation | TravelokiError::LocationUnavailable(_) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(serde_json::json!({
            "status": "error",
            "message": self.to_string(),
        }));

        (status, body).into_response()
    }
}
