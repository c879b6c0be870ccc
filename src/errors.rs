use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::services::validation::ValidationError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Invalid request body")]
    InvalidBody,

    #[error("Database not ready")]
    DatabaseNotReady,

    #[error("Error inserting data")]
    Insert,

    #[error("Error fetching booking details")]
    Fetch,
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::InvalidBody => StatusCode::BAD_REQUEST,
            AppError::DatabaseNotReady | AppError::Insert | AppError::Fetch => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = serde_json::json!({ "message": self.to_string() });
        (self.status(), axum::Json(body)).into_response()
    }
}
