//! Error Types
//!
//! Errors surfaced by the HTTP layer. Coercion failures and unknown routes are
//! `NotFound`; anything the store reports becomes a 500 with the details kept
//! in the logs.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::database::DatabaseError;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Not found")]
    NotFound,
    #[error(transparent)]
    Store(#[from] DatabaseError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound | ApiError::Store(DatabaseError::NotFound(_)) => {
                StatusCode::NOT_FOUND
            }
            ApiError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            ApiError::NotFound => "Not found".to_string(),
            ApiError::Store(DatabaseError::NotFound(what)) => what.clone(),
            ApiError::Store(e) => {
                tracing::error!(error = %e, "Catalog query failed");
                "Internal server error".to_string()
            }
        };

        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}
