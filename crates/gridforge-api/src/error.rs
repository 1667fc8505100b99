//! API error mapping.
//!
//! Failures surface as `{"error": <message>}` with a non-2xx status; the
//! editors show the message verbatim. Validation and name problems map to
//! 400, missing documents to 404, everything else to 500.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use gridforge_core::GridforgeError;
use gridforge_store::StoreError;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::BadRequest(msg.into())
    }

    fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = %self, "request failed");
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound { .. } => Self::NotFound(e.to_string()),
            StoreError::AlreadyExists { .. } | StoreError::InvalidName(_) => {
                Self::BadRequest(e.to_string())
            }
            StoreError::Io(_) | StoreError::Json(_) => Self::Internal(e.to_string()),
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        Self::BadRequest(format!("malformed document: {e}"))
    }
}

impl From<GridforgeError> for ApiError {
    fn from(e: GridforgeError) -> Self {
        match e {
            GridforgeError::Validation(_) | GridforgeError::InvalidArgument(_) => {
                Self::BadRequest(e.to_string())
            }
            _ => Self::Internal(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_errors_map_to_statuses() {
        let e: ApiError = StoreError::not_found("enum", "Ghost").into();
        assert_eq!(e.status(), StatusCode::NOT_FOUND);

        let e: ApiError = StoreError::already_exists("enum", "MoveKind").into();
        assert_eq!(e.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn validation_maps_to_bad_request() {
        let e: ApiError = GridforgeError::validation("name is required").into();
        assert_eq!(e.status(), StatusCode::BAD_REQUEST);
        assert_eq!(e.to_string(), "name is required");
    }
}
