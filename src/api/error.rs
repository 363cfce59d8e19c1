use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::Serialize;
use thiserror::Error;

use crate::logic::authorize::AccessDenied;
use crate::logic::validate::ValidationError;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<String>>,
}

impl ErrorResponse {
    pub fn new(message: &str) -> Self {
        Self {
            error: message.to_string(),
            details: None,
        }
    }
}

/// Terminal request outcomes. Every handler error maps onto exactly one
/// of the four user-visible denials or an opaque internal failure.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(#[from] ValidationError),
    #[error("authentication required")]
    Unauthenticated,
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    NotFound(String),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl From<AccessDenied> for ApiError {
    fn from(denied: AccessDenied) -> Self {
        match denied {
            AccessDenied::Unauthenticated => ApiError::Unauthenticated,
            forbidden @ AccessDenied::Forbidden { .. } => ApiError::Forbidden(forbidden.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::Validation(invalid) => (
                StatusCode::BAD_REQUEST,
                ErrorResponse {
                    error: "invalid model payload".to_string(),
                    details: Some(invalid.errors),
                },
            ),
            ApiError::Unauthenticated => (
                StatusCode::UNAUTHORIZED,
                ErrorResponse::new("authentication required"),
            ),
            ApiError::Forbidden(reason) => (StatusCode::FORBIDDEN, ErrorResponse::new(&reason)),
            ApiError::NotFound(reason) => (StatusCode::NOT_FOUND, ErrorResponse::new(&reason)),
            ApiError::Internal(source) => {
                log::error!("internal error: {source:#}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::new("internal server error"),
                )
            }
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::AccessTier;

    #[test]
    fn statuses_follow_the_error_taxonomy() {
        let cases = [
            (
                ApiError::Validation(ValidationError::single("bad")),
                StatusCode::BAD_REQUEST,
            ),
            (ApiError::Unauthenticated, StatusCode::UNAUTHORIZED),
            (
                ApiError::Forbidden("no".to_string()),
                StatusCode::FORBIDDEN,
            ),
            (
                ApiError::NotFound("gone".to_string()),
                StatusCode::NOT_FOUND,
            ),
            (
                ApiError::Internal(anyhow::anyhow!("boom")),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (error, expected) in cases {
            assert_eq!(error.into_response().status(), expected);
        }
    }

    #[test]
    fn denials_map_onto_the_http_taxonomy() {
        assert!(matches!(
            ApiError::from(AccessDenied::Unauthenticated),
            ApiError::Unauthenticated
        ));
        let forbidden = ApiError::from(AccessDenied::Forbidden {
            project: Some(4),
            tier: AccessTier::Write,
        });
        match forbidden {
            ApiError::Forbidden(reason) => assert!(reason.contains("project 4")),
            other => panic!("expected Forbidden, got {other:?}"),
        }
    }
}
