//! API error types with HTTP response mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use domain::{DomainError, ReceptionError};

/// API-level error type that maps to HTTP responses.
#[derive(Debug)]
pub enum ApiError {
    /// Bad request from the client.
    BadRequest(String),
    /// Domain logic error.
    Domain(DomainError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Domain(err) => domain_error_to_response(err),
        };

        let body = serde_json::json!({ "message": message });
        (status, axum::Json(body)).into_response()
    }
}

fn domain_error_to_response(err: DomainError) -> (StatusCode, String) {
    match &err {
        DomainError::Reception(rule) => match rule {
            ReceptionError::PickupPointNotFound(_) => (StatusCode::NOT_FOUND, err.to_string()),
            ReceptionError::ReceptionAlreadyOpen(_)
            | ReceptionError::NoOpenReception(_)
            | ReceptionError::ReceptionAlreadyClosed(_)
            | ReceptionError::NoProductsInReception(_) => {
                (StatusCode::BAD_REQUEST, err.to_string())
            }
        },
        DomainError::Store(_) | DomainError::Projection(_) => {
            tracing::error!(error = %err, "internal server error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal server error".to_string(),
            )
        }
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        ApiError::Domain(err)
    }
}
