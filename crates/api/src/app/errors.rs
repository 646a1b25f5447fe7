use axum::http::{header, HeaderValue, StatusCode};
use axum::response::IntoResponse;
use serde_json::json;
use thiserror::Error;

use partsapp_auth::{AuthzError, JwtError};
use partsapp_core::DomainError;
use partsapp_import::ImportError;
use partsapp_infra::StoreError;

/// Failure of an application service call.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Forbidden(#[from] AuthzError),

    #[error("{0}")]
    Unauthorized(String),

    #[error("too many login attempts; try again in {retry_after_secs} seconds")]
    RateLimited { retry_after_secs: i64 },

    #[error("{extract}: {source}")]
    Import {
        extract: &'static str,
        #[source]
        source: ImportError,
    },

    #[error(transparent)]
    Token(#[from] JwtError),
}

impl ServiceError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Domain(DomainError::validation(msg))
    }
}

pub fn service_error_to_response(err: ServiceError) -> axum::response::Response {
    match err {
        ServiceError::Domain(e) => domain_error_to_response(e),
        ServiceError::Store(e) => store_error_to_response(e),
        ServiceError::Forbidden(e) => json_error(StatusCode::FORBIDDEN, "forbidden", e.to_string()),
        ServiceError::Unauthorized(msg) => json_error(StatusCode::UNAUTHORIZED, "unauthorized", msg),
        ServiceError::RateLimited { retry_after_secs } => {
            let mut res = json_error(
                StatusCode::TOO_MANY_REQUESTS,
                "rate_limited",
                format!("Too many login attempts. Please try again in {retry_after_secs} seconds."),
            );
            if let Ok(v) = HeaderValue::from_str(&retry_after_secs.to_string()) {
                res.headers_mut().insert(header::RETRY_AFTER, v);
            }
            res
        }
        e @ ServiceError::Import { .. } => json_error(StatusCode::BAD_REQUEST, "import_error", e.to_string()),
        ServiceError::Token(e) => {
            tracing::error!(error = %e, "token signing failed");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "token_error", "failed to issue token")
        }
    }
}

pub fn domain_error_to_response(err: DomainError) -> axum::response::Response {
    match err {
        DomainError::Validation(msg) => json_error(StatusCode::BAD_REQUEST, "validation_error", msg),
        DomainError::InvalidId(msg) => json_error(StatusCode::BAD_REQUEST, "invalid_id", msg),
        DomainError::NotFound => json_error(StatusCode::NOT_FOUND, "not_found", "not found"),
        DomainError::Conflict(msg) => json_error(StatusCode::CONFLICT, "conflict", msg),
    }
}

pub fn store_error_to_response(err: StoreError) -> axum::response::Response {
    match err {
        StoreError::NotFound => json_error(StatusCode::NOT_FOUND, "not_found", "not found"),
        StoreError::Conflict(msg) => json_error(StatusCode::CONFLICT, "conflict", msg),
        StoreError::Storage(msg) => {
            tracing::error!(error = %msg, "storage failure");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "store_error", "internal storage error")
        }
    }
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
