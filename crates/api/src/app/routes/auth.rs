use std::sync::Arc;

use axum::{extract::Extension, http::StatusCode, response::IntoResponse, Json};
use chrono::Utc;

use crate::app::{dto, errors};
use crate::app::services::AppServices;

pub async fn login(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::LoginRequest>,
) -> axum::response::Response {
    match services.login(body, Utc::now()).await {
        Ok(res) => (StatusCode::OK, Json(res)).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn verify_email(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::VerifyEmailRequest>,
) -> axum::response::Response {
    match services.verify_email(body, Utc::now()).await {
        Ok(()) => (
            StatusCode::OK,
            Json(serde_json::json!({
                "success": true,
                "message": "Email verified successfully",
            })),
        )
            .into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}
