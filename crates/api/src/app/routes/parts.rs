use std::sync::Arc;

use axum::{
    extract::{Extension, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};

use partsapp_auth::Permission;

use crate::app::{dto, errors};
use crate::app::services::AppServices;
use crate::authz;
use crate::context::PrincipalContext;

pub fn router() -> Router {
    Router::new()
        .route("/search", get(search_parts))
        .route("/unordered", get(unordered_parts))
}

pub async fn search_parts(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Query(query): Query<dto::SearchQuery>,
) -> axum::response::Response {
    if let Err(e) = authz::require(&principal, Permission::PARTS_READ) {
        return errors::service_error_to_response(e.into());
    }

    match services.search_parts(query.q.as_deref().unwrap_or_default()).await {
        Ok(items) => (StatusCode::OK, Json(serde_json::json!({ "items": items }))).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn unordered_parts(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
) -> axum::response::Response {
    if let Err(e) = authz::require(&principal, Permission::PARTS_READ) {
        return errors::service_error_to_response(e.into());
    }

    match services.unordered_parts().await {
        Ok(items) => (StatusCode::OK, Json(serde_json::json!({ "items": items }))).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}
