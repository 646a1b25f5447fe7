use std::sync::Arc;

use axum::{
    extract::{Extension, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use chrono::Utc;

use partsapp_auth::Permission;
use partsapp_materials::{MaterialFilter, NewMaterial};

use crate::app::errors;
use crate::app::services::AppServices;
use crate::authz;
use crate::context::PrincipalContext;

pub fn router() -> Router {
    Router::new().route("/", get(list_materials).post(create_material))
}

pub async fn list_materials(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Query(filter): Query<MaterialFilter>,
) -> axum::response::Response {
    if let Err(e) = authz::require(&principal, Permission::MATERIALS_READ) {
        return errors::service_error_to_response(e.into());
    }

    match services.materials(filter).await {
        Ok(items) => (StatusCode::OK, Json(serde_json::json!({ "items": items }))).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn create_material(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Json(body): Json<NewMaterial>,
) -> axum::response::Response {
    if let Err(e) = authz::require(&principal, Permission::MATERIALS_CREATE) {
        return errors::service_error_to_response(e.into());
    }

    match services.create_material(body, Utc::now()).await {
        Ok(material) => (StatusCode::CREATED, Json(material)).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}
