use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, patch},
    Json, Router,
};
use chrono::Utc;

use partsapp_auth::Permission;
use partsapp_core::RoNumber;
use partsapp_vehicles::{NewWorkQueueEntry, WorkQueuePatch};

use crate::app::{dto, errors};
use crate::app::services::AppServices;
use crate::authz;
use crate::context::PrincipalContext;

pub fn router() -> Router {
    Router::new()
        .route("/", get(work_board).post(enqueue))
        .route("/:ro", patch(update_entry).delete(remove_entry))
}

pub async fn work_board(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Query(query): Query<dto::WorkQueueQuery>,
) -> axum::response::Response {
    if let Err(e) = authz::require(&principal, Permission::WORK_QUEUE_READ) {
        return errors::service_error_to_response(e.into());
    }

    match services.work_board(query.department.as_deref()).await {
        Ok(board) => (StatusCode::OK, Json(board)).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn enqueue(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Json(body): Json<NewWorkQueueEntry>,
) -> axum::response::Response {
    if let Err(e) = authz::require(&principal, Permission::WORK_QUEUE_WRITE) {
        return errors::service_error_to_response(e.into());
    }

    match services.enqueue(body, Utc::now()).await {
        Ok(entry) => (StatusCode::CREATED, Json(entry)).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn update_entry(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(ro): Path<String>,
    Json(body): Json<WorkQueuePatch>,
) -> axum::response::Response {
    if let Err(e) = authz::require(&principal, Permission::WORK_QUEUE_WRITE) {
        return errors::service_error_to_response(e.into());
    }

    let ro_number = match ro.parse::<RoNumber>() {
        Ok(r) => r,
        Err(e) => return errors::domain_error_to_response(e),
    };

    match services.update_work_queue(ro_number, body, Utc::now()).await {
        Ok(entry) => (StatusCode::OK, Json(entry)).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn remove_entry(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(ro): Path<String>,
) -> axum::response::Response {
    if let Err(e) = authz::require(&principal, Permission::WORK_QUEUE_WRITE) {
        return errors::service_error_to_response(e.into());
    }

    let ro_number = match ro.parse::<RoNumber>() {
        Ok(r) => r,
        Err(e) => return errors::domain_error_to_response(e),
    };

    match services.remove_from_queue(ro_number).await {
        Ok(()) => (StatusCode::OK, Json(serde_json::json!({ "success": true }))).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}
