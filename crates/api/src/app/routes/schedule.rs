use std::sync::Arc;

use axum::{
    extract::{Extension, Query},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::Utc;

use partsapp_auth::Permission;

use crate::app::routes::repair_orders::parse_status;
use crate::app::{dto, errors};
use crate::app::services::AppServices;
use crate::authz;
use crate::context::PrincipalContext;

pub async fn production_schedule(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Query(query): Query<dto::VehicleStatusQuery>,
) -> axum::response::Response {
    if let Err(e) = authz::require(&principal, Permission::SCHEDULE_READ) {
        return errors::service_error_to_response(e.into());
    }

    let filter = match parse_status(query.status.as_deref()) {
        Ok(f) => f,
        Err(resp) => return resp,
    };

    match services.production_schedule(filter, Utc::now()).await {
        Ok(schedule) => (StatusCode::OK, Json(schedule)).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn deliveries(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
) -> axum::response::Response {
    if let Err(e) = authz::require(&principal, Permission::DELIVERIES_READ) {
        return errors::service_error_to_response(e.into());
    }

    match services.deliveries().await {
        Ok(d) => (StatusCode::OK, Json(d)).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}
