use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use chrono::Utc;

use partsapp_auth::Permission;
use partsapp_core::RoNumber;
use partsapp_parts::{PartSortField, SortDirection};
use partsapp_vehicles::VehicleStatusFilter;

use crate::app::{dto, errors};
use crate::app::services::AppServices;
use crate::authz;
use crate::context::PrincipalContext;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_repair_orders))
        .route("/:ro", get(get_repair_order))
}

pub async fn list_repair_orders(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Query(query): Query<dto::VehicleStatusQuery>,
) -> axum::response::Response {
    if let Err(e) = authz::require(&principal, Permission::REPAIR_ORDERS_READ) {
        return errors::service_error_to_response(e.into());
    }

    let filter = match parse_status(query.status.as_deref()) {
        Ok(f) => f,
        Err(resp) => return resp,
    };

    match services.repair_orders(filter, Utc::now()).await {
        Ok(items) => (StatusCode::OK, Json(serde_json::json!({ "items": items }))).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn get_repair_order(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(ro): Path<String>,
    Query(query): Query<dto::PartSortQuery>,
) -> axum::response::Response {
    if let Err(e) = authz::require(&principal, Permission::REPAIR_ORDERS_READ) {
        return errors::service_error_to_response(e.into());
    }

    let ro_number = match ro.parse::<RoNumber>() {
        Ok(r) => r,
        Err(e) => return errors::domain_error_to_response(e),
    };

    let sort = match query.sort.as_deref().map(str::parse::<PartSortField>).transpose() {
        Ok(s) => s.unwrap_or_default(),
        Err(msg) => return errors::json_error(StatusCode::BAD_REQUEST, "validation_error", msg),
    };
    let direction = match query.dir.as_deref().map(str::parse::<SortDirection>).transpose() {
        Ok(d) => d.unwrap_or_default(),
        Err(msg) => return errors::json_error(StatusCode::BAD_REQUEST, "validation_error", msg),
    };

    match services.repair_order_detail(ro_number, sort, direction).await {
        Ok(detail) => (StatusCode::OK, Json(detail)).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

/// `?status=` value; absent means all vehicles.
pub(crate) fn parse_status(status: Option<&str>) -> Result<VehicleStatusFilter, axum::response::Response> {
    status
        .unwrap_or_default()
        .parse::<VehicleStatusFilter>()
        .map_err(errors::domain_error_to_response)
}
