use std::sync::Arc;

use axum::{
    extract::{DefaultBodyLimit, Extension, Multipart, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, patch, post},
    Json, Router,
};
use chrono::Utc;

use partsapp_auth::{NewUser, Permission, UserPatch};
use partsapp_core::{MaterialId, RoNumber, UserId};
use partsapp_materials::MaterialPatch;

use crate::app::{dto, errors};
use crate::app::services::AppServices;
use crate::authz;
use crate::context::PrincipalContext;

/// Extracts from the shop system run to a few MB each.
const UPLOAD_LIMIT_BYTES: usize = 25 * 1024 * 1024;

pub fn router() -> Router {
    Router::new()
        .route("/users", get(list_users).post(create_user))
        .route("/users/:id", patch(update_user).delete(delete_user))
        .route("/materials/:id", patch(update_material).delete(delete_material))
        .route(
            "/upload-extracts",
            post(upload_extracts).layer(DefaultBodyLimit::max(UPLOAD_LIMIT_BYTES)),
        )
        .route("/debug-ro", get(debug_ro))
}

pub async fn list_users(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
) -> axum::response::Response {
    if let Err(e) = authz::require(&principal, Permission::ADMIN_USERS) {
        return errors::service_error_to_response(e.into());
    }

    match services.list_users().await {
        Ok(items) => (StatusCode::OK, Json(serde_json::json!({ "items": items }))).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn create_user(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Json(body): Json<NewUser>,
) -> axum::response::Response {
    if let Err(e) = authz::require(&principal, Permission::ADMIN_USERS) {
        return errors::service_error_to_response(e.into());
    }

    match services.create_user(principal.user_id(), body, Utc::now()).await {
        Ok(user) => (StatusCode::CREATED, Json(user)).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn update_user(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
    Json(body): Json<UserPatch>,
) -> axum::response::Response {
    if let Err(e) = authz::require(&principal, Permission::ADMIN_USERS) {
        return errors::service_error_to_response(e.into());
    }

    let id = match id.parse::<UserId>() {
        Ok(v) => v,
        Err(e) => return errors::domain_error_to_response(e),
    };

    match services.update_user(principal.user_id(), id, body, Utc::now()).await {
        Ok(user) => (StatusCode::OK, Json(user)).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn delete_user(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    if let Err(e) = authz::require(&principal, Permission::ADMIN_USERS) {
        return errors::service_error_to_response(e.into());
    }

    let id = match id.parse::<UserId>() {
        Ok(v) => v,
        Err(e) => return errors::domain_error_to_response(e),
    };

    match services.delete_user(principal.user_id(), id).await {
        Ok(()) => (StatusCode::OK, Json(serde_json::json!({ "success": true }))).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn update_material(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
    Json(body): Json<MaterialPatch>,
) -> axum::response::Response {
    if let Err(e) = authz::require(&principal, Permission::ADMIN_MATERIALS) {
        return errors::service_error_to_response(e.into());
    }

    let id = match id.parse::<MaterialId>() {
        Ok(v) => v,
        Err(e) => return errors::domain_error_to_response(e),
    };

    match services.update_material(principal.user_id(), id, body).await {
        Ok(material) => (StatusCode::OK, Json(material)).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn delete_material(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    if let Err(e) = authz::require(&principal, Permission::ADMIN_MATERIALS) {
        return errors::service_error_to_response(e.into());
    }

    let id = match id.parse::<MaterialId>() {
        Ok(v) => v,
        Err(e) => return errors::domain_error_to_response(e),
    };

    match services.delete_material(principal.user_id(), id).await {
        Ok(()) => (StatusCode::OK, Json(serde_json::json!({ "success": true }))).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

/// Multipart fields `daily_out`, `parts_status`, `vendors`; each optional.
pub async fn upload_extracts(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    mut multipart: Multipart,
) -> axum::response::Response {
    if let Err(e) = authz::require(&principal, Permission::ADMIN_IMPORT) {
        return errors::service_error_to_response(e.into());
    }

    let mut upload = dto::ExtractUpload::default();
    loop {
        let field = match multipart.next_field().await {
            Ok(Some(f)) => f,
            Ok(None) => break,
            Err(e) => return errors::json_error(StatusCode::BAD_REQUEST, "invalid_multipart", e.body_text()),
        };
        let name = field.name().unwrap_or_default().to_string();
        let content = match field.text().await {
            Ok(t) => t,
            Err(e) => return errors::json_error(StatusCode::BAD_REQUEST, "invalid_multipart", e.body_text()),
        };
        // Browsers send an empty part for an unselected file input.
        if content.trim().is_empty() {
            continue;
        }
        match name.as_str() {
            "daily_out" => upload.daily_out = Some(content),
            "parts_status" => upload.parts_status = Some(content),
            "vendors" => upload.vendors = Some(content),
            other => tracing::debug!(field = %other, "ignoring unknown upload field"),
        }
    }

    match services.import_extracts(principal.user_id(), upload, Utc::now()).await {
        Ok(report) => (StatusCode::OK, Json(report)).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn debug_ro(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Query(query): Query<dto::DebugRoQuery>,
) -> axum::response::Response {
    if let Err(e) = authz::require(&principal, Permission::ADMIN_DEBUG) {
        return errors::service_error_to_response(e.into());
    }

    let ro_number = match query.ro_number.as_deref().map(str::parse::<RoNumber>) {
        Some(Ok(r)) => r,
        Some(Err(e)) => return errors::domain_error_to_response(e),
        None => {
            return errors::json_error(StatusCode::BAD_REQUEST, "validation_error", "ro_number is required");
        }
    };

    match services.debug_ro(ro_number).await {
        Ok(res) => (StatusCode::OK, Json(res)).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}
