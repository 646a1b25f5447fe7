use axum::{
    routing::{get, patch, post},
    Router,
};

pub mod admin;
pub mod auth;
pub mod materials;
pub mod parts;
pub mod repair_orders;
pub mod schedule;
pub mod system;
pub mod vendors;
pub mod work_queue;

/// Router for all authenticated endpoints.
pub fn router() -> Router {
    Router::new()
        .route("/whoami", get(system::whoami))
        .route("/profile", patch(system::update_profile))
        .nest("/repair-orders", repair_orders::router())
        .nest("/parts", parts::router())
        .route("/production-schedule", get(schedule::production_schedule))
        .route("/deliveries", get(schedule::deliveries))
        .nest("/vendors", vendors::router())
        .nest("/materials", materials::router())
        .nest("/work-queue", work_queue::router())
        .nest("/admin", admin::router())
}

/// Router for endpoints reachable without a token.
pub fn public_router() -> Router {
    Router::new()
        .route("/health", get(system::health))
        .route("/auth/login", post(auth::login))
        .route("/auth/verify-email", post(auth::verify_email))
}
