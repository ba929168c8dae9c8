use std::sync::Arc;

use axum::{
    routing::{delete, get, post, put},
    Router,
};

use crate::features::violations::handlers;
use crate::features::violations::services::ViolationService;

pub fn routes(service: Arc<ViolationService>) -> Router {
    Router::new()
        .route("/api/violation-types", get(handlers::list_violation_types))
        .route("/api/violation-types", post(handlers::create_violation_type))
        .route("/api/violation-types/{id}", get(handlers::get_violation_type))
        .route("/api/violation-types/{id}", put(handlers::update_violation_type))
        .route(
            "/api/violation-types/{id}",
            delete(handlers::delete_violation_type),
        )
        .with_state(service)
}
