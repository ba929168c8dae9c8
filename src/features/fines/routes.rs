use std::sync::Arc;

use axum::{
    routing::{delete, get, post, put},
    Router,
};

use crate::features::fines::handlers;
use crate::features::fines::services::FineService;

pub fn routes(service: Arc<FineService>) -> Router {
    Router::new()
        .route("/api/fines", get(handlers::list_fines))
        .route("/api/fines", post(handlers::create_fine))
        .route("/api/fines/{id}", get(handlers::get_fine))
        .route("/api/fines/{id}", put(handlers::update_fine))
        .route("/api/fines/{id}", delete(handlers::delete_fine))
        .with_state(service)
}
