use std::sync::Arc;

use axum::{
    routing::{get, put},
    Router,
};

use crate::features::admin::handlers;
use crate::features::admin::services::SettingsService;

pub fn routes(service: Arc<SettingsService>) -> Router {
    Router::new()
        .route("/api/admin/settings", get(handlers::get_settings))
        .route("/api/admin/settings", put(handlers::update_settings))
        .with_state(service)
}
