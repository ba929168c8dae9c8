use std::sync::Arc;

use axum::{routing::get, Router};

use crate::features::dashboard::handlers;
use crate::features::dashboard::services::DashboardService;

pub fn routes(service: Arc<DashboardService>) -> Router {
    Router::new()
        .route("/api/dashboard/stats", get(handlers::dashboard_stats))
        .with_state(service)
}
