use std::sync::Arc;

use axum::{routing::post, Router};

use crate::features::email::handlers;
use crate::features::email::services::EmailService;

pub fn routes(service: Arc<EmailService>) -> Router {
    Router::new()
        .route("/api/fines/{id}/email-receipt", post(handlers::send_receipt))
        .route(
            "/api/send-employee-report",
            post(handlers::send_employee_report),
        )
        .route("/api/send-test-email", post(handlers::send_test_email))
        .with_state(service)
}
