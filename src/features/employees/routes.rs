use std::sync::Arc;

use axum::{
    routing::{delete, get, post, put},
    Router,
};

use crate::features::employees::handlers;
use crate::features::employees::services::EmployeeService;

pub fn routes(service: Arc<EmployeeService>) -> Router {
    Router::new()
        // /totals must register before /{id} so it is not captured as an id.
        .route("/api/employees/totals", get(handlers::employee_totals))
        .route("/api/employees", get(handlers::list_employees))
        .route("/api/employees", post(handlers::create_employee))
        .route("/api/employees/{id}", get(handlers::get_employee))
        .route("/api/employees/{id}", put(handlers::update_employee))
        .route("/api/employees/{id}", delete(handlers::delete_employee))
        .with_state(service)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_helpers::{test_pool, with_admin_auth};
    use axum_test::TestServer;
    use serde_json::{json, Value};

    async fn server() -> TestServer {
        let pool = test_pool().await;
        let router = with_admin_auth(routes(Arc::new(EmployeeService::new(pool))));
        TestServer::new(router).unwrap()
    }

    #[tokio::test]
    async fn test_create_then_list_over_http() {
        let server = server().await;

        let created = server
            .post("/api/employees")
            .json(&json!({ "name": "Ann Lee", "department": "IT" }))
            .await;
        created.assert_status_ok();
        let body: Value = created.json();
        assert_eq!(body["data"]["name"], "Ann Lee");

        let listed = server.get("/api/employees").await;
        listed.assert_status_ok();
        let body: Value = listed.json();
        assert_eq!(body["data"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_missing_name_is_a_400_with_error_body() {
        let server = server().await;
        let response = server
            .post("/api/employees")
            .json(&json!({ "department": "IT" }))
            .await;
        response.assert_status_bad_request();
        let body: Value = response.json();
        assert_eq!(body["error"], "Employee name is required");
    }

    #[tokio::test]
    async fn test_totals_route_precedes_id_capture() {
        let server = server().await;
        let response = server.get("/api/employees/totals").await;
        response.assert_status_ok();
        let body: Value = response.json();
        assert!(body["data"].as_array().unwrap().is_empty());
    }
}
