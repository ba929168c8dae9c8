#![cfg(test)]

use std::time::Duration;

use axum::{extract::Request, middleware::Next, response::Response, Router};
use chrono::{DateTime, Utc};
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;

use crate::core::config::AuthConfig;
use crate::features::auth::model::{AuthenticatedUser, Role};

/// Fresh in-memory database with the schema applied. One connection so the
/// in-memory store is shared for the pool's lifetime.
pub async fn test_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("failed to open in-memory database");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("failed to run migrations");
    pool
}

pub fn test_auth_config() -> AuthConfig {
    AuthConfig {
        jwt_secret: "test-secret".to_string(),
        token_ttl: Duration::from_secs(3600),
        admin_username: "admin".to_string(),
        admin_password: "admin123".to_string(),
        viewer_username: None,
        viewer_password: None,
    }
}

pub fn create_admin_user() -> AuthenticatedUser {
    AuthenticatedUser {
        username: "admin".to_string(),
        role: Role::Admin,
    }
}

async fn inject_admin_middleware(mut request: Request, next: Next) -> Response {
    request.extensions_mut().insert(create_admin_user());
    next.run(request).await
}

/// Wraps a feature router with a layer that injects an admin identity, in
/// place of the bearer-token middleware.
pub fn with_admin_auth(router: Router) -> Router {
    router.layer(axum::middleware::from_fn(inject_admin_middleware))
}

pub async fn insert_employee(pool: &SqlitePool, name: &str) -> i64 {
    let now = Utc::now();
    sqlx::query(
        "INSERT INTO employees (name, department, employee_code, phone, email, created_at, updated_at) \
         VALUES (?, '', '', '', '', ?, ?)",
    )
    .bind(name)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await
    .expect("failed to insert employee")
    .last_insert_rowid()
}

pub async fn insert_violation_type(pool: &SqlitePool, name: &str, default_amount: f64) -> i64 {
    let now = Utc::now();
    sqlx::query(
        "INSERT INTO violation_types (name, description, default_amount, severity, suggestions, created_at, updated_at) \
         VALUES (?, '', ?, 'Medium', '[]', ?, ?)",
    )
    .bind(name)
    .bind(default_amount)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await
    .expect("failed to insert violation type")
    .last_insert_rowid()
}

pub async fn insert_fine(
    pool: &SqlitePool,
    employee_id: i64,
    violation_type_id: i64,
    amount: f64,
    reason: &str,
) -> i64 {
    insert_fine_on(pool, employee_id, violation_type_id, amount, reason, Utc::now()).await
}

pub async fn insert_fine_on(
    pool: &SqlitePool,
    employee_id: i64,
    violation_type_id: i64,
    amount: f64,
    reason: &str,
    fine_date: DateTime<Utc>,
) -> i64 {
    let now = Utc::now();
    sqlx::query(
        "INSERT INTO fines (employee_id, violation_type_id, amount, reason, notes, fine_date, created_at, updated_at) \
         VALUES (?, ?, ?, ?, '', ?, ?, ?)",
    )
    .bind(employee_id)
    .bind(violation_type_id)
    .bind(amount)
    .bind(reason)
    .bind(fine_date)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await
    .expect("failed to insert fine")
    .last_insert_rowid()
}
