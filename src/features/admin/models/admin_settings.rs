use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// The singleton settings row, seeded by migration with id 1.
#[derive(Debug, Clone, FromRow)]
pub struct AdminSettings {
    pub id: i64,
    pub admin_name: String,
    pub admin_email: String,
    pub admin_phone: String,
    pub company_name: String,
    pub smtp_server: String,
    pub smtp_port: i64,
    pub smtp_username: String,
    pub smtp_password: String,
    pub email_signature: String,
    pub version: i64,
    pub updated_at: DateTime<Utc>,
}
