use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::features::admin::models::AdminSettings;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AdminSettingsDto {
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

impl From<AdminSettings> for AdminSettingsDto {
    fn from(s: AdminSettings) -> Self {
        Self {
            admin_name: s.admin_name,
            admin_email: s.admin_email,
            admin_phone: s.admin_phone,
            company_name: s.company_name,
            smtp_server: s.smtp_server,
            smtp_port: s.smtp_port,
            smtp_username: s.smtp_username,
            smtp_password: s.smtp_password,
            email_signature: s.email_signature,
            version: s.version,
            updated_at: s.updated_at,
        }
    }
}

/// Whole-row update. `version` must match the stored row or the update is
/// rejected as stale.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UpdateSettingsDto {
    pub admin_name: Option<String>,
    pub admin_email: Option<String>,
    pub admin_phone: Option<String>,
    pub company_name: Option<String>,
    pub smtp_server: Option<String>,
    pub smtp_port: Option<i64>,
    pub smtp_username: Option<String>,
    pub smtp_password: Option<String>,
    pub email_signature: Option<String>,
    pub version: Option<i64>,
}
