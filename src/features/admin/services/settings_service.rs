use chrono::Utc;
use sqlx::SqlitePool;

use crate::core::error::{AppError, Result};
use crate::features::admin::dtos::{AdminSettingsDto, UpdateSettingsDto};
use crate::features::admin::models::AdminSettings;
use crate::shared::validation::is_valid_phone;

const SELECT_SETTINGS: &str = "SELECT id, admin_name, admin_email, admin_phone, company_name, \
     smtp_server, smtp_port, smtp_username, smtp_password, email_signature, version, updated_at \
     FROM admin_settings WHERE id = 1";

pub struct SettingsService {
    pool: SqlitePool,
}

impl SettingsService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn get(&self) -> Result<AdminSettingsDto> {
        Ok(self.load().await?.into())
    }

    pub(crate) async fn load(&self) -> Result<AdminSettings> {
        // The row is seeded by migration, so absence means a broken database.
        sqlx::query_as::<_, AdminSettings>(SELECT_SETTINGS)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::Internal("Settings row is missing".to_string()))
    }

    /// Read-modify-write with an optimistic version check. Missing fields
    /// keep their stored value; a stale version is a conflict.
    pub async fn update(&self, dto: UpdateSettingsDto) -> Result<AdminSettingsDto> {
        if let Some(phone) = dto.admin_phone.as_deref() {
            if !phone.is_empty() && !is_valid_phone(phone) {
                return Err(AppError::Validation(
                    "Invalid phone number format".to_string(),
                ));
            }
        }

        let current = self.load().await?;
        let expected_version = dto.version.unwrap_or(current.version);

        let result = sqlx::query(
            "UPDATE admin_settings SET \
                 admin_name = ?, admin_email = ?, admin_phone = ?, company_name = ?, \
                 smtp_server = ?, smtp_port = ?, smtp_username = ?, smtp_password = ?, \
                 email_signature = ?, version = version + 1, updated_at = ? \
             WHERE id = 1 AND version = ?",
        )
        .bind(dto.admin_name.unwrap_or(current.admin_name))
        .bind(dto.admin_email.unwrap_or(current.admin_email))
        .bind(dto.admin_phone.unwrap_or(current.admin_phone))
        .bind(dto.company_name.unwrap_or(current.company_name))
        .bind(dto.smtp_server.unwrap_or(current.smtp_server))
        .bind(match dto.smtp_port {
            Some(port) if port > 0 && port <= 65535 => port,
            Some(_) => 587,
            None => current.smtp_port,
        })
        .bind(dto.smtp_username.unwrap_or(current.smtp_username))
        .bind(dto.smtp_password.unwrap_or(current.smtp_password))
        .bind(dto.email_signature.unwrap_or(current.email_signature))
        .bind(Utc::now())
        .bind(expected_version)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::Conflict(
                "Settings were changed by someone else. Reload and try again.".to_string(),
            ));
        }

        tracing::info!("Admin settings updated to version {}", expected_version + 1);
        self.get().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_helpers::test_pool;

    #[tokio::test]
    async fn test_seeded_defaults() {
        let service = SettingsService::new(test_pool().await);
        let settings = service.get().await.unwrap();
        assert_eq!(settings.admin_name, "System Administrator");
        assert_eq!(settings.admin_email, "admin@company.com");
        assert_eq!(settings.smtp_port, 587);
        assert_eq!(settings.version, 1);
    }

    #[tokio::test]
    async fn test_update_increments_version_and_keeps_missing_fields() {
        let service = SettingsService::new(test_pool().await);
        let updated = service
            .update(UpdateSettingsDto {
                smtp_server: Some("smtp.gmail.com".to_string()),
                smtp_username: Some("fines@company.com".to_string()),
                version: Some(1),
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(updated.smtp_server, "smtp.gmail.com");
        assert_eq!(updated.version, 2);
        // Untouched fields survive.
        assert_eq!(updated.admin_name, "System Administrator");
    }

    #[tokio::test]
    async fn test_stale_version_is_a_conflict() {
        let service = SettingsService::new(test_pool().await);
        service
            .update(UpdateSettingsDto {
                company_name: Some("Acme".to_string()),
                version: Some(1),
                ..Default::default()
            })
            .await
            .unwrap();

        // A second writer still holding version 1 loses.
        let err = service
            .update(UpdateSettingsDto {
                company_name: Some("Globex".to_string()),
                version: Some(1),
                ..Default::default()
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));

        let settings = service.get().await.unwrap();
        assert_eq!(settings.company_name, "Acme");
        assert_eq!(settings.version, 2);
    }

    #[tokio::test]
    async fn test_malformed_admin_phone_is_rejected() {
        let service = SettingsService::new(test_pool().await);
        let err = service
            .update(UpdateSettingsDto {
                admin_phone: Some("call me".to_string()),
                version: Some(1),
                ..Default::default()
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        let updated = service
            .update(UpdateSettingsDto {
                admin_phone: Some("(042) 111 222".to_string()),
                version: Some(1),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(updated.admin_phone, "(042) 111 222");
    }

    #[tokio::test]
    async fn test_zero_smtp_port_falls_back_to_587() {
        let service = SettingsService::new(test_pool().await);
        let updated = service
            .update(UpdateSettingsDto {
                smtp_port: Some(0),
                version: Some(1),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(updated.smtp_port, 587);
    }
}
