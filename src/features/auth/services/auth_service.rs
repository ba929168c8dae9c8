use argon2::password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use chrono::Utc;
use sqlx::SqlitePool;
use std::sync::Arc;

use crate::core::config::AuthConfig;
use crate::core::error::{AppError, Result};
use crate::features::auth::dtos::{ChangePasswordDto, LoginDto, LoginResponseDto};
use crate::features::auth::model::{AuthenticatedUser, Role};
use crate::features::auth::services::TokenService;

#[derive(Debug, Clone, sqlx::FromRow)]
struct UserRow {
    username: String,
    password_hash: String,
    role: String,
}

/// Credential store and login flow. Passwords are Argon2 hashes in the
/// `users` table, seeded from the environment on first run.
pub struct AuthService {
    pool: SqlitePool,
    tokens: Arc<TokenService>,
}

impl AuthService {
    pub fn new(pool: SqlitePool, tokens: Arc<TokenService>) -> Self {
        Self { pool, tokens }
    }

    /// Seed the credential store from env config when the table is empty.
    pub async fn seed_users(&self, config: &AuthConfig) -> Result<()> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;
        if count > 0 {
            return Ok(());
        }

        self.insert_user(&config.admin_username, &config.admin_password, Role::Admin)
            .await?;
        tracing::info!("Seeded admin account '{}'", config.admin_username);

        if let (Some(username), Some(password)) =
            (&config.viewer_username, &config.viewer_password)
        {
            self.insert_user(username, password, Role::Viewer).await?;
            tracing::info!("Seeded viewer account '{}'", username);
        }

        Ok(())
    }

    async fn insert_user(&self, username: &str, password: &str, role: Role) -> Result<()> {
        let hash = hash_password(password)?;
        let now = Utc::now();
        sqlx::query(
            "INSERT INTO users (username, password_hash, role, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(username)
        .bind(hash)
        .bind(role.as_str())
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn login(&self, dto: LoginDto) -> Result<LoginResponseDto> {
        let username = dto.username.unwrap_or_default();
        let password = dto.password.unwrap_or_default();

        let user = sqlx::query_as::<_, UserRow>(
            "SELECT username, password_hash, role FROM users WHERE username = ?",
        )
        .bind(&username)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Invalid credentials".to_string()))?;

        if !verify_password(&password, &user.password_hash) {
            tracing::warn!("Failed login attempt for '{}'", username);
            return Err(AppError::Unauthorized("Invalid credentials".to_string()));
        }

        let role = Role::parse(&user.role)
            .ok_or_else(|| AppError::Internal(format!("Unknown stored role '{}'", user.role)))?;
        let (token, expires_in) = self.tokens.issue(&user.username, role)?;

        tracing::info!("Login successful for '{}'", user.username);
        Ok(LoginResponseDto {
            token,
            expires_in,
            user: AuthenticatedUser {
                username: user.username,
                role,
            },
        })
    }

    /// Validate a bearer token if one is present. Never errors: an absent or
    /// bad token just reads as "not authenticated".
    pub fn check(&self, bearer: Option<&str>) -> Option<AuthenticatedUser> {
        let token = bearer?.strip_prefix("Bearer ")?;
        self.tokens.validate(token).ok()
    }

    pub async fn change_password(&self, username: &str, dto: ChangePasswordDto) -> Result<()> {
        let current = dto.current_password.unwrap_or_default();
        let new_password = dto.new_password.unwrap_or_default();
        let confirm = dto.confirm_password.unwrap_or_default();

        let user = sqlx::query_as::<_, UserRow>(
            "SELECT username, password_hash, role FROM users WHERE username = ?",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        if !verify_password(&current, &user.password_hash) {
            return Err(AppError::Validation(
                "Current password is incorrect".to_string(),
            ));
        }
        if new_password.len() < 6 {
            return Err(AppError::Validation(
                "New password must be at least 6 characters".to_string(),
            ));
        }
        if new_password != confirm {
            return Err(AppError::Validation(
                "New password and confirmation do not match".to_string(),
            ));
        }

        let hash = hash_password(&new_password)?;
        sqlx::query("UPDATE users SET password_hash = ?, updated_at = ? WHERE username = ?")
            .bind(hash)
            .bind(Utc::now())
            .bind(username)
            .execute(&self.pool)
            .await?;

        tracing::info!("Password changed for '{}'", username);
        Ok(())
    }
}

fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))
}

fn verify_password(password: &str, hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_helpers::{test_auth_config, test_pool};

    async fn service() -> AuthService {
        let pool = test_pool().await;
        let config = test_auth_config();
        let service = AuthService::new(pool, Arc::new(TokenService::new(&config)));
        service.seed_users(&config).await.unwrap();
        service
    }

    #[tokio::test]
    async fn test_login_with_valid_credentials() {
        let service = service().await;
        let response = service
            .login(LoginDto {
                username: Some("admin".to_string()),
                password: Some("admin123".to_string()),
            })
            .await
            .unwrap();

        assert_eq!(response.user.username, "admin");
        assert_eq!(response.user.role, Role::Admin);
        assert!(!response.token.is_empty());
    }

    #[tokio::test]
    async fn test_login_rejects_bad_password() {
        let service = service().await;
        let err = service
            .login(LoginDto {
                username: Some("admin".to_string()),
                password: Some("wrong".to_string()),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn test_login_rejects_unknown_user() {
        let service = service().await;
        let err = service
            .login(LoginDto {
                username: Some("nobody".to_string()),
                password: Some("admin123".to_string()),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn test_change_password_flow() {
        let service = service().await;

        // Wrong current password
        let err = service
            .change_password(
                "admin",
                ChangePasswordDto {
                    current_password: Some("nope".to_string()),
                    new_password: Some("longenough".to_string()),
                    confirm_password: Some("longenough".to_string()),
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        // Too short
        let err = service
            .change_password(
                "admin",
                ChangePasswordDto {
                    current_password: Some("admin123".to_string()),
                    new_password: Some("abc".to_string()),
                    confirm_password: Some("abc".to_string()),
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        // Confirmation mismatch
        let err = service
            .change_password(
                "admin",
                ChangePasswordDto {
                    current_password: Some("admin123".to_string()),
                    new_password: Some("longenough".to_string()),
                    confirm_password: Some("different".to_string()),
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        // Success, and the new password takes effect
        service
            .change_password(
                "admin",
                ChangePasswordDto {
                    current_password: Some("admin123".to_string()),
                    new_password: Some("newsecret".to_string()),
                    confirm_password: Some("newsecret".to_string()),
                },
            )
            .await
            .unwrap();

        assert!(service
            .login(LoginDto {
                username: Some("admin".to_string()),
                password: Some("newsecret".to_string()),
            })
            .await
            .is_ok());
        assert!(service
            .login(LoginDto {
                username: Some("admin".to_string()),
                password: Some("admin123".to_string()),
            })
            .await
            .is_err());
    }
}
