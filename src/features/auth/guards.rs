//! Role-based authorization guards.
//!
//! Two fixed roles exist: `admin` (full permission set) and `viewer`
//! (read-only). Mutating handlers take `RequireAdmin` instead of the plain
//! `AuthenticatedUser` extractor.

use crate::core::error::AppError;
use crate::features::auth::model::AuthenticatedUser;
use axum::{extract::FromRequestParts, http::request::Parts};

/// The token middleware stores the verified user in request extensions;
/// handlers read it back through this extractor.
impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .ok_or_else(|| AppError::Unauthorized("Authentication required".to_string()))
    }
}

/// Guard for handlers that mutate state.
///
/// # Example
/// ```ignore
/// pub async fn handler(RequireAdmin(user): RequireAdmin) { ... }
/// ```
pub struct RequireAdmin(pub AuthenticatedUser);

impl<S> FromRequestParts<S> for RequireAdmin
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = parts
            .extensions
            .get::<AuthenticatedUser>()
            .ok_or_else(|| AppError::Unauthorized("Authentication required".to_string()))?;

        if !user.is_admin() {
            return Err(AppError::Forbidden(
                "Admin access required for this operation".to_string(),
            ));
        }

        Ok(RequireAdmin(user.clone()))
    }
}
