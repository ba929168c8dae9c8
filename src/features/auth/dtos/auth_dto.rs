use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::features::auth::model::AuthenticatedUser;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct LoginDto {
    pub username: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoginResponseDto {
    pub token: String,
    pub expires_in: i64,
    pub user: AuthenticatedUser,
}

/// Response for `GET /api/auth/check`; never an error.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthCheckDto {
    pub is_authenticated: bool,
    pub user: Option<AuthenticatedUser>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordDto {
    pub current_password: Option<String>,
    pub new_password: Option<String>,
    pub confirm_password: Option<String>,
}
