use std::sync::Arc;

use axum::{extract::State, http::header, http::HeaderMap, Json};

use crate::core::error::Result;
use crate::core::extractor::AppJson;
use crate::features::auth::dtos::{AuthCheckDto, ChangePasswordDto, LoginDto, LoginResponseDto};
use crate::features::auth::guards::RequireAdmin;
use crate::features::auth::services::AuthService;
use crate::shared::types::{ApiResponse, StatusMessage};

/// Log in with username and password
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginDto,
    responses(
        (status = 200, description = "Login successful", body = ApiResponse<LoginResponseDto>),
        (status = 401, description = "Invalid credentials")
    ),
    tag = "auth"
)]
pub async fn login(
    State(service): State<Arc<AuthService>>,
    AppJson(dto): AppJson<LoginDto>,
) -> Result<Json<ApiResponse<LoginResponseDto>>> {
    let response = service.login(dto).await?;
    Ok(Json(ApiResponse::new(response)))
}

/// Log out
///
/// Tokens are stateless, so logout is an acknowledgement; the client discards
/// its token.
#[utoipa::path(
    post,
    path = "/api/auth/logout",
    responses(
        (status = 200, description = "Logged out", body = ApiResponse<StatusMessage>)
    ),
    tag = "auth"
)]
pub async fn logout() -> Json<ApiResponse<StatusMessage>> {
    Json(ApiResponse::new(StatusMessage::success()))
}

/// Report whether the caller holds a valid token
#[utoipa::path(
    get,
    path = "/api/auth/check",
    responses(
        (status = 200, description = "Authentication state", body = ApiResponse<AuthCheckDto>)
    ),
    tag = "auth"
)]
pub async fn check(
    State(service): State<Arc<AuthService>>,
    headers: HeaderMap,
) -> Json<ApiResponse<AuthCheckDto>> {
    let bearer = headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok());
    let user = service.check(bearer);

    Json(ApiResponse::new(AuthCheckDto {
        is_authenticated: user.is_some(),
        user,
    }))
}

/// Change the current user's password
#[utoipa::path(
    post,
    path = "/api/admin/change-password",
    request_body = ChangePasswordDto,
    responses(
        (status = 200, description = "Password changed", body = ApiResponse<StatusMessage>),
        (status = 400, description = "Validation failure")
    ),
    security(("bearer_auth" = [])),
    tag = "admin"
)]
pub async fn change_password(
    RequireAdmin(user): RequireAdmin,
    State(service): State<Arc<AuthService>>,
    AppJson(dto): AppJson<ChangePasswordDto>,
) -> Result<Json<ApiResponse<StatusMessage>>> {
    service.change_password(&user.username, dto).await?;
    Ok(Json(ApiResponse::new(StatusMessage::with_message(
        "Password changed successfully",
    ))))
}
