use std::sync::Arc;

use axum::{extract::State, Json};

use crate::core::error::Result;
use crate::core::extractor::AppJson;
use crate::features::admin::dtos::{AdminSettingsDto, UpdateSettingsDto};
use crate::features::admin::services::SettingsService;
use crate::features::auth::guards::RequireAdmin;
use crate::shared::types::ApiResponse;

/// Get the admin settings
#[utoipa::path(
    get,
    path = "/api/admin/settings",
    responses(
        (status = 200, description = "The settings row including its version", body = ApiResponse<AdminSettingsDto>)
    ),
    security(("bearer_auth" = [])),
    tag = "admin"
)]
pub async fn get_settings(
    RequireAdmin(_user): RequireAdmin,
    State(service): State<Arc<SettingsService>>,
) -> Result<Json<ApiResponse<AdminSettingsDto>>> {
    let settings = service.get().await?;
    Ok(Json(ApiResponse::new(settings)))
}

/// Update the admin settings
#[utoipa::path(
    put,
    path = "/api/admin/settings",
    request_body = UpdateSettingsDto,
    responses(
        (status = 200, description = "Settings updated, version incremented", body = ApiResponse<AdminSettingsDto>),
        (status = 409, description = "Version is stale")
    ),
    security(("bearer_auth" = [])),
    tag = "admin"
)]
pub async fn update_settings(
    RequireAdmin(_user): RequireAdmin,
    State(service): State<Arc<SettingsService>>,
    AppJson(dto): AppJson<UpdateSettingsDto>,
) -> Result<Json<ApiResponse<AdminSettingsDto>>> {
    let settings = service.update(dto).await?;
    Ok(Json(ApiResponse::new(settings)))
}
