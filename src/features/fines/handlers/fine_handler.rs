use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};

use crate::core::error::Result;
use crate::core::extractor::{AppJson, AppQuery};
use crate::features::auth::guards::RequireAdmin;
use crate::features::fines::dtos::{FineListQuery, FineResponseDto, SaveFineDto};
use crate::features::fines::services::FineService;
use crate::shared::types::{ApiResponse, StatusMessage};

/// List fines with optional filters
#[utoipa::path(
    get,
    path = "/api/fines",
    params(FineListQuery),
    responses(
        (status = 200, description = "Filtered, sorted fines with joined names", body = ApiResponse<Vec<FineResponseDto>>)
    ),
    security(("bearer_auth" = [])),
    tag = "fines"
)]
pub async fn list_fines(
    State(service): State<Arc<FineService>>,
    AppQuery(query): AppQuery<FineListQuery>,
) -> Result<Json<ApiResponse<Vec<FineResponseDto>>>> {
    let fines = service.list(query.into()).await?;
    Ok(Json(ApiResponse::new(fines)))
}

/// Get a single fine
#[utoipa::path(
    get,
    path = "/api/fines/{id}",
    params(("id" = i64, Path, description = "Fine id")),
    responses(
        (status = 200, description = "Fine found", body = ApiResponse<FineResponseDto>),
        (status = 404, description = "Fine not found")
    ),
    security(("bearer_auth" = [])),
    tag = "fines"
)]
pub async fn get_fine(
    State(service): State<Arc<FineService>>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<FineResponseDto>>> {
    let fine = service.get_by_id(id).await?;
    Ok(Json(ApiResponse::new(fine)))
}

/// Create a fine
#[utoipa::path(
    post,
    path = "/api/fines",
    request_body = SaveFineDto,
    responses(
        (status = 200, description = "Fine created", body = ApiResponse<FineResponseDto>),
        (status = 400, description = "Validation failure or missing reference")
    ),
    security(("bearer_auth" = [])),
    tag = "fines"
)]
pub async fn create_fine(
    RequireAdmin(_user): RequireAdmin,
    State(service): State<Arc<FineService>>,
    AppJson(dto): AppJson<SaveFineDto>,
) -> Result<Json<ApiResponse<FineResponseDto>>> {
    let fine = service.create(dto).await?;
    Ok(Json(ApiResponse::new(fine)))
}

/// Update a fine
#[utoipa::path(
    put,
    path = "/api/fines/{id}",
    params(("id" = i64, Path, description = "Fine id")),
    request_body = SaveFineDto,
    responses(
        (status = 200, description = "Fine updated", body = ApiResponse<FineResponseDto>),
        (status = 400, description = "Validation failure or missing reference"),
        (status = 404, description = "Fine not found")
    ),
    security(("bearer_auth" = [])),
    tag = "fines"
)]
pub async fn update_fine(
    RequireAdmin(_user): RequireAdmin,
    State(service): State<Arc<FineService>>,
    Path(id): Path<i64>,
    AppJson(dto): AppJson<SaveFineDto>,
) -> Result<Json<ApiResponse<FineResponseDto>>> {
    let fine = service.update(id, dto).await?;
    Ok(Json(ApiResponse::new(fine)))
}

/// Delete a fine
#[utoipa::path(
    delete,
    path = "/api/fines/{id}",
    params(("id" = i64, Path, description = "Fine id")),
    responses(
        (status = 200, description = "Fine deleted", body = ApiResponse<StatusMessage>),
        (status = 404, description = "Fine not found")
    ),
    security(("bearer_auth" = [])),
    tag = "fines"
)]
pub async fn delete_fine(
    RequireAdmin(_user): RequireAdmin,
    State(service): State<Arc<FineService>>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<StatusMessage>>> {
    let message = service.delete(id).await?;
    Ok(Json(ApiResponse::new(message)))
}
