use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};

use crate::core::error::Result;
use crate::core::extractor::AppJson;
use crate::features::auth::guards::RequireAdmin;
use crate::features::violations::dtos::{SaveViolationTypeDto, ViolationTypeResponseDto};
use crate::features::violations::services::ViolationService;
use crate::shared::types::{ApiResponse, StatusMessage};

/// List all violation types
#[utoipa::path(
    get,
    path = "/api/violation-types",
    responses(
        (status = 200, description = "All violation types ordered by name", body = ApiResponse<Vec<ViolationTypeResponseDto>>)
    ),
    security(("bearer_auth" = [])),
    tag = "violation-types"
)]
pub async fn list_violation_types(
    State(service): State<Arc<ViolationService>>,
) -> Result<Json<ApiResponse<Vec<ViolationTypeResponseDto>>>> {
    let types = service.list().await?;
    Ok(Json(ApiResponse::new(types)))
}

/// Get a single violation type
#[utoipa::path(
    get,
    path = "/api/violation-types/{id}",
    params(("id" = i64, Path, description = "Violation type id")),
    responses(
        (status = 200, description = "Violation type found", body = ApiResponse<ViolationTypeResponseDto>),
        (status = 404, description = "Violation type not found")
    ),
    security(("bearer_auth" = [])),
    tag = "violation-types"
)]
pub async fn get_violation_type(
    State(service): State<Arc<ViolationService>>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<ViolationTypeResponseDto>>> {
    let violation_type = service.get_by_id(id).await?;
    Ok(Json(ApiResponse::new(violation_type)))
}

/// Create a violation type
#[utoipa::path(
    post,
    path = "/api/violation-types",
    request_body = SaveViolationTypeDto,
    responses(
        (status = 200, description = "Violation type created", body = ApiResponse<ViolationTypeResponseDto>),
        (status = 400, description = "Validation failure")
    ),
    security(("bearer_auth" = [])),
    tag = "violation-types"
)]
pub async fn create_violation_type(
    RequireAdmin(_user): RequireAdmin,
    State(service): State<Arc<ViolationService>>,
    AppJson(dto): AppJson<SaveViolationTypeDto>,
) -> Result<Json<ApiResponse<ViolationTypeResponseDto>>> {
    let violation_type = service.create(dto).await?;
    Ok(Json(ApiResponse::new(violation_type)))
}

/// Update a violation type
#[utoipa::path(
    put,
    path = "/api/violation-types/{id}",
    params(("id" = i64, Path, description = "Violation type id")),
    request_body = SaveViolationTypeDto,
    responses(
        (status = 200, description = "Violation type updated", body = ApiResponse<ViolationTypeResponseDto>),
        (status = 400, description = "Validation failure"),
        (status = 404, description = "Violation type not found")
    ),
    security(("bearer_auth" = [])),
    tag = "violation-types"
)]
pub async fn update_violation_type(
    RequireAdmin(_user): RequireAdmin,
    State(service): State<Arc<ViolationService>>,
    Path(id): Path<i64>,
    AppJson(dto): AppJson<SaveViolationTypeDto>,
) -> Result<Json<ApiResponse<ViolationTypeResponseDto>>> {
    let violation_type = service.update(id, dto).await?;
    Ok(Json(ApiResponse::new(violation_type)))
}

/// Delete a violation type
#[utoipa::path(
    delete,
    path = "/api/violation-types/{id}",
    params(("id" = i64, Path, description = "Violation type id")),
    responses(
        (status = 200, description = "Violation type deleted", body = ApiResponse<StatusMessage>),
        (status = 404, description = "Violation type not found"),
        (status = 409, description = "Violation type is referenced by fines")
    ),
    security(("bearer_auth" = [])),
    tag = "violation-types"
)]
pub async fn delete_violation_type(
    RequireAdmin(_user): RequireAdmin,
    State(service): State<Arc<ViolationService>>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<StatusMessage>>> {
    let message = service.delete(id).await?;
    Ok(Json(ApiResponse::new(message)))
}
