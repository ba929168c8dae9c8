use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};

use crate::core::error::Result;
use crate::core::extractor::{AppJson, AppQuery};
use crate::features::auth::guards::RequireAdmin;
use crate::features::employees::dtos::{
    DeleteEmployeeQuery, EmployeeResponseDto, EmployeeTotalsDto, SaveEmployeeDto,
};
use crate::features::employees::services::EmployeeService;
use crate::shared::types::{ApiResponse, StatusMessage};

/// List all employees
#[utoipa::path(
    get,
    path = "/api/employees",
    responses(
        (status = 200, description = "All employees ordered by name", body = ApiResponse<Vec<EmployeeResponseDto>>)
    ),
    security(("bearer_auth" = [])),
    tag = "employees"
)]
pub async fn list_employees(
    State(service): State<Arc<EmployeeService>>,
) -> Result<Json<ApiResponse<Vec<EmployeeResponseDto>>>> {
    let employees = service.list().await?;
    Ok(Json(ApiResponse::new(employees)))
}

/// Get a single employee
#[utoipa::path(
    get,
    path = "/api/employees/{id}",
    params(("id" = i64, Path, description = "Employee id")),
    responses(
        (status = 200, description = "Employee found", body = ApiResponse<EmployeeResponseDto>),
        (status = 404, description = "Employee not found")
    ),
    security(("bearer_auth" = [])),
    tag = "employees"
)]
pub async fn get_employee(
    State(service): State<Arc<EmployeeService>>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<EmployeeResponseDto>>> {
    let employee = service.get_by_id(id).await?;
    Ok(Json(ApiResponse::new(employee)))
}

/// Create an employee
#[utoipa::path(
    post,
    path = "/api/employees",
    request_body = SaveEmployeeDto,
    responses(
        (status = 200, description = "Employee created", body = ApiResponse<EmployeeResponseDto>),
        (status = 400, description = "Validation failure")
    ),
    security(("bearer_auth" = [])),
    tag = "employees"
)]
pub async fn create_employee(
    RequireAdmin(_user): RequireAdmin,
    State(service): State<Arc<EmployeeService>>,
    AppJson(dto): AppJson<SaveEmployeeDto>,
) -> Result<Json<ApiResponse<EmployeeResponseDto>>> {
    let employee = service.create(dto).await?;
    Ok(Json(ApiResponse::new(employee)))
}

/// Update an employee
#[utoipa::path(
    put,
    path = "/api/employees/{id}",
    params(("id" = i64, Path, description = "Employee id")),
    request_body = SaveEmployeeDto,
    responses(
        (status = 200, description = "Employee updated", body = ApiResponse<EmployeeResponseDto>),
        (status = 400, description = "Validation failure"),
        (status = 404, description = "Employee not found")
    ),
    security(("bearer_auth" = [])),
    tag = "employees"
)]
pub async fn update_employee(
    RequireAdmin(_user): RequireAdmin,
    State(service): State<Arc<EmployeeService>>,
    Path(id): Path<i64>,
    AppJson(dto): AppJson<SaveEmployeeDto>,
) -> Result<Json<ApiResponse<EmployeeResponseDto>>> {
    let employee = service.update(id, dto).await?;
    Ok(Json(ApiResponse::new(employee)))
}

/// Delete an employee
///
/// Refused with 409 while fines reference the employee unless `force=true`,
/// which removes the employee and keeps the fines as orphaned history.
#[utoipa::path(
    delete,
    path = "/api/employees/{id}",
    params(
        ("id" = i64, Path, description = "Employee id"),
        DeleteEmployeeQuery
    ),
    responses(
        (status = 200, description = "Employee deleted", body = ApiResponse<StatusMessage>),
        (status = 404, description = "Employee not found"),
        (status = 409, description = "Employee has fines and force was not set")
    ),
    security(("bearer_auth" = [])),
    tag = "employees"
)]
pub async fn delete_employee(
    RequireAdmin(_user): RequireAdmin,
    State(service): State<Arc<EmployeeService>>,
    Path(id): Path<i64>,
    AppQuery(query): AppQuery<DeleteEmployeeQuery>,
) -> Result<Json<ApiResponse<StatusMessage>>> {
    let message = service.delete(id, query.force).await?;
    Ok(Json(ApiResponse::new(message)))
}

/// Per-employee fine totals
#[utoipa::path(
    get,
    path = "/api/employees/totals",
    responses(
        (status = 200, description = "One rollup row per employee", body = ApiResponse<Vec<EmployeeTotalsDto>>)
    ),
    security(("bearer_auth" = [])),
    tag = "employees"
)]
pub async fn employee_totals(
    State(service): State<Arc<EmployeeService>>,
) -> Result<Json<ApiResponse<Vec<EmployeeTotalsDto>>>> {
    let totals = service.totals().await?;
    Ok(Json(ApiResponse::new(totals)))
}
