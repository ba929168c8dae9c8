use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};

use crate::core::error::Result;
use crate::core::extractor::AppJson;
use crate::features::auth::guards::RequireAdmin;
use crate::features::email::dtos::{EmailSendResultDto, SendReportDto, SendTestEmailDto};
use crate::features::email::services::EmailService;
use crate::shared::types::ApiResponse;

/// Email a receipt for one fine to the fined employee
#[utoipa::path(
    post,
    path = "/api/fines/{id}/email-receipt",
    params(("id" = i64, Path, description = "Fine id")),
    responses(
        (status = 200, description = "Receipt sent", body = ApiResponse<EmailSendResultDto>),
        (status = 400, description = "Missing employee email or SMTP problem"),
        (status = 404, description = "Fine not found")
    ),
    security(("bearer_auth" = [])),
    tag = "email"
)]
pub async fn send_receipt(
    RequireAdmin(_user): RequireAdmin,
    State(service): State<Arc<EmailService>>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<EmailSendResultDto>>> {
    let result = service.send_receipt(id).await?;
    Ok(Json(ApiResponse::new(result)))
}

/// Email an aggregate fine report for one employee
#[utoipa::path(
    post,
    path = "/api/send-employee-report",
    request_body = SendReportDto,
    responses(
        (status = 200, description = "Report sent", body = ApiResponse<EmailSendResultDto>),
        (status = 400, description = "Missing employee email or SMTP problem"),
        (status = 404, description = "Employee not found")
    ),
    security(("bearer_auth" = [])),
    tag = "email"
)]
pub async fn send_employee_report(
    RequireAdmin(_user): RequireAdmin,
    State(service): State<Arc<EmailService>>,
    AppJson(dto): AppJson<SendReportDto>,
) -> Result<Json<ApiResponse<EmailSendResultDto>>> {
    let result = service.send_employee_report(dto).await?;
    Ok(Json(ApiResponse::new(result)))
}

/// Send a configuration test email
#[utoipa::path(
    post,
    path = "/api/send-test-email",
    request_body = SendTestEmailDto,
    responses(
        (status = 200, description = "Test email sent", body = ApiResponse<EmailSendResultDto>),
        (status = 400, description = "Invalid address or SMTP problem")
    ),
    security(("bearer_auth" = [])),
    tag = "email"
)]
pub async fn send_test_email(
    RequireAdmin(_user): RequireAdmin,
    State(service): State<Arc<EmailService>>,
    AppJson(dto): AppJson<SendTestEmailDto>,
) -> Result<Json<ApiResponse<EmailSendResultDto>>> {
    let result = service.send_test_email(dto).await?;
    Ok(Json(ApiResponse::new(result)))
}
