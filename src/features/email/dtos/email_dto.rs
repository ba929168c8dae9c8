use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct SendTestEmailDto {
    pub test_email: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct SendReportDto {
    pub employee_id: Option<i64>,
}

/// Outcome of a successful send. `message_id` carries the SMTP reply code
/// since that is all the transport reports.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct EmailSendResultDto {
    pub message: String,
    pub message_id: String,
}
