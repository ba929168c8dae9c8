use std::sync::Arc;

use axum::{extract::State, Json};

use crate::core::error::Result;
use crate::features::dashboard::dtos::DashboardStatsDto;
use crate::features::dashboard::services::DashboardService;
use crate::shared::types::ApiResponse;

/// Counts and total fine amount for the dashboard
#[utoipa::path(
    get,
    path = "/api/dashboard/stats",
    responses(
        (status = 200, description = "Current counts and total", body = ApiResponse<DashboardStatsDto>)
    ),
    security(("bearer_auth" = [])),
    tag = "dashboard"
)]
pub async fn dashboard_stats(
    State(service): State<Arc<DashboardService>>,
) -> Result<Json<ApiResponse<DashboardStatsDto>>> {
    let stats = service.stats().await?;
    Ok(Json(ApiResponse::new(stats)))
}
