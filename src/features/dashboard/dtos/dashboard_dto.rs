use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DashboardStatsDto {
    pub employees: i64,
    pub violations: i64,
    pub fines: i64,
    pub total_fine_amount: f64,
}
