use sqlx::SqlitePool;

use crate::core::error::Result;
use crate::features::dashboard::dtos::DashboardStatsDto;

pub struct DashboardService {
    pool: SqlitePool,
}

impl DashboardService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn stats(&self) -> Result<DashboardStatsDto> {
        let employees: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM employees")
            .fetch_one(&self.pool)
            .await?;
        let violations: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM violation_types")
            .fetch_one(&self.pool)
            .await?;
        let fines: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM fines")
            .fetch_one(&self.pool)
            .await?;
        let total_fine_amount: f64 =
            sqlx::query_scalar("SELECT COALESCE(SUM(amount), 0.0) FROM fines")
                .fetch_one(&self.pool)
                .await?;

        Ok(DashboardStatsDto {
            employees,
            violations,
            fines,
            total_fine_amount,
        })
    }
}
