use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Fine row joined with its employee and violation type names. The joins are
/// LEFT JOINs so orphaned fines (force-deleted employee) still list, with
/// "Unknown" standing in for the missing name.
#[derive(Debug, Clone, FromRow)]
pub struct FineWithDetails {
    pub id: i64,
    pub employee_id: i64,
    pub violation_type_id: i64,
    pub amount: f64,
    pub reason: String,
    pub notes: String,
    pub fine_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub employee: String,
    pub violation_name: String,
}
