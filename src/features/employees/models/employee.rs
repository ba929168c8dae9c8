use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for an employee. `employee_code` is the free-text external
/// badge/payroll code (exposed on the wire as `employee_id`, which in the
/// schema names the fines foreign key instead).
#[derive(Debug, Clone, FromRow)]
pub struct Employee {
    pub id: i64,
    pub name: String,
    pub department: String,
    pub employee_code: String,
    pub phone: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One row of the per-employee rollup.
#[derive(Debug, Clone, FromRow)]
pub struct EmployeeTotals {
    pub employee_id: i64,
    pub employee: String,
    pub fine_count: i64,
    pub total_amount: f64,
    pub avg_amount: f64,
    pub first_fine: Option<DateTime<Utc>>,
    pub last_fine: Option<DateTime<Utc>>,
}
