use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::features::employees::models::{Employee, EmployeeTotals};

/// Response DTO for an employee. The external badge code keeps its historical
/// wire name `employee_id`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct EmployeeResponseDto {
    pub id: i64,
    pub name: String,
    pub department: String,
    #[serde(rename = "employee_id")]
    pub employee_code: String,
    pub phone: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Employee> for EmployeeResponseDto {
    fn from(e: Employee) -> Self {
        Self {
            id: e.id,
            name: e.name,
            department: e.department,
            employee_code: e.employee_code,
            phone: e.phone,
            email: e.email,
            created_at: e.created_at,
            updated_at: e.updated_at,
        }
    }
}

/// Create/update payload. Only `name` is required; everything else defaults
/// to an empty string.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct SaveEmployeeDto {
    pub name: Option<String>,
    pub department: Option<String>,
    #[serde(rename = "employee_id")]
    pub employee_code: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct DeleteEmployeeQuery {
    /// Delete even when fines reference the employee, leaving the fines
    /// behind as orphaned history.
    #[serde(default)]
    pub force: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct EmployeeTotalsDto {
    pub employee_id: i64,
    pub employee: String,
    pub fine_count: i64,
    pub total_amount: f64,
    pub avg_amount: f64,
    pub first_fine: Option<DateTime<Utc>>,
    pub last_fine: Option<DateTime<Utc>>,
}

impl From<EmployeeTotals> for EmployeeTotalsDto {
    fn from(t: EmployeeTotals) -> Self {
        Self {
            employee_id: t.employee_id,
            employee: t.employee,
            fine_count: t.fine_count,
            total_amount: t.total_amount,
            avg_amount: t.avg_amount,
            first_fine: t.first_fine,
            last_fine: t.last_fine,
        }
    }
}
