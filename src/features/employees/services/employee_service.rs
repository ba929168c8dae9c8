use chrono::Utc;
use sqlx::SqlitePool;

use crate::core::error::{AppError, Result};
use crate::features::employees::dtos::{EmployeeResponseDto, EmployeeTotalsDto, SaveEmployeeDto};
use crate::features::employees::models::{Employee, EmployeeTotals};
use crate::shared::types::StatusMessage;
use crate::shared::validation::is_valid_phone;

const SELECT_EMPLOYEE: &str =
    "SELECT id, name, department, employee_code, phone, email, created_at, updated_at \
     FROM employees";

/// Service for employee CRUD and the per-employee fine rollup.
pub struct EmployeeService {
    pool: SqlitePool,
}

impl EmployeeService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// List all employees ordered by name
    pub async fn list(&self) -> Result<Vec<EmployeeResponseDto>> {
        let employees =
            sqlx::query_as::<_, Employee>(&format!("{} ORDER BY name", SELECT_EMPLOYEE))
                .fetch_all(&self.pool)
                .await
                .map_err(|e| {
                    tracing::error!("Failed to list employees: {:?}", e);
                    AppError::Database(e)
                })?;

        Ok(employees.into_iter().map(|e| e.into()).collect())
    }

    pub async fn get_by_id(&self, id: i64) -> Result<EmployeeResponseDto> {
        let employee =
            sqlx::query_as::<_, Employee>(&format!("{} WHERE id = ?", SELECT_EMPLOYEE))
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        employee
            .map(|e| e.into())
            .ok_or_else(|| AppError::NotFound("Employee not found".to_string()))
    }

    pub async fn create(&self, dto: SaveEmployeeDto) -> Result<EmployeeResponseDto> {
        let name = required_name(&dto)?;
        let phone = validated_phone(dto.phone)?;
        let now = Utc::now();

        let result = sqlx::query(
            "INSERT INTO employees (name, department, employee_code, phone, email, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&name)
        .bind(trimmed(dto.department))
        .bind(trimmed(dto.employee_code))
        .bind(phone)
        .bind(trimmed(dto.email))
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await?;

        tracing::info!("Employee created: id={}, name={}", result.last_insert_rowid(), name);
        self.get_by_id(result.last_insert_rowid()).await
    }

    pub async fn update(&self, id: i64, dto: SaveEmployeeDto) -> Result<EmployeeResponseDto> {
        let name = required_name(&dto)?;
        let phone = validated_phone(dto.phone)?;

        let result = sqlx::query(
            "UPDATE employees \
             SET name = ?, department = ?, employee_code = ?, phone = ?, email = ?, updated_at = ? \
             WHERE id = ?",
        )
        .bind(&name)
        .bind(trimmed(dto.department))
        .bind(trimmed(dto.employee_code))
        .bind(phone)
        .bind(trimmed(dto.email))
        .bind(Utc::now())
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Employee not found".to_string()));
        }
        self.get_by_id(id).await
    }

    /// Delete an employee. Blocked when fines reference them unless `force`
    /// is set, in which case the fines stay behind as orphaned history.
    pub async fn delete(&self, id: i64, force: bool) -> Result<StatusMessage> {
        let employee = self.get_by_id(id).await?;

        let fine_count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM fines WHERE employee_id = ?")
                .bind(id)
                .fetch_one(&self.pool)
                .await?;

        if fine_count > 0 && !force {
            return Err(AppError::Conflict(format!(
                "Cannot delete employee \"{}\" with {} existing fine(s). \
                 Pass force=true to delete anyway; the fine records will be kept.",
                employee.name, fine_count
            )));
        }

        sqlx::query("DELETE FROM employees WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        let message = if fine_count > 0 {
            tracing::warn!(
                "Employee {} force-deleted; {} fine record(s) now orphaned",
                id,
                fine_count
            );
            format!(
                "Employee deleted. {} fine record(s) remain for historical purposes.",
                fine_count
            )
        } else {
            "Employee deleted successfully.".to_string()
        };

        Ok(StatusMessage::with_message(message))
    }

    /// Per-employee rollup. Every employee appears exactly once; employees
    /// with fines come first ordered by total descending, then the clean
    /// records, each group alphabetical.
    pub async fn totals(&self) -> Result<Vec<EmployeeTotalsDto>> {
        let totals = sqlx::query_as::<_, EmployeeTotals>(
            "SELECT \
                 e.id AS employee_id, \
                 e.name AS employee, \
                 COUNT(f.id) AS fine_count, \
                 COALESCE(SUM(f.amount), 0.0) AS total_amount, \
                 COALESCE(AVG(f.amount), 0.0) AS avg_amount, \
                 MIN(f.fine_date) AS first_fine, \
                 MAX(f.fine_date) AS last_fine \
             FROM employees e \
             LEFT JOIN fines f ON f.employee_id = e.id \
             GROUP BY e.id, e.name \
             ORDER BY (COUNT(f.id) = 0), total_amount DESC, e.name",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to compute employee totals: {:?}", e);
            AppError::Database(e)
        })?;

        Ok(totals.into_iter().map(|t| t.into()).collect())
    }
}

fn required_name(dto: &SaveEmployeeDto) -> Result<String> {
    dto.name
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .ok_or_else(|| AppError::Validation("Employee name is required".to_string()))
}

fn trimmed(value: Option<String>) -> String {
    value.as_deref().map(str::trim).unwrap_or("").to_string()
}

fn validated_phone(value: Option<String>) -> Result<String> {
    let phone = trimmed(value);
    if !phone.is_empty() && !is_valid_phone(&phone) {
        return Err(AppError::Validation(
            "Invalid phone number format".to_string(),
        ));
    }
    Ok(phone)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_helpers::{insert_fine, insert_violation_type, test_pool};

    fn employee(name: &str) -> SaveEmployeeDto {
        SaveEmployeeDto {
            name: Some(name.to_string()),
            department: Some("IT".to_string()),
            email: Some("dev@company.com".to_string()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_create_trims_name() {
        let service = EmployeeService::new(test_pool().await);
        let created = service.create(employee("  Ann Lee  ")).await.unwrap();
        assert_eq!(created.name, "Ann Lee");
        assert_eq!(created.department, "IT");
    }

    #[tokio::test]
    async fn test_create_requires_name() {
        let service = EmployeeService::new(test_pool().await);
        for dto in [
            SaveEmployeeDto::default(),
            employee("   "),
        ] {
            let err = service.create(dto).await.unwrap_err();
            assert!(matches!(err, AppError::Validation(_)));
        }
    }

    #[tokio::test]
    async fn test_create_rejects_malformed_phone() {
        let service = EmployeeService::new(test_pool().await);
        let err = service
            .create(SaveEmployeeDto {
                name: Some("Ann Lee".to_string()),
                phone: Some("call me".to_string()),
                ..Default::default()
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(ref msg) if msg == "Invalid phone number format"));

        let created = service
            .create(SaveEmployeeDto {
                name: Some("Ann Lee".to_string()),
                phone: Some("+92-300-1234567".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(created.phone, "+92-300-1234567");
    }

    #[tokio::test]
    async fn test_update_missing_employee_is_not_found() {
        let service = EmployeeService::new(test_pool().await);
        let err = service.update(99, employee("Ghost")).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_delete_without_fines_succeeds() {
        let service = EmployeeService::new(test_pool().await);
        let created = service.create(employee("Ann Lee")).await.unwrap();
        service.delete(created.id, false).await.unwrap();
        assert!(service.get_by_id(created.id).await.is_err());
    }

    #[tokio::test]
    async fn test_delete_with_fines_requires_force_and_keeps_fines() {
        let pool = test_pool().await;
        let service = EmployeeService::new(pool.clone());
        let emp = service.create(employee("Ann Lee")).await.unwrap();
        let vt = insert_violation_type(&pool, "Late Arrival", 25.0).await;
        insert_fine(&pool, emp.id, vt, 25.0, "arrived late").await;

        let err = service.delete(emp.id, false).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));

        let msg = service.delete(emp.id, true).await.unwrap();
        assert!(msg.message.unwrap().contains("1 fine record(s) remain"));

        // The orphaned fine still points at the removed employee.
        let remaining: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM fines WHERE employee_id = ?")
                .bind(emp.id)
                .fetch_one(&pool)
                .await
                .unwrap();
        assert_eq!(remaining, 1);
        assert!(service.get_by_id(emp.id).await.is_err());
    }

    #[tokio::test]
    async fn test_totals_includes_clean_records_and_orders_by_total() {
        let pool = test_pool().await;
        let service = EmployeeService::new(pool.clone());
        let ann = service.create(employee("Ann Lee")).await.unwrap();
        let bob = service.create(employee("Bob Ray")).await.unwrap();
        let cid = service.create(employee("Cid Voe")).await.unwrap();
        let vt = insert_violation_type(&pool, "Late Arrival", 25.0).await;

        insert_fine(&pool, bob.id, vt, 10.0, "late").await;
        insert_fine(&pool, cid.id, vt, 30.0, "late").await;
        insert_fine(&pool, cid.id, vt, 20.0, "late again").await;

        let totals = service.totals().await.unwrap();
        assert_eq!(totals.len(), 3);

        // Fined employees first by total desc, then the clean record.
        assert_eq!(totals[0].employee, "Cid Voe");
        assert_eq!(totals[0].fine_count, 2);
        assert!((totals[0].total_amount - 50.0).abs() < f64::EPSILON);
        assert!((totals[0].avg_amount - 25.0).abs() < f64::EPSILON);
        assert!(totals[0].first_fine.is_some() && totals[0].last_fine.is_some());

        assert_eq!(totals[1].employee, "Bob Ray");
        assert_eq!(totals[2].employee, "Ann Lee");
        assert_eq!(totals[2].fine_count, 0);
        assert_eq!(totals[2].total_amount, 0.0);
        assert_eq!(totals[2].avg_amount, 0.0);
        assert!(totals[2].first_fine.is_none());
        let _ = ann;
    }
}
