use chrono::{DateTime, Utc};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use crate::core::error::{AppError, Result};
use crate::features::fines::dtos::{FineResponseDto, SaveFineDto};
use crate::features::fines::filter::FineFilter;
use crate::features::fines::models::FineWithDetails;
use crate::shared::types::StatusMessage;

const SELECT_FINE_WITH_DETAILS: &str = "SELECT f.id, f.employee_id, f.violation_type_id, \
     f.amount, f.reason, f.notes, f.fine_date, f.created_at, f.updated_at, \
     COALESCE(e.name, 'Unknown') AS employee, \
     COALESCE(v.name, 'Unknown') AS violation_name \
     FROM fines f \
     LEFT JOIN employees e ON e.id = f.employee_id \
     LEFT JOIN violation_types v ON v.id = f.violation_type_id";

pub struct FineService {
    pool: SqlitePool,
}

/// Validated write payload.
struct FineInput {
    employee_id: i64,
    violation_type_id: i64,
    amount: f64,
    reason: String,
    notes: String,
    fine_date: Option<DateTime<Utc>>,
}

impl FineService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// List joined fines. Date and id predicates go into SQL; the filter
    /// engine re-applies everything and handles amounts, search and sort.
    pub async fn list(&self, filter: FineFilter) -> Result<Vec<FineResponseDto>> {
        let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new(SELECT_FINE_WITH_DETAILS);
        builder.push(" WHERE 1 = 1");
        if let Some(start) = filter.start_date {
            builder.push(" AND date(f.fine_date) >= date(");
            builder.push_bind(start);
            builder.push(")");
        }
        if let Some(end) = filter.end_date {
            builder.push(" AND date(f.fine_date) <= date(");
            builder.push_bind(end);
            builder.push(")");
        }
        if let Some(employee_id) = filter.employee_id {
            builder.push(" AND f.employee_id = ");
            builder.push_bind(employee_id);
        }
        if let Some(violation_type_id) = filter.violation_type_id {
            builder.push(" AND f.violation_type_id = ");
            builder.push_bind(violation_type_id);
        }
        builder.push(" ORDER BY f.fine_date DESC, f.id DESC");

        let rows = builder
            .build_query_as::<FineWithDetails>()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to list fines: {:?}", e);
                AppError::Database(e)
            })?;

        Ok(filter.apply(rows).into_iter().map(|f| f.into()).collect())
    }

    pub async fn get_by_id(&self, id: i64) -> Result<FineResponseDto> {
        let fine = sqlx::query_as::<_, FineWithDetails>(&format!(
            "{} WHERE f.id = ?",
            SELECT_FINE_WITH_DETAILS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        fine.map(|f| f.into())
            .ok_or_else(|| AppError::NotFound("Fine not found".to_string()))
    }

    pub async fn create(&self, dto: SaveFineDto) -> Result<FineResponseDto> {
        let mut input = validate(dto)?;
        let violation_name = self.check_references(&input).await?;
        input.reason = strip_violation_prefix(&input.reason, &violation_name);

        let now = Utc::now();
        let result = sqlx::query(
            "INSERT INTO fines \
             (employee_id, violation_type_id, amount, reason, notes, fine_date, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(input.employee_id)
        .bind(input.violation_type_id)
        .bind(input.amount)
        .bind(&input.reason)
        .bind(&input.notes)
        .bind(input.fine_date.unwrap_or(now))
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await?;

        tracing::info!(
            "Fine created: id={}, employee_id={}, amount={}",
            result.last_insert_rowid(),
            input.employee_id,
            input.amount
        );
        self.get_by_id(result.last_insert_rowid()).await
    }

    pub async fn update(&self, id: i64, dto: SaveFineDto) -> Result<FineResponseDto> {
        let mut input = validate(dto)?;
        let violation_name = self.check_references(&input).await?;
        input.reason = strip_violation_prefix(&input.reason, &violation_name);

        let mut query = QueryBuilder::<Sqlite>::new(
            "UPDATE fines SET employee_id = ",
        );
        query.push_bind(input.employee_id);
        query.push(", violation_type_id = ");
        query.push_bind(input.violation_type_id);
        query.push(", amount = ");
        query.push_bind(input.amount);
        query.push(", reason = ");
        query.push_bind(&input.reason);
        query.push(", notes = ");
        query.push_bind(&input.notes);
        if let Some(fine_date) = input.fine_date {
            query.push(", fine_date = ");
            query.push_bind(fine_date);
        }
        query.push(", updated_at = ");
        query.push_bind(Utc::now());
        query.push(" WHERE id = ");
        query.push_bind(id);

        let result = query.build().execute(&self.pool).await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Fine not found".to_string()));
        }
        self.get_by_id(id).await
    }

    pub async fn delete(&self, id: i64) -> Result<StatusMessage> {
        let result = sqlx::query("DELETE FROM fines WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Fine not found".to_string()));
        }
        Ok(StatusMessage::with_message("Fine deleted successfully."))
    }

    /// Verifies both referenced rows exist and returns the violation type
    /// name for reason normalization.
    async fn check_references(&self, input: &FineInput) -> Result<String> {
        let employee: Option<String> =
            sqlx::query_scalar("SELECT name FROM employees WHERE id = ?")
                .bind(input.employee_id)
                .fetch_optional(&self.pool)
                .await?;
        if employee.is_none() {
            return Err(AppError::Validation("Selected employee not found".to_string()));
        }

        let violation_name: Option<String> =
            sqlx::query_scalar("SELECT name FROM violation_types WHERE id = ?")
                .bind(input.violation_type_id)
                .fetch_optional(&self.pool)
                .await?;
        violation_name
            .ok_or_else(|| AppError::Validation("Selected violation type not found".to_string()))
    }
}

fn validate(dto: SaveFineDto) -> Result<FineInput> {
    let employee_id = dto
        .employee_id
        .filter(|id| *id > 0)
        .ok_or_else(|| AppError::Validation("Employee is required".to_string()))?;

    let violation_type_id = dto
        .violation_type_id
        .filter(|id| *id > 0)
        .ok_or_else(|| AppError::Validation("Violation type is required".to_string()))?;

    let amount = dto
        .amount
        .filter(|a| a.is_finite() && *a > 0.0)
        .ok_or_else(|| AppError::Validation("Valid amount is required".to_string()))?;

    let reason = dto
        .reason
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .ok_or_else(|| AppError::Validation("Reason is required".to_string()))?;

    Ok(FineInput {
        employee_id,
        violation_type_id,
        amount,
        reason,
        notes: dto.notes.as_deref().map(str::trim).unwrap_or("").to_string(),
        fine_date: dto.fine_date,
    })
}

/// Drops a legacy "<violation name>: " prefix from the reason when it names
/// the fine's own violation type. The stored reason is the detail only; the
/// display name always comes from the join.
fn strip_violation_prefix(reason: &str, violation_name: &str) -> String {
    let prefix = format!("{}: ", violation_name);
    match reason.strip_prefix(&prefix).map(str::trim) {
        Some(detail) if !detail.is_empty() => detail.to_string(),
        _ => reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::fines::filter::SortKey;
    use crate::shared::test_helpers::{
        insert_employee, insert_fine_on, insert_violation_type, test_pool,
    };
    use chrono::TimeZone;

    fn fine(employee_id: i64, violation_type_id: i64, amount: Option<f64>) -> SaveFineDto {
        SaveFineDto {
            employee_id: Some(employee_id),
            violation_type_id: Some(violation_type_id),
            amount,
            reason: Some("arrived late".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_strip_violation_prefix() {
        assert_eq!(
            strip_violation_prefix("Late Arrival: overslept", "Late Arrival"),
            "overslept"
        );
        // Different violation's prefix is user text, not the legacy encoding.
        assert_eq!(
            strip_violation_prefix("Phone Use: during meeting", "Late Arrival"),
            "Phone Use: during meeting"
        );
        // A bare prefix leaves the reason untouched.
        assert_eq!(
            strip_violation_prefix("Late Arrival: ", "Late Arrival"),
            "Late Arrival: "
        );
    }

    #[tokio::test]
    async fn test_create_validation_messages() {
        let pool = test_pool().await;
        let service = FineService::new(pool.clone());
        let emp = insert_employee(&pool, "Ann Lee").await;
        let vt = insert_violation_type(&pool, "Late Arrival", 25.0).await;

        let cases: Vec<(SaveFineDto, &str)> = vec![
            (
                SaveFineDto {
                    employee_id: None,
                    ..fine(emp, vt, Some(25.0))
                },
                "Employee is required",
            ),
            (
                SaveFineDto {
                    violation_type_id: None,
                    ..fine(emp, vt, Some(25.0))
                },
                "Violation type is required",
            ),
            (fine(emp, vt, Some(0.0)), "Valid amount is required"),
            (fine(emp, vt, Some(-3.0)), "Valid amount is required"),
            (
                SaveFineDto {
                    reason: Some("  ".to_string()),
                    ..fine(emp, vt, Some(25.0))
                },
                "Reason is required",
            ),
            (fine(99, vt, Some(25.0)), "Selected employee not found"),
            (fine(emp, 99, Some(25.0)), "Selected violation type not found"),
        ];

        for (dto, expected) in cases {
            let err = service.create(dto).await.unwrap_err();
            assert!(matches!(err, AppError::Validation(ref m) if m == expected));
        }
    }

    #[tokio::test]
    async fn test_update_rejects_non_positive_amount() {
        let pool = test_pool().await;
        let service = FineService::new(pool.clone());
        let emp = insert_employee(&pool, "Ann Lee").await;
        let vt = insert_violation_type(&pool, "Late Arrival", 25.0).await;
        let created = service.create(fine(emp, vt, Some(25.0))).await.unwrap();

        let err = service
            .update(created.id, fine(emp, vt, Some(0.0)))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(ref m) if m == "Valid amount is required"));
    }

    #[tokio::test]
    async fn test_create_strips_legacy_reason_prefix() {
        let pool = test_pool().await;
        let service = FineService::new(pool.clone());
        let emp = insert_employee(&pool, "Ann Lee").await;
        let vt = insert_violation_type(&pool, "Late Arrival", 25.0).await;

        let created = service
            .create(SaveFineDto {
                reason: Some("Late Arrival: overslept after night shift".to_string()),
                ..fine(emp, vt, Some(25.0))
            })
            .await
            .unwrap();

        assert_eq!(created.reason, "overslept after night shift");
        assert_eq!(created.employee, "Ann Lee");
        assert_eq!(created.violation_name, "Late Arrival");
    }

    #[tokio::test]
    async fn test_orphaned_fine_lists_with_unknown_employee() {
        let pool = test_pool().await;
        let service = FineService::new(pool.clone());
        let emp = insert_employee(&pool, "Ann Lee").await;
        let vt = insert_violation_type(&pool, "Late Arrival", 25.0).await;
        let id = service.create(fine(emp, vt, Some(25.0))).await.unwrap().id;

        sqlx::query("DELETE FROM employees WHERE id = ?")
            .bind(emp)
            .execute(&pool)
            .await
            .unwrap();

        let orphan = service.get_by_id(id).await.unwrap();
        assert_eq!(orphan.employee, "Unknown");
        assert_eq!(orphan.violation_name, "Late Arrival");
    }

    #[tokio::test]
    async fn test_list_pushes_date_and_id_predicates() {
        let pool = test_pool().await;
        let service = FineService::new(pool.clone());
        let ann = insert_employee(&pool, "Ann Lee").await;
        let bob = insert_employee(&pool, "Bob Ray").await;
        let vt = insert_violation_type(&pool, "Late Arrival", 25.0).await;

        let day = |d: u32| Utc.with_ymd_and_hms(2026, 3, d, 9, 0, 0).unwrap();
        insert_fine_on(&pool, ann, vt, 25.0, "late", day(10)).await;
        insert_fine_on(&pool, ann, vt, 40.0, "late again", day(12)).await;
        insert_fine_on(&pool, bob, vt, 10.0, "late", day(11)).await;

        let rows = service
            .list(FineFilter {
                start_date: chrono::NaiveDate::from_ymd_opt(2026, 3, 11),
                employee_id: Some(ann),
                sort_by: SortKey::AmountAsc,
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].employee, "Ann Lee");
        assert!((rows[0].amount - 40.0).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn test_delete_missing_fine_is_not_found() {
        let service = FineService::new(test_pool().await);
        let err = service.delete(42).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
