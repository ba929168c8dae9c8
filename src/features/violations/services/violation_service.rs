use chrono::Utc;
use sqlx::SqlitePool;

use crate::core::error::{AppError, Result};
use crate::features::violations::dtos::{SaveViolationTypeDto, ViolationTypeResponseDto};
use crate::features::violations::models::{Severity, ViolationType};
use crate::shared::types::StatusMessage;

const SELECT_VIOLATION_TYPE: &str =
    "SELECT id, name, description, default_amount, severity, suggestions, created_at, updated_at \
     FROM violation_types";

pub struct ViolationService {
    pool: SqlitePool,
}

/// Validated write payload.
struct ViolationTypeInput {
    name: String,
    description: String,
    default_amount: f64,
    severity: Severity,
    suggestions: String,
}

impl ViolationService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> Result<Vec<ViolationTypeResponseDto>> {
        let types =
            sqlx::query_as::<_, ViolationType>(&format!("{} ORDER BY name", SELECT_VIOLATION_TYPE))
                .fetch_all(&self.pool)
                .await
                .map_err(|e| {
                    tracing::error!("Failed to list violation types: {:?}", e);
                    AppError::Database(e)
                })?;

        Ok(types.into_iter().map(|t| t.into()).collect())
    }

    pub async fn get_by_id(&self, id: i64) -> Result<ViolationTypeResponseDto> {
        let violation_type =
            sqlx::query_as::<_, ViolationType>(&format!("{} WHERE id = ?", SELECT_VIOLATION_TYPE))
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        violation_type
            .map(|t| t.into())
            .ok_or_else(|| AppError::NotFound("Violation type not found".to_string()))
    }

    pub async fn create(&self, dto: SaveViolationTypeDto) -> Result<ViolationTypeResponseDto> {
        let input = validate(dto)?;
        let now = Utc::now();

        let result = sqlx::query(
            "INSERT INTO violation_types \
             (name, description, default_amount, severity, suggestions, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&input.name)
        .bind(&input.description)
        .bind(input.default_amount)
        .bind(input.severity.as_str())
        .bind(&input.suggestions)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await?;

        tracing::info!(
            "Violation type created: id={}, name={}",
            result.last_insert_rowid(),
            input.name
        );
        self.get_by_id(result.last_insert_rowid()).await
    }

    pub async fn update(&self, id: i64, dto: SaveViolationTypeDto) -> Result<ViolationTypeResponseDto> {
        let input = validate(dto)?;

        let result = sqlx::query(
            "UPDATE violation_types \
             SET name = ?, description = ?, default_amount = ?, severity = ?, suggestions = ?, updated_at = ? \
             WHERE id = ?",
        )
        .bind(&input.name)
        .bind(&input.description)
        .bind(input.default_amount)
        .bind(input.severity.as_str())
        .bind(&input.suggestions)
        .bind(Utc::now())
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Violation type not found".to_string()));
        }
        self.get_by_id(id).await
    }

    pub async fn delete(&self, id: i64) -> Result<StatusMessage> {
        self.get_by_id(id).await?;

        let fine_count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM fines WHERE violation_type_id = ?")
                .bind(id)
                .fetch_one(&self.pool)
                .await?;

        if fine_count > 0 {
            return Err(AppError::Conflict(
                "Cannot delete violation type that is used in fines".to_string(),
            ));
        }

        sqlx::query("DELETE FROM violation_types WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(StatusMessage::with_message("Violation type deleted successfully."))
    }
}

fn validate(dto: SaveViolationTypeDto) -> Result<ViolationTypeInput> {
    let name = dto
        .name
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .ok_or_else(|| AppError::Validation("Violation name is required".to_string()))?;

    let default_amount = dto
        .default_amount
        .filter(|a| a.is_finite() && *a > 0.0)
        .ok_or_else(|| AppError::Validation("Valid default amount is required".to_string()))?;

    let suggestions = dto
        .suggestions
        .map(|s| s.normalize())
        .unwrap_or_default();

    Ok(ViolationTypeInput {
        name,
        description: dto
            .description
            .as_deref()
            .map(str::trim)
            .unwrap_or("")
            .to_string(),
        default_amount,
        severity: dto.severity.unwrap_or_default(),
        // Vec<String> serialization cannot fail.
        suggestions: serde_json::to_string(&suggestions).unwrap_or_else(|_| "[]".to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::violations::dtos::SuggestionsInput;
    use crate::shared::test_helpers::{insert_employee, insert_fine, test_pool};

    fn violation(name: &str, amount: Option<f64>) -> SaveViolationTypeDto {
        SaveViolationTypeDto {
            name: Some(name.to_string()),
            description: Some("Arriving after shift start".to_string()),
            default_amount: amount,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_create_with_defaults() {
        let service = ViolationService::new(test_pool().await);
        let created = service
            .create(violation("  Late Arrival ", Some(25.0)))
            .await
            .unwrap();
        assert_eq!(created.name, "Late Arrival");
        assert_eq!(created.severity, Severity::Medium);
        assert!(created.suggestions.is_empty());
    }

    #[tokio::test]
    async fn test_create_requires_name_and_positive_amount() {
        let service = ViolationService::new(test_pool().await);

        let err = service
            .create(violation("   ", Some(25.0)))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(ref m) if m == "Violation name is required"));

        for amount in [None, Some(0.0), Some(-5.0), Some(f64::NAN)] {
            let err = service
                .create(violation("Late Arrival", amount))
                .await
                .unwrap_err();
            assert!(
                matches!(err, AppError::Validation(ref m) if m == "Valid default amount is required")
            );
        }
    }

    #[tokio::test]
    async fn test_suggestions_stored_as_json_array() {
        let service = ViolationService::new(test_pool().await);
        let created = service
            .create(SaveViolationTypeDto {
                suggestions: Some(SuggestionsInput::Text("Verbal warning, Fine".to_string())),
                severity: Some(Severity::High),
                ..violation("Phone Use", Some(10.0))
            })
            .await
            .unwrap();
        assert_eq!(created.suggestions, vec!["Verbal warning", "Fine"]);
        assert_eq!(created.severity, Severity::High);

        // The same shape survives an update with a list payload.
        let updated = service
            .update(
                created.id,
                SaveViolationTypeDto {
                    suggestions: Some(SuggestionsInput::List(vec!["Coaching".to_string()])),
                    ..violation("Phone Use", Some(10.0))
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.suggestions, vec!["Coaching"]);
    }

    #[tokio::test]
    async fn test_delete_blocked_while_fines_reference_it() {
        let pool = test_pool().await;
        let service = ViolationService::new(pool.clone());
        let vt = service
            .create(violation("Late Arrival", Some(25.0)))
            .await
            .unwrap();
        let emp = insert_employee(&pool, "Ann Lee").await;
        insert_fine(&pool, emp, vt.id, 25.0, "arrived late").await;

        let err = service.delete(vt.id).await.unwrap_err();
        assert!(
            matches!(err, AppError::Conflict(ref m) if m == "Cannot delete violation type that is used in fines")
        );

        sqlx::query("DELETE FROM fines")
            .execute(&pool)
            .await
            .unwrap();
        service.delete(vt.id).await.unwrap();
        assert!(service.get_by_id(vt.id).await.is_err());
    }
}
