use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::features::fines::filter::{FineFilter, SortKey};
use crate::features::fines::models::FineWithDetails;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FineResponseDto {
    pub id: i64,
    pub employee_id: i64,
    pub violation_type_id: i64,
    pub amount: f64,
    pub reason: String,
    pub notes: String,
    pub fine_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Employee name at read time, "Unknown" when the employee was deleted.
    pub employee: String,
    pub violation_name: String,
}

impl From<FineWithDetails> for FineResponseDto {
    fn from(f: FineWithDetails) -> Self {
        Self {
            id: f.id,
            employee_id: f.employee_id,
            violation_type_id: f.violation_type_id,
            amount: f.amount,
            reason: f.reason,
            notes: f.notes,
            fine_date: f.fine_date,
            created_at: f.created_at,
            updated_at: f.updated_at,
            employee: f.employee,
            violation_name: f.violation_name,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct SaveFineDto {
    pub employee_id: Option<i64>,
    pub violation_type_id: Option<i64>,
    pub amount: Option<f64>,
    pub reason: Option<String>,
    pub notes: Option<String>,
    pub fine_date: Option<DateTime<Utc>>,
}

/// Query parameters for the fine list, camelCased to match the client.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct FineListQuery {
    /// Inclusive date-only lower bound (YYYY-MM-DD)
    pub start_date: Option<NaiveDate>,
    /// Inclusive date-only upper bound (YYYY-MM-DD)
    pub end_date: Option<NaiveDate>,
    pub employee_id: Option<i64>,
    pub violation_type_id: Option<i64>,
    /// Inclusive amount lower bound
    pub min_amount: Option<f64>,
    /// Inclusive amount upper bound
    pub max_amount: Option<f64>,
    /// Case-insensitive substring over employee, violation, reason, notes and amount
    pub search_term: Option<String>,
    /// date-desc (default) | date-asc | amount-desc | amount-asc | employee
    #[param(value_type = Option<String>)]
    pub sort_by: Option<SortKey>,
}

impl From<FineListQuery> for FineFilter {
    fn from(q: FineListQuery) -> Self {
        FineFilter {
            start_date: q.start_date,
            end_date: q.end_date,
            employee_id: q.employee_id,
            violation_type_id: q.violation_type_id,
            min_amount: q.min_amount,
            max_amount: q.max_amount,
            search_term: q.search_term,
            sort_by: q.sort_by.unwrap_or_default(),
        }
    }
}
