//! In-memory filter and sort engine for joined fine rows.
//!
//! Date and id predicates are pushed into SQL by the service; amount bounds,
//! free-text search, and ordering run here. Applying a filter twice yields
//! the same rows in the same order.

use chrono::NaiveDate;
use serde::Deserialize;

use crate::features::fines::models::FineWithDetails;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortKey {
    #[default]
    DateDesc,
    DateAsc,
    AmountDesc,
    AmountAsc,
    Employee,
}

#[derive(Debug, Clone, Default)]
pub struct FineFilter {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub employee_id: Option<i64>,
    pub violation_type_id: Option<i64>,
    pub min_amount: Option<f64>,
    pub max_amount: Option<f64>,
    pub search_term: Option<String>,
    pub sort_by: SortKey,
}

impl FineFilter {
    /// Applies every predicate, then sorts. All predicates are re-applied
    /// even when the SQL layer already handled some of them.
    pub fn apply(&self, mut rows: Vec<FineWithDetails>) -> Vec<FineWithDetails> {
        rows.retain(|f| self.matches(f));
        self.sort(&mut rows);
        rows
    }

    fn matches(&self, fine: &FineWithDetails) -> bool {
        let date = fine.fine_date.date_naive();
        if self.start_date.is_some_and(|d| date < d) {
            return false;
        }
        if self.end_date.is_some_and(|d| date > d) {
            return false;
        }
        if self.employee_id.is_some_and(|id| fine.employee_id != id) {
            return false;
        }
        if self
            .violation_type_id
            .is_some_and(|id| fine.violation_type_id != id)
        {
            return false;
        }
        if self.min_amount.is_some_and(|min| fine.amount < min) {
            return false;
        }
        if self.max_amount.is_some_and(|max| fine.amount > max) {
            return false;
        }
        match self.search_term.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(term) => {
                let needle = term.to_lowercase();
                fine.employee.to_lowercase().contains(&needle)
                    || fine.violation_name.to_lowercase().contains(&needle)
                    || fine.reason.to_lowercase().contains(&needle)
                    || fine.notes.to_lowercase().contains(&needle)
                    || format!("{:.2}", fine.amount).contains(&needle)
            }
        }
    }

    fn sort(&self, rows: &mut [FineWithDetails]) {
        match self.sort_by {
            SortKey::DateDesc => rows.sort_by(|a, b| b.fine_date.cmp(&a.fine_date)),
            SortKey::DateAsc => rows.sort_by(|a, b| a.fine_date.cmp(&b.fine_date)),
            SortKey::AmountDesc => {
                rows.sort_by(|a, b| b.amount.partial_cmp(&a.amount).unwrap_or(std::cmp::Ordering::Equal))
            }
            SortKey::AmountAsc => {
                rows.sort_by(|a, b| a.amount.partial_cmp(&b.amount).unwrap_or(std::cmp::Ordering::Equal))
            }
            SortKey::Employee => rows.sort_by(|a, b| a.employee.cmp(&b.employee)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn fine(id: i64, employee: &str, amount: f64, day: u32) -> FineWithDetails {
        let when = Utc.with_ymd_and_hms(2026, 3, day, 9, 0, 0).unwrap();
        FineWithDetails {
            id,
            employee_id: id,
            violation_type_id: 1,
            amount,
            reason: "arrived late".to_string(),
            notes: String::new(),
            fine_date: when,
            created_at: when,
            updated_at: when,
            employee: employee.to_string(),
            violation_name: "Late Arrival".to_string(),
        }
    }

    fn sample() -> Vec<FineWithDetails> {
        vec![
            fine(1, "Ann Lee", 25.0, 10),
            fine(2, "Bob Ray", 10.0, 12),
            fine(3, "Cid Voe", 40.0, 11),
        ]
    }

    #[test]
    fn test_default_sort_is_date_desc() {
        let rows = FineFilter::default().apply(sample());
        let ids: Vec<i64> = rows.iter().map(|f| f.id).collect();
        assert_eq!(ids, vec![2, 3, 1]);
    }

    #[test]
    fn test_amount_sorts_are_reverses_of_each_other() {
        let asc = FineFilter {
            sort_by: SortKey::AmountAsc,
            ..Default::default()
        }
        .apply(sample());
        let desc = FineFilter {
            sort_by: SortKey::AmountDesc,
            ..Default::default()
        }
        .apply(sample());

        let asc_ids: Vec<i64> = asc.iter().map(|f| f.id).collect();
        let mut desc_ids: Vec<i64> = desc.iter().map(|f| f.id).collect();
        desc_ids.reverse();
        assert_eq!(asc_ids, desc_ids);
    }

    #[test]
    fn test_amount_bounds_are_inclusive() {
        let filter = FineFilter {
            min_amount: Some(10.0),
            max_amount: Some(25.0),
            ..Default::default()
        };
        let ids: Vec<i64> = filter.apply(sample()).iter().map(|f| f.id).collect();
        assert_eq!(ids, vec![2, 1]);
    }

    #[test]
    fn test_date_bounds_are_inclusive() {
        let filter = FineFilter {
            start_date: NaiveDate::from_ymd_opt(2026, 3, 11),
            end_date: NaiveDate::from_ymd_opt(2026, 3, 12),
            ..Default::default()
        };
        let ids: Vec<i64> = filter.apply(sample()).iter().map(|f| f.id).collect();
        assert_eq!(ids, vec![2, 3]);
    }

    #[test]
    fn test_search_matches_name_and_formatted_amount() {
        let by_name = FineFilter {
            search_term: Some("ann".to_string()),
            ..Default::default()
        };
        assert_eq!(by_name.apply(sample()).len(), 1);

        // 40.0 renders as "40.00"
        let by_amount = FineFilter {
            search_term: Some("40.00".to_string()),
            ..Default::default()
        };
        let rows = by_amount.apply(sample());
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, 3);

        let blank = FineFilter {
            search_term: Some("   ".to_string()),
            ..Default::default()
        };
        assert_eq!(blank.apply(sample()).len(), 3);
    }

    #[test]
    fn test_apply_is_idempotent() {
        let filter = FineFilter {
            min_amount: Some(15.0),
            sort_by: SortKey::Employee,
            ..Default::default()
        };
        let once = filter.apply(sample());
        let twice = filter.apply(once.clone());
        let once_ids: Vec<i64> = once.iter().map(|f| f.id).collect();
        let twice_ids: Vec<i64> = twice.iter().map(|f| f.id).collect();
        assert_eq!(once_ids, twice_ids);
    }

    #[test]
    fn test_sort_key_deserializes_from_kebab_case() {
        let key: SortKey = serde_json::from_str("\"amount-desc\"").unwrap();
        assert_eq!(key, SortKey::AmountDesc);
        assert_eq!(SortKey::default(), SortKey::DateDesc);
    }
}
