use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// Database row. `suggestions` is stored as a JSON-encoded string array.
#[derive(Debug, Clone, FromRow)]
pub struct ViolationType {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub default_amount: f64,
    pub severity: String,
    pub suggestions: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
pub enum Severity {
    Low,
    #[default]
    Medium,
    High,
    Critical,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "Low",
            Severity::Medium => "Medium",
            Severity::High => "High",
            Severity::Critical => "Critical",
        }
    }

    /// Unknown values fall back to Medium, matching the column default.
    pub fn parse(value: &str) -> Self {
        match value {
            "Low" => Severity::Low,
            "High" => Severity::High,
            "Critical" => Severity::Critical,
            _ => Severity::Medium,
        }
    }
}
