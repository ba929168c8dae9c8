use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::features::violations::models::{Severity, ViolationType};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ViolationTypeResponseDto {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub default_amount: f64,
    pub severity: Severity,
    pub suggestions: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ViolationType> for ViolationTypeResponseDto {
    fn from(vt: ViolationType) -> Self {
        // Rows written by this service always hold a JSON array; anything
        // else decodes to an empty list rather than failing the request.
        let suggestions = serde_json::from_str(&vt.suggestions).unwrap_or_default();
        Self {
            id: vt.id,
            name: vt.name,
            description: vt.description,
            default_amount: vt.default_amount,
            severity: Severity::parse(&vt.severity),
            suggestions,
            created_at: vt.created_at,
            updated_at: vt.updated_at,
        }
    }
}

/// Suggestions arrive either as a JSON array or as one comma-separated string.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum SuggestionsInput {
    List(Vec<String>),
    Text(String),
}

impl SuggestionsInput {
    pub fn normalize(self) -> Vec<String> {
        let items = match self {
            SuggestionsInput::List(items) => items,
            SuggestionsInput::Text(text) => {
                text.split(',').map(str::to_string).collect()
            }
        };
        items
            .iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    }
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct SaveViolationTypeDto {
    pub name: Option<String>,
    pub description: Option<String>,
    pub default_amount: Option<f64>,
    pub severity: Option<Severity>,
    pub suggestions: Option<SuggestionsInput>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_comma_separated_text() {
        let input = SuggestionsInput::Text("Verbal warning, Written warning , ,Fine".to_string());
        assert_eq!(
            input.normalize(),
            vec!["Verbal warning", "Written warning", "Fine"]
        );
    }

    #[test]
    fn test_normalize_list_drops_blanks() {
        let input = SuggestionsInput::List(vec![
            "  Coaching  ".to_string(),
            "".to_string(),
            "Escalate".to_string(),
        ]);
        assert_eq!(input.normalize(), vec!["Coaching", "Escalate"]);
    }

    #[test]
    fn test_suggestions_deserialize_both_shapes() {
        let from_list: SuggestionsInput = serde_json::from_str(r#"["a","b"]"#).unwrap();
        assert_eq!(from_list.normalize(), vec!["a", "b"]);

        let from_text: SuggestionsInput = serde_json::from_str(r#""a, b""#).unwrap();
        assert_eq!(from_text.normalize(), vec!["a", "b"]);
    }
}
