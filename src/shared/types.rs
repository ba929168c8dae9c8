use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Wire shape for every successful request: `{ "data": ... }`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    pub data: T,
}

impl<T> ApiResponse<T> {
    pub fn new(data: T) -> Self {
        Self { data }
    }
}

/// Payload for delete-style operations that only report an outcome message.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct StatusMessage {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl StatusMessage {
    pub fn success() -> Self {
        Self {
            status: "success".to_string(),
            message: None,
        }
    }

    pub fn with_message(message: impl Into<String>) -> Self {
        Self {
            status: "success".to_string(),
            message: Some(message.into()),
        }
    }
}
