use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

use crate::app::errors::sanitize_message;

/// Uniform JSON envelope for every API response.
///
/// ```json
/// { "success": true, "message": "product found", "data": { ... }, "metadata": {} }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default)]
    pub metadata: Map<String, JsonValue>,
}

impl ApiResponse<JsonValue> {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: None,
            metadata: Map::new(),
        }
    }

    /// Failure envelope. The message is sanitized and the status is echoed in metadata.
    pub fn error(message: &str, status_code: u16) -> Self {
        let mut metadata = Map::new();
        metadata.insert("statusCode".to_string(), JsonValue::from(status_code));
        Self {
            success: false,
            message: sanitize_message(message),
            data: None,
            metadata,
        }
    }
}

impl<T> ApiResponse<T> {
    pub fn with_data(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: Some(data),
            metadata: Map::new(),
        }
    }
}
