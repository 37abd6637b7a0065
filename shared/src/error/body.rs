//! Error payloads returned by the REST API
//!
//! The backend is not consistent about error shapes. Seen in the wild:
//!
//! ```json
//! {"detail": {"code": "ORDER_LOCKED", "message": "Order is locked"}}
//! {"detail": "Order is locked"}
//! {"code": 4001, "message": "Order not found"}
//! {"error": "Bad gateway"}
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// `detail` field: either a `{code, message}` object or a plain string
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum ApiErrorDetail {
    Structured {
        #[serde(default)]
        code: Option<Value>,
        message: String,
    },
    Text(String),
    Other(Value),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub detail: Option<ApiErrorDetail>,
    #[serde(default)]
    pub code: Option<Value>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

fn code_to_string(code: &Value) -> Option<String> {
    match code {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

impl ApiErrorBody {
    /// Best human-readable message, most specific first
    pub fn message(&self) -> Option<String> {
        match &self.detail {
            Some(ApiErrorDetail::Structured { message, .. }) => return Some(message.clone()),
            Some(ApiErrorDetail::Text(text)) => return Some(text.clone()),
            _ => {}
        }
        self.message.clone().or_else(|| self.error.clone())
    }

    /// Machine-readable code, if any
    pub fn code(&self) -> Option<String> {
        if let Some(ApiErrorDetail::Structured { code: Some(code), .. }) = &self.detail {
            return code_to_string(code);
        }
        self.code.as_ref().and_then(code_to_string)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_structured_detail() {
        let body: ApiErrorBody =
            serde_json::from_str(r#"{"detail":{"code":"ORDER_LOCKED","message":"Order is locked"}}"#).unwrap();
        assert_eq!(body.message().as_deref(), Some("Order is locked"));
        assert_eq!(body.code().as_deref(), Some("ORDER_LOCKED"));
    }

    #[test]
    fn test_text_detail() {
        let body: ApiErrorBody = serde_json::from_str(r#"{"detail":"Table is closed"}"#).unwrap();
        assert_eq!(body.message().as_deref(), Some("Table is closed"));
        assert!(body.code().is_none());
    }

    #[test]
    fn test_top_level_fields() {
        let body: ApiErrorBody = serde_json::from_str(r#"{"code":4001,"message":"Order not found"}"#).unwrap();
        assert_eq!(body.message().as_deref(), Some("Order not found"));
        assert_eq!(body.code().as_deref(), Some("4001"));

        let body: ApiErrorBody = serde_json::from_str(r#"{"error":"Bad gateway"}"#).unwrap();
        assert_eq!(body.message().as_deref(), Some("Bad gateway"));
    }

    #[test]
    fn test_validation_list_detail_has_no_message() {
        let body: ApiErrorBody = serde_json::from_str(r#"{"detail":[{"loc":["body"],"msg":"x"}]}"#).unwrap();
        assert!(matches!(body.detail, Some(ApiErrorDetail::Other(_))));
        assert!(body.message().is_none());
    }
}
