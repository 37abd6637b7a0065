//! Transient user notifications

use crate::ClientError;
use serde::Serialize;
use shared::ErrorCode;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ToastLevel {
    Success,
    Info,
    Warning,
    Error,
}

/// One toast, broadcast to whoever paints them
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Toast {
    pub level: ToastLevel,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<ErrorCode>,
}

impl Toast {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: ToastLevel::Success,
            message: message.into(),
            code: None,
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: ToastLevel::Info,
            message: message.into(),
            code: None,
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: ToastLevel::Warning,
            message: message.into(),
            code: None,
        }
    }
}

impl From<&ClientError> for Toast {
    fn from(err: &ClientError) -> Self {
        Self {
            level: ToastLevel::Error,
            message: err.user_message(),
            code: Some(err.error_code()),
        }
    }
}
