//! Client error types

use http::StatusCode;
use shared::ErrorCode;
use shared::models::BlockingItem;
use thiserror::Error;

/// Client error type
///
/// Three families surface to the user:
/// - transport failures (`Http`, `Offline`): generic failure toast
/// - business rejections (`Api`, `BillingBlocked`): specific reason
/// - local validation (`EmptyOrder`, `TableRequired`, ...): raised before any network call
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed at the transport level
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Server rejected the request
    #[error("API error ({status}): {message}")]
    Api {
        status: StatusCode,
        code: Option<String>,
        message: String,
    },

    /// Invalid response format
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Authentication required
    #[error("Authentication required")]
    Unauthorized,

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Local validation error
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("No items in the order")]
    EmptyOrder,

    #[error("Select a table first")]
    TableRequired,

    #[error("Order is already being sent")]
    SendInFlight,

    /// The selected table's open order has not been loaded yet
    #[error("Table is still loading")]
    TableLoading,

    #[error("Send pending items before taking payment")]
    UnsentItems,

    /// Line at this index was already sent and belongs to the server
    #[error("Line {0} has already been sent")]
    LineCommitted(usize),

    #[error("No line at index {0}")]
    NoSuchLine(usize),

    #[error("Modifier group '{0}' requires a selection")]
    ModifierRequired(String),

    /// Billing eligibility check refused payment
    #[error("{reason}")]
    BillingBlocked {
        reason: String,
        blocking_items: Vec<BlockingItem>,
    },

    /// No offline queue exists; the action was dropped
    #[error("Device is offline, the action was not queued")]
    Offline,

    /// Local storage I/O failed
    #[error("Storage error: {0}")]
    Storage(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ClientError {
    /// Transport-level failure (no response from the server)
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Http(_) | Self::Offline)
    }

    /// Local validation failure raised before any network call
    pub fn is_local_validation(&self) -> bool {
        matches!(
            self,
            Self::Validation(_)
                | Self::EmptyOrder
                | Self::TableRequired
                | Self::TableLoading
                | Self::UnsentItems
                | Self::LineCommitted(_)
                | Self::NoSuchLine(_)
                | Self::ModifierRequired(_)
        )
    }

    /// Normalize into the single string shown in a toast
    pub fn user_message(&self) -> String {
        match self {
            Self::Http(e) if e.is_timeout() => "The server took too long to respond".to_string(),
            Self::Http(e) => format!("Network error: {}", e),
            Self::Api { message, .. } => message.clone(),
            Self::BillingBlocked {
                reason,
                blocking_items,
            } if !blocking_items.is_empty() => {
                let names: Vec<&str> = blocking_items.iter().map(|i| i.name.as_str()).collect();
                format!("{}: {}", reason, names.join(", "))
            }
            Self::NotFound(what) => format!("{} not found", what),
            Self::Validation(msg) => msg.clone(),
            other => other.to_string(),
        }
    }

    /// Map onto the shared error code table
    pub fn error_code(&self) -> ErrorCode {
        match self {
            Self::Http(_) => ErrorCode::NetworkError,
            Self::Api { status, .. } => match *status {
                StatusCode::UNAUTHORIZED => ErrorCode::NotAuthenticated,
                StatusCode::FORBIDDEN => ErrorCode::PermissionDenied,
                StatusCode::NOT_FOUND => ErrorCode::NotFound,
                s if s.is_client_error() => ErrorCode::InvalidRequest,
                _ => ErrorCode::InternalError,
            },
            Self::InvalidResponse(_) | Self::Serialization(_) => ErrorCode::InvalidResponse,
            Self::Unauthorized => ErrorCode::NotAuthenticated,
            Self::NotFound(_) => ErrorCode::NotFound,
            Self::Validation(_) | Self::NoSuchLine(_) => ErrorCode::ValidationFailed,
            Self::EmptyOrder => ErrorCode::OrderEmpty,
            Self::TableRequired => ErrorCode::TableRequired,
            Self::SendInFlight => ErrorCode::SendInProgress,
            Self::TableLoading => ErrorCode::TableLoading,
            Self::UnsentItems => ErrorCode::OrderHasUnsentItems,
            Self::LineCommitted(_) => ErrorCode::OrderLineCommitted,
            Self::ModifierRequired(_) => ErrorCode::ModifierRequired,
            Self::BillingBlocked { .. } => ErrorCode::BillingBlocked,
            Self::Offline => ErrorCode::Offline,
            Self::Storage(_) => ErrorCode::StorageError,
        }
    }
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;
