//! Unified error codes for the POS client
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 4xxx: Order errors
//! - 5xxx: Payment errors
//! - 6xxx: Menu errors
//! - 7xxx: Table errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Unified error code enum
///
/// All error codes are represented as u16 values for efficient serialization
/// and cross-language compatibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Invalid request
    InvalidRequest = 5,

    // ==================== 1xxx: Auth ====================
    /// User is not authenticated
    NotAuthenticated = 1001,
    /// Permission denied
    PermissionDenied = 1002,

    // ==================== 4xxx: Order ====================
    /// Order has no items to send or pay
    OrderEmpty = 4007,
    /// A send for this session is already in flight
    SendInProgress = 4010,
    /// Items were added but not sent yet
    OrderHasUnsentItems = 4011,
    /// Order line is owned by the server and cannot be edited locally
    OrderLineCommitted = 4012,

    // ==================== 5xxx: Payment ====================
    /// Billing eligibility check refused payment
    BillingBlocked = 5004,

    // ==================== 6xxx: Menu ====================
    /// A required modifier group has no selection
    ModifierRequired = 6002,

    // ==================== 7xxx: Table ====================
    /// The active theme requires a table before adding items
    TableRequired = 7002,
    /// The selected table's open order is still loading
    TableLoading = 7003,

    // ==================== 9xxx: System ====================
    /// Internal error
    InternalError = 9001,
    /// Network / transport failure
    NetworkError = 9002,
    /// Device is offline
    Offline = 9003,
    /// Local storage failure
    StorageError = 9004,
    /// Server returned an unexpected payload
    InvalidResponse = 9005,
}

impl ErrorCode {
    /// Numeric value of this code
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Default human-readable message
    pub const fn message(&self) -> &'static str {
        match self {
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::NotAuthenticated => "Authentication required",
            ErrorCode::PermissionDenied => "Permission denied",
            ErrorCode::OrderEmpty => "No items in the order",
            ErrorCode::SendInProgress => "Order is already being sent",
            ErrorCode::OrderHasUnsentItems => "Send pending items before payment",
            ErrorCode::OrderLineCommitted => "Line has already been sent",
            ErrorCode::BillingBlocked => "Order cannot be billed yet",
            ErrorCode::ModifierRequired => "A required modifier is missing",
            ErrorCode::TableRequired => "Select a table first",
            ErrorCode::TableLoading => "Table is still loading",
            ErrorCode::InternalError => "Internal error",
            ErrorCode::NetworkError => "Network error",
            ErrorCode::Offline => "Device is offline",
            ErrorCode::StorageError => "Local storage error",
            ErrorCode::InvalidResponse => "Unexpected server response",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error returned when converting an unknown u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("invalid error code: {0}")]
pub struct InvalidErrorCode(pub u16);

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            5 => Ok(ErrorCode::InvalidRequest),
            1001 => Ok(ErrorCode::NotAuthenticated),
            1002 => Ok(ErrorCode::PermissionDenied),
            4007 => Ok(ErrorCode::OrderEmpty),
            4010 => Ok(ErrorCode::SendInProgress),
            4011 => Ok(ErrorCode::OrderHasUnsentItems),
            4012 => Ok(ErrorCode::OrderLineCommitted),
            5004 => Ok(ErrorCode::BillingBlocked),
            6002 => Ok(ErrorCode::ModifierRequired),
            7002 => Ok(ErrorCode::TableRequired),
            7003 => Ok(ErrorCode::TableLoading),
            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::NetworkError),
            9003 => Ok(ErrorCode::Offline),
            9004 => Ok(ErrorCode::StorageError),
            9005 => Ok(ErrorCode::InvalidResponse),
            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E{:04}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_values() {
        assert_eq!(ErrorCode::ValidationFailed.code(), 2);
        assert_eq!(ErrorCode::SendInProgress.code(), 4010);
        assert_eq!(ErrorCode::BillingBlocked.code(), 5004);
        assert_eq!(ErrorCode::TableRequired.code(), 7002);
        assert_eq!(ErrorCode::Offline.code(), 9003);
    }

    #[test]
    fn test_try_from_roundtrip() {
        let codes = [
            ErrorCode::ValidationFailed,
            ErrorCode::TableLoading,
            ErrorCode::OrderEmpty,
            ErrorCode::OrderLineCommitted,
            ErrorCode::ModifierRequired,
            ErrorCode::InvalidResponse,
        ];
        for code in codes {
            assert_eq!(ErrorCode::try_from(code.code()), Ok(code));
        }
        assert_eq!(ErrorCode::try_from(1234), Err(InvalidErrorCode(1234)));
    }

    #[test]
    fn test_serialize_as_number() {
        let json = serde_json::to_string(&ErrorCode::BillingBlocked).unwrap();
        assert_eq!(json, "5004");
        let code: ErrorCode = serde_json::from_str("7002").unwrap();
        assert_eq!(code, ErrorCode::TableRequired);
        assert!(serde_json::from_str::<ErrorCode>("4242").is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(ErrorCode::NotFound.to_string(), "E0003");
        assert_eq!(ErrorCode::OrderEmpty.to_string(), "E4007");
    }
}
