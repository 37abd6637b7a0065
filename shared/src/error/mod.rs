//! Unified error codes for the POS client
//!
//! - [`ErrorCode`]: Standardized error codes for all error types
//! - [`ErrorCategory`]: Classification of errors by domain
//! - [`ApiErrorBody`]: The error payload shapes the REST API may return
//!
//! # Error Code Ranges
//!
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 4xxx: Order errors
//! - 5xxx: Payment errors
//! - 6xxx: Menu errors
//! - 7xxx: Table errors
//! - 9xxx: System errors

mod body;
mod category;
mod codes;

pub use body::{ApiErrorBody, ApiErrorDetail};
pub use category::ErrorCategory;
pub use codes::{ErrorCode, InvalidErrorCode};
