//! Shared types for the POS client
//!
//! Wire models consumed from the REST API, money helpers and error codes.
//! No I/O lives here.

pub mod client;
pub mod error;
pub mod models;
pub mod money;
pub mod util;

// Re-exports
pub use rust_decimal::Decimal;
pub use serde::{Deserialize, Serialize};

pub use error::{ErrorCategory, ErrorCode};
pub use money::{OrderTotals, TAX_RATE};
