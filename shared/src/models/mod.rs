//! Data models
//!
//! Shared between the POS client and the REST API it consumes.
//! All IDs are opaque strings assigned by the backend.

pub mod billing;
pub mod category;
pub mod dining_table;
pub mod modifier;
pub mod order;
pub mod product;
pub mod venue;

// Re-exports
pub use billing::*;
pub use category::*;
pub use dining_table::*;
pub use modifier::*;
pub use order::*;
pub use product::*;
pub use venue::*;
