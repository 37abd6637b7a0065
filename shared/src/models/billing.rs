//! Billing eligibility returned by `GET /orders/:id/billing-eligibility`

use serde::{Deserialize, Serialize};

/// A line that prevents the order from being paid
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BlockingItem {
    #[serde(default)]
    pub line_id: Option<String>,
    pub name: String,
    /// Kitchen status of the line (e.g. "pending", "preparing")
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BillingEligibility {
    pub eligible: bool,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub blocking_items: Vec<BlockingItem>,
}
