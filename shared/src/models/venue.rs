//! Venue Model

use serde::{Deserialize, Serialize};

/// How a venue serves its guests
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ServiceStyle {
    /// Waiter service at tables (orders are bound to a table)
    #[default]
    TableService,
    /// Order and pay at a counter
    Counter,
    /// Quick service, pay on order
    Express,
}

impl ServiceStyle {
    /// Counter and express venues take payment right after ordering
    pub fn pays_at_order(&self) -> bool {
        matches!(self, Self::Counter | Self::Express)
    }
}

/// Venue entity (one restaurant / location tenant)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Venue {
    pub id: String,
    pub name: String,
    /// ISO 4217 currency code
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default)]
    pub service_style: ServiceStyle,
    /// Venue-level default POS theme identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pos_theme: Option<String>,
}

fn default_currency() -> String {
    "EUR".to_string()
}

/// Remote configuration version counter (bumped on every menu publish)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConfigVersion {
    pub version: i64,
}
