//! Order Model
//!
//! `OrderLine` is the only entity the client mutates. Lines without a
//! `line_id` are pending (not yet sent); lines carrying one were hydrated from
//! the server and are read-only on the client.

use super::modifier::SelectedModifier;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Seat / course assigned to freshly added lines
pub const DEFAULT_SEAT: u32 = 1;
pub const DEFAULT_COURSE: u32 = 1;

/// Order line
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderLine {
    /// Server-assigned line ID (None = pending)
    #[serde(default, alias = "id", skip_serializing_if = "Option::is_none")]
    pub line_id: Option<String>,
    pub item_id: String,
    pub name: String,
    /// Base price in currency unit, modifiers excluded
    pub price: Decimal,
    pub quantity: i32,
    /// Line total (quantity × unit price)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_price: Option<Decimal>,
    #[serde(default = "default_seat")]
    pub seat: u32,
    #[serde(default = "default_course")]
    pub course: u32,
    #[serde(default)]
    pub modifiers: Vec<SelectedModifier>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

fn default_seat() -> u32 {
    DEFAULT_SEAT
}

fn default_course() -> u32 {
    DEFAULT_COURSE
}

impl OrderLine {
    /// New pending line with quantity 1 on seat 1, course 1
    pub fn pending(
        item_id: impl Into<String>,
        name: impl Into<String>,
        price: Decimal,
        modifiers: Vec<SelectedModifier>,
    ) -> Self {
        let mut line = Self {
            line_id: None,
            item_id: item_id.into(),
            name: name.into(),
            price,
            quantity: 1,
            total_price: None,
            seat: DEFAULT_SEAT,
            course: DEFAULT_COURSE,
            modifiers,
            notes: None,
        };
        line.recompute_total();
        line
    }

    pub fn is_pending(&self) -> bool {
        self.line_id.is_none()
    }

    /// Sum of all modifier price adjustments
    pub fn modifiers_total(&self) -> Decimal {
        self.modifiers.iter().map(|m| m.price_adjustment).sum()
    }

    /// Base price plus modifier adjustments
    pub fn unit_price(&self) -> Decimal {
        self.price + self.modifiers_total()
    }

    pub fn recompute_total(&mut self) {
        self.total_price = Some(self.unit_price() * Decimal::from(self.quantity));
    }

    /// Line total, falling back to quantity × unit price when absent
    pub fn line_total(&self) -> Decimal {
        self.total_price
            .unwrap_or_else(|| self.unit_price() * Decimal::from(self.quantity))
    }

    /// Same item with the same modifier list (order-sensitive)
    pub fn same_composition(&self, item_id: &str, modifiers: &[SelectedModifier]) -> bool {
        self.item_id == item_id && self.modifiers.as_slice() == modifiers
    }
}

/// Server order status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    #[default]
    Open,
    Closed,
    Voided,
}

/// One batch of lines transmitted to kitchen/printer in a single send
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SendRound {
    pub round_no: u32,
    /// RFC 3339 timestamp assigned by the server
    pub sent_at: String,
    #[serde(default)]
    pub do_print: bool,
    #[serde(default)]
    pub do_kds: bool,
    #[serde(default)]
    pub do_stock: bool,
}

/// Server-confirmed order header
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CurrentOrder {
    pub id: String,
    pub order_number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table_id: Option<String>,
    #[serde(default)]
    pub status: OrderStatus,
    #[serde(default)]
    pub send_rounds: Vec<SendRound>,
}

impl CurrentOrder {
    pub fn last_round(&self) -> Option<&SendRound> {
        self.send_rounds.iter().max_by_key(|r| r.round_no)
    }
}

/// Authoritative order as returned by `GET /orders/:id` and `POST /orders`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderDetail {
    pub id: String,
    pub order_number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table_id: Option<String>,
    #[serde(default)]
    pub status: OrderStatus,
    #[serde(default)]
    pub items: Vec<OrderLine>,
    #[serde(default)]
    pub send_rounds: Vec<SendRound>,
}

impl OrderDetail {
    /// Split into the order header and its committed lines
    pub fn into_parts(self) -> (CurrentOrder, Vec<OrderLine>) {
        let order = CurrentOrder {
            id: self.id,
            order_number: self.order_number,
            table_id: self.table_id,
            status: self.status,
            send_rounds: self.send_rounds,
        };
        (order, self.items)
    }
}

// =============================================================================
// Request / response DTOs
// =============================================================================

/// `POST /orders`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CreateOrderRequest {
    pub venue_id: String,
    /// Table ID, or the synthetic `"counter"` identifier
    pub table_id: String,
    /// Current user
    pub server_id: String,
}

/// `POST /orders/:id/items`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AddItemRequest {
    pub menu_item_id: String,
    pub quantity: i32,
    pub seat: u32,
    pub course: u32,
    pub modifiers: Vec<SelectedModifier>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl From<&OrderLine> for AddItemRequest {
    fn from(line: &OrderLine) -> Self {
        Self {
            menu_item_id: line.item_id.clone(),
            quantity: line.quantity,
            seat: line.seat,
            course: line.course,
            modifiers: line.modifiers.clone(),
            notes: line.notes.clone(),
        }
    }
}

/// `POST /orders/:id/send` body (the idempotency key travels as a header)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SendOrderRequest {
    pub do_print: bool,
    pub do_kds: bool,
    pub do_stock: bool,
    pub client_send_id: String,
}

/// `POST /orders/:id/send` response
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SendOrderResponse {
    #[serde(default)]
    pub round_no: Option<u32>,
    /// Server recognised the idempotency key and skipped the send
    #[serde(default)]
    pub duplicate: bool,
}

/// Payment method accepted by `POST /orders/:id/close`
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethodKind {
    Cash,
    Card,
}

/// `POST /orders/:id/close`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CloseOrderRequest {
    pub payment_method: PaymentMethodKind,
    pub amount: Decimal,
}
