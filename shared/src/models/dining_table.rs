//! Dining Table Model

use serde::{Deserialize, Serialize};

/// Table occupancy status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum TableStatus {
    #[default]
    Available,
    Occupied,
    Reserved,
}

/// Dining table entity
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DiningTable {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub seats: u32,
    #[serde(default)]
    pub status: TableStatus,
    /// Open order bound to this table
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_order_id: Option<String>,
}

impl DiningTable {
    pub fn has_open_order(&self) -> bool {
        self.current_order_id.is_some()
    }
}

/// Shape of a table on the floor plan
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum TableShape {
    #[default]
    Square,
    Round,
    Rectangle,
}

/// Position of one table on the floor plan
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TablePlacement {
    pub table_id: String,
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub shape: TableShape,
}

/// Active floor plan of a venue
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FloorPlan {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub tables: Vec<TablePlacement>,
}
