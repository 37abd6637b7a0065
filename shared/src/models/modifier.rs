//! Modifier Model

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Selection mode of a modifier group
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum SelectionType {
    #[default]
    Single,
    Multiple,
}

/// Modifier option (embedded in ModifierGroup)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ModifierOption {
    pub id: String,
    pub name: String,
    /// Price adjustment in currency unit (positive=add, negative=subtract)
    #[serde(default)]
    pub price_adjustment: Decimal,
    #[serde(default)]
    pub is_default: bool,
}

/// Modifier group attached to a menu item
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ModifierGroup {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub selection_type: SelectionType,
    #[serde(default)]
    pub required: bool,
    pub options: Vec<ModifierOption>,
}

impl ModifierGroup {
    pub fn option(&self, option_id: &str) -> Option<&ModifierOption> {
        self.options.iter().find(|o| o.id == option_id)
    }

    /// The option flagged as default, if any
    pub fn default_option(&self) -> Option<&ModifierOption> {
        self.options.iter().find(|o| o.is_default)
    }
}

/// A modifier chosen for an order line
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SelectedModifier {
    pub group_id: String,
    pub option_id: String,
    pub name: String,
    pub price_adjustment: Decimal,
}

impl SelectedModifier {
    pub fn from_option(group: &ModifierGroup, option: &ModifierOption) -> Self {
        Self {
            group_id: group.id.clone(),
            option_id: option.id.clone(),
            name: option.name.clone(),
            price_adjustment: option.price_adjustment,
        }
    }
}
