//! Modifier selection dialog state
//!
//! Holds one selection set per modifier group while the dialog is open and
//! flattens it into the [`SelectedModifier`] list the cart stores.

use crate::api::PosApi;
use crate::{ClientError, ClientResult};
use rust_decimal::Decimal;
use shared::models::{MenuItem, ModifierGroup, SelectedModifier, SelectionType};
use std::collections::HashMap;

/// An item with its resolved modifiers, ready for the cart
#[derive(Debug, Clone, PartialEq)]
pub struct ItemWithModifiers {
    pub item: MenuItem,
    pub modifiers: Vec<SelectedModifier>,
}

impl ItemWithModifiers {
    /// Item without any modifier
    pub fn plain(item: MenuItem) -> Self {
        Self {
            item,
            modifiers: Vec::new(),
        }
    }

    pub fn unit_price(&self) -> Decimal {
        self.item.price + self.modifiers.iter().map(|m| m.price_adjustment).sum::<Decimal>()
    }
}

/// Selections of an open modifier dialog
#[derive(Debug, Clone)]
pub struct ModifierSelection {
    item: MenuItem,
    groups: Vec<ModifierGroup>,
    /// group id -> selected option ids
    selected: HashMap<String, Vec<String>>,
}

impl ModifierSelection {
    /// Start a selection with defaults seeded
    ///
    /// Single-select groups start on their `is_default` option (if any),
    /// multiple-select groups start empty.
    pub fn new(item: MenuItem, groups: Vec<ModifierGroup>) -> Self {
        let selected = groups
            .iter()
            .map(|group| {
                let initial = match group.selection_type {
                    SelectionType::Single => group
                        .default_option()
                        .map(|o| vec![o.id.clone()])
                        .unwrap_or_default(),
                    SelectionType::Multiple => Vec::new(),
                };
                (group.id.clone(), initial)
            })
            .collect();

        Self {
            item,
            groups,
            selected,
        }
    }

    /// Fetch the item's modifier groups and open the dialog
    pub async fn open(api: &dyn PosApi, item: MenuItem) -> ClientResult<Self> {
        let groups = api.item_modifiers(&item.id).await?;
        tracing::debug!(item_id = %item.id, groups = groups.len(), "Modifier dialog opened");
        Ok(Self::new(item, groups))
    }

    pub fn item(&self) -> &MenuItem {
        &self.item
    }

    pub fn groups(&self) -> &[ModifierGroup] {
        &self.groups
    }

    /// Nothing to choose; the item can be confirmed as is
    pub fn is_trivial(&self) -> bool {
        self.groups.is_empty()
    }

    fn group(&self, group_id: &str) -> ClientResult<&ModifierGroup> {
        self.groups
            .iter()
            .find(|g| g.id == group_id)
            .ok_or_else(|| ClientError::NotFound(format!("Modifier group {}", group_id)))
    }

    /// Tap an option: single-select replaces, multiple-select toggles
    pub fn select(&mut self, group_id: &str, option_id: &str) -> ClientResult<()> {
        let group = self.group(group_id)?;
        if group.option(option_id).is_none() {
            return Err(ClientError::NotFound(format!("Modifier option {}", option_id)));
        }
        let selection_type = group.selection_type;

        let entry = self.selected.entry(group_id.to_string()).or_default();
        match selection_type {
            SelectionType::Single => {
                entry.clear();
                entry.push(option_id.to_string());
            }
            SelectionType::Multiple => {
                if let Some(pos) = entry.iter().position(|id| id == option_id) {
                    entry.remove(pos);
                } else {
                    entry.push(option_id.to_string());
                }
            }
        }
        Ok(())
    }

    /// Clear one group's selection
    pub fn clear(&mut self, group_id: &str) {
        if let Some(entry) = self.selected.get_mut(group_id) {
            entry.clear();
        }
    }

    pub fn is_selected(&self, group_id: &str, option_id: &str) -> bool {
        self.selected
            .get(group_id)
            .is_some_and(|ids| ids.iter().any(|id| id == option_id))
    }

    /// Selections flattened in group then option declaration order
    pub fn selected_modifiers(&self) -> Vec<SelectedModifier> {
        self.groups
            .iter()
            .flat_map(|group| {
                group
                    .options
                    .iter()
                    .filter(|option| self.is_selected(&group.id, &option.id))
                    .map(move |option| SelectedModifier::from_option(group, option))
            })
            .collect()
    }

    /// Base price plus every selected adjustment
    pub fn running_total(&self) -> Decimal {
        self.item.price
            + self
                .selected_modifiers()
                .iter()
                .map(|m| m.price_adjustment)
                .sum::<Decimal>()
    }

    /// Required groups left without a selection
    pub fn missing_required(&self) -> Vec<&ModifierGroup> {
        self.groups
            .iter()
            .filter(|g| g.required)
            .filter(|g| self.selected.get(&g.id).is_none_or(|ids| ids.is_empty()))
            .collect()
    }

    /// Validate and hand the augmented item back to the cart
    pub fn confirm(&self) -> ClientResult<ItemWithModifiers> {
        if let Some(group) = self.missing_required().first() {
            return Err(ClientError::ModifierRequired(group.name.clone()));
        }
        Ok(ItemWithModifiers {
            item: self.item.clone(),
            modifiers: self.selected_modifiers(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::ModifierOption;

    fn option(id: &str, cents: i64, is_default: bool) -> ModifierOption {
        ModifierOption {
            id: id.to_string(),
            name: id.to_uppercase(),
            price_adjustment: Decimal::new(cents, 2),
            is_default,
        }
    }

    fn pizza() -> MenuItem {
        MenuItem {
            id: "pizza".into(),
            name: "Pizza".into(),
            price: Decimal::new(900, 2),
            category_id: None,
            image: None,
            color: None,
        }
    }

    fn groups() -> Vec<ModifierGroup> {
        vec![
            ModifierGroup {
                id: "size".into(),
                name: "Size".into(),
                selection_type: SelectionType::Single,
                required: true,
                options: vec![option("small", 0, false), option("large", 250, true)],
            },
            ModifierGroup {
                id: "extras".into(),
                name: "Extras".into(),
                selection_type: SelectionType::Multiple,
                required: false,
                options: vec![
                    option("olives", 50, true),
                    option("cheese", 100, false),
                    option("ham", 150, false),
                ],
            },
        ]
    }

    #[test]
    fn test_defaults_seeded() {
        let selection = ModifierSelection::new(pizza(), groups());
        assert!(selection.is_selected("size", "large"));
        // Multiple-select groups ignore is_default
        assert!(!selection.is_selected("extras", "olives"));
        assert_eq!(selection.running_total(), Decimal::new(1150, 2));
    }

    #[test]
    fn test_single_replaces_multiple_toggles() {
        let mut selection = ModifierSelection::new(pizza(), groups());
        selection.select("size", "small").unwrap();
        assert!(!selection.is_selected("size", "large"));
        assert!(selection.is_selected("size", "small"));

        selection.select("extras", "cheese").unwrap();
        selection.select("extras", "ham").unwrap();
        selection.select("extras", "cheese").unwrap();
        assert!(!selection.is_selected("extras", "cheese"));
        assert!(selection.is_selected("extras", "ham"));
        assert_eq!(selection.running_total(), Decimal::new(1050, 2));
    }

    #[test]
    fn test_flatten_in_declaration_order() {
        let mut selection = ModifierSelection::new(pizza(), groups());
        selection.select("extras", "ham").unwrap();
        selection.select("extras", "olives").unwrap();

        let ids: Vec<String> = selection
            .selected_modifiers()
            .into_iter()
            .map(|m| m.option_id)
            .collect();
        assert_eq!(ids, vec!["large", "olives", "ham"]);
    }

    #[test]
    fn test_required_group_blocks_confirm() {
        let mut selection = ModifierSelection::new(pizza(), groups());
        selection.clear("size");
        match selection.confirm() {
            Err(ClientError::ModifierRequired(name)) => assert_eq!(name, "Size"),
            other => panic!("unexpected: {:?}", other),
        }

        selection.select("size", "small").unwrap();
        let confirmed = selection.confirm().unwrap();
        assert_eq!(confirmed.unit_price(), Decimal::new(900, 2));
    }

    #[test]
    fn test_unknown_option_rejected() {
        let mut selection = ModifierSelection::new(pizza(), groups());
        assert!(matches!(
            selection.select("size", "xxl"),
            Err(ClientError::NotFound(_))
        ));
        assert!(matches!(
            selection.select("sauce", "bbq"),
            Err(ClientError::NotFound(_))
        ));
    }

    #[test]
    fn test_zero_groups_confirm_immediately() {
        let selection = ModifierSelection::new(pizza(), Vec::new());
        assert!(selection.is_trivial());
        let confirmed = selection.confirm().unwrap();
        assert!(confirmed.modifiers.is_empty());
        assert_eq!(confirmed.unit_price(), Decimal::new(900, 2));
    }
}
