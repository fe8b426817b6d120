//! Item customization draft
//!
//! Holds the in-progress modifier selection for one menu item. Nothing here
//! touches the store: dropping a draft discards it, `confirm` yields the cart
//! line for the caller to commit.

use std::collections::HashMap;

use shared::models::{MenuItem, OrderItem};
use shared::util::instance_id;
use thiserror::Error;

use super::modifiers::{ModifierCatalog, ModifierGroup, ModifierKind};

/// Separator between note parts
pub const NOTE_DELIMITER: &str = ", ";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompositionError {
    #[error("Item is out of stock: {0}")]
    OutOfStock(String),

    #[error("Menu item not found: {0}")]
    ItemNotFound(String),

    #[error("Modifier group not offered for this item: {0}")]
    UnknownGroup(String),

    #[error("Option {option} not in group {group}")]
    UnknownOption { group: String, option: String },
}

pub type CompositionResult<T> = Result<T, CompositionError>;

/// Customization in progress
#[derive(Debug, Clone)]
pub struct CustomizationDraft {
    item: MenuItem,
    groups: Vec<ModifierGroup>,
    /// group id → option ids in selection order
    selected: HashMap<String, Vec<String>>,
    note: String,
}

impl CustomizationDraft {
    /// Start customizing `item`. Out-of-stock items cannot be ordered.
    pub fn begin(item: &MenuItem, catalog: &ModifierCatalog) -> CompositionResult<Self> {
        if item.is_out_of_stock {
            return Err(CompositionError::OutOfStock(item.name.clone()));
        }
        Ok(Self {
            item: item.clone(),
            groups: catalog.groups_for(item).into_iter().cloned().collect(),
            selected: HashMap::new(),
            note: String::new(),
        })
    }

    pub fn item(&self) -> &MenuItem {
        &self.item
    }

    /// Groups offered, in declaration order
    pub fn groups(&self) -> &[ModifierGroup] {
        &self.groups
    }

    /// Currently selected option ids of a group
    pub fn selection(&self, group_id: &str) -> &[String] {
        self.selected.get(group_id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn is_selected(&self, group_id: &str, option_id: &str) -> bool {
        self.selection(group_id).iter().any(|o| o == option_id)
    }

    /// Tap an option: single groups replace, multiple groups toggle.
    pub fn toggle(&mut self, group_id: &str, option_id: &str) -> CompositionResult<()> {
        let group = self
            .groups
            .iter()
            .find(|g| g.id == group_id)
            .ok_or_else(|| CompositionError::UnknownGroup(group_id.to_string()))?;
        if group.option(option_id).is_none() {
            return Err(CompositionError::UnknownOption {
                group: group_id.to_string(),
                option: option_id.to_string(),
            });
        }

        let current = self.selected.entry(group_id.to_string()).or_default();
        match group.kind {
            ModifierKind::Single => *current = vec![option_id.to_string()],
            ModifierKind::Multiple => {
                if let Some(pos) = current.iter().position(|o| o == option_id) {
                    current.remove(pos);
                } else {
                    current.push(option_id.to_string());
                }
            }
        }
        Ok(())
    }

    /// Free-text note appended after the modifier labels
    pub fn set_note(&mut self, note: impl Into<String>) {
        self.note = note.into();
    }

    /// Kitchen notes: selected labels in group order, then the free text.
    pub fn notes(&self) -> String {
        let mut parts: Vec<&str> = Vec::new();
        for group in &self.groups {
            for option_id in self.selection(&group.id) {
                if let Some(option) = group.option(option_id) {
                    parts.push(&option.label);
                }
            }
        }
        let note = self.note.trim();
        if !note.is_empty() {
            parts.push(note);
        }
        parts.join(NOTE_DELIMITER)
    }

    /// Finish: a fresh, non-urgent cart line with the resolved notes.
    pub fn confirm(self) -> OrderItem {
        let notes = self.notes();
        OrderItem::from_menu_item(&self.item, instance_id(), Some(notes))
    }
}

/// Cart line without customization
pub fn quick_line(item: &MenuItem) -> CompositionResult<OrderItem> {
    if item.is_out_of_stock {
        return Err(CompositionError::OutOfStock(item.name.clone()));
    }
    Ok(OrderItem::from_menu_item(item, instance_id(), None))
}
