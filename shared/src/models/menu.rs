//! Menu Model

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Menu item entity
///
/// Reference data; carts copy it into an [`OrderItem`](super::OrderItem)
/// so later edits never reach lines already ordered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItem {
    pub id: String,
    pub name: String,
    pub price: Decimal,
    /// Category name (must appear in the owning menu's `categories`)
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_out_of_stock: bool,
    /// Hidden keywords matched by search only
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub search_terms: Vec<String>,
}

impl MenuItem {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        price: Decimal,
        category: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            price,
            category: category.into(),
            description: None,
            is_out_of_stock: false,
            search_terms: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_search_terms<I, S>(mut self, terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.search_terms = terms.into_iter().map(Into::into).collect();
        self
    }

    /// Case-insensitive match against name, description, category and
    /// hidden search keywords.
    pub fn matches(&self, term: &str) -> bool {
        let term = term.trim().to_lowercase();
        if term.is_empty() {
            return false;
        }
        self.name.to_lowercase().contains(&term)
            || self
                .description
                .as_deref()
                .is_some_and(|d| d.to_lowercase().contains(&term))
            || self.category.to_lowercase().contains(&term)
            || self
                .search_terms
                .iter()
                .any(|tag| tag.to_lowercase().contains(&term))
    }
}

/// Menu entity
///
/// Exactly one menu in the collection is active at a time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Menu {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub is_active: bool,
    /// Display order of categories
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub items: Vec<MenuItem>,
}

impl Menu {
    pub fn item(&self, item_id: &str) -> Option<&MenuItem> {
        self.items.iter().find(|i| i.id == item_id)
    }
}
