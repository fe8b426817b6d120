//! Menu collection operations
//!
//! Pure functions over the menu list; [`MenuService`] applies them through
//! the synchronized `menus` store.

mod service;

pub use service::MenuService;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use shared::models::{Menu, MenuItem};
use thiserror::Error;

/// Category every new menu starts with
pub const DEFAULT_CATEGORY: &str = "כללי";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MenuError {
    #[error("Menu not found: {0}")]
    MenuNotFound(String),

    #[error("Category not found: {0}")]
    CategoryNotFound(String),

    #[error("Menu item not found: {0}")]
    ItemNotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

pub type MenuResult<T> = Result<T, MenuError>;

/// Make `menu_id` the only active menu.
pub fn activate(menus: &mut [Menu], menu_id: &str) -> MenuResult<()> {
    if !menus.iter().any(|m| m.id == menu_id) {
        return Err(MenuError::MenuNotFound(menu_id.to_string()));
    }
    for menu in menus.iter_mut() {
        menu.is_active = menu.id == menu_id;
    }
    Ok(())
}

/// The active menu, falling back to the first one.
pub fn active_menu(menus: &[Menu]) -> Option<&Menu> {
    menus.iter().find(|m| m.is_active).or_else(|| menus.first())
}

/// Items to show: a non-blank search term matches across every category,
/// otherwise the category filter applies (`None` = all items).
pub fn list_items<'a>(
    menu: &'a Menu,
    category: Option<&str>,
    search: Option<&str>,
) -> Vec<&'a MenuItem> {
    match search.map(str::trim).filter(|s| !s.is_empty()) {
        Some(term) => menu.items.iter().filter(|i| i.matches(term)).collect(),
        None => menu
            .items
            .iter()
            .filter(|i| category.is_none_or(|c| i.category == c))
            .collect(),
    }
}

/// New, inactive menu with the default category.
pub fn new_menu(name: &str, now: DateTime<Utc>) -> MenuResult<Menu> {
    let name = name.trim();
    if name.is_empty() {
        return Err(MenuError::Validation("menu name is required".into()));
    }
    Ok(Menu {
        id: format!("menu_{}", now.timestamp_millis()),
        name: name.to_string(),
        is_active: false,
        categories: vec![DEFAULT_CATEGORY.to_string()],
        items: Vec::new(),
    })
}

/// Add a category; an existing name is left alone. Returns whether it was added.
pub fn add_category(menu: &mut Menu, name: &str) -> MenuResult<bool> {
    let name = name.trim();
    if name.is_empty() {
        return Err(MenuError::Validation("category name is required".into()));
    }
    if menu.categories.iter().any(|c| c == name) {
        return Ok(false);
    }
    menu.categories.push(name.to_string());
    Ok(true)
}

/// Remove a category and every item in it. Returns the number of items removed.
pub fn delete_category(menu: &mut Menu, name: &str) -> MenuResult<usize> {
    let before = menu.categories.len();
    menu.categories.retain(|c| c != name);
    if menu.categories.len() == before {
        return Err(MenuError::CategoryNotFound(name.to_string()));
    }
    let items_before = menu.items.len();
    menu.items.retain(|i| i.category != name);
    Ok(items_before - menu.items.len())
}

/// Insert or replace an item (matched by id).
pub fn upsert_item(menu: &mut Menu, item: MenuItem) -> MenuResult<()> {
    if item.name.trim().is_empty() {
        return Err(MenuError::Validation("item name is required".into()));
    }
    if item.price < Decimal::ZERO {
        return Err(MenuError::Validation("price cannot be negative".into()));
    }
    if !menu.categories.iter().any(|c| *c == item.category) {
        return Err(MenuError::CategoryNotFound(item.category));
    }
    match menu.items.iter_mut().find(|i| i.id == item.id) {
        Some(existing) => *existing = item,
        None => menu.items.push(item),
    }
    Ok(())
}

pub fn delete_item(menu: &mut Menu, item_id: &str) -> MenuResult<MenuItem> {
    let index = menu
        .items
        .iter()
        .position(|i| i.id == item_id)
        .ok_or_else(|| MenuError::ItemNotFound(item_id.to_string()))?;
    Ok(menu.items.remove(index))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use shared::seed::{CAT_SALADS, default_menus};

    fn menus(n: usize, active: Option<usize>) -> Vec<Menu> {
        (0..n)
            .map(|i| Menu {
                id: format!("m{i}"),
                name: format!("Menu {i}"),
                is_active: Some(i) == active,
                categories: vec![],
                items: vec![],
            })
            .collect()
    }

    proptest! {
        #[test]
        fn prop_activation_is_exclusive(n in 1usize..8, active in proptest::option::of(0usize..8), pick in 0usize..8) {
            let mut list = menus(n, active.filter(|a| *a < n));
            let target = format!("m{}", pick % n);
            activate(&mut list, &target).unwrap();

            prop_assert_eq!(list.iter().filter(|m| m.is_active).count(), 1);
            prop_assert_eq!(&active_menu(&list).unwrap().id, &target);
        }
    }

    #[test]
    fn test_activate_unknown_changes_nothing() {
        let mut list = menus(2, Some(0));
        assert_eq!(activate(&mut list, "nope"), Err(MenuError::MenuNotFound("nope".into())));
        assert!(list[0].is_active);
    }

    #[test]
    fn test_active_falls_back_to_first() {
        let list = menus(3, None);
        assert_eq!(active_menu(&list).unwrap().id, "m0");
        assert!(active_menu(&[]).is_none());
    }

    #[test]
    fn test_search_bypasses_category() {
        let menu = default_menus().remove(0);
        let salads = list_items(&menu, Some(CAT_SALADS), None);
        assert!(!salads.is_empty());
        assert!(salads.iter().all(|i| i.category == CAT_SALADS));

        // Same category filter, but a search term wins
        let found = list_items(&menu, Some(CAT_SALADS), Some("קפה"));
        assert!(!found.is_empty());
        assert!(found.iter().any(|i| i.category != CAT_SALADS));

        // Blank search is no search
        assert_eq!(list_items(&menu, Some(CAT_SALADS), Some("  ")).len(), salads.len());
        assert_eq!(list_items(&menu, None, None).len(), menu.items.len());
    }

    #[test]
    fn test_category_editing() {
        let mut menu = new_menu("Summer", Utc::now()).unwrap();
        assert!(menu.id.starts_with("menu_"));
        assert_eq!(menu.categories, [DEFAULT_CATEGORY]);
        assert!(!menu.is_active);

        assert_eq!(add_category(&mut menu, "Desserts"), Ok(true));
        assert_eq!(add_category(&mut menu, "Desserts"), Ok(false));

        upsert_item(&mut menu, MenuItem::new("d1", "Cake", Decimal::from(30), "Desserts")).unwrap();
        upsert_item(&mut menu, MenuItem::new("g1", "Water", Decimal::from(8), DEFAULT_CATEGORY)).unwrap();
        assert_eq!(delete_category(&mut menu, "Desserts"), Ok(1));
        assert_eq!(menu.items.len(), 1);
        assert_eq!(
            delete_category(&mut menu, "Desserts"),
            Err(MenuError::CategoryNotFound("Desserts".into()))
        );
    }

    #[test]
    fn test_item_upsert_and_delete() {
        let mut menu = new_menu("M", Utc::now()).unwrap();
        let mut item = MenuItem::new("i1", "Soup", Decimal::from(20), DEFAULT_CATEGORY);
        upsert_item(&mut menu, item.clone()).unwrap();
        item.price = Decimal::from(25);
        upsert_item(&mut menu, item).unwrap();
        assert_eq!(menu.items.len(), 1);
        assert_eq!(menu.items[0].price, Decimal::from(25));

        let bad = MenuItem::new("i2", "Soup", Decimal::from(-1), DEFAULT_CATEGORY);
        assert!(matches!(upsert_item(&mut menu, bad), Err(MenuError::Validation(_))));
        let orphan = MenuItem::new("i3", "Soup", Decimal::from(1), "Nowhere");
        assert!(matches!(upsert_item(&mut menu, orphan), Err(MenuError::CategoryNotFound(_))));

        assert_eq!(delete_item(&mut menu, "i1").unwrap().name, "Soup");
        assert!(delete_item(&mut menu, "i1").is_err());
    }
}
