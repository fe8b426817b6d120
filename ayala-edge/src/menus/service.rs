use std::sync::Arc;

use ayala_sync::SyncedStore;
use shared::models::{Menu, MenuItem};

use super::{MenuError, MenuResult};

/// Menu editing and lookup over the synchronized `menus` collection
#[derive(Debug, Clone)]
pub struct MenuService {
    menus: SyncedStore<Vec<Menu>>,
}

impl MenuService {
    pub fn new(menus: SyncedStore<Vec<Menu>>) -> Self {
        Self { menus }
    }

    pub fn menus(&self) -> Arc<Vec<Menu>> {
        self.menus.get()
    }

    pub fn store(&self) -> &SyncedStore<Vec<Menu>> {
        &self.menus
    }

    /// The menu waiters order from
    pub fn active_menu(&self) -> Option<Menu> {
        super::active_menu(&self.menus.get()).cloned()
    }

    /// Item of the active menu
    pub fn find_item(&self, item_id: &str) -> MenuResult<MenuItem> {
        self.active_menu()
            .and_then(|m| m.item(item_id).cloned())
            .ok_or_else(|| MenuError::ItemNotFound(item_id.to_string()))
    }

    /// Items of the active menu, by category or search term
    pub fn list_items(&self, category: Option<&str>, search: Option<&str>) -> Vec<MenuItem> {
        self.active_menu()
            .map(|menu| {
                super::list_items(&menu, category, search)
                    .into_iter()
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn activate(&self, menu_id: &str) -> MenuResult<()> {
        self.menus.try_update(|menus| -> MenuResult<Option<Vec<Menu>>> {
            let mut next = menus.clone();
            super::activate(&mut next, menu_id)?;
            Ok(Some(next))
        })?;
        tracing::info!(menu_id, "Menu activated");
        Ok(())
    }

    pub fn create_menu(&self, name: &str) -> MenuResult<Menu> {
        let menu = super::new_menu(name, shared::util::now())?;
        let created = menu.clone();
        self.menus.update(move |menus| {
            let mut next = menus.clone();
            next.push(menu);
            next
        });
        tracing::info!(menu_id = %created.id, "Menu created");
        Ok(created)
    }

    pub fn add_category(&self, menu_id: &str, name: &str) -> MenuResult<bool> {
        let mut added = false;
        self.edit_menu(menu_id, |menu| {
            added = super::add_category(menu, name)?;
            Ok(added)
        })?;
        Ok(added)
    }

    /// Remove a category and its items; returns how many items went with it.
    pub fn delete_category(&self, menu_id: &str, name: &str) -> MenuResult<usize> {
        let mut removed = 0;
        self.edit_menu(menu_id, |menu| {
            removed = super::delete_category(menu, name)?;
            Ok(true)
        })?;
        Ok(removed)
    }

    pub fn upsert_item(&self, menu_id: &str, item: MenuItem) -> MenuResult<()> {
        self.edit_menu(menu_id, |menu| {
            super::upsert_item(menu, item)?;
            Ok(true)
        })
    }

    pub fn delete_item(&self, menu_id: &str, item_id: &str) -> MenuResult<MenuItem> {
        let mut removed = None;
        self.edit_menu(menu_id, |menu| {
            removed = Some(super::delete_item(menu, item_id)?);
            Ok(true)
        })?;
        removed.ok_or_else(|| MenuError::ItemNotFound(item_id.to_string()))
    }

    /// Apply `f` to one menu; `Ok(false)` means nothing to write.
    fn edit_menu(
        &self,
        menu_id: &str,
        f: impl FnOnce(&mut Menu) -> MenuResult<bool>,
    ) -> MenuResult<()> {
        self.menus.try_update(|menus| -> MenuResult<Option<Vec<Menu>>> {
            let mut next = menus.clone();
            let menu = next
                .iter_mut()
                .find(|m| m.id == menu_id)
                .ok_or_else(|| MenuError::MenuNotFound(menu_id.to_string()))?;
            Ok(f(menu)?.then_some(next))
        })?;
        Ok(())
    }
}
