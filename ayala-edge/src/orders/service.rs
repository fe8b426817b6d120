use std::sync::Arc;

use shared::models::OrderItem;

use super::composer::{self, CompositionError, CompositionResult, CustomizationDraft};
use super::modifiers::ModifierCatalog;
use crate::core::FloorResult;
use crate::menus::MenuService;
use crate::tables::FloorService;

/// Builds cart lines from the active menu and puts them on tables
#[derive(Debug, Clone)]
pub struct OrderService {
    menus: MenuService,
    floor: FloorService,
    catalog: Arc<ModifierCatalog>,
}

impl OrderService {
    pub fn new(menus: MenuService, floor: FloorService, catalog: ModifierCatalog) -> Self {
        Self {
            menus,
            floor,
            catalog: Arc::new(catalog),
        }
    }

    pub fn catalog(&self) -> &ModifierCatalog {
        &self.catalog
    }

    /// Open a customization draft for an item of the active menu.
    pub fn customize(&self, item_id: &str) -> CompositionResult<CustomizationDraft> {
        let item = self
            .menus
            .find_item(item_id)
            .map_err(|_| CompositionError::ItemNotFound(item_id.to_string()))?;
        CustomizationDraft::begin(&item, &self.catalog)
    }

    /// Confirm a draft onto a table. Returns the line that was added.
    pub fn commit(&self, table_id: i64, draft: CustomizationDraft) -> FloorResult<OrderItem> {
        let line = draft.confirm();
        self.floor.add_line(table_id, line.clone())?;
        Ok(line)
    }

    /// Add an item as-is, skipping customization.
    pub fn quick_add(&self, table_id: i64, item_id: &str) -> FloorResult<OrderItem> {
        let item = self
            .menus
            .find_item(item_id)
            .map_err(|_| CompositionError::ItemNotFound(item_id.to_string()))?;
        let line = composer::quick_line(&item)?;
        self.floor.add_line(table_id, line.clone())?;
        Ok(line)
    }
}
