//! Order composition
//!
//! - [`modifiers`] - rule table mapping menu items to modifier groups
//! - [`composer`] - customization draft and cart line construction
//! - [`OrderService`] - composes lines from the active menu and adds them to a table

pub mod composer;
pub mod modifiers;
mod service;

pub use composer::{CompositionError, CompositionResult, CustomizationDraft, NOTE_DELIMITER};
pub use modifiers::{Matcher, ModifierCatalog, ModifierGroup, ModifierKind, ModifierRule};
pub use service::OrderService;
