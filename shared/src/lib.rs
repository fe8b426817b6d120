//! Shared types for the Ayala front-of-house system
//!
//! Data model carried by the synchronized documents (tables, menus, users),
//! the seed dataset every device boots with, and small time/id utilities.

pub mod models;
pub mod seed;
pub mod util;

// Re-exports
pub use rust_decimal::Decimal;
pub use serde::{Deserialize, Serialize};

pub use models::{
    Menu, MenuItem, OrderItem, PastOrder, Role, Table, TableStatus, User, order_total,
};
