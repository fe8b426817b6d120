//! Data models
//!
//! Wire shape of the three synchronized collections. Field names are camelCase
//! because browser clients read and write the same documents.
//!
//! The hosted store drops empty arrays and absent keys, so every collection
//! field carries a `#[serde(default)]` and decoding never depends on the writer
//! having sent it.

pub mod menu;
pub mod order;
pub mod table;
pub mod user;

// Re-exports
pub use menu::*;
pub use order::*;
pub use table::*;
pub use user::*;
