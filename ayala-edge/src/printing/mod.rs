//! Kitchen ticket and bill printing
//!
//! Rendering is pure (table in, document out). [`PrintService`] wraps it in
//! the confirm-then-commit flow: a ticket is prepared for preview, and only
//! a successful hand-off to the printer advances the table.

pub mod renderer;
mod service;

pub use renderer::{BillRenderer, KitchenTicketRenderer, format_price, format_timestamp};
pub use service::{PendingPrint, PrintKind, PrintService};
