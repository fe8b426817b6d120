//! # ayala-printer
//!
//! Receipt printing for 80mm paper - low-level document and output only.
//!
//! ## Scope
//!
//! This crate handles HOW to print:
//! - Self-contained HTML receipt documents (inline styles, right-to-left)
//! - Text escaping
//! - Handing documents to a print surface (file spool)
//!
//! Business logic (WHAT to print) stays in application code:
//! - Kitchen ticket and bill rendering → ayala-edge
//!
//! ## Example
//!
//! ```ignore
//! use ayala_printer::{FilePrinter, HtmlTicketBuilder, Printer};
//!
//! let mut builder = HtmlTicketBuilder::new("Kitchen Order");
//! builder.header("הזמנה למטבח");
//! builder.meta(&["שולחן: שולחן 4", "אורחים: 2"]);
//! builder.ticket_item("סלט יווני", Some("דחוף!"), Some("בלי בצל"));
//! builder.footer("-- סוף הזמנה --");
//!
//! let printer = FilePrinter::new("./prints");
//! printer.print(&builder.build("kitchen_4")).await?;
//! ```

mod error;
mod html;
mod printer;

// Re-exports
pub use error::{PrintError, PrintResult};
pub use html::{HtmlDocument, HtmlTicketBuilder, escape_html};
pub use printer::{FilePrinter, Printer};
