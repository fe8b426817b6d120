//! Table lifecycle state machine
//!
//! ```text
//!            add line                send                 request bill
//!   FREE ──────────────▶ OCCUPIED ──────────▶ ORDERED ──────────────────▶ PAYMENT
//!    ▲                      │  ▲    add line     │                          │
//!    │  last line removed   │  └─────────────────┘                          │
//!    ├──────────────────────┴────────────────────┘                          │
//!    │                  close (archive) / reset (discard)                   │
//!    └──────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every function here is pure over `&mut Table`; the floor service applies
//! them inside one store update so the whole collection is written at once.

use chrono::{DateTime, Utc};
use shared::models::{OrderItem, PastOrder, Table, TableStatus};
use thiserror::Error;

/// Lifecycle guard failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LifecycleError {
    #[error("桌台不存在: {0}")]
    TableNotFound(i64),

    #[error("订单行不存在: {0}")]
    LineNotFound(String),

    #[error("桌台 {0} 没有可发送的订单")]
    EmptyOrder(i64),

    #[error("桌台 {table} 状态 {from} 不允许 {action}")]
    InvalidTransition {
        table: i64,
        from: TableStatus,
        action: &'static str,
    },
}

pub type LifecycleResult<T> = Result<T, LifecycleError>;

/// Result of a close request
#[derive(Debug, Clone, PartialEq)]
pub enum CloseOutcome {
    /// Table was already FREE; nothing changed
    AlreadyFree,
    /// Table is now FREE; `archived` holds the frozen order if there was one
    Closed { archived: Option<PastOrder> },
}

/// Checkout archive id
pub fn archive_id(at: DateTime<Utc>, table_id: i64) -> String {
    format!("hist_{}_{}", at.timestamp_millis(), table_id)
}

/// Shift-end archive id
pub fn shift_archive_id(at: DateTime<Utc>, table_id: i64) -> String {
    format!("hist_shift_{}_{}", at.timestamp_millis(), table_id)
}

/// Back to FREE: empty order, no guests, no timer.
fn release(table: &mut Table) {
    table.status = TableStatus::Free;
    table.current_order.clear();
    table.guests = 0;
    table.start_time = None;
}

fn line_mut<'a>(table: &'a mut Table, unique_id: &str) -> LifecycleResult<&'a mut OrderItem> {
    table
        .line_mut(unique_id)
        .ok_or_else(|| LifecycleError::LineNotFound(unique_id.to_string()))
}

/// Append a line. New lines are unsent work, so the table is OCCUPIED.
pub fn add_line(table: &mut Table, line: OrderItem) {
    table.current_order.push(line);
    table.status = TableStatus::Occupied;
}

/// Remove a line by instance id. Removing the last line frees the table.
pub fn remove_line(table: &mut Table, unique_id: &str) -> LifecycleResult<OrderItem> {
    let index = table
        .current_order
        .iter()
        .position(|l| l.unique_id == unique_id)
        .ok_or_else(|| LifecycleError::LineNotFound(unique_id.to_string()))?;
    let removed = table.current_order.remove(index);
    if table.current_order.is_empty() {
        release(table);
    }
    Ok(removed)
}

/// Flip a line's urgent flag; returns the new value.
pub fn toggle_urgent(table: &mut Table, unique_id: &str) -> LifecycleResult<bool> {
    let line = line_mut(table, unique_id)?;
    line.is_urgent = !line.is_urgent;
    Ok(line.is_urgent)
}

/// Replace a line's notes with free text (blank clears them).
/// Returns whether anything changed.
pub fn edit_notes(table: &mut Table, unique_id: &str, notes: &str) -> LifecycleResult<bool> {
    let line = line_mut(table, unique_id)?;
    let trimmed = notes.trim();
    let next = (!trimmed.is_empty()).then(|| trimmed.to_string());
    if line.notes == next {
        return Ok(false);
    }
    line.notes = next;
    Ok(true)
}

/// Manual guest adjustment, clamped to at least one guest.
pub fn adjust_guests(table: &mut Table, delta: i32) -> u32 {
    let next = (i64::from(table.guests) + i64::from(delta)).max(1);
    table.guests = u32::try_from(next).unwrap_or(u32::MAX);
    table.guests
}

/// Kitchen ticket confirmed: OCCUPIED → ORDERED, timer starts if unset.
///
/// Re-sending from ORDERED is allowed and keeps the original start time.
pub fn send_to_kitchen(table: &mut Table, now: DateTime<Utc>) -> LifecycleResult<bool> {
    match table.status {
        TableStatus::Free => Err(LifecycleError::EmptyOrder(table.id)),
        _ if table.current_order.is_empty() => Err(LifecycleError::EmptyOrder(table.id)),
        TableStatus::Occupied | TableStatus::Ordered => {
            let changed = table.status != TableStatus::Ordered || table.start_time.is_none();
            table.status = TableStatus::Ordered;
            table.start_time.get_or_insert(now);
            Ok(changed)
        }
        TableStatus::Payment => Err(LifecycleError::InvalidTransition {
            table: table.id,
            from: table.status,
            action: "send_to_kitchen",
        }),
    }
}

/// Bill requested / kitchen marked ready: ORDERED → PAYMENT.
pub fn request_payment(table: &mut Table) -> LifecycleResult<bool> {
    match table.status {
        TableStatus::Ordered => {
            table.status = TableStatus::Payment;
            Ok(true)
        }
        TableStatus::Payment => Ok(false),
        from => Err(LifecycleError::InvalidTransition {
            table: table.id,
            from,
            action: "request_payment",
        }),
    }
}

/// Checkout. A non-empty order is frozen into history (most recent first).
pub fn close(table: &mut Table, archive_id: String, now: DateTime<Utc>) -> CloseOutcome {
    if table.status.is_free() {
        return CloseOutcome::AlreadyFree;
    }
    let archived = archive_current(table, archive_id, now);
    release(table);
    CloseOutcome::Closed { archived }
}

/// Discard. No history entry. Returns whether the table changed.
pub fn reset(table: &mut Table) -> bool {
    if table.status.is_free() {
        return false;
    }
    release(table);
    true
}

/// Free every table, archiving each non-empty order.
pub fn end_shift(tables: &mut [Table], now: DateTime<Utc>) -> Vec<PastOrder> {
    tables
        .iter_mut()
        .filter_map(|table| {
            let archived = archive_current(table, shift_archive_id(now, table.id), now);
            release(table);
            archived
        })
        .collect()
}

fn archive_current(table: &mut Table, id: String, now: DateTime<Utc>) -> Option<PastOrder> {
    if table.current_order.is_empty() {
        return None;
    }
    let past = PastOrder::archive(id, std::mem::take(&mut table.current_order), now);
    table.order_history.insert(0, past.clone());
    Some(past)
}
