use std::sync::Arc;

use ayala_sync::SyncedStore;
use shared::models::{OrderItem, PastOrder, Table};
use shared::seed::default_tables;
use shared::util;

use super::lifecycle::{self, CloseOutcome, LifecycleError, LifecycleResult};
use crate::core::FloorResult;
use crate::security_log;
use crate::staff::StaffSession;

/// 楼面服务 - 桌台操作
///
/// Each operation is one optimistic update of the whole `tables` collection:
/// the new state is visible locally before the call returns, the remote
/// write happens in the background.
#[derive(Debug, Clone)]
pub struct FloorService {
    tables: SyncedStore<Vec<Table>>,
}

impl FloorService {
    pub fn new(tables: SyncedStore<Vec<Table>>) -> Self {
        Self { tables }
    }

    pub fn tables(&self) -> Arc<Vec<Table>> {
        self.tables.get()
    }

    pub fn table(&self, table_id: i64) -> Option<Table> {
        self.tables.get().iter().find(|t| t.id == table_id).cloned()
    }

    pub fn store(&self) -> &SyncedStore<Vec<Table>> {
        &self.tables
    }

    pub fn add_line(&self, table_id: i64, line: OrderItem) -> LifecycleResult<()> {
        tracing::debug!(table_id, item = %line.name, "Adding order line");
        self.with_table(table_id, |table| {
            lifecycle::add_line(table, line);
            Ok(((), true))
        })
    }

    pub fn remove_line(&self, table_id: i64, unique_id: &str) -> LifecycleResult<OrderItem> {
        self.with_table(table_id, |table| {
            lifecycle::remove_line(table, unique_id).map(|removed| (removed, true))
        })
    }

    pub fn toggle_urgent(&self, table_id: i64, unique_id: &str) -> LifecycleResult<bool> {
        self.with_table(table_id, |table| {
            lifecycle::toggle_urgent(table, unique_id).map(|urgent| (urgent, true))
        })
    }

    pub fn edit_notes(&self, table_id: i64, unique_id: &str, notes: &str) -> LifecycleResult<bool> {
        self.with_table(table_id, |table| {
            lifecycle::edit_notes(table, unique_id, notes).map(|changed| (changed, changed))
        })
    }

    pub fn adjust_guests(&self, table_id: i64, delta: i32) -> LifecycleResult<u32> {
        self.with_table(table_id, |table| {
            let before = table.guests;
            let guests = lifecycle::adjust_guests(table, delta);
            Ok((guests, guests != before))
        })
    }

    pub fn send_to_kitchen(&self, table_id: i64) -> LifecycleResult<bool> {
        let now = util::now();
        let changed = self.with_table(table_id, |table| {
            lifecycle::send_to_kitchen(table, now).map(|changed| (changed, changed))
        })?;
        tracing::info!(table_id, "Order sent to kitchen");
        Ok(changed)
    }

    /// Request the bill (also the kitchen's "mark ready")
    pub fn request_payment(&self, table_id: i64) -> LifecycleResult<bool> {
        self.with_table(table_id, |table| {
            lifecycle::request_payment(table).map(|changed| (changed, changed))
        })
    }

    /// Checkout: archive the order and free the table.
    pub fn close(&self, table_id: i64) -> LifecycleResult<CloseOutcome> {
        let now = util::now();
        let outcome = self.with_table(table_id, |table| {
            let outcome = lifecycle::close(table, lifecycle::archive_id(now, table_id), now);
            let changed = outcome != CloseOutcome::AlreadyFree;
            Ok((outcome, changed))
        })?;
        if let CloseOutcome::Closed { archived: Some(past) } = &outcome {
            tracing::info!(table_id, total = %past.total, order_id = %past.id, "Table closed");
        }
        Ok(outcome)
    }

    /// Discard the order without archiving.
    pub fn reset(&self, table_id: i64) -> LifecycleResult<bool> {
        let changed = self.with_table(table_id, |table| {
            let changed = lifecycle::reset(table);
            Ok((changed, changed))
        })?;
        if changed {
            tracing::info!(table_id, "Table reset");
        }
        Ok(changed)
    }

    /// Admin only. Archive every open order and free all tables.
    pub fn end_shift(&self, session: &StaffSession) -> FloorResult<Vec<PastOrder>> {
        session.require_admin("end_shift")?;
        let now = util::now();
        let mut archived = Vec::new();
        self.tables.update(|tables| {
            let mut next = tables.clone();
            archived = lifecycle::end_shift(&mut next, now);
            next
        });
        security_log!(
            "INFO",
            "end_shift",
            user_id = session.user().id.as_str(),
            archived = archived.len()
        );
        Ok(archived)
    }

    /// Admin only. Every table back to the built-in layout; history is lost.
    pub fn reset_all(&self, session: &StaffSession) -> FloorResult<()> {
        session.require_admin("reset_all")?;
        self.tables.set(default_tables());
        security_log!("WARN", "reset_all", user_id = session.user().id.as_str());
        Ok(())
    }

    /// Apply `f` to one table. `f` returns its result and whether the table
    /// changed; unchanged means nothing is written.
    fn with_table<R>(
        &self,
        table_id: i64,
        f: impl FnOnce(&mut Table) -> LifecycleResult<(R, bool)>,
    ) -> LifecycleResult<R> {
        let mut out = None;
        self.tables
            .try_update(|tables| -> LifecycleResult<Option<Vec<Table>>> {
                let mut next = tables.clone();
                let table = next
                    .iter_mut()
                    .find(|t| t.id == table_id)
                    .ok_or(LifecycleError::TableNotFound(table_id))?;
                let (result, changed) = f(table)?;
                out = Some(result);
                Ok(changed.then_some(next))
            })?;
        out.ok_or(LifecycleError::TableNotFound(table_id))
    }
}
