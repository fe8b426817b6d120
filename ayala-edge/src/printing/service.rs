use ayala_printer::{HtmlDocument, Printer};
use chrono_tz::Tz;
use shared::util;
use tracing::instrument;

use super::renderer::{BillRenderer, KitchenTicketRenderer};
use crate::core::FloorResult;
use crate::tables::lifecycle::{self, LifecycleError};
use crate::tables::FloorService;

/// What a confirmed print commits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrintKind {
    /// Confirmed ticket sends the order to the kitchen
    KitchenTicket,
    /// Bill printing changes no state
    Bill,
}

/// Prepared document awaiting operator confirmation
#[derive(Debug, Clone)]
pub struct PendingPrint {
    kind: PrintKind,
    table_id: i64,
    document: HtmlDocument,
}

impl PendingPrint {
    pub fn kind(&self) -> PrintKind {
        self.kind
    }

    pub fn table_id(&self) -> i64 {
        self.table_id
    }

    /// Preview content
    pub fn document(&self) -> &HtmlDocument {
        &self.document
    }
}

/// Confirm-then-commit printing
#[derive(Debug, Clone)]
pub struct PrintService {
    floor: FloorService,
    kitchen: KitchenTicketRenderer,
    bill: BillRenderer,
}

impl PrintService {
    pub fn new(floor: FloorService, timezone: Tz, receipt_title: impl Into<String>) -> Self {
        Self {
            floor,
            kitchen: KitchenTicketRenderer::new(timezone),
            bill: BillRenderer::new(timezone, receipt_title),
        }
    }

    /// Render the kitchen ticket for the whole current order.
    ///
    /// Fails up front when the table could not be sent (empty order, bill
    /// already requested), so the operator never previews a dead ticket.
    pub fn prepare_kitchen_ticket(&self, table_id: i64) -> FloorResult<PendingPrint> {
        let now = util::now();
        let table = self
            .floor
            .table(table_id)
            .ok_or(LifecycleError::TableNotFound(table_id))?;
        lifecycle::send_to_kitchen(&mut table.clone(), now)?;

        Ok(PendingPrint {
            kind: PrintKind::KitchenTicket,
            table_id,
            document: self.kitchen.render(&table, &table.current_order, now),
        })
    }

    /// Render the customer bill
    pub fn prepare_bill(&self, table_id: i64) -> FloorResult<PendingPrint> {
        let table = self
            .floor
            .table(table_id)
            .ok_or(LifecycleError::TableNotFound(table_id))?;

        Ok(PendingPrint {
            kind: PrintKind::Bill,
            table_id,
            document: self.bill.render(&table, util::now()),
        })
    }

    /// Print, then commit. A failed print commits nothing; the pending print
    /// stays with the caller for a retry or [`cancel`](Self::cancel).
    #[instrument(skip(self, pending, printer), fields(table_id = pending.table_id, kind = ?pending.kind))]
    pub async fn confirm(&self, pending: &PendingPrint, printer: &impl Printer) -> FloorResult<()> {
        if let Err(e) = printer.print(&pending.document).await {
            tracing::warn!(error = %e, retryable = e.is_retryable(), "Print failed");
            return Err(e.into());
        }

        if pending.kind == PrintKind::KitchenTicket {
            self.floor.send_to_kitchen(pending.table_id)?;
        }
        tracing::info!(document = %pending.document.name, "Print confirmed");
        Ok(())
    }

    /// Drop a pending print. No state change.
    pub fn cancel(&self, pending: PendingPrint) {
        tracing::debug!(table_id = pending.table_id, document = %pending.document.name, "Print cancelled");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ayala_printer::{PrintError, PrintResult};
    use ayala_sync::{MemoryRemote, SyncedStore};
    use shared::models::TableStatus;
    use shared::seed::{default_menus, default_tables};
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Printer whose window is always blocked
    struct BlockedPrinter;

    impl Printer for BlockedPrinter {
        async fn print(&self, _document: &HtmlDocument) -> PrintResult<()> {
            Err(PrintError::Blocked("popup blocked".into()))
        }

        async fn is_online(&self) -> bool {
            false
        }
    }

    #[derive(Default)]
    struct CountingPrinter {
        printed: AtomicUsize,
    }

    impl Printer for CountingPrinter {
        async fn print(&self, _document: &HtmlDocument) -> PrintResult<()> {
            self.printed.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        async fn is_online(&self) -> bool {
            true
        }
    }

    fn service() -> (PrintService, FloorService) {
        let store = SyncedStore::connect(Arc::new(MemoryRemote::new()), "tables", default_tables());
        let floor = FloorService::new(store);
        let print = PrintService::new(floor.clone(), chrono_tz::Asia::Jerusalem, "Ayala");
        (print, floor)
    }

    fn seat(floor: &FloorService, table_id: i64) {
        let salad = default_menus()[0].item("s3").unwrap().clone();
        let line = crate::orders::composer::quick_line(&salad).unwrap();
        floor.add_line(table_id, line).unwrap();
    }

    #[tokio::test]
    async fn test_blocked_print_commits_nothing() {
        let (print, floor) = service();
        seat(&floor, 1);

        let pending = print.prepare_kitchen_ticket(1).unwrap();
        let err = print.confirm(&pending, &BlockedPrinter).await.unwrap_err();
        assert!(err.is_retryable());
        assert_eq!(floor.table(1).unwrap().status, TableStatus::Occupied);

        // Retry on a working printer with the same pending print
        let printer = CountingPrinter::default();
        print.confirm(&pending, &printer).await.unwrap();
        let table = floor.table(1).unwrap();
        assert_eq!(table.status, TableStatus::Ordered);
        assert!(table.start_time.is_some());
        assert_eq!(printer.printed.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_cancel_leaves_table_alone() {
        let (print, floor) = service();
        seat(&floor, 2);
        let before = floor.table(2).unwrap();

        let pending = print.prepare_kitchen_ticket(2).unwrap();
        print.cancel(pending);
        assert_eq!(floor.table(2).unwrap(), before);
    }

    #[tokio::test]
    async fn test_dead_tickets_are_refused() {
        let (print, _floor) = service();
        assert!(matches!(
            print.prepare_kitchen_ticket(3),
            Err(crate::core::FloorError::Lifecycle(LifecycleError::EmptyOrder(3)))
        ));
        assert!(matches!(
            print.prepare_kitchen_ticket(99),
            Err(crate::core::FloorError::Lifecycle(LifecycleError::TableNotFound(99)))
        ));
    }

    #[tokio::test]
    async fn test_bill_changes_no_state() {
        let (print, floor) = service();
        seat(&floor, 5);
        let before = floor.table(5).unwrap();

        let pending = print.prepare_bill(5).unwrap();
        assert_eq!(pending.kind(), PrintKind::Bill);
        assert!(pending.document().html.contains("₪69"));
        print.confirm(&pending, &CountingPrinter::default()).await.unwrap();
        assert_eq!(floor.table(5).unwrap(), before);
    }
}
