//! Floor and kitchen summaries
//!
//! Read-only views over the tables collection for the admin dashboard and
//! the kitchen screen.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use shared::models::{Table, TableStatus};

/// Minutes after which a kitchen order is flagged
pub const WARNING_AFTER_MINUTES: i64 = 10;
/// Minutes after which a kitchen order is late
pub const LATE_AFTER_MINUTES: i64 = 20;

/// 营业概览
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FloorSummary {
    /// Tables that are not FREE
    pub occupied_tables: usize,
    pub total_guests: u32,
    /// Sum of open orders
    pub open_revenue: Decimal,
    /// Sum of archived orders
    pub closed_revenue: Decimal,
    pub daily_revenue: Decimal,
}

impl FloorSummary {
    pub fn from_tables(tables: &[Table]) -> Self {
        let mut summary = Self::default();
        for table in tables {
            if !table.status.is_free() {
                summary.occupied_tables += 1;
            }
            summary.total_guests = summary.total_guests.saturating_add(table.guests);
            summary.open_revenue += table.total();
            summary.closed_revenue += table.history_total();
        }
        summary.daily_revenue = summary.open_revenue + summary.closed_revenue;
        summary
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    Normal,
    Warning,
    Late,
}

impl Urgency {
    pub fn from_elapsed(minutes: i64) -> Self {
        if minutes > LATE_AFTER_MINUTES {
            Urgency::Late
        } else if minutes > WARNING_AFTER_MINUTES {
            Urgency::Warning
        } else {
            Urgency::Normal
        }
    }
}

/// One ticket on the kitchen screen
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KitchenEntry {
    pub table_id: i64,
    pub table_name: String,
    pub items: usize,
    pub elapsed_minutes: i64,
    pub urgency: Urgency,
}

/// ORDERED tables, longest waiting first.
///
/// A missing start time counts as just sent.
pub fn kitchen_queue(tables: &[Table], now: DateTime<Utc>) -> Vec<KitchenEntry> {
    let mut queue: Vec<KitchenEntry> = tables
        .iter()
        .filter(|t| t.status == TableStatus::Ordered)
        .map(|t| {
            let elapsed_minutes = t
                .start_time
                .map(|start| (now - start).num_minutes().max(0))
                .unwrap_or(0);
            KitchenEntry {
                table_id: t.id,
                table_name: t.name.clone(),
                items: t.current_order.len(),
                elapsed_minutes,
                urgency: Urgency::from_elapsed(elapsed_minutes),
            }
        })
        .collect();
    queue.sort_by(|a, b| b.elapsed_minutes.cmp(&a.elapsed_minutes));
    queue
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use shared::models::{MenuItem, OrderItem, PastOrder};

    fn line(price: i64) -> OrderItem {
        let item = MenuItem::new("x", "Item", Decimal::from(price), "Cat");
        OrderItem::from_menu_item(&item, shared::util::instance_id(), None)
    }

    fn ordered(id: i64, minutes_ago: i64, now: DateTime<Utc>) -> Table {
        let mut table = Table::new(id, format!("T{id}"));
        table.status = TableStatus::Ordered;
        table.guests = 2;
        table.current_order = vec![line(10)];
        table.start_time = Some(now - Duration::minutes(minutes_ago));
        table
    }

    #[test]
    fn test_urgency_thresholds() {
        assert_eq!(Urgency::from_elapsed(0), Urgency::Normal);
        assert_eq!(Urgency::from_elapsed(10), Urgency::Normal);
        assert_eq!(Urgency::from_elapsed(11), Urgency::Warning);
        assert_eq!(Urgency::from_elapsed(20), Urgency::Warning);
        assert_eq!(Urgency::from_elapsed(21), Urgency::Late);
    }

    #[test]
    fn test_kitchen_queue_only_ordered_tables() {
        let now = Utc::now();
        let mut waiting_bill = ordered(3, 40, now);
        waiting_bill.status = TableStatus::Payment;
        let tables = vec![ordered(1, 5, now), ordered(2, 25, now), waiting_bill, Table::new(4, "T4")];

        let queue = kitchen_queue(&tables, now);
        assert_eq!(queue.len(), 2);
        assert_eq!(queue[0].table_id, 2);
        assert_eq!(queue[0].urgency, Urgency::Late);
        assert_eq!(queue[1].urgency, Urgency::Normal);
        assert_eq!(queue[1].elapsed_minutes, 5);
    }

    #[test]
    fn test_floor_summary() {
        let now = Utc::now();
        let mut open = ordered(1, 5, now);
        open.current_order.push(line(59));
        let mut closed = Table::new(2, "T2");
        closed
            .order_history
            .push(PastOrder::archive("hist_1_2", vec![line(100)], now));

        let summary = FloorSummary::from_tables(&[open, closed, Table::new(3, "T3")]);
        assert_eq!(summary.occupied_tables, 1);
        assert_eq!(summary.total_guests, 2);
        assert_eq!(summary.open_revenue, Decimal::from(69));
        assert_eq!(summary.closed_revenue, Decimal::from(100));
        assert_eq!(summary.daily_revenue, Decimal::from(169));
    }

    #[test]
    fn test_guest_total_saturates() {
        let now = Utc::now();
        let mut crowded = ordered(1, 5, now);
        crowded.guests = u32::MAX;
        let summary = FloorSummary::from_tables(&[crowded, ordered(2, 5, now)]);
        assert_eq!(summary.total_guests, u32::MAX);
    }
}
