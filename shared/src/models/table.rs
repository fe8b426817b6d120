//! Dining Table Model

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{OrderItem, PastOrder, order_total};

/// 桌台状态
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TableStatus {
    /// No guests, empty order
    #[default]
    Free,
    /// Guests seated, order being built
    Occupied,
    /// Kitchen ticket sent, waiting for food
    Ordered,
    /// Bill requested
    Payment,
}

impl TableStatus {
    pub fn is_free(self) -> bool {
        self == TableStatus::Free
    }
}

impl std::fmt::Display for TableStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TableStatus::Free => write!(f, "FREE"),
            TableStatus::Occupied => write!(f, "OCCUPIED"),
            TableStatus::Ordered => write!(f, "ORDERED"),
            TableStatus::Payment => write!(f, "PAYMENT"),
        }
    }
}

/// Dining table entity (桌台)
///
/// Created once from the fixed floor layout and never destroyed; tables only
/// go back to FREE.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Table {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub status: TableStatus,
    #[serde(default)]
    pub guests: u32,
    /// Insertion order = display and print order
    #[serde(default)]
    pub current_order: Vec<OrderItem>,
    /// Set when the first kitchen ticket goes out; cleared on FREE
    #[serde(
        default,
        with = "crate::util::iso_datetime::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub start_time: Option<DateTime<Utc>>,
    /// Most recent first
    #[serde(default)]
    pub order_history: Vec<PastOrder>,
}

impl Table {
    /// A FREE table from the floor layout
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            status: TableStatus::Free,
            guests: 0,
            current_order: Vec::new(),
            start_time: None,
            order_history: Vec::new(),
        }
    }

    pub fn total(&self) -> Decimal {
        order_total(&self.current_order)
    }

    pub fn line(&self, unique_id: &str) -> Option<&OrderItem> {
        self.current_order.iter().find(|l| l.unique_id == unique_id)
    }

    pub fn line_mut(&mut self, unique_id: &str) -> Option<&mut OrderItem> {
        self.current_order
            .iter_mut()
            .find(|l| l.unique_id == unique_id)
    }

    /// Sum of frozen history totals
    pub fn history_total(&self) -> Decimal {
        self.order_history.iter().map(|o| o.total).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sparse_document_decodes() {
        // The hosted store drops empty arrays and zero-ish optional keys.
        let table: Table = serde_json::from_value(serde_json::json!({
            "id": 3,
            "name": "Table 3",
            "status": "FREE"
        }))
        .unwrap();
        assert_eq!(table, Table::new(3, "Table 3"));
    }

    #[test]
    fn test_start_time_wire_format() {
        let mut table = Table::new(1, "Table 1");
        assert!(serde_json::to_value(&table).unwrap().get("startTime").is_none());

        table.start_time = Some(
            DateTime::parse_from_rfc3339("2024-01-22T14:32:15Z")
                .unwrap()
                .with_timezone(&Utc),
        );
        let v = serde_json::to_value(&table).unwrap();
        assert_eq!(v["startTime"], "2024-01-22T14:32:15.000Z");
        assert_eq!(v["status"], "FREE");
        assert_eq!(v["currentOrder"], serde_json::json!([]));

        let back: Table = serde_json::from_value(v).unwrap();
        assert_eq!(back, table);
    }
}
