//! Order Model

use chrono::{DateTime, SubsecRound, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::MenuItem;

/// Cart line - value copy of a menu item plus per-line state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    /// Menu item id
    pub id: String,
    pub name: String,
    pub price: Decimal,
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_out_of_stock: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub search_terms: Vec<String>,

    /// Line instance id (unique within the cart, never the menu item id)
    pub unique_id: String,
    /// Kitchen notes: modifier labels plus free text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default)]
    pub is_urgent: bool,
}

impl OrderItem {
    /// Snapshot a menu item into a new, non-urgent cart line.
    ///
    /// Empty notes are stored as absent.
    pub fn from_menu_item(
        item: &MenuItem,
        unique_id: impl Into<String>,
        notes: Option<String>,
    ) -> Self {
        Self {
            id: item.id.clone(),
            name: item.name.clone(),
            price: item.price,
            category: item.category.clone(),
            description: item.description.clone(),
            is_out_of_stock: item.is_out_of_stock,
            search_terms: item.search_terms.clone(),
            unique_id: unique_id.into(),
            notes: notes.filter(|n| !n.trim().is_empty()),
            is_urgent: false,
        }
    }
}

/// Sum of line prices. A pure fold; line order does not matter.
pub fn order_total(lines: &[OrderItem]) -> Decimal {
    lines.iter().map(|line| line.price).sum()
}

/// Archived order - frozen at checkout or shift end, never recomputed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PastOrder {
    pub id: String,
    #[serde(default)]
    pub items: Vec<OrderItem>,
    pub total: Decimal,
    #[serde(with = "crate::util::iso_datetime")]
    pub date: DateTime<Utc>,
}

impl PastOrder {
    /// Freeze a cart snapshot; `total` is captured here and never recomputed.
    ///
    /// `date` is kept at millisecond precision, the precision it travels with.
    pub fn archive(id: impl Into<String>, items: Vec<OrderItem>, date: DateTime<Utc>) -> Self {
        let total = order_total(&items);
        Self {
            id: id.into(),
            items,
            total,
            date: date.trunc_subsecs(3),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn line(price: i64) -> OrderItem {
        let item = MenuItem::new("x", "Item", Decimal::from(price), "Cat");
        OrderItem::from_menu_item(&item, crate::util::instance_id(), None)
    }

    #[test]
    fn test_snapshot_is_independent_of_menu_item() {
        let mut item = MenuItem::new("h1", "Latte", Decimal::from(15), "Hot drinks");
        let ordered = OrderItem::from_menu_item(&item, "line-1", Some("oat milk".into()));
        item.price = Decimal::from(99);
        item.name = "Renamed".into();

        assert_eq!(ordered.price, Decimal::from(15));
        assert_eq!(ordered.name, "Latte");
        assert_eq!(ordered.notes.as_deref(), Some("oat milk"));
        assert!(!ordered.is_urgent);
    }

    #[test]
    fn test_blank_notes_are_dropped() {
        let item = MenuItem::new("h1", "Latte", Decimal::from(15), "Hot drinks");
        let ordered = OrderItem::from_menu_item(&item, "line-1", Some("  ".into()));
        assert!(ordered.notes.is_none());
        let v = serde_json::to_value(&ordered).unwrap();
        assert!(v.get("notes").is_none());
        assert_eq!(v["uniqueId"], "line-1");
        assert_eq!(v["isUrgent"], false);
    }

    #[test]
    fn test_past_order_total_is_frozen() {
        let items = vec![line(69), line(14)];
        let past = PastOrder::archive("hist_1_1", items.clone(), Utc::now());
        assert_eq!(past.total, Decimal::from(83));
        assert_eq!(past.items, items);
    }

    #[test]
    fn test_archive_date_has_wire_precision() {
        let raw = DateTime::parse_from_rfc3339("2024-01-22T14:32:15.123456789Z")
            .unwrap()
            .with_timezone(&Utc);
        let past = PastOrder::archive("hist_1_1", vec![line(5)], raw);
        let v = serde_json::to_value(&past).unwrap();
        assert_eq!(v["date"], "2024-01-22T14:32:15.123Z");
        assert_eq!(serde_json::from_value::<PastOrder>(v).unwrap(), past);
    }

    proptest! {
        #[test]
        fn prop_total_is_order_independent(prices in proptest::collection::vec(0i64..10_000, 0..20)) {
            let lines: Vec<OrderItem> = prices.iter().map(|p| line(*p)).collect();
            let mut reversed = lines.clone();
            reversed.reverse();

            let expected: i64 = prices.iter().sum();
            prop_assert_eq!(order_total(&lines), Decimal::from(expected));
            prop_assert_eq!(order_total(&reversed), order_total(&lines));
        }
    }
}
