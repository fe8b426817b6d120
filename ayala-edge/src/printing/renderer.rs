//! Ticket renderers
//!
//! Renders table orders into 80mm right-to-left HTML receipts.

use ayala_printer::{HtmlDocument, HtmlTicketBuilder};
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use rust_decimal::Decimal;
use shared::models::{OrderItem, Table, order_total};

const KITCHEN_HEADER: &str = "הזמנה למטבח";
const KITCHEN_FOOTER: &str = "-- סוף הזמנה --";
const URGENT_LABEL: &str = "דחוף!";
const BILL_TOTAL_LABEL: &str = "סה\"כ לתשלום:";
const BILL_FOOTER: &str = "תודה רבה ולהתראות!";

/// Kitchen ticket renderer
///
/// One entry per line, in cart order, with the urgency badge and the
/// modifier/free-text notes the kitchen needs.
#[derive(Debug, Clone)]
pub struct KitchenTicketRenderer {
    timezone: Tz,
}

impl KitchenTicketRenderer {
    pub fn new(timezone: Tz) -> Self {
        Self { timezone }
    }

    /// Render `lines` (normally the whole current order) for `table`
    pub fn render(
        &self,
        table: &Table,
        lines: &[OrderItem],
        generated_at: DateTime<Utc>,
    ) -> HtmlDocument {
        let mut b = HtmlTicketBuilder::new("Kitchen Order");
        b.header(KITCHEN_HEADER);

        let table_line = format!("שולחן: {}", table.name);
        let guests_line = format!("אורחים: {}", table.guests);
        let date_line = format!("תאריך: {}", format_timestamp(generated_at, self.timezone));
        b.meta(&[&table_line, &guests_line, &date_line]);

        for line in lines {
            b.ticket_item(
                &line.name,
                line.is_urgent.then_some(URGENT_LABEL),
                line.notes.as_deref(),
            );
        }

        b.footer(KITCHEN_FOOTER);
        b.build(&format!("kitchen_{}_{}", table.id, generated_at.timestamp_millis()))
    }
}

impl Default for KitchenTicketRenderer {
    fn default() -> Self {
        Self::new(chrono_tz::Asia::Jerusalem)
    }
}

/// Customer bill renderer
#[derive(Debug, Clone)]
pub struct BillRenderer {
    timezone: Tz,
    title: String,
}

impl BillRenderer {
    pub fn new(timezone: Tz, title: impl Into<String>) -> Self {
        Self {
            timezone,
            title: title.into(),
        }
    }

    /// Render the bill for the table's current order
    pub fn render(&self, table: &Table, generated_at: DateTime<Utc>) -> HtmlDocument {
        let mut b = HtmlTicketBuilder::new("Bill");
        b.header(&self.title);

        let for_table = format!("חשבון לשולחן: {}", table.name);
        let guests = format!("אורחים: {}", table.guests);
        let date = format_timestamp(generated_at, self.timezone);
        b.sub_header(&[&for_table, &guests, &date]);

        for line in &table.current_order {
            b.line_item(&line.name, &format_price(line.price));
        }
        b.total(BILL_TOTAL_LABEL, &format_price(order_total(&table.current_order)));

        b.footer(BILL_FOOTER);
        b.build(&format!("bill_{}_{}", table.id, generated_at.timestamp_millis()))
    }
}

/// Format a timestamp as `dd.mm.yyyy HH:MM:SS` in the given timezone
pub fn format_timestamp(dt: DateTime<Utc>, tz: Tz) -> String {
    dt.with_timezone(&tz).format("%d.%m.%Y %H:%M:%S").to_string()
}

/// Shekel amount without trailing zeros (`₪69`, `₪14.5`)
pub fn format_price(amount: Decimal) -> String {
    format!("₪{}", amount.normalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use shared::models::MenuItem;

    fn at() -> DateTime<Utc> {
        // 2024-01-22 14:32:15 UTC = 16:32:15 in Jerusalem (UTC+2)
        Utc.with_ymd_and_hms(2024, 1, 22, 14, 32, 15).unwrap()
    }

    fn line(name: &str, price: &str, notes: Option<&str>, urgent: bool) -> OrderItem {
        let item = MenuItem::new("x", name, price.parse().unwrap(), "Cat");
        let mut line = OrderItem::from_menu_item(&item, format!("u-{name}"), notes.map(Into::into));
        line.is_urgent = urgent;
        line
    }

    fn table() -> Table {
        let mut table = Table::new(4, "שולחן 4");
        table.guests = 2;
        table.current_order = vec![
            line("סלט יווני", "69", Some("בלי בצל, רוטב בצד"), true),
            line("הפוך", "14.50", None, false),
        ];
        table
    }

    #[test]
    fn test_timestamp_in_local_zone() {
        assert_eq!(format_timestamp(at(), chrono_tz::Asia::Jerusalem), "22.01.2024 16:32:15");
        assert_eq!(format_timestamp(at(), chrono_tz::UTC), "22.01.2024 14:32:15");
    }

    #[test]
    fn test_price_format() {
        assert_eq!(format_price(Decimal::from(69)), "₪69");
        assert_eq!(format_price("14.50".parse().unwrap()), "₪14.5");
    }

    #[test]
    fn test_kitchen_ticket() {
        let table = table();
        let doc = KitchenTicketRenderer::default().render(&table, &table.current_order, at());

        assert_eq!(doc.name, format!("kitchen_4_{}", at().timestamp_millis()));
        assert_eq!(doc.title, "Kitchen Order");
        assert!(doc.html.contains("<div class=\"header\">הזמנה למטבח</div>"));
        assert!(doc.html.contains("<strong>שולחן: שולחן 4</strong>"));
        assert!(doc.html.contains("אורחים: 2"));
        assert!(doc.html.contains("תאריך: 22.01.2024 16:32:15"));
        assert!(doc.html.contains("<span class=\"urgent\">דחוף!</span>"));
        assert!(doc.html.contains("** בלי בצל, רוטב בצד **"));
        assert_eq!(doc.html.matches("class=\"urgent\"").count(), 1);
        assert_eq!(doc.html.matches("class=\"notes\"").count(), 1);
        assert!(doc.html.contains("-- סוף הזמנה --"));

        // Cart order is print order
        let salad = doc.html.find("סלט יווני").unwrap();
        let coffee = doc.html.find("הפוך").unwrap();
        assert!(salad < coffee);
    }

    #[test]
    fn test_bill() {
        let doc = BillRenderer::new(chrono_tz::Asia::Jerusalem, "איילה פשוט טעים").render(&table(), at());

        assert_eq!(doc.title, "Bill");
        assert!(doc.html.contains("<div class=\"header\">איילה פשוט טעים</div>"));
        assert!(doc.html.contains("חשבון לשולחן: שולחן 4<br>אורחים: 2<br>22.01.2024 16:32:15"));
        assert!(doc.html.contains("<span>סלט יווני</span><span>₪69</span>"));
        assert!(doc.html.contains("<span>הפוך</span><span>₪14.5</span>"));
        assert!(doc.html.contains("<span>סה&quot;כ לתשלום:</span><span>₪83.5</span>"));
        assert!(doc.html.contains("תודה רבה ולהתראות!"));
        // Notes and urgency are kitchen-only
        assert!(!doc.html.contains("דחוף!"));
    }
}
