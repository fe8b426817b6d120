//! HTML receipt builder
//!
//! Produces a self-contained document (inline stylesheet, no external
//! resources) laid out right-to-left for 80mm receipt paper.

/// Receipt stylesheet (80mm, RTL, monospace)
const STYLES: &str = concat!(
    "body { font-family: \"Courier New\", monospace; direction: rtl; padding: 10px; text-align: right; width: 80mm; margin: 0; }\n",
    ".header { text-align: center; font-weight: bold; font-size: 24px; border-bottom: 2px solid #000; padding-bottom: 5px; margin-bottom: 10px; }\n",
    ".meta { margin-bottom: 15px; font-size: 16px; border-bottom: 1px dashed #000; padding-bottom: 5px; }\n",
    ".item { display: flex; justify-content: space-between; margin-bottom: 8px; font-size: 18px; font-weight: bold; align-items: flex-start; }\n",
    ".notes { font-size: 16px; margin-top: 2px; font-weight: normal; font-style: italic; }\n",
    ".urgent { color: white; background: black; padding: 2px 6px; border-radius: 4px; font-size: 14px; margin-left: 5px; -webkit-print-color-adjust: exact; print-color-adjust: exact; }\n",
    ".footer { margin-top: 20px; border-top: 2px solid #000; padding-top: 10px; text-align: center; font-size: 16px; }\n",
    ".sub-header { text-align: center; font-size: 16px; margin-bottom: 15px; border-bottom: 1px solid #000; padding-bottom: 10px; }\n",
    ".total { display: flex; justify-content: space-between; margin-top: 15px; border-top: 2px solid #000; padding-top: 10px; font-size: 20px; font-weight: bold; }\n",
    "@media print { body { margin: 0; } @page { margin: 0; } }\n",
);

/// Finished printable document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HtmlDocument {
    /// File-safe name used by spooling printers
    pub name: String,
    /// Window / job title
    pub title: String,
    /// Complete `<html>` text
    pub html: String,
}

impl HtmlDocument {
    pub fn as_bytes(&self) -> &[u8] {
        self.html.as_bytes()
    }
}

/// Escape text for HTML element content and attribute values
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Receipt document builder
///
/// All text arguments are escaped; callers pass plain strings.
pub struct HtmlTicketBuilder {
    title: String,
    body: String,
}

impl HtmlTicketBuilder {
    pub fn new(title: &str) -> Self {
        Self {
            title: title.to_string(),
            body: String::with_capacity(2048),
        }
    }

    /// Large centered heading
    pub fn header(&mut self, text: &str) -> &mut Self {
        self.push_div("header", &escape_html(text));
        self
    }

    /// Centered block under the header, one entry per line
    pub fn sub_header(&mut self, lines: &[&str]) -> &mut Self {
        self.push_div("sub-header", &join_lines(lines));
        self
    }

    /// Metadata block: bold first line, then plain lines
    pub fn meta(&mut self, lines: &[&str]) -> &mut Self {
        let mut content = String::new();
        if let Some((first, rest)) = lines.split_first() {
            content.push_str("<strong>");
            content.push_str(&escape_html(first));
            content.push_str("</strong>");
            if !rest.is_empty() {
                content.push_str("<br>");
                content.push_str(&join_lines(rest));
            }
        }
        self.push_div("meta", &content);
        self
    }

    /// Kitchen line: name, optional urgency badge, optional notes
    pub fn ticket_item(&mut self, name: &str, urgent: Option<&str>, notes: Option<&str>) -> &mut Self {
        self.body.push_str("<div>");
        let mut row = format!("<span>{}</span>", escape_html(name));
        if let Some(label) = urgent {
            row.push_str(&format!("<span class=\"urgent\">{}</span>", escape_html(label)));
        }
        self.push_div("item", &row);
        if let Some(notes) = notes.filter(|n| !n.trim().is_empty()) {
            self.push_div("notes", &format!("** {} **", escape_html(notes)));
        }
        self.body.push_str("</div><br>");
        self
    }

    /// Priced line: name on one side, amount on the other
    pub fn line_item(&mut self, name: &str, amount: &str) -> &mut Self {
        let row = format!(
            "<span>{}</span><span>{}</span>",
            escape_html(name),
            escape_html(amount)
        );
        self.push_div("item", &row);
        self
    }

    /// Emphasized total row
    pub fn total(&mut self, label: &str, amount: &str) -> &mut Self {
        let row = format!(
            "<span>{}</span><span>{}</span>",
            escape_html(label),
            escape_html(amount)
        );
        self.push_div("total", &row);
        self
    }

    pub fn footer(&mut self, text: &str) -> &mut Self {
        self.push_div("footer", &escape_html(text));
        self
    }

    /// Finish the document
    pub fn build(&self, name: &str) -> HtmlDocument {
        let html = format!(
            "<html><head><meta charset=\"utf-8\"><title>{}</title><style>{}</style></head><body>{}</body></html>",
            escape_html(&self.title),
            STYLES,
            self.body
        );
        HtmlDocument {
            name: sanitize_name(name),
            title: self.title.clone(),
            html,
        }
    }

    fn push_div(&mut self, class: &str, inner: &str) {
        self.body.push_str("<div class=\"");
        self.body.push_str(class);
        self.body.push_str("\">");
        self.body.push_str(inner);
        self.body.push_str("</div>");
    }
}

fn join_lines(lines: &[&str]) -> String {
    lines
        .iter()
        .map(|l| escape_html(l))
        .collect::<Vec<_>>()
        .join("<br>")
}

/// Keep spool file names to `[A-Za-z0-9_-]`
fn sanitize_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();
    if cleaned.is_empty() {
        "document".to_string()
    } else {
        cleaned
    }
}
