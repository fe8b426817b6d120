//! Document codec between typed state and the remote JSON tree
//!
//! The remote only stores JSON, so timestamps travel as ISO-8601 strings.
//! Other writers (browsers) may use slightly different shapes
//! (`+00:00` offsets, no milliseconds), so every string that looks like a
//! timestamp is canonicalized before it reaches serde.

use std::sync::LazyLock;

use chrono::{DateTime, NaiveDateTime, Utc};
use regex::Regex;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::SyncResult;

/// Prefix that marks a string as a timestamp (`YYYY-MM-DDTHH:MM:SS`).
static ISO_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}").expect("timestamp pattern is valid")
});

/// Encode a value for a remote write.
///
/// Absent optionals are already dropped by the models' serde attributes;
/// explicit `null`s pass through unchanged.
pub fn sanitize<T: Serialize + ?Sized>(value: &T) -> SyncResult<Value> {
    let mut doc = serde_json::to_value(value)?;
    normalize_timestamps(&mut doc);
    Ok(doc)
}

/// Decode a remote document into typed state, reviving timestamps.
pub fn revive<T: DeserializeOwned>(mut doc: Value) -> SyncResult<T> {
    normalize_timestamps(&mut doc);
    Ok(serde_json::from_value(doc)?)
}

/// Walk the tree and rewrite every timestamp-looking string into the
/// canonical wire form. Returns the number of strings rewritten.
///
/// Strings that match the prefix but do not parse are left untouched.
pub fn normalize_timestamps(doc: &mut Value) -> usize {
    match doc {
        Value::String(s) => match canonical_timestamp(s) {
            Some(canonical) if canonical != *s => {
                *s = canonical;
                1
            }
            _ => 0,
        },
        Value::Array(items) => items.iter_mut().map(normalize_timestamps).sum(),
        Value::Object(map) => map.values_mut().map(normalize_timestamps).sum(),
        _ => 0,
    }
}

fn canonical_timestamp(raw: &str) -> Option<String> {
    if !ISO_PREFIX.is_match(raw) {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(shared::util::format_iso(&dt.with_timezone(&Utc)));
    }
    // Offset-less timestamps are taken as UTC
    let naive = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f").ok()?;
    Some(shared::util::format_iso(&naive.and_utc()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct Stamped {
        label: String,
        #[serde(with = "shared::util::iso_datetime")]
        created_at: DateTime<Utc>,
    }

    #[test]
    fn test_offset_forms_are_canonicalized() {
        let mut doc = json!({
            "a": "2024-01-22T16:32:15+02:00",
            "b": ["2024-01-22T14:32:15Z", "2024-01-22T14:32:15.000Z"],
            "c": "2024-01-22T14:32:15.5"
        });
        let rewritten = normalize_timestamps(&mut doc);

        assert_eq!(rewritten, 3);
        assert_eq!(doc["a"], "2024-01-22T14:32:15.000Z");
        assert_eq!(doc["b"][0], "2024-01-22T14:32:15.000Z");
        assert_eq!(doc["b"][1], "2024-01-22T14:32:15.000Z");
        assert_eq!(doc["c"], "2024-01-22T14:32:15.500Z");
    }

    #[test]
    fn test_non_timestamps_untouched() {
        let mut doc = json!({
            "name": "שולחן 1",
            "almost": "2024-01-22 14:32:15",
            "broken": "2024-13-45T99:99:99Z",
            "n": 5,
            "flag": null
        });
        let before = doc.clone();
        assert_eq!(normalize_timestamps(&mut doc), 0);
        assert_eq!(doc, before);
    }

    #[test]
    fn test_revive_accepts_browser_written_dates() {
        let doc = json!({ "label": "x", "createdAt": "2024-01-22T16:32:15+02:00" });
        let value: Stamped = revive(doc).unwrap();
        assert_eq!(shared::util::format_iso(&value.created_at), "2024-01-22T14:32:15.000Z");
    }

    #[test]
    fn test_sanitize_then_revive_preserves_value() {
        let value = Stamped {
            label: "x".into(),
            created_at: DateTime::parse_from_rfc3339("2024-01-22T14:32:15.250Z")
                .unwrap()
                .with_timezone(&Utc),
        };
        let doc = sanitize(&value).unwrap();
        assert_eq!(doc["createdAt"], "2024-01-22T14:32:15.250Z");
        assert_eq!(revive::<Stamped>(doc).unwrap(), value);
    }
}
