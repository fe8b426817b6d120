use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};

/// 获取当前 UTC 时间戳（毫秒）
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Current time at wire precision (milliseconds).
///
/// Every timestamp stored in a synchronized document comes from here, so a
/// value equals itself after a trip through the remote.
pub fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}

/// Fresh cart-line instance id.
///
/// Distinct from the menu item id so the same dish can sit in one order
/// several times as separate lines.
pub fn instance_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

/// Wire form of a timestamp: ISO-8601, millisecond precision, `Z` suffix.
///
/// Matches what browser clients write into the same documents
/// (`2024-01-22T14:32:15.000Z`).
pub fn format_iso(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Serde adapter for `DateTime<Utc>` using [`format_iso`].
pub mod iso_datetime {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    pub fn serialize<S: Serializer>(dt: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&super::format_iso(dt))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(d)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(D::Error::custom)
    }

    /// Same adapter for optional fields (pair with `skip_serializing_if`).
    pub mod option {
        use chrono::{DateTime, Utc};
        use serde::{Deserialize, Deserializer, Serializer, de::Error};

        pub fn serialize<S: Serializer>(
            dt: &Option<DateTime<Utc>>,
            s: S,
        ) -> Result<S::Ok, S::Error> {
            match dt {
                Some(dt) => s.serialize_str(&super::super::format_iso(dt)),
                None => s.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            d: D,
        ) -> Result<Option<DateTime<Utc>>, D::Error> {
            let raw: Option<String> = Option::deserialize(d)?;
            raw.map(|s| {
                DateTime::parse_from_rfc3339(&s)
                    .map(|dt| dt.with_timezone(&Utc))
                    .map_err(D::Error::custom)
            })
            .transpose()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_format_iso_matches_browser_shape() {
        let dt = Utc.with_ymd_and_hms(2024, 1, 22, 14, 32, 15).unwrap();
        assert_eq!(format_iso(&dt), "2024-01-22T14:32:15.000Z");
    }

    #[test]
    fn test_now_survives_wire_format() {
        let at = now();
        assert_eq!(at.timestamp_subsec_nanos() % 1_000_000, 0);
        let parsed = DateTime::parse_from_rfc3339(&format_iso(&at))
            .unwrap()
            .with_timezone(&Utc);
        assert_eq!(parsed, at);
    }

    #[test]
    fn test_instance_ids_are_unique() {
        let a = instance_id();
        let b = instance_id();
        assert_ne!(a, b);
        assert_eq!(a.len(), 32);
    }
}
