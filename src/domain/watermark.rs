//! A single persisted cursor (`sync_state.voice_last_poll`).

use chrono::{DateTime, SecondsFormat, Utc};

/// An ISO-8601 UTC instant with explicit `Z` suffix and second precision,
/// chosen for unambiguous cross-timezone parseability wherever the cursor
/// is read back.
pub fn format_utc(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Parse a watermark string. An unparseable cursor is treated as absent
/// (first run) rather than as an error, so a corrupted or foreign cursor
/// value degrades to "scan everything" instead of blocking the cycle.
pub fn parse_utc(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
}

/// A single named cursor row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Watermark {
    pub key: String,
    pub value: String,
    pub updated_at: DateTime<Utc>,
}

impl Watermark {
    pub fn new(key: impl Into<String>, value: DateTime<Utc>, updated_at: DateTime<Utc>) -> Self {
        Self {
            key: key.into(),
            value: format_utc(value),
            updated_at,
        }
    }

    /// The cursor's value as a parsed instant, or `None` if unparseable.
    pub fn as_instant(&self) -> Option<DateTime<Utc>> {
        parse_utc(&self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn formats_with_second_precision_and_z_suffix() {
        let t = Utc.with_ymd_and_hms(2026, 7, 29, 12, 0, 0).unwrap();
        assert_eq!(format_utc(t), "2026-07-29T12:00:00Z");
    }

    #[test]
    fn round_trips_through_parse() {
        let t = Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).unwrap();
        let formatted = format_utc(t);
        assert_eq!(parse_utc(&formatted), Some(t));
    }

    #[test]
    fn unparseable_cursor_is_none() {
        assert_eq!(parse_utc("not-a-timestamp"), None);
        assert_eq!(parse_utc(""), None);
    }
}
