use chrono::{DateTime, Duration, NaiveDateTime, TimeZone, Utc};

/// Grammar of the display time carried by official bulletins.
pub const DISPLAY_TIME_FORMAT: &str = "%H:%M %d/%m/%Y";

/// An official timestamped bulletin scraped from a health-authority page.
///
/// `display_time` keeps the original local-time string and is rendered
/// verbatim; `timestamp` is the absolute instant it denotes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Announcement {
    pub timestamp: DateTime<Utc>,
    pub display_time: String,
    pub content: String,
}

impl Announcement {
    pub fn new(display_time: String, content: String, utc_offset_hours: i64) -> Option<Self> {
        let timestamp = parse_display_time(&display_time, utc_offset_hours)?;
        Some(Self { timestamp, display_time, content })
    }

    /// A bulletin counts as usable state only when all three fields carry
    /// real values. Legacy persisted records may lack everything but the
    /// timestamp.
    pub fn is_populated(&self) -> bool {
        self.timestamp.timestamp_millis() > 0
            && !self.display_time.is_empty()
            && !self.content.is_empty()
    }
}

/// Converts a `"HH:MM DD/MM/YYYY"` stamp, stated in a fixed-offset local
/// zone, into the UTC instant it denotes: the naive fields are taken as the
/// local wall clock and shifted back by the offset.
pub fn parse_display_time(display: &str, utc_offset_hours: i64) -> Option<DateTime<Utc>> {
    let naive = NaiveDateTime::parse_from_str(display.trim(), DISPLAY_TIME_FORMAT).ok()?;
    let instant = Utc.from_utc_datetime(&naive) - Duration::hours(utc_offset_hours);
    Some(instant)
}

#[cfg(test)]
mod test {
    use chrono::{TimeZone, Utc};
    use super::{parse_display_time, Announcement};

    #[test]
    fn display_time_is_shifted_to_utc() {
        let instant = parse_display_time("18:00 01/03/2020", 7).unwrap();
        assert_eq!(instant, Utc.with_ymd_and_hms(2020, 3, 1, 11, 0, 0).unwrap());
    }

    #[test]
    fn single_digit_day_and_month() {
        let instant = parse_display_time("6:00 2/4/2020", 7).unwrap();
        assert_eq!(instant, Utc.with_ymd_and_hms(2020, 4, 1, 23, 0, 0).unwrap());
    }

    #[test]
    fn garbage_yields_none() {
        assert!(parse_display_time("yesterday evening", 7).is_none());
        assert!(parse_display_time("", 7).is_none());
        assert!(parse_display_time("25:99 40/13/2020", 7).is_none());
    }

    #[test]
    fn populated_requires_all_fields() {
        let full = Announcement::new("18:00 01/03/2020".to_string(), "6 ca mới".to_string(), 7).unwrap();
        assert!(full.is_populated());

        let no_content = Announcement::new("18:00 01/03/2020".to_string(), String::new(), 7).unwrap();
        assert!(!no_content.is_populated());
    }
}
