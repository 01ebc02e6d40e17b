//! Date helper functions

use chrono::{DateTime, Datelike, TimeZone, Utc};

/// Human-readable US long date
///
/// # Examples
/// ```ignore
/// date_display(&date) // -> "March 5, 2024"
/// ```
pub fn date_display<Tz: TimeZone>(date: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    date.format("%B %-d, %Y").to_string()
}

/// ISO 8601 in UTC with millisecond precision, e.g. `2024-03-05T00:00:00.000Z`
pub fn date_iso<Tz: TimeZone>(date: &DateTime<Tz>) -> String {
    date.with_timezone(&Utc)
        .format("%Y-%m-%dT%H:%M:%S%.3fZ")
        .to_string()
}

/// RFC 2822 style date in GMT, e.g. `Tue, 05 Mar 2024 00:00:00 GMT`
pub fn date_rfc2822<Tz: TimeZone>(date: &DateTime<Tz>) -> String {
    date.with_timezone(&Utc)
        .format("%a, %d %b %Y %H:%M:%S GMT")
        .to_string()
}

/// RFC 3339 timestamp used by Atom feeds
pub fn date_rfc3339<Tz: TimeZone>(date: &DateTime<Tz>) -> String {
    date.with_timezone(&Utc)
        .format("%Y-%m-%dT%H:%M:%SZ")
        .to_string()
}

/// The current year, for copyright lines
pub fn current_year() -> i32 {
    Utc::now().year()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    #[test]
    fn test_date_display() {
        let date = Utc.with_ymd_and_hms(2024, 3, 5, 0, 0, 0).unwrap();
        assert_eq!(date_display(&date), "March 5, 2024");
        let date = Utc.with_ymd_and_hms(2023, 12, 25, 18, 0, 0).unwrap();
        assert_eq!(date_display(&date), "December 25, 2023");
    }

    #[test]
    fn test_date_iso() {
        let date = Utc.with_ymd_and_hms(2024, 3, 5, 0, 0, 0).unwrap();
        assert_eq!(date_iso(&date), "2024-03-05T00:00:00.000Z");

        let offset = FixedOffset::east_opt(2 * 3600).unwrap();
        let date = offset.with_ymd_and_hms(2024, 3, 5, 1, 30, 0).unwrap();
        assert_eq!(date_iso(&date), "2024-03-04T23:30:00.000Z");
    }

    #[test]
    fn test_date_rfc2822() {
        let date = Utc.with_ymd_and_hms(2024, 3, 5, 0, 0, 0).unwrap();
        assert_eq!(date_rfc2822(&date), "Tue, 05 Mar 2024 00:00:00 GMT");
    }

    #[test]
    fn test_date_rfc3339() {
        let date = Utc.with_ymd_and_hms(2024, 3, 5, 8, 15, 0).unwrap();
        assert_eq!(date_rfc3339(&date), "2024-03-05T08:15:00Z");
    }

    #[test]
    fn test_current_year() {
        assert!(current_year() >= 2024);
    }
}
