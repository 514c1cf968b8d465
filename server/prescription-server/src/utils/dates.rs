//! Lenient birth-date parsing for request bodies.
//!
//! Form clients send `yyyy-MM-dd`; older clients send a full ISO date-time.
//! Both collapse to a calendar date.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{de, Deserialize, Deserializer};

pub fn parse_calendar_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(value).ok().map(|dt| dt.date_naive()))
        .or_else(|| {
            NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
                .ok()
                .map(|dt| dt.date())
        })
}

/// `deserialize_with` adapter for [`parse_calendar_date`].
pub fn deserialize_calendar_date<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_calendar_date(&raw).ok_or_else(|| {
        de::Error::custom(format!("invalid date `{raw}`, expected yyyy-MM-dd"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_plain_dates_and_date_times() {
        let expected = NaiveDate::from_ymd_opt(1992, 3, 14);

        assert_eq!(parse_calendar_date("1992-03-14"), expected);
        assert_eq!(parse_calendar_date("1992-03-14T00:00:00"), expected);
        assert_eq!(parse_calendar_date("1992-03-14T00:00:00.000Z"), expected);
        assert_eq!(parse_calendar_date("1992-03-14T10:30:00+02:00"), expected);
    }

    #[test]
    fn test_rejects_impossible_dates() {
        assert_eq!(parse_calendar_date("1992-02-30"), None);
        assert_eq!(parse_calendar_date("14/03/1992"), None);
        assert_eq!(parse_calendar_date(""), None);
    }
}
