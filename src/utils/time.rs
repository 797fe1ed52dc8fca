use std::fmt::Display;

use anyhow::{Context, Result};
use chrono::{DateTime, Local, NaiveDate, NaiveTime};
use clap::ValueEnum;
use chrono_english::parse_date_string;

const RECORD_EXTENSION: &str = ".json";
const DATE_FORMAT: &str = "%Y-%m-%d";

/// This is the standard way of converting a date to a record file name in daytally.
pub fn date_to_record_name(date: NaiveDate) -> String {
    format!("{}{RECORD_EXTENSION}", date.format(DATE_FORMAT))
}

/// Reverse of [date_to_record_name]. Anything that isn't `YYYY-MM-DD.json` gives [None].
pub fn record_name_to_date(name: &str) -> Option<NaiveDate> {
    let stem = name.strip_suffix(RECORD_EXTENSION)?;
    let date = NaiveDate::parse_from_str(stem, DATE_FORMAT).ok()?;
    // chrono accepts unpadded fields, but only the canonical name is ever loaded for a date
    (date_to_record_name(date) == name).then_some(date)
}

/// Parses `HH:MM`.
pub fn parse_clock_time(value: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(value.trim(), "%H:%M")
        .with_context(|| format!("Expected time in HH:MM format, got {value:?}"))
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum DateStyle {
    Uk,
    Us,
}

impl From<DateStyle> for chrono_english::Dialect {
    fn from(value: DateStyle) -> Self {
        match value {
            DateStyle::Uk => Self::Uk,
            DateStyle::Us => Self::Us,
        }
    }
}

impl Display for DateStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DateStyle::Uk => write!(f, "uk"),
            DateStyle::Us => write!(f, "us"),
        }
    }
}

/// Parses a day given by the user. ISO dates are tried first, then phrases like "yesterday" or
/// "15/03/2025".
pub fn parse_day(value: &str, now: DateTime<Local>, style: DateStyle) -> Result<NaiveDate> {
    let value = value.trim();
    if let Ok(date) = NaiveDate::parse_from_str(value, DATE_FORMAT) {
        return Ok(date);
    }
    let parsed = parse_date_string(value, now, style.into())
        .with_context(|| format!("Failed to parse date {value:?}"))?;
    Ok(parsed.date_naive())
}

#[cfg(test)]
mod tests {
    use chrono::{Local, NaiveDate, NaiveTime, TimeZone};

    use super::*;

    #[test]
    fn test_record_name_round_trip() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 4).unwrap();
        assert_eq!(date_to_record_name(date), "2025-03-04.json");
        assert_eq!(record_name_to_date("2025-03-04.json"), Some(date));
    }

    #[test]
    fn test_record_name_rejects_other_files() {
        assert_eq!(record_name_to_date("2025-03-04.txt"), None);
        assert_eq!(record_name_to_date("notes.json"), None);
        assert_eq!(record_name_to_date("2025-13-40.json"), None);
        assert_eq!(record_name_to_date(".json"), None);
    }

    #[test]
    fn test_record_name_must_be_zero_padded() {
        assert_eq!(record_name_to_date("2025-3-4.json"), None);
        assert_eq!(record_name_to_date("2025-03-4.json"), None);
        assert_eq!(record_name_to_date("+2025-03-04.json"), None);
    }

    #[test]
    fn test_parse_clock_time() {
        assert_eq!(
            parse_clock_time("06:30").unwrap(),
            NaiveTime::from_hms_opt(6, 30, 0).unwrap()
        );
        assert!(parse_clock_time("6.30").is_err());
    }

    #[test]
    fn test_parse_day() {
        let now = Local.with_ymd_and_hms(2025, 3, 16, 12, 0, 0).unwrap();
        assert_eq!(
            parse_day("2025-03-01", now, DateStyle::Uk).unwrap(),
            NaiveDate::from_ymd_opt(2025, 3, 1).unwrap()
        );
        assert_eq!(
            parse_day("yesterday", now, DateStyle::Uk).unwrap(),
            NaiveDate::from_ymd_opt(2025, 3, 15).unwrap()
        );
        assert_eq!(
            parse_day("02/03/2025", now, DateStyle::Uk).unwrap(),
            NaiveDate::from_ymd_opt(2025, 3, 2).unwrap()
        );
        assert_eq!(
            parse_day("02/03/2025", now, DateStyle::Us).unwrap(),
            NaiveDate::from_ymd_opt(2025, 2, 3).unwrap()
        );
    }
}
