use serde_json::Value;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use crate::model::{CalendarDate, CleanseError};

// day serial 25569 in the spreadsheet epoch (1899-12-30) is 1970-01-01
const SERIAL_UNIX_EPOCH: f64 = 25569.0;
const SECONDS_PER_DAY: f64 = 86400.0;

const DATETIME_FORMATS: [&str; 3] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%m/%d/%Y %H:%M:%S",
];

const DATE_FORMATS: [&str; 8] = [
    "%Y-%m-%d",
    "%d-%m-%Y",
    "%m/%d/%Y",
    "%d/%m/%Y",
    "%d.%m.%Y",
    "%Y%m%d",
    "%d %b %Y",
    "%d %B %Y",
];

pub fn normalize(raw: &Value) -> Result<CalendarDate, CleanseError> {
    let text = match raw {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        other => return Err(CleanseError::DateParse(other.to_string())),
    };

    if let Some(date) = parse_conventional(&text) {
        return Ok(date);
    }

    let serial = match raw.as_f64() {
        Some(value) => value,
        None => text
            .trim()
            .parse::<f64>()
            .map_err(|_| CleanseError::DateParse(text.clone()))?,
    };

    from_serial(serial).ok_or(CleanseError::DateParse(text))
}

pub fn parse_conventional(text: &str) -> Option<CalendarDate> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(parsed) = DateTime::parse_from_rfc2822(trimmed) {
        return Some(CalendarDate::from_naive(parsed.naive_local()));
    }

    if let Ok(parsed) = iso8601::datetime(trimmed) {
        if let Some(date) = from_iso_datetime(&parsed) {
            return Some(date);
        }
    }

    for format in DATETIME_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Some(CalendarDate::from_naive(parsed));
        }
    }

    if let Ok(parsed) = iso8601::date(trimmed) {
        if let Some(date) = from_iso_date(&parsed) {
            return Some(CalendarDate::from_naive(date));
        }
    }

    for format in DATE_FORMATS {
        if let Ok(parsed) = NaiveDate::parse_from_str(trimmed, format) {
            return Some(CalendarDate::from_naive(parsed.and_hms_opt(0, 0, 0)?));
        }
    }

    None
}

// only calendar dates resolve a month; week and ordinal forms fall through
fn from_iso_date(date: &iso8601::Date) -> Option<NaiveDateTime> {
    match *date {
        iso8601::Date::YMD { year, month, day } => {
            NaiveDate::from_ymd_opt(year, month, day)?.and_hms_opt(0, 0, 0)
        }
        _ => None,
    }
}

fn from_iso_datetime(datetime: &iso8601::DateTime) -> Option<CalendarDate> {
    let date = match datetime.date {
        iso8601::Date::YMD { year, month, day } => NaiveDate::from_ymd_opt(year, month, day)?,
        _ => return None,
    };
    let full = date.and_hms_opt(
        datetime.time.hour,
        datetime.time.minute,
        datetime.time.second,
    )?;
    Some(CalendarDate::from_naive(full))
}

// serial conversion is UTC only
pub fn from_serial(serial: f64) -> Option<CalendarDate> {
    if !serial.is_finite() || serial < 0.0 {
        return None;
    }
    let unix_seconds = ((serial - SERIAL_UNIX_EPOCH) * SECONDS_PER_DAY).trunc();
    let converted = DateTime::<Utc>::from_timestamp(unix_seconds as i64, 0)?;
    parse_conventional(&converted.to_rfc2822())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn conventional_iso_date() {
        let date = normalize(&json!("2017-06-28")).unwrap();
        assert_eq!((date.year, date.month, date.day), (2017, 6, 28));
        assert_eq!((date.hour, date.minute, date.second), (0, 0, 0));
    }

    #[test]
    fn conventional_datetime_keeps_time() {
        let date = normalize(&json!("2017-06-28 14:30:09")).unwrap();
        assert_eq!((date.year, date.month, date.day), (2017, 6, 28));
        assert_eq!((date.hour, date.minute, date.second), (14, 30, 9));
    }

    #[test]
    fn conventional_compact_and_us_formats() {
        let compact = normalize(&json!("20170628")).unwrap();
        assert_eq!((compact.year, compact.month, compact.day), (2017, 6, 28));
        let us = normalize(&json!("06/28/2017")).unwrap();
        assert_eq!((us.year, us.month, us.day), (2017, 6, 28));
        let text_month = normalize(&json!("28 Jun 2017")).unwrap();
        assert_eq!((text_month.year, text_month.month, text_month.day), (2017, 6, 28));
    }

    #[test]
    fn conventional_rfc2822_uses_literal_components() {
        let date = normalize(&json!("Wed, 28 Jun 2017 14:30:00 +0000")).unwrap();
        assert_eq!((date.year, date.month, date.day), (2017, 6, 28));
        assert_eq!(date.hour, 14);
    }

    #[test]
    fn eight_digit_number_is_a_date_not_a_serial() {
        let date = normalize(&json!(20170628)).unwrap();
        assert_eq!((date.year, date.month, date.day), (2017, 6, 28));
    }

    #[test]
    fn serial_number_unix_epoch() {
        let date = normalize(&json!(25569)).unwrap();
        assert_eq!((date.year, date.month, date.day), (1970, 1, 1));
    }

    #[test]
    fn serial_zero_is_spreadsheet_epoch() {
        let date = normalize(&json!(0)).unwrap();
        assert_eq!((date.year, date.month, date.day), (1899, 12, 30));
    }

    #[test]
    fn serial_number_and_string_agree() {
        let from_number = normalize(&json!(42736)).unwrap();
        let from_string = normalize(&json!("42736")).unwrap();
        assert_eq!(from_number, from_string);
        assert_eq!((from_number.year, from_number.month, from_number.day), (2017, 1, 1));
    }

    #[test]
    fn fractional_serial_keeps_day() {
        let date = normalize(&json!(42736.5)).unwrap();
        assert_eq!((date.year, date.month, date.day), (2017, 1, 1));
        assert_eq!(date.hour, 12);
    }

    #[test]
    fn serial_matches_rendered_instant() {
        for serial in [0.0_f64, 25569.0, 42736.0, 44197.25] {
            let unix_seconds = ((serial - SERIAL_UNIX_EPOCH) * SECONDS_PER_DAY).trunc() as i64;
            let rendered = DateTime::<Utc>::from_timestamp(unix_seconds, 0)
                .unwrap()
                .to_rfc2822();
            assert_eq!(
                normalize(&json!(serial)).unwrap(),
                normalize(&json!(rendered)).unwrap(),
                "serial {} disagrees with its rendering",
                serial
            );
        }
    }

    #[test]
    fn serial_conversion_is_isolated_and_clean() {
        let date = from_serial(25569.0).unwrap();
        assert_eq!((date.year, date.month, date.day, date.hour), (1970, 1, 1, 0));
        assert_eq!(from_serial(f64::NAN), None);
        assert_eq!(from_serial(-0.5), None);
    }

    #[test]
    fn rendered_calendar_date_reparses_on_primary_path() {
        let date = normalize(&json!(42736)).unwrap();
        let rendered = date.to_string();
        assert_eq!(parse_conventional(&rendered), Some(date));
        assert_eq!(normalize(&json!(rendered)).unwrap(), date);
    }

    #[test]
    fn garbage_fails_cleanly() {
        for bad in ["", "   ", "not a date", "12a45", "2004-W28-3", "2020-06-31"] {
            assert!(normalize(&json!(bad)).is_err(), "accepted {:?}", bad);
        }
        assert!(normalize(&json!(-1)).is_err());
        assert!(normalize(&json!(1e15)).is_err());
        assert!(normalize(&json!(null)).is_err());
        assert!(normalize(&json!(true)).is_err());
        assert!(normalize(&json!([1, 2])).is_err());
    }
}
