use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use chrono::{Datelike, FixedOffset, NaiveDate, NaiveDateTime, Timelike};

// incomplete accounts are denoted with a leading *
pub const INCOMPLETE_MARKER: char = '*';

pub const DEFAULT_TZ_OFFSET: &str = "-05:00";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarDate {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
    pub second: u32,
}

impl CalendarDate {
    pub fn from_naive(value: NaiveDateTime) -> Self {
        CalendarDate {
            year: value.year(),
            month: value.month(),
            day: value.day(),
            hour: value.hour(),
            minute: value.minute(),
            second: value.second(),
        }
    }

    pub fn to_naive(&self) -> Option<NaiveDateTime> {
        NaiveDate::from_ymd_opt(self.year, self.month, self.day)?
            .and_hms_opt(self.hour, self.minute, self.second)
    }
}

impl fmt::Display for CalendarDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04}-{:02}-{:02} {:02}:{:02}:{:02}",
            self.year, self.month, self.day, self.hour, self.minute, self.second
        )
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identifier(String);

impl Identifier {
    pub(crate) fn new(value: String) -> Self {
        Identifier(value)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn has_marker(&self) -> bool {
        self.0.starts_with(INCOMPLETE_MARKER)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RawPatient {
    #[serde(default)]
    pub dob: Value,
    #[serde(rename = "patient-id", default)]
    pub patient_id: Value,
    #[serde(rename = "service-date", default)]
    pub service_date: Value,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PatientSummary {
    pub age: i64,
    #[serde(rename = "isOver21")]
    pub is_over_21: u8,
    #[serde(rename = "isComplete")]
    pub is_complete: bool,
    #[serde(rename = "serviceDayOfWeek")]
    pub service_day_of_week: String,
}

impl PatientSummary {
    pub fn new(age: i64, is_complete: bool, service_day_of_week: String) -> Self {
        PatientSummary {
            age,
            is_over_21: if age >= 21 { 1 } else { 0 },
            is_complete,
            service_day_of_week,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BatchSummary {
    pub patients: Vec<PatientSummary>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum CleanseError {
    #[error("payload is not a patient record array: {0}")]
    Payload(String),
    #[error("no month could be resolved from {0:?}")]
    DateParse(String),
    #[error("patient id must be an optional * followed by digits, got {0:?}")]
    IdentifierFormat(String),
    #[error("failed to parse required data: {0}")]
    Record(Box<CleanseError>),
}

#[derive(Clone, Copy, Debug)]
pub struct Config {
    pub tz_offset: FixedOffset,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            tz_offset: DEFAULT_TZ_OFFSET.parse().unwrap(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        match std::env::var("CLEANSE_TZ_OFFSET") {
            Ok(raw) => match raw.parse::<FixedOffset>() {
                Ok(tz_offset) => Config { tz_offset },
                Err(_) => {
                    log::warn!(
                        "unparseable CLEANSE_TZ_OFFSET {:?}, falling back to {}",
                        raw,
                        DEFAULT_TZ_OFFSET
                    );
                    Config::default()
                }
            },
            Err(_) => Config::default(),
        }
    }
}
