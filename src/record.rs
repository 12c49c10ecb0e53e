use serde_json::Value;
use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, Utc};

use crate::date;
use crate::ident;
use crate::model::{CalendarDate, CleanseError, Config, Identifier, RawPatient};

#[derive(Clone, Debug)]
pub struct PatientRecord {
    date_of_birth: CalendarDate,
    service_date: CalendarDate,
    patient_id: Identifier,
    age: i64,
    account_complete: bool,
    service_weekday: String,
}

impl PatientRecord {
    pub fn build(raw: &RawPatient, cfg: &Config) -> Result<Self, CleanseError> {
        Self::build_at(raw, cfg, Utc::now().with_timezone(&cfg.tz_offset))
    }

    // all three inputs must validate or no record exists
    pub fn build_at(
        raw: &RawPatient,
        cfg: &Config,
        now: DateTime<FixedOffset>,
    ) -> Result<Self, CleanseError> {
        let date_of_birth = date::normalize(&raw.dob).map_err(reject)?;
        let service_date = date::normalize(&raw.service_date).map_err(reject)?;
        let id_text = match &raw.patient_id {
            Value::String(s) => s.clone(),
            Value::Number(n) => n.to_string(),
            _ => String::new(),
        };
        let patient_id = ident::validate(&id_text).map_err(reject)?;

        let account_complete = !patient_id.has_marker();
        let age = age_years(&date_of_birth, now.date_naive());
        let service_weekday = weekday_name(&service_date, cfg).map_err(reject)?;

        Ok(PatientRecord {
            date_of_birth,
            service_date,
            patient_id,
            age,
            account_complete,
            service_weekday,
        })
    }

    pub fn age(&self) -> i64 {
        self.age
    }

    pub fn is_account_complete(&self) -> bool {
        self.account_complete
    }

    pub fn service_day_of_week(&self) -> &str {
        &self.service_weekday
    }

    pub fn date_of_birth(&self) -> &CalendarDate {
        &self.date_of_birth
    }

    pub fn service_date(&self) -> &CalendarDate {
        &self.service_date
    }

    pub fn patient_id(&self) -> &Identifier {
        &self.patient_id
    }
}

fn reject(cause: CleanseError) -> CleanseError {
    CleanseError::Record(Box::new(cause))
}

pub fn gregorian_jdn(month: i64, day: i64, year: i64) -> i64 {
    let a = (14 - month) / 12;
    let y = year + 4800 - a;
    let m = month + 12 * a - 3;
    day + (153 * m + 2) / 5 + 365 * y + y / 4 - y / 100 + y / 400 - 32045
}

// truncated day count over 365, not a calendar age
pub fn age_years(date_of_birth: &CalendarDate, today: NaiveDate) -> i64 {
    let birth = gregorian_jdn(
        i64::from(date_of_birth.month),
        i64::from(date_of_birth.day),
        i64::from(date_of_birth.year),
    );
    let current = gregorian_jdn(
        i64::from(today.month()),
        i64::from(today.day()),
        i64::from(today.year()),
    );
    (current - birth) / 365
}

fn weekday_name(service: &CalendarDate, cfg: &Config) -> Result<String, CleanseError> {
    let wall_clock = service
        .to_naive()
        .and_then(|naive| naive.and_local_timezone(cfg.tz_offset).single())
        .ok_or_else(|| CleanseError::DateParse(service.to_string()))?;
    Ok(wall_clock.format("%A").to_string())
}
