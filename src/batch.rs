use crate::model::{BatchSummary, CleanseError, Config, PatientSummary, RawPatient};
use crate::record::PatientRecord;

pub struct BatchProcessor {
    pub raw: Vec<RawPatient>,
    pub records: Vec<PatientRecord>,
    pub skipped: Vec<(usize, CleanseError)>,
}

impl BatchProcessor {
    pub fn new() -> Self {
        BatchProcessor {
            raw: Vec::new(),
            records: Vec::new(),
            skipped: Vec::new(),
        }
    }

    pub fn process(data: &str, cfg: &Config) -> Result<Self, CleanseError> {
        let mut processor = Self::new();
        processor.parse(data)?;
        processor.validate(cfg);
        Ok(processor)
    }

    pub fn parse(&mut self, data: &str) -> Result<(), CleanseError> {
        match serde_json::from_str::<Vec<RawPatient>>(data) {
            Ok(result) => {
                self.raw = result;
                Ok(())
            }
            Err(err) => Err(CleanseError::Payload(err.to_string())),
        }
    }

    // partition the batch; a failed record is skipped, never fatal
    pub fn validate(&mut self, cfg: &Config) {
        self.records.clear();
        self.skipped.clear();
        for (index, raw) in self.raw.iter().enumerate() {
            match PatientRecord::build(raw, cfg) {
                Ok(record) => self.records.push(record),
                Err(err) => self.skipped.push((index, err)),
            }
        }
    }

    pub fn summarize(&self) -> BatchSummary {
        let mut patients = Vec::new();
        for record in &self.records {
            patients.push(PatientSummary::new(
                record.age(),
                record.is_account_complete(),
                record.service_day_of_week().to_string(),
            ));
        }
        BatchSummary { patients }
    }
}
