use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{require_text, StoreError};
use crate::store::{Entity, Id, Ordering, Repository};

/// Days between vaccinations when planning the next one
const VACCINATION_INTERVAL_DAYS: u64 = 90;

pub const RECORD_DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a health record date typed as `YYYY-MM-DD`
pub fn parse_record_date(text: &str) -> Result<NaiveDate, StoreError> {
    let text = text.trim();
    NaiveDate::parse_from_str(text, RECORD_DATE_FORMAT).map_err(|_| StoreError::InvalidDate {
        value: text.to_string(),
    })
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DogProfile {
    pub name: String,
    pub breed: String,
    pub age: String,
    pub weight: String,
    pub photo: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum ProfileField {
    Name,
    Breed,
    Age,
    Weight,
}

impl DogProfile {
    pub fn field(&self, field: ProfileField) -> &str {
        match field {
            ProfileField::Name => &self.name,
            ProfileField::Breed => &self.breed,
            ProfileField::Age => &self.age,
            ProfileField::Weight => &self.weight,
        }
    }

    fn field_mut(&mut self, field: ProfileField) -> &mut String {
        match field {
            ProfileField::Name => &mut self.name,
            ProfileField::Breed => &mut self.breed,
            ProfileField::Age => &mut self.age,
            ProfileField::Weight => &mut self.weight,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum_macros::Display)]
pub enum HealthKind {
    Vaccination,
    Checkup,
    Medication,
    Grooming,
    Other,
}

impl HealthKind {
    pub const ALL: [HealthKind; 5] = [
        HealthKind::Vaccination,
        HealthKind::Checkup,
        HealthKind::Medication,
        HealthKind::Grooming,
        HealthKind::Other,
    ];

    /// Next kind in the picker, wrapping around
    pub fn next(self) -> HealthKind {
        let idx = Self::ALL.iter().position(|k| *k == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthRecord {
    pub id: Id,
    pub date: NaiveDate,
    pub kind: HealthKind,
    pub notes: String,
}

impl HealthRecord {
    pub fn new(date: NaiveDate, kind: HealthKind, notes: impl Into<String>) -> Self {
        Self {
            id: Id::UNASSIGNED,
            date,
            kind,
            notes: notes.into(),
        }
    }
}

impl Entity for HealthRecord {
    const KIND: &'static str = "health record";

    fn id(&self) -> Id {
        self.id
    }

    fn assign_id(&mut self, id: Id) {
        self.id = id;
    }
}

/// The dog's profile plus its health log, newest entry first
#[derive(Debug, Clone)]
pub struct DiaryBook {
    profile: DogProfile,
    records: Repository<HealthRecord>,
}

impl DiaryBook {
    pub fn new(profile: DogProfile, records: Vec<HealthRecord>) -> Self {
        Self {
            profile,
            records: Repository::seeded(Ordering::NewestFirst, records),
        }
    }

    pub fn profile(&self) -> &DogProfile {
        &self.profile
    }

    pub fn records(&self) -> &[HealthRecord] {
        self.records.list()
    }

    pub fn edit_profile(&mut self, field: ProfileField, value: &str) -> Result<(), StoreError> {
        let value = require_text(value, "profile field")?;
        *self.profile.field_mut(field) = value;
        Ok(())
    }

    pub fn add_health_record(
        &mut self,
        date: NaiveDate,
        kind: HealthKind,
        notes: &str,
    ) -> Result<&HealthRecord, StoreError> {
        let notes = require_text(notes, "notes")?;
        Ok(self.records.create(HealthRecord::new(date, kind, notes)))
    }

    /// Due date of the next vaccination, counted from the latest one on file
    pub fn next_vaccination(&self) -> Option<NaiveDate> {
        self.records
            .iter()
            .filter(|r| r.kind == HealthKind::Vaccination)
            .map(|r| r.date)
            .max()
            .and_then(|last| last.checked_add_days(Days::new(VACCINATION_INTERVAL_DAYS)))
    }
}
