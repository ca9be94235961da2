use serde::{Deserialize, Serialize};

use crate::error::CoreError;

use super::patient::PatientRecord;
use super::rating;

/// Patients scored side by side on one scoresheet.
pub const DEFAULT_PATIENT_COUNT: usize = 5;

/// The in-memory scoresheet. Owns every patient record and is the only
/// place ratings or identifying fields change.
///
/// Indices are 0-based here; front ends translate from whatever numbering
/// they show the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientRoster {
    patients: Vec<PatientRecord>,
}

impl PatientRoster {
    pub fn new(patient_count: usize, skill_count: usize) -> Self {
        Self {
            patients: (0..patient_count)
                .map(|_| PatientRecord::new(skill_count))
                .collect(),
        }
    }

    /// Rebuild a roster from saved records.
    ///
    /// Identifying fields are upper-cased on the way in. Every record must
    /// carry exactly `skill_count` ratings; codes themselves are kept as-is
    /// so that scoring sees what was saved.
    pub fn from_records(
        records: Vec<PatientRecord>,
        skill_count: usize,
    ) -> Result<Self, CoreError> {
        let mut patients = Vec::with_capacity(records.len());
        for (index, mut record) in records.into_iter().enumerate() {
            if record.ratings().len() != skill_count {
                return Err(CoreError::RatingCountMismatch {
                    index,
                    expected: skill_count,
                    actual: record.ratings().len(),
                });
            }
            record.normalize();
            patients.push(record);
        }
        Ok(Self { patients })
    }

    pub fn from_json(json: &str, skill_count: usize) -> Result<Self, CoreError> {
        let roster: PatientRoster = serde_json::from_str(json)?;
        Self::from_records(roster.patients, skill_count)
    }

    pub fn to_json(&self) -> Result<String, CoreError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn patients(&self) -> &[PatientRecord] {
        &self.patients
    }

    pub fn len(&self) -> usize {
        self.patients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patients.is_empty()
    }

    pub fn patient(&self, index: usize) -> Result<&PatientRecord, CoreError> {
        let count = self.patients.len();
        self.patients
            .get(index)
            .ok_or(CoreError::PatientOutOfRange { index, count })
    }

    fn patient_mut(&mut self, index: usize) -> Result<&mut PatientRecord, CoreError> {
        let count = self.patients.len();
        self.patients
            .get_mut(index)
            .ok_or(CoreError::PatientOutOfRange { index, count })
    }

    pub fn set_name(&mut self, index: usize, name: &str) -> Result<(), CoreError> {
        self.patient_mut(index)?.set_name(name);
        Ok(())
    }

    pub fn set_identifier(&mut self, index: usize, identifier: &str) -> Result<(), CoreError> {
        self.patient_mut(index)?.set_identifier(identifier);
        Ok(())
    }

    /// Assign `code` to one skill of one patient. The code must come from
    /// [`rating::RATING_CODES`] or be the unselected placeholder.
    pub fn set_rating(
        &mut self,
        index: usize,
        skill: usize,
        code: &str,
    ) -> Result<(), CoreError> {
        if !rating::is_known(code) {
            return Err(CoreError::InvalidRating(code.to_string()));
        }
        let patient = self.patient_mut(index)?;
        let count = patient.ratings().len();
        let cell = patient
            .rating_mut(skill)
            .ok_or(CoreError::SkillOutOfRange { index: skill, count })?;
        *cell = code.to_string();
        Ok(())
    }

    /// Back to a blank scoresheet of the same shape.
    pub fn reset(&mut self) {
        for patient in &mut self.patients {
            *patient = PatientRecord::new(patient.ratings().len());
        }
    }
}
