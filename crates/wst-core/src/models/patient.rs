use serde::{Deserialize, Serialize};

use super::rating::DEFAULT_RATING;

/// One column of the scoresheet.
///
/// Name and identifier are only ever stored upper-cased; every way of
/// setting them goes through [`PatientRecord::set_name`] and
/// [`PatientRecord::set_identifier`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientRecord {
    name: String,
    /// Medical record number. Also names the generated report file.
    identifier: String,
    /// One code per skill item, in instrument order.
    ratings: Vec<String>,
}

impl PatientRecord {
    /// A blank record with every skill rated [`DEFAULT_RATING`].
    pub fn new(skill_count: usize) -> Self {
        Self {
            name: String::new(),
            identifier: String::new(),
            ratings: vec![DEFAULT_RATING.to_string(); skill_count],
        }
    }

    /// A record with the given fields. Codes are kept exactly as passed.
    pub fn from_parts(name: &str, identifier: &str, ratings: Vec<String>) -> Self {
        let mut record = Self {
            name: String::new(),
            identifier: String::new(),
            ratings,
        };
        record.set_name(name);
        record.set_identifier(identifier);
        record
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn ratings(&self) -> &[String] {
        &self.ratings
    }

    pub fn set_name(&mut self, name: &str) {
        self.name = name.to_uppercase();
    }

    pub fn set_identifier(&mut self, identifier: &str) {
        self.identifier = identifier.to_uppercase();
    }

    pub(crate) fn rating_mut(&mut self, skill: usize) -> Option<&mut String> {
        self.ratings.get_mut(skill)
    }

    /// Re-apply the upper-case rule to fields that arrived through serde.
    pub(crate) fn normalize(&mut self) {
        self.name = self.name.to_uppercase();
        self.identifier = self.identifier.to_uppercase();
    }

    /// Both identifying fields are filled in, so a report can be produced.
    pub fn is_identified(&self) -> bool {
        !self.name.is_empty() && !self.identifier.is_empty()
    }
}
