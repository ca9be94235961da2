//! Projection of a patient record into the flat placeholder mapping a
//! report template is filled from.

use serde::ser::{Serialize, SerializeMap, Serializer};

use wst_core::models::patient::PatientRecord;

use crate::instruments::wst::standard_subscales;
use crate::scoring::compute_score;

pub const PATIENT_KEY: &str = "patient";

pub fn skill_key(position: usize) -> String {
    format!("skill_{position}")
}

/// Ordered placeholder → value mapping. Insertion order is kept so the
/// payload reads the same way the scoresheet does.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportPayload {
    entries: Vec<(String, String)>,
}

impl ReportPayload {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `key`, replacing any earlier value in place.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => *existing = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl Serialize for ReportPayload {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

/// Build the template payload for one patient.
///
/// Callers check that the patient is identified first; this function does
/// not. Keys: `patient`, then one per WST sub-scale, then `skill_1` to
/// `skill_N` carrying each rating code exactly as stored.
pub fn build_report_payload(patient: &PatientRecord) -> ReportPayload {
    let mut payload = ReportPayload::new();
    payload.insert(PATIENT_KEY, patient.identifier());

    for subscale in standard_subscales() {
        let score = compute_score(patient.ratings(), subscale.start, subscale.end);
        payload.insert(subscale.payload_key.as_str(), score.to_string());
    }

    for (index, code) in patient.ratings().iter().enumerate() {
        payload.insert(skill_key(index + 1), code.as_str());
    }

    payload
}

/// Every key [`build_report_payload`] emits for a skill list of
/// `skill_count` items, in order.
pub fn payload_keys(skill_count: usize) -> Vec<String> {
    std::iter::once(PATIENT_KEY.to_string())
        .chain(standard_subscales().iter().map(|s| s.payload_key.clone()))
        .chain((1..=skill_count).map(skill_key))
        .collect()
}
