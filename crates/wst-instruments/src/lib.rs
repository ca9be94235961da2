//! wst-instruments
//!
//! Assessment instrument definitions and scoring. Pure data and pure
//! functions, no I/O. Defines the skill items and sub-scales of the
//! Wheelchair Skills Test, how a range of ratings becomes a percentage,
//! and the flat payload a report template is filled from.

pub mod error;
pub mod instruments;
pub mod payload;
pub mod scoring;

use scoring::{Score, Subscale, ValidationError, compute_score};
use wst_core::models::patient::PatientRecord;
use wst_core::models::rating::{self, RATING_CODES};

/// Trait implemented by each assessment instrument.
pub trait Instrument: Send + Sync {
    /// Unique identifier for this instrument (e.g., "wst").
    fn id(&self) -> &str;

    /// Human-readable name (e.g., "WST 5.4.2").
    fn name(&self) -> &str;

    /// Skill items in scoresheet order.
    fn skills(&self) -> &[String];

    /// Sub-scales scored over the skill list.
    fn subscales(&self) -> &[Subscale];

    /// Codes a rating cell may hold, besides the blank placeholder.
    fn rating_codes(&self) -> &[&'static str] {
        &RATING_CODES
    }

    /// Report every rating cell whose code is not one the instrument offers.
    ///
    /// Scoring never fails on these (they count as 0), so this is the only
    /// place they surface.
    fn validate_ratings(&self, patient: &PatientRecord) -> Vec<ValidationError> {
        patient
            .ratings()
            .iter()
            .enumerate()
            .filter(|(_, code)| {
                !(code.as_str() == rating::UNRATED || self.rating_codes().contains(&code.as_str()))
            })
            .map(|(index, code)| {
                let skill_name = self
                    .skills()
                    .get(index)
                    .cloned()
                    .unwrap_or_else(|| format!("skill {}", index + 1));
                ValidationError {
                    skill_index: index,
                    message: format!(
                        "{}: '{}' is not a valid rating for {} (expected one of {})",
                        self.name(),
                        code,
                        skill_name,
                        self.rating_codes().join(", "),
                    ),
                    skill_name,
                    code: code.clone(),
                }
            })
            .collect()
    }

    /// Score every sub-scale for one patient, in sub-scale order.
    fn score_patient(&self, patient: &PatientRecord) -> Vec<(&Subscale, Score)> {
        self.subscales()
            .iter()
            .map(|s| (s, compute_score(patient.ratings(), s.start, s.end)))
            .collect()
    }
}
