use std::fmt;

use serde::{Deserialize, Serialize, Serializer};
use thiserror::Error;

use wst_core::models::rating::{self, MAX_RATING};

/// Shown in place of a percentage when no rating in range can be scored.
pub const NOT_DETERMINED: &str = "N/D";

/// A sub-scale: a named prefix of the skill list scored as one percentage.
///
/// `start..end` is half-open over skill indices. The WST sub-scales all
/// start at 0, so each one includes the skills of the narrower ones.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subscale {
    pub id: String,
    pub name: String,
    /// Placeholder the score fills in a report template.
    pub payload_key: String,
    pub start: usize,
    pub end: usize,
    pub description: Option<String>,
}

/// The result of scoring a range of ratings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Score {
    /// Share of the maximum attainable points, 0–100.
    Percent(f64),
    /// Every rating in range was excluded.
    NotDetermined,
}

impl Score {
    pub fn percent(&self) -> Option<f64> {
        match self {
            Score::Percent(value) => Some(*value),
            Score::NotDetermined => None,
        }
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // Round half away from zero at the second decimal, then print
            // exactly two digits.
            Score::Percent(value) => write!(f, "{:.2}", (value * 100.0).round() / 100.0),
            Score::NotDetermined => f.write_str(NOT_DETERMINED),
        }
    }
}

impl Serialize for Score {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Score the ratings in `start..end`.
///
/// `NP`, `TE` and blank cells are dropped. Each remaining code is worth its
/// integer value out of [`MAX_RATING`]; codes that do not parse count as 0.
/// `end` is clamped to the number of ratings, so a sub-scale wider than a
/// shortened skill list scores whatever is there.
pub fn compute_score<S: AsRef<str>>(ratings: &[S], start: usize, end: usize) -> Score {
    let end = end.min(ratings.len());
    let Some(range) = ratings.get(start..end) else {
        return Score::NotDetermined;
    };

    let valid: Vec<&str> = range
        .iter()
        .map(AsRef::as_ref)
        .filter(|code| !rating::is_excluded(code))
        .collect();

    if valid.is_empty() {
        return Score::NotDetermined;
    }

    let total = valid
        .iter()
        .map(|code| code.trim().parse::<u64>().unwrap_or(0))
        .fold(0u64, u64::saturating_add);
    let possible = valid.len() as f64 * f64::from(MAX_RATING);

    Score::Percent(total as f64 / possible * 100.0)
}

/// A rating cell holding a code outside the enumerated set.
#[derive(Debug, Clone, Serialize, Deserialize, Error)]
#[error("{message}")]
pub struct ValidationError {
    /// 0-based skill index.
    pub skill_index: usize,
    pub skill_name: String,
    pub code: String,
    pub message: String,
}
