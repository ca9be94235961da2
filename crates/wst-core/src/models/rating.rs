//! Rating codes a clinician can assign to a single skill.
//!
//! Codes are carried as strings end to end so that the report receives
//! exactly what was selected on the scoresheet.

/// Every code offered on the scoresheet, in display order.
pub const RATING_CODES: [&str; 6] = ["0", "1", "2", "3", "NP", "TE"];

/// Not possible (the skill could not be attempted).
pub const NOT_POSSIBLE: &str = "NP";

/// Testing error (the attempt was not evaluated).
pub const TESTING_ERROR: &str = "TE";

/// The unselected placeholder.
pub const UNRATED: &str = "";

/// Every rating starts here when a record is created.
pub const DEFAULT_RATING: &str = "0";

/// Highest value a single skill can score.
pub const MAX_RATING: u32 = 3;

/// True for codes that are left out of scoring entirely.
pub fn is_excluded(code: &str) -> bool {
    matches!(code, NOT_POSSIBLE | TESTING_ERROR | UNRATED)
}

/// True for codes a scoresheet cell may hold: the enumerated set or the
/// unselected placeholder.
pub fn is_known(code: &str) -> bool {
    code == UNRATED || RATING_CODES.contains(&code)
}
