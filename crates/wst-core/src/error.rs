use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("patient {index} is out of range (roster holds {count} patients)")]
    PatientOutOfRange { index: usize, count: usize },

    #[error("skill {index} is out of range (instrument has {count} skills)")]
    SkillOutOfRange { index: usize, count: usize },

    #[error("invalid rating code '{0}'")]
    InvalidRating(String),

    #[error("patient {index} has {actual} ratings, expected {expected}")]
    RatingCountMismatch {
        index: usize,
        expected: usize,
        actual: usize,
    },

    #[error("invalid report kind: {0}")]
    InvalidReportKind(String),
}
