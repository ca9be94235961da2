use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Which report a clinician is producing for a patient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportKind {
    Admission,
    Discharge,
}

impl ReportKind {
    pub const ALL: [ReportKind; 2] = [ReportKind::Admission, ReportKind::Discharge];

    pub fn as_str(&self) -> &'static str {
        match self {
            ReportKind::Admission => "admission",
            ReportKind::Discharge => "discharge",
        }
    }
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReportKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "admission" => Ok(ReportKind::Admission),
            "discharge" => Ok(ReportKind::Discharge),
            other => Err(CoreError::InvalidReportKind(other.to_string())),
        }
    }
}
