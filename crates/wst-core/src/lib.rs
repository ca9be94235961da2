//! wst-core
//!
//! Pure domain types for the Wheelchair Skills Test scoresheet: patient
//! records, the roster that owns them, rating codes, and report naming
//! conventions. No I/O; this is the shared vocabulary of the WST crates.

pub mod error;
pub mod file_names;
pub mod models;
