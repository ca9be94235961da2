//! wst-export
//!
//! Report generation: template retrieval, docx placeholder filling, the
//! Tera-rendered scoresheet, and the orchestration that ties a patient
//! record to a saved report file.

pub mod docx;
pub mod error;
pub mod fill;
pub mod output;
pub mod render;
pub mod report;
pub mod styles;
pub mod template;
