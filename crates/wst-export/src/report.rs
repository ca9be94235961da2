//! Report generation for a single patient.

use std::path::{Path, PathBuf};

use thiserror::Error;

use wst_core::file_names;
use wst_core::models::patient::PatientRecord;
use wst_core::models::report::ReportKind;
use wst_instruments::payload::build_report_payload;

use crate::error::ExportError;
use crate::fill::fill_template;
use crate::output::write_atomic;
use crate::template::TemplateSource;

/// Why a report was not produced. Each variant maps to one message the
/// user sees; none of them touch the roster.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("patient name and record identifier are required")]
    Validation,

    #[error("template could not be loaded: {0}")]
    TemplateUnavailable(#[source] ExportError),

    #[error("report generation failed: {0}")]
    Generation(#[source] ExportError),
}

impl ReportError {
    pub fn user_message(&self) -> &'static str {
        match self {
            ReportError::Validation => "Patient name and record identifier are required.",
            ReportError::TemplateUnavailable(_) => "The report template could not be loaded.",
            ReportError::Generation(_) => "Error generating the report. Please try again.",
        }
    }
}

/// A report written to disk.
#[derive(Debug, Clone)]
pub struct ReportArtifact {
    pub path: PathBuf,
    pub kind: ReportKind,
    pub identifier: String,
    pub size_bytes: usize,
}

/// Turns patient records into report files.
pub struct ReportGenerator {
    source: Box<dyn TemplateSource>,
    output_dir: PathBuf,
}

impl ReportGenerator {
    pub fn new(source: Box<dyn TemplateSource>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            source,
            output_dir: output_dir.into(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Validate, fetch the template for `kind`, fill it from the patient's
    /// payload, and save it as `Relatorio_<identifier>_<kind>.docx`.
    ///
    /// The template is not fetched unless the patient is identified, and
    /// nothing is left in the output directory when a step fails.
    pub async fn generate(
        &self,
        patient: &PatientRecord,
        kind: ReportKind,
    ) -> Result<ReportArtifact, ReportError> {
        if !patient.is_identified() {
            tracing::warn!(%kind, "report requested for unidentified patient");
            return Err(ReportError::Validation);
        }

        let template = self.source.fetch(kind).await.map_err(|e| {
            tracing::error!(
                location = %self.source.locate(kind),
                error = %e,
                "template unavailable"
            );
            ReportError::TemplateUnavailable(e)
        })?;

        let payload = build_report_payload(patient);
        let rendered = fill_template(&template, &payload).map_err(|e| {
            tracing::error!(identifier = %patient.identifier(), %kind, error = %e, "template fill failed");
            ReportError::Generation(e)
        })?;

        let path = self
            .output_dir
            .join(file_names::report_docx(patient.identifier(), kind));
        let size_bytes = rendered.len();
        write_atomic(path.clone(), rendered)
            .await
            .map_err(ReportError::Generation)?;

        tracing::info!(
            path = %path.display(),
            identifier = %patient.identifier(),
            %kind,
            bytes = size_bytes,
            "report written"
        );

        Ok(ReportArtifact {
            path,
            kind,
            identifier: patient.identifier().to_string(),
            size_bytes,
        })
    }
}
