//! File naming conventions.
//!
//! Pure string functions. These define where templates are looked up and
//! what generated reports are called.

use crate::models::report::ReportKind;

pub fn admission_template() -> &'static str {
    "modelo_admissao.docx"
}

pub fn discharge_template() -> &'static str {
    "modelo_alta.docx"
}

pub fn default_template(kind: ReportKind) -> &'static str {
    match kind {
        ReportKind::Admission => admission_template(),
        ReportKind::Discharge => discharge_template(),
    }
}

/// Path separators in the identifier are replaced so the report always
/// lands directly in the output directory.
pub fn report_docx(identifier: &str, kind: ReportKind) -> String {
    let identifier = identifier.replace(['/', '\\'], "_");
    format!("Relatorio_{identifier}_{kind}.docx")
}

pub fn scoresheet_docx() -> &'static str {
    "Scoresheet.docx"
}
