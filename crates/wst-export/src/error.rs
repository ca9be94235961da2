use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("template not found: {0}")]
    TemplateNotFound(String),

    #[error("template fetch failed: {0}")]
    TemplateFetch(String),

    #[error("template parse error: {0}")]
    TemplateParse(String),

    #[error("template rendering failed: {0}")]
    TemplateRender(String),

    #[error("DOCX generation failed: {0}")]
    Docx(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<tera::Error> for ExportError {
    fn from(e: tera::Error) -> Self {
        ExportError::TemplateRender(e.to_string())
    }
}
