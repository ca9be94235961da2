//! Where report templates come from.

use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;

use serde::{Deserialize, Serialize};

use wst_core::file_names;
use wst_core::models::report::ReportKind;

use crate::error::ExportError;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Retrieves the docx template for a report kind.
pub trait TemplateSource: Send + Sync {
    /// Human-readable location of the template, for logs and messages.
    fn locate(&self, kind: ReportKind) -> String;

    /// Fetch the template bytes. Any failure here means the template is
    /// unavailable; callers do not retry.
    fn fetch(&self, kind: ReportKind) -> BoxFuture<'_, Result<Vec<u8>, ExportError>>;
}

/// Template file name per report kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateNames {
    pub admission: String,
    pub discharge: String,
}

impl TemplateNames {
    pub fn for_kind(&self, kind: ReportKind) -> &str {
        match kind {
            ReportKind::Admission => &self.admission,
            ReportKind::Discharge => &self.discharge,
        }
    }
}

impl Default for TemplateNames {
    fn default() -> Self {
        Self {
            admission: file_names::admission_template().to_string(),
            discharge: file_names::discharge_template().to_string(),
        }
    }
}

/// Templates stored as files in one directory.
pub struct DirectoryTemplateSource {
    dir: PathBuf,
    names: TemplateNames,
}

impl DirectoryTemplateSource {
    pub fn new(dir: impl Into<PathBuf>, names: TemplateNames) -> Self {
        Self {
            dir: dir.into(),
            names,
        }
    }

    fn path(&self, kind: ReportKind) -> PathBuf {
        self.dir.join(self.names.for_kind(kind))
    }
}

impl TemplateSource for DirectoryTemplateSource {
    fn locate(&self, kind: ReportKind) -> String {
        self.path(kind).display().to_string()
    }

    fn fetch(&self, kind: ReportKind) -> BoxFuture<'_, Result<Vec<u8>, ExportError>> {
        let path = self.path(kind);
        Box::pin(async move {
            tracing::debug!(path = %path.display(), %kind, "reading template");
            tokio::fs::read(&path).await.map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    ExportError::TemplateNotFound(path.display().to_string())
                } else {
                    ExportError::Io(e)
                }
            })
        })
    }
}

/// Templates served over HTTP under a common base URL.
pub struct HttpTemplateSource {
    base_url: String,
    names: TemplateNames,
}

impl HttpTemplateSource {
    pub fn new(base_url: impl Into<String>, names: TemplateNames) -> Self {
        Self {
            base_url: base_url.into(),
            names,
        }
    }

    fn url(&self, kind: ReportKind) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            self.names.for_kind(kind)
        )
    }
}

impl TemplateSource for HttpTemplateSource {
    fn locate(&self, kind: ReportKind) -> String {
        self.url(kind)
    }

    fn fetch(&self, kind: ReportKind) -> BoxFuture<'_, Result<Vec<u8>, ExportError>> {
        let url = self.url(kind);
        Box::pin(async move {
            tracing::debug!(%url, %kind, "downloading template");
            // ureq is blocking; keep it off the async workers.
            tokio::task::spawn_blocking(move || {
                let mut response = ureq::get(&url).call().map_err(|e| match e {
                    ureq::Error::StatusCode(404) => ExportError::TemplateNotFound(url.clone()),
                    other => ExportError::TemplateFetch(format!("{url}: {other}")),
                })?;
                response
                    .body_mut()
                    .read_to_vec()
                    .map_err(|e| ExportError::TemplateFetch(format!("{url}: {e}")))
            })
            .await
            .map_err(|e| ExportError::TemplateFetch(e.to_string()))?
        })
    }
}
