//! Atomic file output shared by reports, scoresheets, rosters and config.
//!
//! Each write goes to its own uniquely named temp file in the target
//! directory and is renamed over the destination, so concurrent writers of
//! the same path never share a temp file and readers never see a partial
//! file. The last rename wins.

use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::ExportError;

/// Blocking form of [`write_atomic`]. Temp files are created with mode
/// `0o600` on unix and the rename keeps it.
pub fn write_atomic_sync(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir)?;

    let mut tmp = tempfile::Builder::new()
        .prefix(".wst-")
        .suffix(".tmp")
        .tempfile_in(dir)?;
    tmp.write_all(bytes)?;
    tmp.as_file().sync_all()?;
    // On failure the temp file is removed when `PersistError` drops.
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// Write `bytes` to `path` atomically without blocking the runtime.
pub async fn write_atomic(path: impl Into<PathBuf>, bytes: Vec<u8>) -> Result<(), ExportError> {
    let path = path.into();
    tokio::task::spawn_blocking(move || write_atomic_sync(&path, &bytes))
        .await
        .map_err(|e| ExportError::Io(std::io::Error::other(e)))??;
    Ok(())
}
