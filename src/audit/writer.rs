//! Append-only JSONL writer for the audit trail.

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use super::LogRecord;
use crate::{SinkError, SinkErrorKind};

/// Owns the audit file and serializes concurrent appends.
///
/// The file is opened lazily on the first append (creating missing parent
/// directories) in append mode, so successive runs concatenate. The handle
/// then stays open. Every record is written as one `write_all` of a complete
/// line while the writer's lock is held, so concurrent callers never
/// interleave partial lines.
///
/// # Example
///
/// ```
/// use chrono::Local;
/// use tintlog::{AuditWriter, Level, LogRecord};
///
/// let dir = tempfile::tempdir().unwrap();
/// let path = dir.path().join("nested/dirs/app.jsonl");
/// let writer = AuditWriter::new(Some(path.clone()));
///
/// writer.append(&LogRecord::new(Local::now().into(), Level::INFO, "started"));
///
/// let text = std::fs::read_to_string(&path).unwrap();
/// assert_eq!(text.lines().count(), 1);
/// ```
#[derive(Debug)]
pub struct AuditWriter {
    path: Option<PathBuf>,
    file: Mutex<Option<File>>,
}

impl AuditWriter {
    /// Creates a writer for `path`; `None` disables the audit trail.
    pub fn new(path: Option<PathBuf>) -> Self {
        Self {
            path,
            file: Mutex::new(None),
        }
    }

    /// Creates a writer that drops every record.
    pub fn disabled() -> Self {
        Self::new(None)
    }

    /// Returns the destination path, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Returns `true` if records are written somewhere.
    pub fn is_enabled(&self) -> bool {
        self.path.is_some()
    }

    /// Appends a record, dropping it silently on failure.
    pub fn append(&self, record: &LogRecord) {
        if let Err(err) = self.try_append(record) {
            tracing::debug!(error = %err, "audit record dropped");
        }
    }

    /// Appends a record and reports failures.
    ///
    /// A no-op returning `Ok` when the writer is disabled. A failed open is
    /// retried on the next call.
    ///
    /// # Errors
    ///
    /// Returns `SinkError` with kind `Encode` if the record cannot be
    /// serialized, or `Io` if the directory, file or write fails.
    pub fn try_append(&self, record: &LogRecord) -> Result<(), SinkError> {
        let Some(path) = self.path.as_deref() else {
            return Ok(());
        };

        let mut line = record
            .to_json_line()
            .map_err(|e| SinkError::with_message(SinkErrorKind::Encode, e.to_string()))?;
        line.push('\n');

        let mut guard = self.file.lock().unwrap_or_else(PoisonError::into_inner);
        let file = match guard.as_mut() {
            Some(file) => file,
            None => guard.insert(open_append(path)?),
        };
        file.write_all(line.as_bytes())?;
        Ok(())
    }
}

fn open_append(path: &Path) -> Result<File, SinkError> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir).map_err(|e| {
            SinkError::with_message(
                SinkErrorKind::Io,
                format!("unable to create dir {}: {e}", dir.display()),
            )
        })?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| {
            SinkError::with_message(
                SinkErrorKind::Io,
                format!("unable to open {}: {e}", path.display()),
            )
        })?;
    tracing::debug!(path = %path.display(), "audit file opened");
    Ok(file)
}
