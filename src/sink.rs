use std::fmt;
use std::io::{self, Write};
use std::sync::{Mutex, PoisonError};

/// Error returned when writing to a sink fails.
///
/// Logging callers never see this error; it is surfaced by
/// [`AuditWriter::try_append`](crate::AuditWriter::try_append) and by
/// [`Sink::write_str`] for tests and diagnostics.
///
/// # Examples
///
/// ```
/// use tintlog::{SinkError, SinkErrorKind};
///
/// let error = SinkError::with_message(SinkErrorKind::Io, "disk full");
/// assert_eq!(error.kind(), SinkErrorKind::Io);
/// assert_eq!(error.to_string(), "sink error (I/O error): disk full");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SinkError {
    kind: SinkErrorKind,
    message: Option<String>,
}

impl SinkError {
    /// Creates a new sink error with the specified kind.
    pub fn new(kind: SinkErrorKind) -> Self {
        Self {
            kind,
            message: None,
        }
    }

    /// Creates a new sink error with a custom message.
    pub fn with_message(kind: SinkErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: Some(message.into()),
        }
    }

    /// Returns the error kind.
    pub fn kind(&self) -> SinkErrorKind {
        self.kind
    }

    /// Returns the error message, if any.
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }
}

impl fmt::Display for SinkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(msg) = &self.message {
            write!(f, "sink error ({}): {}", self.kind, msg)
        } else {
            write!(f, "sink error ({})", self.kind)
        }
    }
}

impl std::error::Error for SinkError {}

impl From<io::Error> for SinkError {
    fn from(err: io::Error) -> Self {
        SinkError::with_message(SinkErrorKind::Io, err.to_string())
    }
}

/// Kind of sink error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SinkErrorKind {
    /// I/O error while opening or writing.
    Io,
    /// A record could not be encoded.
    Encode,
}

impl fmt::Display for SinkErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io => write!(f, "I/O error"),
            Self::Encode => write!(f, "encode error"),
        }
    }
}

/// Destination for rendered interactive lines.
///
/// Implementations must write each call's text as one unit: concurrent
/// callers may never observe two lines interleaved.
pub trait Sink: Send + Sync {
    /// Writes one fully rendered line.
    ///
    /// # Errors
    ///
    /// Returns `SinkError` if the underlying stream rejects the write.
    fn write_str(&self, text: &str) -> Result<(), SinkError>;
}

/// The process's standard error stream.
///
/// Writes go through the stderr lock, which serializes them with every other
/// user of `std::io::stderr` in the process.
#[derive(Debug, Clone, Copy, Default)]
pub struct StderrSink;

impl Sink for StderrSink {
    fn write_str(&self, text: &str) -> Result<(), SinkError> {
        let mut stderr = io::stderr().lock();
        stderr.write_all(text.as_bytes())?;
        stderr.flush()?;
        Ok(())
    }
}

/// Any `Write` implementation behind a mutex.
///
/// # Examples
///
/// ```
/// use tintlog::{Sink, WriterSink};
///
/// let sink = WriterSink::new(Vec::new());
/// sink.write_str("one\n").unwrap();
/// sink.write_str("two\n").unwrap();
/// assert_eq!(sink.into_inner(), b"one\ntwo\n");
/// ```
#[derive(Debug)]
pub struct WriterSink<W> {
    inner: Mutex<W>,
}

impl<W: Write + Send> WriterSink<W> {
    /// Wraps a writer.
    pub fn new(writer: W) -> Self {
        Self {
            inner: Mutex::new(writer),
        }
    }

    /// Returns the wrapped writer.
    pub fn into_inner(self) -> W {
        self.inner.into_inner().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<W: Write + Send> Sink for WriterSink<W> {
    fn write_str(&self, text: &str) -> Result<(), SinkError> {
        let mut writer = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        writer.write_all(text.as_bytes())?;
        writer.flush()?;
        Ok(())
    }
}

/// An in-memory sink that collects every line, for tests and demos.
///
/// # Examples
///
/// ```
/// use tintlog::{Sink, VecSink};
///
/// let sink = VecSink::new();
/// sink.write_str("hello\n").unwrap();
///
/// assert_eq!(sink.len(), 1);
/// assert_eq!(sink.into_vec(), vec!["hello\n"]);
/// ```
#[derive(Debug, Default)]
pub struct VecSink {
    values: Mutex<Vec<String>>,
}

impl VecSink {
    /// Creates a new empty vector sink.
    pub fn new() -> Self {
        Self {
            values: Mutex::new(Vec::new()),
        }
    }

    /// Returns the number of lines written.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Returns `true` if nothing has been written.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Provides borrowed access to the lines via callback.
    ///
    /// The sink stays locked for the duration of the callback.
    pub fn with_values<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&[String]) -> R,
    {
        f(&self.lock())
    }

    /// Returns a copy of the lines written so far.
    pub fn snapshot(&self) -> Vec<String> {
        self.lock().clone()
    }

    /// Consumes the sink and returns the collected lines.
    pub fn into_vec(self) -> Vec<String> {
        self.values.into_inner().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<String>> {
        self.values.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Sink for VecSink {
    fn write_str(&self, text: &str) -> Result<(), SinkError> {
        self.lock().push(text.to_string());
        Ok(())
    }
}
