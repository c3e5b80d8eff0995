//! Colorized, level-gated terminal logging with a durable audit trail.
//!
//! Every log call takes two independent paths:
//! - **Interactive**: arguments are pretty-rendered and colorized, the line
//!   gets a timestamp and a `[Level]` prefix, and it is written to the
//!   terminal only if its level passes the configured threshold.
//! - **Audit**: the raw template and sanitized, uncolored arguments are
//!   appended as one JSON line to the audit file, always.
//!
//! [`read_log`] decodes that file later and filters it by time, level and
//! tail; [`Replay`] re-renders each record through the same [`LineRenderer`]
//! the live logger uses.
//!
//! # Core Types
//!
//! - [`Level`]: ordered severity; smaller is more severe
//! - [`Colorizer`] and [`Registry`]: named display transforms
//! - [`Arg`]: a log argument, classified once into a closed set of shapes
//! - [`Config`]: immutable settings built with [`Config::builder`]
//! - [`Logger`]: the logging context; [`TaskLog`] binds a task id
//! - [`LogRecord`] and [`AuditWriter`]: the audit trail
//! - [`Query`] and [`Replay`]: reading it back
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//! use tintlog::{colorizer, read_log, tlog, AuditWriter, Config, Level, Logger, Query, VecSink};
//!
//! let dir = tempfile::tempdir().unwrap();
//! let path = dir.path().join("app.jsonl");
//!
//! let config = Config::builder()
//!     .threshold(Level::NOTICE)
//!     .time_format("")
//!     .build()
//!     .expect("valid config");
//! let sink = Arc::new(VecSink::new());
//! let logger = Logger::with_sink(config, sink.clone())
//!     .with_audit(AuditWriter::new(Some(path.clone())));
//!
//! tlog!(logger, Level::ERROR, colorizer::NO_COLOR, "disk %s is full", "/dev/sda1");
//! tlog!(logger, Level::DEBUG, colorizer::NO_COLOR, "retrying in %dms", 250);
//!
//! // Only the error reached the terminal...
//! assert_eq!(sink.snapshot(), vec!["[Error] disk /dev/sda1 is full\n"]);
//!
//! // ...but both calls are in the audit trail.
//! let records = read_log(&path, &Query::default()).unwrap();
//! assert_eq!(records.len(), 2);
//! assert_eq!(records[1].format(), "retrying in %dms");
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod arg;
mod audit;
mod color;
pub mod colorizer;
mod config;
mod error;
mod format;
mod level;
mod logging;
mod pretty;
mod reader;
mod render;
mod sanitizer;
mod sink;

pub use arg::Arg;
pub use audit::{AuditWriter, LogRecord};
pub use color::{palette, Rgb};
pub use colorizer::{Colorizer, PaintFn, Registry};
pub use config::{
    resolve_color, validate_time_format, Config, ConfigBuilder, ConfigError, ConfigErrorKind,
    FileConfig, CONTAINER_ID_DISABLED, DEFAULT_CONTAINER_ID_VAR, DEFAULT_FILE_NAME_FORMAT,
    DEFAULT_TIME_FORMAT,
};
pub use error::Error;
pub use format::{interpolate, interpolate_with};
pub use level::Level;
pub use logging::{Logger, TaskLog};
pub use pretty::{pretty, MAX_HEX_PREVIEW, MAX_PRETTY_BYTES};
pub use reader::{decode_lines, parse_bound, read_log, Query, ReadError, Replay};
pub use render::{body, prefix, LineRenderer};
pub use sanitizer::{decode_bytes, sanitize, sanitize_args, BYTES_KEY};
pub use sink::{Sink, SinkError, SinkErrorKind, StderrSink, VecSink, WriterSink};
