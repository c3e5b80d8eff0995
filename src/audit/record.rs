//! The audit trail's wire entity.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::sanitizer::sanitize_args;
use crate::{Arg, Level};

fn is_zero(tid: &u64) -> bool {
    *tid == 0
}

/// One log call as stored in the audit trail.
///
/// A record carries the raw template and the sanitized arguments, never
/// rendered or colorized text, so it can be re-rendered later with any
/// colorizer. One record is serialized as one JSON line:
///
/// ```text
/// {"time":"2025-11-09T18:19:26.5-05:00","tid":3,"level":20,"color":"Red","format":"error: %s","args":["boom"]}
/// ```
///
/// `tid` is omitted when zero and `color` when empty. A zero offset is
/// written as `Z`. `level` must be an integer in `0..=255`; a line carrying
/// any other level fails to decode like any other malformed line.
///
/// # Examples
///
/// ```
/// use chrono::{FixedOffset, TimeZone};
/// use tintlog::{Arg, Level, LogRecord};
///
/// let time = FixedOffset::east_opt(0).unwrap().with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
/// let record = LogRecord::new(time, Level::ERROR, "error: %s")
///     .with_color("Red")
///     .with_args(&[Arg::from("boom")]);
///
/// assert_eq!(
///     record.to_json_line().unwrap(),
///     r#"{"time":"2025-01-01T00:00:00Z","level":20,"color":"Red","format":"error: %s","args":["boom"]}"#,
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogRecord {
    time: DateTime<FixedOffset>,
    #[serde(default, skip_serializing_if = "is_zero")]
    tid: u64,
    level: Level,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    color: String,
    format: String,
    #[serde(default)]
    args: Vec<Value>,
}

impl LogRecord {
    /// Creates a record with no task id, no color and no arguments.
    pub fn new(time: DateTime<FixedOffset>, level: Level, format: impl Into<String>) -> Self {
        Self {
            time,
            tid: 0,
            level,
            color: String::new(),
            format: format.into(),
            args: Vec::new(),
        }
    }

    /// Sets the task id; zero means untracked.
    pub fn with_tid(mut self, tid: u64) -> Self {
        self.tid = tid;
        self
    }

    /// Sets the colorizer name.
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }

    /// Sanitizes and stores the arguments.
    pub fn with_args(mut self, args: &[Arg]) -> Self {
        self.args = sanitize_args(args);
        self
    }

    /// Stores already-sanitized arguments.
    pub fn with_stored_args(mut self, args: Vec<Value>) -> Self {
        self.args = args;
        self
    }

    /// Returns the creation time.
    pub fn time(&self) -> &DateTime<FixedOffset> {
        &self.time
    }

    /// Returns the task id, zero if untracked.
    pub fn tid(&self) -> u64 {
        self.tid
    }

    /// Returns the level.
    pub fn level(&self) -> Level {
        self.level
    }

    /// Returns the colorizer name, empty if none.
    pub fn color(&self) -> &str {
        &self.color
    }

    /// Returns the unrendered template.
    pub fn format(&self) -> &str {
        &self.format
    }

    /// Returns the sanitized arguments.
    pub fn args(&self) -> &[Value] {
        &self.args
    }

    /// Lifts the stored arguments back into renderable form.
    pub fn restored_args(&self) -> Vec<Arg> {
        self.args.iter().cloned().map(Arg::from_stored).collect()
    }

    /// Serializes the record as one JSON line, without the terminator.
    pub fn to_json_line(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Parses one JSON line.
    pub fn from_json_line(line: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(line)
    }
}
