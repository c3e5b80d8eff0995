//! Decoding, filtering and re-rendering of audit files.
//!
//! The reader is the other half of the audit trail: it turns JSONL records
//! back into terminal lines using the same [`LineRenderer`] as the live
//! logger, so a replayed record looks exactly like the original output.

use std::fmt;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, TimeZone, Utc};

use crate::{Colorizer, Level, LineRenderer, LogRecord, Registry};

/// Template used for records stored with a blank one.
const FALLBACK_TEMPLATE: &str = "%v";

/// Errors that abort a read.
#[derive(Debug)]
pub enum ReadError {
    /// The file could not be read.
    Io {
        /// The file that failed.
        path: PathBuf,
        /// The underlying error.
        source: io::Error,
    },
    /// A line is not a valid record.
    Decode {
        /// 1-based line number in the file.
        line: usize,
        /// The offending line.
        text: String,
        /// The underlying error.
        source: serde_json::Error,
    },
    /// A time bound does not match its layout.
    InvalidTime {
        /// The rejected input.
        input: String,
        /// The layout it was parsed with.
        layout: String,
    },
}

impl fmt::Display for ReadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReadError::Io { path, source } => {
                write!(f, "unable to read {}: {}", path.display(), source)
            }
            ReadError::Decode { line, text, source } => {
                write!(f, "malformed record on line {line}: {source}: {text}")
            }
            ReadError::InvalidTime { input, layout } => {
                write!(f, "time {input:?} does not match layout {layout:?}")
            }
        }
    }
}

impl std::error::Error for ReadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ReadError::Io { source, .. } => Some(source),
            ReadError::Decode { source, .. } => Some(source),
            ReadError::InvalidTime { .. } => None,
        }
    }
}

/// Selection criteria for [`read_log`].
///
/// The default query keeps everything.
///
/// # Examples
///
/// ```
/// use tintlog::{Level, Query};
///
/// let query = Query::default().ceiling(Level::INFO).tail(Some(10));
/// assert_eq!(query.ceiling_level(), Level::INFO);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Query {
    ceiling: Level,
    start: DateTime<FixedOffset>,
    end: DateTime<FixedOffset>,
    tail: Option<usize>,
}

impl Query {
    /// Keeps only records with `level <= ceiling`.
    pub fn ceiling(mut self, ceiling: Level) -> Self {
        self.ceiling = ceiling;
        self
    }

    /// Keeps only records created at or after `start`.
    pub fn start(mut self, start: DateTime<FixedOffset>) -> Self {
        self.start = start;
        self
    }

    /// Keeps only records created at or before `end`.
    pub fn end(mut self, end: DateTime<FixedOffset>) -> Self {
        self.end = end;
        self
    }

    /// Considers only the last `n` lines of the file; `None` considers all.
    pub fn tail(mut self, tail: Option<usize>) -> Self {
        self.tail = tail;
        self
    }

    /// Returns the level ceiling.
    pub fn ceiling_level(&self) -> Level {
        self.ceiling
    }

    /// Returns `true` if `record` passes the time and level filters.
    pub fn matches(&self, record: &LogRecord) -> bool {
        let time = record.time();
        self.ceiling.admits(record.level()) && *time >= self.start && *time <= self.end
    }
}

impl Default for Query {
    fn default() -> Self {
        Self {
            ceiling: Level::MAX,
            start: DateTime::<Utc>::MIN_UTC.into(),
            end: DateTime::<Utc>::MAX_UTC.into(),
            tail: None,
        }
    }
}

/// Decodes and filters the records in `text`.
///
/// Every retained line is decoded before any record is returned, so a
/// malformed line yields an error and no records at all.
///
/// # Errors
///
/// Returns [`ReadError::Decode`] for the first line that is not a record.
pub fn decode_lines(text: &str, query: &Query) -> Result<Vec<LogRecord>, ReadError> {
    let lines: Vec<&str> = text.lines().collect();
    let skip = match query.tail {
        Some(n) => lines.len().saturating_sub(n),
        None => 0,
    };

    let mut records = Vec::with_capacity(lines.len() - skip);
    for (index, line) in lines.iter().enumerate().skip(skip) {
        let record = LogRecord::from_json_line(line).map_err(|source| ReadError::Decode {
            line: index + 1,
            text: (*line).to_string(),
            source,
        })?;
        records.push(record);
    }

    let decoded = records.len();
    records.retain(|record| query.matches(record));
    tracing::debug!(lines = lines.len(), decoded, kept = records.len(), "records filtered");
    Ok(records)
}

/// Reads the audit file at `path` and returns the matching records in file
/// order.
///
/// # Errors
///
/// Returns [`ReadError::Io`] if the file cannot be read and
/// [`ReadError::Decode`] if any retained line is malformed.
///
/// # Examples
///
/// ```
/// use tintlog::{read_log, Level, Query};
///
/// let dir = tempfile::tempdir().unwrap();
/// let path = dir.path().join("app.jsonl");
/// std::fs::write(
///     &path,
///     concat!(
///         r#"{"time":"2025-01-01T00:00:00Z","level":10,"format":"a"}"#, "\n",
///         r#"{"time":"2025-01-01T00:00:01Z","level":60,"format":"b"}"#, "\n",
///     ),
/// ).unwrap();
///
/// let records = read_log(&path, &Query::default().ceiling(Level::INFO)).unwrap();
/// assert_eq!(records.len(), 1);
/// assert_eq!(records[0].format(), "a");
/// ```
pub fn read_log(path: impl AsRef<Path>, query: &Query) -> Result<Vec<LogRecord>, ReadError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| ReadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    decode_lines(&text, query)
}

/// Parses a time bound with a strftime layout.
///
/// Layouts carrying an offset (`%z`) are honored; otherwise the input is read
/// as UTC. A date-only input means midnight.
///
/// # Errors
///
/// Returns [`ReadError::InvalidTime`] if the input does not match.
///
/// # Examples
///
/// ```
/// use tintlog::parse_bound;
///
/// let t = parse_bound("2025/Mar/04 05:06:07", "%Y/%b/%d %H:%M:%S").unwrap();
/// assert_eq!(t.to_rfc3339(), "2025-03-04T05:06:07+00:00");
/// assert!(parse_bound("yesterday", "%Y/%b/%d %H:%M:%S").is_err());
/// ```
pub fn parse_bound(input: &str, layout: &str) -> Result<DateTime<FixedOffset>, ReadError> {
    let input = input.trim();
    if let Ok(time) = DateTime::parse_from_str(input, layout) {
        return Ok(time);
    }
    let naive = NaiveDateTime::parse_from_str(input, layout).ok().or_else(|| {
        NaiveDate::parse_from_str(input, layout)
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
    });
    match naive {
        Some(naive) => Ok(Utc.from_utc_datetime(&naive).into()),
        None => Err(ReadError::InvalidTime {
            input: input.to_string(),
            layout: layout.to_string(),
        }),
    }
}

/// Re-renders records as terminal lines.
///
/// Each record's stored color name is looked up in the registry; unknown or
/// empty names render without color.
///
/// # Examples
///
/// ```
/// use tintlog::{Colorizer, LineRenderer, LogRecord, Registry, Replay};
///
/// let replay = Replay::new(Registry::empty(), LineRenderer::new("%H:%M", Colorizer::none()));
/// let record = LogRecord::from_json_line(
///     r#"{"time":"2025-01-01T09:15:00+02:00","tid":3,"level":55,"color":"Red","format":"n=%d","args":[4]}"#,
/// ).unwrap();
///
/// assert_eq!(replay.render(&record), "09:15 [Info5][3] n=4\n");
/// ```
#[derive(Debug, Clone)]
pub struct Replay {
    registry: Registry,
    renderer: LineRenderer,
}

impl Replay {
    /// Creates a replay with the given colorizers and timestamp settings.
    pub fn new(registry: Registry, renderer: LineRenderer) -> Self {
        Self { registry, renderer }
    }

    /// Creates a replay that emits no escape sequences at all.
    pub fn plain(time_format: &str) -> Self {
        Self::new(Registry::empty(), LineRenderer::new(time_format, Colorizer::none()))
    }

    /// Renders one record as a full line.
    pub fn render(&self, record: &LogRecord) -> String {
        let colorizer = self.registry.resolve(record.color());
        let tid = (record.tid() > 0).then_some(record.tid());
        let template = if record.format().trim().is_empty() {
            FALLBACK_TEMPLATE
        } else {
            record.format()
        };
        self.renderer.render(
            record.time(),
            record.level(),
            tid,
            &colorizer,
            template,
            &record.restored_args(),
            true,
        )
    }

    /// Writes every record to `out` in order.
    ///
    /// # Errors
    ///
    /// Returns the first error from `out`.
    pub fn write_all<W: Write>(&self, records: &[LogRecord], out: &mut W) -> io::Result<()> {
        for record in records {
            out.write_all(self.render(record).as_bytes())?;
        }
        out.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colorizer::RED;
    use crate::config::DEFAULT_TIME_FORMAT;

    fn line(secs: u32, level: u8) -> String {
        format!(r#"{{"time":"2025-01-01T00:00:{secs:02}Z","level":{level},"format":"n=%d","args":[{secs}]}}"#)
    }

    fn file(lines: &[String]) -> String {
        let mut text = lines.join("\n");
        text.push('\n');
        text
    }

    #[test]
    fn default_query_keeps_everything() {
        let text = file(&[line(1, 0), line(2, 200)]);
        assert_eq!(decode_lines(&text, &Query::default()).unwrap().len(), 2);
    }

    #[test]
    fn tail_is_applied_before_filtering() {
        let text = file(&[line(1, 10), line(2, 90), line(3, 90)]);
        let query = Query::default().ceiling(Level::INFO).tail(Some(2));
        assert!(decode_lines(&text, &query).unwrap().is_empty());
    }

    #[test]
    fn tail_larger_than_file_keeps_all() {
        let text = file(&[line(1, 10), line(2, 10)]);
        let query = Query::default().tail(Some(50));
        assert_eq!(decode_lines(&text, &query).unwrap().len(), 2);
    }

    #[test]
    fn tail_zero_keeps_nothing() {
        let text = file(&[line(1, 10)]);
        assert!(decode_lines(&text, &Query::default().tail(Some(0))).unwrap().is_empty());
    }

    #[test]
    fn decode_error_names_the_file_line() {
        let text = file(&[line(1, 10), "{oops".to_string(), line(3, 10)]);
        match decode_lines(&text, &Query::default()) {
            Err(ReadError::Decode { line, text, .. }) => {
                assert_eq!(line, 2);
                assert_eq!(text, "{oops");
            }
            other => panic!("expected decode error, got {other:?}"),
        }
    }

    #[test]
    fn lines_skipped_by_tail_are_not_decoded() {
        let text = file(&["garbage".to_string(), line(2, 10)]);
        let records = decode_lines(&text, &Query::default().tail(Some(1))).unwrap();
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn blank_line_is_a_decode_error() {
        let text = format!("{}\n\n{}\n", line(1, 1), line(2, 1));
        assert!(matches!(
            decode_lines(&text, &Query::default()),
            Err(ReadError::Decode { line: 2, .. })
        ));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_log(dir.path().join("absent.jsonl"), &Query::default()).unwrap_err();
        assert!(matches!(err, ReadError::Io { .. }));
        assert!(err.to_string().contains("absent.jsonl"));
    }

    #[test]
    fn bounds_default_layout() {
        let start = parse_bound("0000/Jan/01 00:00:00", DEFAULT_TIME_FORMAT).unwrap();
        let end = parse_bound("9999/Dec/31 23:59:59", DEFAULT_TIME_FORMAT).unwrap();
        assert!(start < end);
    }

    #[test]
    fn bounds_honor_explicit_offsets() {
        let t = parse_bound("2025-01-01 10:00:00 +0200", "%Y-%m-%d %H:%M:%S %z").unwrap();
        assert_eq!(t.with_timezone(&Utc).to_rfc3339(), "2025-01-01T08:00:00+00:00");
    }

    #[test]
    fn bounds_accept_dates() {
        let t = parse_bound("2025-02-03", "%Y-%m-%d").unwrap();
        assert_eq!(t.to_rfc3339(), "2025-02-03T00:00:00+00:00");
    }

    #[test]
    fn invalid_bound_reports_input_and_layout() {
        let err = parse_bound("soon", "%Y").unwrap_err();
        assert_eq!(err.to_string(), r#"time "soon" does not match layout "%Y""#);
    }

    #[test]
    fn replay_uses_registry_colors() {
        let replay = Replay::new(Registry::default(), LineRenderer::new("", Colorizer::none()));
        let record = LogRecord::from_json_line(
            r#"{"time":"2025-01-01T00:00:00Z","level":20,"color":"Red","format":"x %s","args":["y"]}"#,
        )
        .unwrap();
        assert_eq!(
            replay.render(&record),
            format!("[{}] x {}\n", RED.apply("Error"), RED.apply("y"))
        );
    }

    #[test]
    fn replay_unknown_color_is_plain() {
        let replay = Replay::new(Registry::default(), LineRenderer::new("", Colorizer::none()));
        let record = LogRecord::from_json_line(
            r#"{"time":"2025-01-01T00:00:00Z","level":20,"color":"Mauve","format":"x"}"#,
        )
        .unwrap();
        assert_eq!(replay.render(&record), "[Error] x\n");
    }

    #[test]
    fn replay_blank_template_shows_args() {
        let replay = Replay::plain("");
        let record = LogRecord::from_json_line(
            r#"{"time":"2025-01-01T00:00:00Z","level":50,"format":" ","args":["only"]}"#,
        )
        .unwrap();
        assert_eq!(replay.render(&record), "[Info] only\n");
    }

    #[test]
    fn replay_survives_oversized_width_and_precision() {
        let record = LogRecord::from_json_line(
            r#"{"time":"2025-01-01T00:00:00Z","level":50,"format":"%99999999999999999999s %.99999999999999999999s","args":["a","b"]}"#,
        )
        .unwrap();
        assert_eq!(
            Replay::plain("").render(&record),
            "[Info] %!(BADWIDTH)a %!(BADPREC)b\n"
        );
    }

    #[test]
    fn replay_writes_in_order() {
        let text = file(&[line(1, 10), line(2, 10)]);
        let records = decode_lines(&text, &Query::default()).unwrap();
        let mut out = Vec::new();
        Replay::plain("").write_all(&records, &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "[Critical] n=1\n[Critical] n=2\n");
    }
}
