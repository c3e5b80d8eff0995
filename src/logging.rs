//! The event emitter.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, FixedOffset, Local};

use crate::{Arg, AuditWriter, Colorizer, Config, Level, LineRenderer, LogRecord, Sink, StderrSink};

/// Padding appended by [`Logger::log_rewrite`] so a shorter line fully
/// overwrites a longer one.
const REWRITE_PADDING: usize = 20;

/// A logging context: settings, the interactive sink and the audit writer.
///
/// Every call is rendered for the terminal and recorded for the audit trail
/// independently. The record is always written; the rendered line only
/// reaches the sink when the level passes the configured threshold.
/// Nothing is ever reported back to the caller.
///
/// `Logger` is `Send + Sync`; share it behind an `Arc` or a `static`.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use tintlog::{colorizer, Arg, Config, Level, Logger, VecSink};
///
/// let config = Config::builder()
///     .threshold(Level::NOTICE)
///     .time_format("")
///     .build()
///     .unwrap();
/// let sink = Arc::new(VecSink::new());
/// let logger = Logger::with_sink(config, sink.clone());
///
/// logger.log(Level::ERROR, &colorizer::NO_COLOR, "error: %s", &[Arg::from("boom")]);
/// logger.log(Level::DEBUG, &colorizer::NO_COLOR, "hidden", &[]);
///
/// assert_eq!(sink.snapshot(), vec!["[Error] error: boom\n"]);
/// ```
pub struct Logger {
    config: Arc<Config>,
    sink: Arc<dyn Sink>,
    audit: AuditWriter,
    renderer: LineRenderer,
}

impl Logger {
    /// Creates a logger writing to standard error.
    ///
    /// The audit file name is resolved once, from the current local time.
    pub fn new(config: impl Into<Arc<Config>>) -> Self {
        Self::with_sink(config, Arc::new(StderrSink))
    }

    /// Creates a logger writing interactive lines to `sink`.
    pub fn with_sink(config: impl Into<Arc<Config>>, sink: Arc<dyn Sink>) -> Self {
        let config = config.into();
        let audit = AuditWriter::new(config.audit_path(&Local::now()));
        if let Some(path) = audit.path() {
            tracing::debug!(path = %path.display(), "audit trail enabled");
        }
        let renderer = LineRenderer::new(config.time_format(), config.time_colorizer().clone());
        Self {
            config,
            sink,
            audit,
            renderer,
        }
    }

    /// Replaces the audit writer, e.g. to pin the file path.
    pub fn with_audit(mut self, audit: AuditWriter) -> Self {
        self.audit = audit;
        self
    }

    /// Returns the settings.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns the audit file path, if the trail is enabled.
    pub fn audit_path(&self) -> Option<&Path> {
        self.audit.path()
    }

    /// Logs one line terminated by a newline.
    pub fn log(&self, level: Level, colorizer: &Colorizer, template: &str, args: &[Arg]) {
        self.emit(0, level, colorizer, true, template, args);
    }

    /// Logs with explicit control over the trailing newline.
    pub fn log_bool(
        &self,
        level: Level,
        colorizer: &Colorizer,
        newline: bool,
        template: &str,
        args: &[Arg],
    ) {
        self.emit(0, level, colorizer, newline, template, args);
    }

    /// Redraws the current terminal line.
    ///
    /// The body starts with a carriage return and is padded with spaces
    /// instead of ending in a newline.
    pub fn log_rewrite(&self, level: Level, colorizer: &Colorizer, template: &str, args: &[Arg]) {
        self.emit(0, level, colorizer, false, &rewrite_template(template), args);
    }

    /// Logs a titled JSON block.
    pub fn log_json(&self, level: Level, colorizer: &Colorizer, title: &str, json: &str) {
        self.emit(0, level, colorizer, true, JSON_TEMPLATE, &json_args(title, json));
    }

    /// Binds a task id to the following calls.
    ///
    /// The id is shown and stored only when the config tracks task ids.
    pub fn task(&self, tid: u64) -> TaskLog<'_> {
        TaskLog { logger: self, tid }
    }

    fn emit(
        &self,
        tid: u64,
        level: Level,
        colorizer: &Colorizer,
        newline: bool,
        template: &str,
        args: &[Arg],
    ) {
        let now: DateTime<FixedOffset> = Local::now().into();
        let tid = self.config.track_tid().then_some(tid);

        let record = LogRecord::new(now, level, template)
            .with_tid(tid.unwrap_or(0))
            .with_color(colorizer.name())
            .with_args(args);
        self.audit.append(&record);

        if !self.config.threshold().admits(level) {
            return;
        }
        let line = self
            .renderer
            .render(&now, level, tid, colorizer, template, args, newline);
        if let Err(err) = self.sink.write_str(&line) {
            tracing::debug!(error = %err, "interactive line dropped");
        }
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("config", &self.config)
            .field("audit", &self.audit)
            .finish_non_exhaustive()
    }
}

const JSON_TEMPLATE: &str = "%s (JSON):\n'''\n%s\n'''";

fn json_args(title: &str, json: &str) -> [Arg; 2] {
    [Arg::from(title), Arg::from(json)]
}

fn rewrite_template(template: &str) -> String {
    format!("\r{template}{}", " ".repeat(REWRITE_PADDING))
}

/// A [`Logger`] bound to one task id.
///
/// Obtained from [`Logger::task`]; it borrows the logger and cannot outlive
/// it.
///
/// ```
/// use std::sync::Arc;
/// use tintlog::{Colorizer, Config, Level, Logger, VecSink};
///
/// let config = Config::builder().track_tid(true).time_format("").build().unwrap();
/// let sink = Arc::new(VecSink::new());
/// let logger = Logger::with_sink(config, sink.clone());
///
/// logger.task(42).log(Level::INFO, &Colorizer::none(), "working", &[]);
/// assert_eq!(sink.snapshot(), vec!["[Info][42] working\n"]);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct TaskLog<'a> {
    logger: &'a Logger,
    tid: u64,
}

impl<'a> TaskLog<'a> {
    /// Returns the bound task id.
    pub fn tid(&self) -> u64 {
        self.tid
    }

    /// Same as [`Logger::log`].
    pub fn log(&self, level: Level, colorizer: &Colorizer, template: &str, args: &[Arg]) {
        self.logger
            .emit(self.tid, level, colorizer, true, template, args);
    }

    /// Same as [`Logger::log_bool`].
    pub fn log_bool(
        &self,
        level: Level,
        colorizer: &Colorizer,
        newline: bool,
        template: &str,
        args: &[Arg],
    ) {
        self.logger
            .emit(self.tid, level, colorizer, newline, template, args);
    }

    /// Same as [`Logger::log_rewrite`].
    pub fn log_rewrite(&self, level: Level, colorizer: &Colorizer, template: &str, args: &[Arg]) {
        self.logger
            .emit(self.tid, level, colorizer, false, &rewrite_template(template), args);
    }

    /// Same as [`Logger::log_json`].
    pub fn log_json(&self, level: Level, colorizer: &Colorizer, title: &str, json: &str) {
        self.logger
            .emit(self.tid, level, colorizer, true, JSON_TEMPLATE, &json_args(title, json));
    }
}

/// Logs through a [`Logger`] with arguments converted by `Arg::from`.
///
/// ```
/// use std::sync::Arc;
/// use tintlog::{colorizer, tlog, Config, Level, Logger, VecSink};
///
/// let sink = Arc::new(VecSink::new());
/// let logger = Logger::with_sink(Config::builder().time_format("").build().unwrap(), sink.clone());
///
/// tlog!(logger, Level::INFO, colorizer::NO_COLOR, "%s has %d items", "cart", 3);
/// assert_eq!(sink.snapshot(), vec!["[Info] cart has 3 items\n"]);
/// ```
#[macro_export]
macro_rules! tlog {
    ($logger:expr, $level:expr, $colorizer:expr, $template:expr $(, $arg:expr)* $(,)?) => {
        $logger.log($level, &$colorizer, $template, &[$($crate::Arg::from($arg)),*])
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colorizer::{GREEN, RED};
    use crate::{SinkError, SinkErrorKind, VecSink};
    use std::fs;

    fn quiet_config(threshold: Level) -> Config {
        Config::builder()
            .threshold(threshold)
            .time_format("")
            .build()
            .unwrap()
    }

    fn records(path: &Path) -> Vec<LogRecord> {
        fs::read_to_string(path)
            .unwrap()
            .lines()
            .map(|line| LogRecord::from_json_line(line).unwrap())
            .collect()
    }

    struct FailingSink;

    impl Sink for FailingSink {
        fn write_str(&self, _text: &str) -> Result<(), SinkError> {
            Err(SinkError::new(SinkErrorKind::Io))
        }
    }

    #[test]
    fn gate_admits_levels_at_or_below_threshold() {
        let sink = Arc::new(VecSink::new());
        let logger = Logger::with_sink(quiet_config(Level::INFO), sink.clone());

        logger.log(Level::ERROR, &Colorizer::none(), "a", &[]);
        logger.log(Level::INFO, &Colorizer::none(), "b", &[]);
        logger.log(Level::DEBUG, &Colorizer::none(), "c", &[]);

        assert_eq!(sink.snapshot(), vec!["[Error] a\n", "[Info] b\n"]);
    }

    #[test]
    fn audit_receives_gated_out_records() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("audit.jsonl");
        let sink = Arc::new(VecSink::new());
        let logger = Logger::with_sink(quiet_config(Level::new(40)), sink.clone())
            .with_audit(AuditWriter::new(Some(path.clone())));

        logger.log(Level::new(90), &RED, "error: %s", &[Arg::from("boom")]);

        assert!(sink.is_empty());
        let stored = records(&path);
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].level(), Level::new(90));
        assert_eq!(stored[0].color(), "Red");
        assert_eq!(stored[0].format(), "error: %s");
        assert_eq!(stored[0].args(), &[serde_json::json!("boom")]);
    }

    #[test]
    fn records_are_uncolored() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("audit.jsonl");
        let logger = Logger::with_sink(quiet_config(Level::MAX), Arc::new(VecSink::new()))
            .with_audit(AuditWriter::new(Some(path.clone())));

        logger.log(Level::INFO, &GREEN, "user %s", &[Arg::from("ada")]);

        let text = fs::read_to_string(&path).unwrap();
        assert!(!text.contains('\x1b'));
    }

    #[test]
    fn tid_is_dropped_when_tracking_is_off() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("audit.jsonl");
        let sink = Arc::new(VecSink::new());
        let logger = Logger::with_sink(quiet_config(Level::MAX), sink.clone())
            .with_audit(AuditWriter::new(Some(path.clone())));

        logger.task(7).log(Level::INFO, &Colorizer::none(), "x", &[]);

        assert_eq!(sink.snapshot(), vec!["[Info] x\n"]);
        assert_eq!(records(&path)[0].tid(), 0);
    }

    #[test]
    fn tid_is_shown_and_stored_when_tracking_is_on() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("audit.jsonl");
        let sink = Arc::new(VecSink::new());
        let config = Config::builder().track_tid(true).time_format("").build().unwrap();
        let logger =
            Logger::with_sink(config, sink.clone()).with_audit(AuditWriter::new(Some(path.clone())));

        logger.task(7).log(Level::INFO, &Colorizer::none(), "x", &[]);
        logger.log(Level::INFO, &Colorizer::none(), "y", &[]);

        assert_eq!(sink.snapshot(), vec!["[Info][7] x\n", "[Info][0] y\n"]);
        assert_eq!(records(&path)[0].tid(), 7);
    }

    #[test]
    fn rewrite_starts_with_carriage_return_and_has_no_newline() {
        let sink = Arc::new(VecSink::new());
        let logger = Logger::with_sink(quiet_config(Level::MAX), sink.clone());

        logger.log_rewrite(Level::INFO, &Colorizer::none(), "%d%%", &[Arg::from(50)]);

        let line = &sink.snapshot()[0];
        assert_eq!(line, &format!("[Info] \r50%{}", " ".repeat(20)));
    }

    #[test]
    fn json_block_is_labeled() {
        let sink = Arc::new(VecSink::new());
        let logger = Logger::with_sink(quiet_config(Level::MAX), sink.clone());

        logger.log_json(Level::INFO, &Colorizer::none(), "Settings", "{\"a\":1}");

        assert_eq!(
            sink.snapshot(),
            vec!["[Info] Settings (JSON):\n'''\n{\"a\":1}\n'''\n"]
        );
    }

    #[test]
    fn timestamp_precedes_prefix() {
        let sink = Arc::new(VecSink::new());
        let config = Config::builder()
            .time_format("%Y")
            .time_colorizer(Colorizer::none())
            .build()
            .unwrap();
        let logger = Logger::with_sink(config, sink.clone());

        logger.log(Level::INFO, &Colorizer::none(), "x", &[]);

        let line = &sink.snapshot()[0];
        let (year, rest) = line.split_once(' ').unwrap();
        assert_eq!(year.len(), 4);
        assert!(year.chars().all(|c| c.is_ascii_digit()));
        assert_eq!(rest, "[Info] x\n");
    }

    #[test]
    fn oversized_width_never_panics_the_caller() {
        let sink = Arc::new(VecSink::new());
        let logger = Logger::with_sink(quiet_config(Level::MAX), sink.clone());

        logger.log(Level::INFO, &Colorizer::none(), "%99999999999999999999d", &[Arg::from(1)]);

        assert_eq!(sink.snapshot(), vec!["[Info] %!(BADWIDTH)1\n"]);
    }

    #[test]
    fn sink_failures_are_swallowed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("audit.jsonl");
        let logger = Logger::with_sink(quiet_config(Level::MAX), Arc::new(FailingSink))
            .with_audit(AuditWriter::new(Some(path.clone())));

        logger.log(Level::INFO, &Colorizer::none(), "still recorded", &[]);

        assert_eq!(records(&path).len(), 1);
    }

    #[test]
    fn audit_path_follows_config() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::builder()
            .log_dir(dir.path())
            .container_id_var(None)
            .file_name_format("fixed.jsonl")
            .build()
            .unwrap();
        let logger = Logger::with_sink(config, Arc::new(VecSink::new()));

        assert_eq!(logger.audit_path(), Some(dir.path().join("fixed.jsonl").as_path()));
    }
}
