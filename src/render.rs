//! Assembly of one interactive line: `timestamp [Level][tid] body`.
//!
//! The emitter and the reader both go through [`LineRenderer`], so a record
//! replayed from the audit trail prints exactly what the live logger would
//! have printed with the same settings.

use std::fmt::{self, Write as _};

use chrono::{DateTime, TimeZone};

use crate::{interpolate_with, pretty, Arg, Colorizer, Level};

/// Formats `time` with a strftime layout, or `None` if the layout is invalid.
pub(crate) fn format_time<Tz>(time: &DateTime<Tz>, layout: &str) -> Option<String>
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    let mut out = String::new();
    write!(out, "{}", time.format(layout)).ok()?;
    Some(out)
}

/// Renders lines from their parts with fixed timestamp settings.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use tintlog::{Arg, Colorizer, Level, LineRenderer};
///
/// let renderer = LineRenderer::new("%H:%M:%S", Colorizer::none());
/// let time = Utc.with_ymd_and_hms(2025, 1, 1, 12, 30, 0).unwrap();
///
/// let line = renderer.render(
///     &time,
///     Level::INFO,
///     Some(7),
///     &Colorizer::none(),
///     "hello %s",
///     &[Arg::from("world")],
///     true,
/// );
/// assert_eq!(line, "12:30:00 [Info][7] hello world\n");
/// ```
#[derive(Debug, Clone)]
pub struct LineRenderer {
    time_format: String,
    time_colorizer: Colorizer,
}

impl LineRenderer {
    /// Creates a renderer; a blank `time_format` omits timestamps.
    pub fn new(time_format: impl Into<String>, time_colorizer: Colorizer) -> Self {
        Self {
            time_format: time_format.into(),
            time_colorizer,
        }
    }

    /// The colorized timestamp followed by a space, or an empty string.
    pub fn timestamp<Tz>(&self, time: &DateTime<Tz>) -> String
    where
        Tz: TimeZone,
        Tz::Offset: fmt::Display,
    {
        if self.time_format.trim().is_empty() {
            return String::new();
        }
        let raw = format_time(time, &self.time_format).unwrap_or_else(|| time.to_rfc3339());
        let mut out = self.time_colorizer.apply(&raw);
        out.push(' ');
        out
    }

    /// Renders the full line.
    #[allow(clippy::too_many_arguments)]
    pub fn render<Tz>(
        &self,
        time: &DateTime<Tz>,
        level: Level,
        tid: Option<u64>,
        colorizer: &Colorizer,
        template: &str,
        args: &[Arg],
        newline: bool,
    ) -> String
    where
        Tz: TimeZone,
        Tz::Offset: fmt::Display,
    {
        let mut line = self.timestamp(time);
        line.push_str(&prefix(level, tid, colorizer));
        line.push_str(&body(template, args, colorizer, newline));
        line
    }
}

/// `[Level] ` or `[Level][tid] ` with both tokens colorized.
pub fn prefix(level: Level, tid: Option<u64>, colorizer: &Colorizer) -> String {
    let mut out = format!("[{}]", colorizer.apply(&level.name()));
    if let Some(tid) = tid {
        let _ = write!(out, "[{}]", colorizer.apply(&tid.to_string()));
    }
    out.push(' ');
    out
}

/// Pretty-renders each argument and interpolates the template, colorizing
/// each argument after width and precision are applied.
pub fn body(template: &str, args: &[Arg], colorizer: &Colorizer, newline: bool) -> String {
    let rendered: Vec<String> = args.iter().map(pretty).collect();
    let mut body = interpolate_with(template, &rendered, |s| colorizer.apply(s));
    if newline && !body.ends_with('\n') {
        body.push('\n');
    }
    body
}
