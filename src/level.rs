use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::{ConfigError, ConfigErrorKind};

/// Band names, one per decade. Index `n` names the levels `10 * n ..= 10 * n + 9`.
const BANDS: [&str; 10] = [
    "Fatal", "Critical", "Error", "Warning", "Notice", "Info", "Debug", "Verbose", "Trace", "Spam",
];

/// Severity of a log call.
///
/// Smaller values are more severe. A configured threshold is a verbosity
/// *ceiling*: an event reaches the terminal iff `level <= threshold`.
///
/// Levels are grouped in decades. Each decade has a base name and the
/// values inside it are named by offset, so `55` is `Info5` and `73` is
/// `Verbose3`.
///
/// # Examples
///
/// ```
/// use tintlog::Level;
///
/// assert_eq!(Level::INFO.name(), "Info");
/// assert_eq!(Level::new(55).name(), "Info5");
/// assert!(Level::ERROR < Level::INFO);
///
/// let threshold = Level::NOTICE;
/// assert!(threshold.admits(Level::ERROR));
/// assert!(!threshold.admits(Level::DEBUG));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Level(u8);

impl Level {
    /// Unrecoverable failures.
    pub const FATAL: Level = Level(0);
    /// Failures that need immediate attention.
    pub const CRITICAL: Level = Level(10);
    /// Failed operations.
    pub const ERROR: Level = Level(20);
    /// Suspicious but recoverable conditions.
    pub const WARNING: Level = Level(30);
    /// Significant normal events.
    pub const NOTICE: Level = Level(40);
    /// Routine progress.
    pub const INFO: Level = Level(50);
    /// Developer diagnostics.
    pub const DEBUG: Level = Level(60);
    /// Detailed diagnostics.
    pub const VERBOSE: Level = Level(70);
    /// Step-by-step tracing.
    pub const TRACE: Level = Level(80);
    /// Everything else.
    pub const SPAM: Level = Level(90);
    /// The most verbose level; as a threshold it admits every event.
    pub const MAX: Level = Level(u8::MAX);

    /// Creates a level from its numeric code.
    pub const fn new(value: u8) -> Self {
        Level(value)
    }

    /// Returns the numeric code.
    pub const fn value(self) -> u8 {
        self.0
    }

    /// Returns the stable display name of this level.
    pub fn name(self) -> Cow<'static, str> {
        let band = usize::from(self.0 / 10);
        let offset = self.0 % 10;
        match BANDS.get(band) {
            Some(base) if offset == 0 => Cow::Borrowed(base),
            Some(base) => Cow::Owned(format!("{base}{offset}")),
            None => Cow::Owned(format!("Level{}", self.0)),
        }
    }

    /// Treating `self` as a threshold, reports whether `level` is shown.
    pub fn admits(self, level: Level) -> bool {
        level <= self
    }
}

impl Default for Level {
    fn default() -> Self {
        Level::MAX
    }
}

impl From<u8> for Level {
    fn from(value: u8) -> Self {
        Level(value)
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

impl FromStr for Level {
    type Err = ConfigError;

    /// Parses either a numeric code (`"55"`) or a name (`"Info5"`, `"warning"`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(value) = s.parse::<u8>() {
            return Ok(Level(value));
        }

        let invalid = || ConfigError::new(ConfigErrorKind::Parse, format!("unknown level {s:?}"));

        if s.get(..5).is_some_and(|p| p.eq_ignore_ascii_case("level")) {
            return s[5..].parse::<u8>().map(Level).map_err(|_| invalid());
        }

        let digits_at = s
            .find(|c: char| c.is_ascii_digit())
            .unwrap_or(s.len());
        let (base, offset) = s.split_at(digits_at);
        let band = BANDS
            .iter()
            .position(|b| b.eq_ignore_ascii_case(base))
            .ok_or_else(invalid)?;
        let offset = match offset {
            "" => 0,
            digit if digit.len() == 1 => digit.parse::<u8>().map_err(|_| invalid())?,
            _ => return Err(invalid()),
        };
        // band <= 9 and offset <= 9, so this stays below 100
        Ok(Level(band as u8 * 10 + offset))
    }
}
