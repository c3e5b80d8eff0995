use std::env;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, TimeZone};
use serde::Deserialize;

use crate::colorizer::{self, Colorizer, Registry};
use crate::render::format_time;
use crate::{Error, Level, ReadError, Rgb};

/// Default timestamp layout, e.g. `2025/Nov/09 18:19:26`.
pub const DEFAULT_TIME_FORMAT: &str = "%Y/%b/%d %H:%M:%S";

/// Default audit file name layout, e.g. `09_Nov_2025_18_19_26.jsonl`.
pub const DEFAULT_FILE_NAME_FORMAT: &str = "%d_%b_%Y_%H_%M_%S.jsonl";

/// Default environment variable naming the per-instance log sub-directory.
pub const DEFAULT_CONTAINER_ID_VAR: &str = "HOSTNAME";

/// Setting the container id variable to this value disables the sub-directory.
pub const CONTAINER_ID_DISABLED: &str = "NONE";

/// Error returned when a configuration value is malformed.
///
/// # Examples
///
/// ```
/// use tintlog::{Config, ConfigErrorKind};
///
/// let err = Config::builder().time_format("%Y-%Q").build().unwrap_err();
/// assert_eq!(err.kind(), ConfigErrorKind::InvalidTimeFormat);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    kind: ConfigErrorKind,
    message: String,
}

impl ConfigError {
    /// Creates a new configuration error.
    pub fn new(kind: ConfigErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Returns the error kind.
    pub fn kind(&self) -> ConfigErrorKind {
        self.kind
    }

    /// Returns the error message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid configuration ({}): {}", self.kind, self.message)
    }
}

impl std::error::Error for ConfigError {}

/// Kind of configuration error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigErrorKind {
    /// A strftime layout contains an unknown specifier.
    InvalidTimeFormat,
    /// A color is neither a known colorizer name nor a hex color.
    InvalidColor,
    /// A value could not be parsed at all.
    Parse,
}

impl fmt::Display for ConfigErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidTimeFormat => write!(f, "time format"),
            Self::InvalidColor => write!(f, "color"),
            Self::Parse => write!(f, "parse"),
        }
    }
}

/// Checks that `layout` is a strftime layout chrono can render.
pub fn validate_time_format(layout: &str) -> Result<(), ConfigError> {
    if StrftimeItems::new(layout).any(|item| matches!(item, Item::Error)) {
        return Err(ConfigError::new(
            ConfigErrorKind::InvalidTimeFormat,
            format!("unsupported specifier in {layout:?}"),
        ));
    }
    Ok(())
}

/// Process-wide logger settings.
///
/// A `Config` is only obtained through [`ConfigBuilder::build`] (or
/// [`Config::default`]), which validates every layout, and it is never
/// mutated afterwards.
///
/// # Examples
///
/// ```
/// use tintlog::{Config, Level};
///
/// let config = Config::builder()
///     .threshold(Level::INFO)
///     .track_tid(true)
///     .time_format("")
///     .build()
///     .expect("valid config");
///
/// assert_eq!(config.threshold(), Level::INFO);
/// assert!(config.track_tid());
/// assert!(config.time_format().is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    threshold: Level,
    time_format: String,
    track_tid: bool,
    time_colorizer: Colorizer,
    log_dir: Option<PathBuf>,
    container_id_var: Option<String>,
    file_name_format: String,
}

impl Config {
    /// Starts a builder preloaded with the defaults.
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::new()
    }

    /// Builds a config from a partial JSON document, defaulting missing fields.
    ///
    /// `time_color` may name a colorizer in `registry` or be a hex color.
    ///
    /// # Examples
    ///
    /// ```
    /// use tintlog::{Config, Level, Registry};
    ///
    /// let config = Config::from_json(
    ///     r##"{"log_level": 40, "use_tid": true, "time_color": "#808080"}"##,
    ///     &Registry::default(),
    /// )
    /// .unwrap();
    /// assert_eq!(config.threshold(), Level::NOTICE);
    /// assert!(config.track_tid());
    /// ```
    pub fn from_json(json: &str, registry: &Registry) -> Result<Self, ConfigError> {
        let file: FileConfig = serde_json::from_str(json)
            .map_err(|e| ConfigError::new(ConfigErrorKind::Parse, e.to_string()))?;
        file.into_builder(registry)?.build()
    }

    /// Reads a JSON config file and builds a config from it.
    ///
    /// A file that cannot be read yields [`Error::Read`]; a document that
    /// [`Config::from_json`] rejects yields [`Error::Config`].
    pub fn load(path: impl AsRef<Path>, registry: &Registry) -> Result<Self, Error> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| ReadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::from_json(&json, registry)?)
    }

    /// The verbosity ceiling for the interactive sink.
    pub fn threshold(&self) -> Level {
        self.threshold
    }

    /// The strftime layout for timestamps; empty disables them.
    pub fn time_format(&self) -> &str {
        &self.time_format
    }

    /// Whether task ids are shown and stored.
    pub fn track_tid(&self) -> bool {
        self.track_tid
    }

    /// The colorizer applied to timestamps.
    pub fn time_colorizer(&self) -> &Colorizer {
        &self.time_colorizer
    }

    /// The audit log directory, if the audit trail is enabled.
    pub fn log_dir(&self) -> Option<&Path> {
        self.log_dir.as_deref()
    }

    /// The environment variable naming a per-instance sub-directory.
    pub fn container_id_var(&self) -> Option<&str> {
        self.container_id_var.as_deref()
    }

    /// The strftime layout of the audit file name.
    pub fn file_name_format(&self) -> &str {
        &self.file_name_format
    }

    /// Resolves the audit file path for a logger started at `now`.
    ///
    /// Returns `None` when no log directory is configured. When the container
    /// id variable is set to a non-empty value, its value becomes an extra
    /// directory level.
    pub fn audit_path<Tz>(&self, now: &DateTime<Tz>) -> Option<PathBuf>
    where
        Tz: TimeZone,
        Tz::Offset: fmt::Display,
    {
        let mut dir = self.log_dir.clone()?;
        if let Some(var) = self.container_id_var.as_deref() {
            if var != CONTAINER_ID_DISABLED {
                if let Ok(id) = env::var(var) {
                    if !id.trim().is_empty() {
                        dir.push(id.trim());
                    }
                }
            }
        }
        let name = format_time(now, &self.file_name_format)
            .unwrap_or_else(|| format!("{}.jsonl", now.timestamp()));
        Some(dir.join(name))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            threshold: Level::MAX,
            time_format: DEFAULT_TIME_FORMAT.to_string(),
            track_tid: false,
            time_colorizer: colorizer::DIM_GRAY,
            log_dir: None,
            container_id_var: Some(DEFAULT_CONTAINER_ID_VAR.to_string()),
            file_name_format: DEFAULT_FILE_NAME_FORMAT.to_string(),
        }
    }
}

/// Builder for [`Config`]. Every field starts at its default.
#[derive(Debug, Clone)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Creates a builder holding the default configuration.
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    /// Sets the verbosity ceiling.
    pub fn threshold(mut self, level: Level) -> Self {
        self.config.threshold = level;
        self
    }

    /// Sets the timestamp layout; an empty or blank layout disables timestamps.
    pub fn time_format(mut self, layout: impl Into<String>) -> Self {
        self.config.time_format = layout.into();
        self
    }

    /// Enables or disables task id tracking.
    pub fn track_tid(mut self, enabled: bool) -> Self {
        self.config.track_tid = enabled;
        self
    }

    /// Sets the timestamp colorizer.
    pub fn time_colorizer(mut self, colorizer: Colorizer) -> Self {
        self.config.time_colorizer = colorizer;
        self
    }

    /// Enables the audit trail in `dir`.
    pub fn log_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.log_dir = Some(dir.into());
        self
    }

    /// Sets or clears the container id variable.
    pub fn container_id_var(mut self, var: Option<String>) -> Self {
        self.config.container_id_var = var;
        self
    }

    /// Sets the audit file name layout.
    pub fn file_name_format(mut self, layout: impl Into<String>) -> Self {
        self.config.file_name_format = layout.into();
        self
    }

    /// Validates the layouts and returns the finished config.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigErrorKind::InvalidTimeFormat`] error if either layout
    /// contains an unsupported specifier or the file name layout is blank.
    pub fn build(self) -> Result<Config, ConfigError> {
        validate_time_format(&self.config.time_format)?;
        validate_time_format(&self.config.file_name_format)?;
        if self.config.file_name_format.trim().is_empty() {
            return Err(ConfigError::new(
                ConfigErrorKind::InvalidTimeFormat,
                "file name format must not be empty",
            ));
        }
        Ok(self.config)
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// The serialized, partial form of [`Config`] as found in a config file.
///
/// Every field is optional; missing fields keep their default.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    /// Verbosity ceiling as a number.
    pub log_level: Option<u8>,
    /// Audit log directory.
    pub log_dir: Option<PathBuf>,
    /// Environment variable naming a per-instance sub-directory.
    pub container_id_var_name: Option<String>,
    /// Task id tracking.
    pub use_tid: Option<bool>,
    /// Timestamp layout.
    pub time_format: Option<String>,
    /// Audit file name layout.
    pub log_file_format: Option<String>,
    /// Timestamp colorizer: a registry name or a hex color.
    pub time_color: Option<String>,
}

impl FileConfig {
    /// Applies the present fields over the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigErrorKind::InvalidColor`] if `time_color` is neither a
    /// registered name nor a hex color.
    pub fn into_builder(self, registry: &Registry) -> Result<ConfigBuilder, ConfigError> {
        let mut builder = ConfigBuilder::new();

        match self.log_level {
            Some(level) => builder = builder.threshold(Level::new(level)),
            None => tracing::debug!(field = "log_level", "using default"),
        }
        if let Some(dir) = self.log_dir.filter(|d| !d.as_os_str().is_empty()) {
            builder = builder.log_dir(dir);
        }
        match self.container_id_var_name {
            Some(var) => builder = builder.container_id_var(Some(var)),
            None => tracing::debug!(field = "container_id_var_name", "using default"),
        }
        match self.use_tid {
            Some(enabled) => builder = builder.track_tid(enabled),
            None => tracing::debug!(field = "use_tid", "using default"),
        }
        match self.time_format {
            Some(layout) => builder = builder.time_format(layout),
            None => tracing::debug!(field = "time_format", "using default"),
        }
        match self.log_file_format {
            Some(layout) => builder = builder.file_name_format(layout),
            None => tracing::debug!(field = "log_file_format", "using default"),
        }
        match self.time_color {
            Some(spec) => builder = builder.time_colorizer(resolve_color(&spec, registry)?),
            None => tracing::debug!(field = "time_color", "using default"),
        }

        Ok(builder)
    }
}

/// Resolves a color setting: a registry name first, then a hex color.
pub fn resolve_color(spec: &str, registry: &Registry) -> Result<Colorizer, ConfigError> {
    if let Some(colorizer) = registry.get(spec) {
        return Ok(colorizer.clone());
    }
    let rgb: Rgb = spec.parse().map_err(|e: ConfigError| {
        ConfigError::new(
            ConfigErrorKind::InvalidColor,
            format!("{spec:?} is not a known colorizer and {}", e.message()),
        )
    })?;
    Ok(Colorizer::named_fg(spec, rgb, false))
}
