use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::color::{escape, paint_lines, palette, Rgb};

/// A user-supplied transform.
pub type PaintFn = Arc<dyn Fn(&str) -> String + Send + Sync>;

#[derive(Clone)]
enum Paint {
    None,
    Fg { fg: Rgb, bold: bool },
    FgBg { fg: Rgb, bg: Rgb, bold: bool },
    Custom(PaintFn),
}

/// A named, display-only text transform.
///
/// A colorizer may carry no transform at all, in which case [`apply`](Self::apply)
/// returns its input unchanged. Only the name is ever persisted; the reader
/// resolves it again through a [`Registry`].
///
/// # Examples
///
/// ```
/// use tintlog::{Colorizer, colorizer};
///
/// assert_eq!(colorizer::NO_COLOR.apply("plain"), "plain");
/// assert_eq!(Colorizer::none().name(), "");
///
/// let red = colorizer::RED.apply("boom");
/// assert!(red.starts_with("\x1b[38;2;"));
/// assert!(red.ends_with("boom\x1b[0m"));
/// ```
#[derive(Clone)]
pub struct Colorizer {
    name: Cow<'static, str>,
    paint: Paint,
}

impl Colorizer {
    /// A colorizer with no name and no transform.
    pub const fn none() -> Self {
        Self {
            name: Cow::Borrowed(""),
            paint: Paint::None,
        }
    }

    /// A named colorizer with no transform.
    pub const fn plain(name: &'static str) -> Self {
        Self {
            name: Cow::Borrowed(name),
            paint: Paint::None,
        }
    }

    /// A per-line foreground colorizer.
    pub const fn fg(name: &'static str, fg: Rgb, bold: bool) -> Self {
        Self {
            name: Cow::Borrowed(name),
            paint: Paint::Fg { fg, bold },
        }
    }

    /// A per-line foreground + background colorizer.
    pub const fn fg_bg(name: &'static str, fg: Rgb, bg: Rgb, bold: bool) -> Self {
        Self {
            name: Cow::Borrowed(name),
            paint: Paint::FgBg { fg, bg, bold },
        }
    }

    /// A foreground colorizer with a runtime name, e.g. one parsed from config.
    pub fn named_fg(name: impl Into<String>, fg: Rgb, bold: bool) -> Self {
        Self {
            name: Cow::Owned(name.into()),
            paint: Paint::Fg { fg, bold },
        }
    }

    /// A colorizer backed by an arbitrary transform.
    pub fn custom<F>(name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        Self {
            name: Cow::Owned(name.into()),
            paint: Paint::Custom(Arc::new(f)),
        }
    }

    /// Returns the registry name (empty for [`Colorizer::none`]).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns `true` if applying this colorizer changes nothing.
    pub fn is_noop(&self) -> bool {
        matches!(self.paint, Paint::None)
    }

    /// Applies the transform; a colorizer without one returns `s` unchanged.
    pub fn apply(&self, s: &str) -> String {
        match &self.paint {
            Paint::None => s.to_string(),
            Paint::Fg { fg, bold } => paint_lines(s, &escape(*fg, None, *bold)),
            Paint::FgBg { fg, bg, bold } => paint_lines(s, &escape(*fg, Some(*bg), *bold)),
            Paint::Custom(f) => f(s),
        }
    }
}

impl Default for Colorizer {
    fn default() -> Self {
        Self::none()
    }
}

impl fmt::Debug for Colorizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match &self.paint {
            Paint::None => "none",
            Paint::Fg { .. } => "fg",
            Paint::FgBg { .. } => "fg_bg",
            Paint::Custom(_) => "custom",
        };
        f.debug_struct("Colorizer")
            .field("name", &self.name)
            .field("paint", &kind)
            .finish()
    }
}

// ============================================================================
// Built-in colorizers
// ============================================================================

/// Explicitly uncolored; unlike [`Colorizer::none`] its name is recorded.
pub const NO_COLOR: Colorizer = Colorizer::plain("NoColor");

/// Red text.
pub const RED: Colorizer = Colorizer::fg("Red", palette::RED, false);
/// Orange text.
pub const ORANGE: Colorizer = Colorizer::fg("Orange", palette::ORANGE, false);
/// Yellow text.
pub const YELLOW: Colorizer = Colorizer::fg("Yellow", palette::YELLOW, false);
/// Green text.
pub const GREEN: Colorizer = Colorizer::fg("Green", palette::GREEN, false);
/// Cyan text.
pub const CYAN: Colorizer = Colorizer::fg("Cyan", palette::CYAN, false);
/// Blue text.
pub const BLUE: Colorizer = Colorizer::fg("Blue", palette::BLUE, false);
/// Purple text.
pub const PURPLE: Colorizer = Colorizer::fg("Purple", palette::PURPLE, false);
/// Gray text.
pub const GRAY: Colorizer = Colorizer::fg("Gray", palette::GRAY, false);

/// Bright red text.
pub const BRIGHT_RED: Colorizer = Colorizer::fg("BrightRed", palette::BRIGHT_RED, false);
/// Bright orange text.
pub const BRIGHT_ORANGE: Colorizer = Colorizer::fg("BrightOrange", palette::BRIGHT_ORANGE, false);
/// Bright yellow text.
pub const BRIGHT_YELLOW: Colorizer = Colorizer::fg("BrightYellow", palette::BRIGHT_YELLOW, false);
/// Bright green text.
pub const BRIGHT_GREEN: Colorizer = Colorizer::fg("BrightGreen", palette::BRIGHT_GREEN, false);
/// Bright cyan text.
pub const BRIGHT_CYAN: Colorizer = Colorizer::fg("BrightCyan", palette::BRIGHT_CYAN, false);
/// Bright blue text.
pub const BRIGHT_BLUE: Colorizer = Colorizer::fg("BrightBlue", palette::BRIGHT_BLUE, false);
/// Bright purple text.
pub const BRIGHT_PURPLE: Colorizer = Colorizer::fg("BrightPurple", palette::BRIGHT_PURPLE, false);
/// Bright gray text.
pub const BRIGHT_GRAY: Colorizer = Colorizer::fg("BrightGray", palette::BRIGHT_GRAY, false);

/// Dim red text.
pub const DIM_RED: Colorizer = Colorizer::fg("DimRed", palette::DIM_RED, false);
/// Dim orange text.
pub const DIM_ORANGE: Colorizer = Colorizer::fg("DimOrange", palette::DIM_ORANGE, false);
/// Dim yellow text.
pub const DIM_YELLOW: Colorizer = Colorizer::fg("DimYellow", palette::DIM_YELLOW, false);
/// Dim green text.
pub const DIM_GREEN: Colorizer = Colorizer::fg("DimGreen", palette::DIM_GREEN, false);
/// Dim cyan text.
pub const DIM_CYAN: Colorizer = Colorizer::fg("DimCyan", palette::DIM_CYAN, false);
/// Dim blue text.
pub const DIM_BLUE: Colorizer = Colorizer::fg("DimBlue", palette::DIM_BLUE, false);
/// Dim purple text.
pub const DIM_PURPLE: Colorizer = Colorizer::fg("DimPurple", palette::DIM_PURPLE, false);
/// Dim gray text.
pub const DIM_GRAY: Colorizer = Colorizer::fg("DimGray", palette::DIM_GRAY, false);

/// Bold red text.
pub const RED_BOLD: Colorizer = Colorizer::fg("RedBold", palette::RED, true);
/// Bold green text.
pub const GREEN_BOLD: Colorizer = Colorizer::fg("GreenBold", palette::GREEN, true);
/// Bold blue text.
pub const BLUE_BOLD: Colorizer = Colorizer::fg("BlueBold", palette::BLUE, true);
/// Black text on red.
pub const RED_BACKGROUND: Colorizer =
    Colorizer::fg_bg("RedBackground", palette::BLACK, palette::RED, false);
/// Bold black text on red.
pub const RED_BOLD_BACKGROUND: Colorizer =
    Colorizer::fg_bg("RedBoldBackground", palette::BLACK, palette::RED, true);

const BUILTIN: [Colorizer; 30] = [
    NO_COLOR,
    RED,
    ORANGE,
    YELLOW,
    GREEN,
    CYAN,
    BLUE,
    PURPLE,
    GRAY,
    BRIGHT_RED,
    BRIGHT_ORANGE,
    BRIGHT_YELLOW,
    BRIGHT_GREEN,
    BRIGHT_CYAN,
    BRIGHT_BLUE,
    BRIGHT_PURPLE,
    BRIGHT_GRAY,
    DIM_RED,
    DIM_ORANGE,
    DIM_YELLOW,
    DIM_GREEN,
    DIM_CYAN,
    DIM_BLUE,
    DIM_PURPLE,
    DIM_GRAY,
    RED_BOLD,
    GREEN_BOLD,
    BLUE_BOLD,
    RED_BACKGROUND,
    RED_BOLD_BACKGROUND,
];

// ============================================================================
// Registry
// ============================================================================

/// Name → colorizer lookup used to restore colors from stored records.
///
/// [`Registry::default`] holds every built-in colorizer. Unknown names
/// resolve to [`Colorizer::none`].
///
/// # Examples
///
/// ```
/// use tintlog::{Colorizer, Registry};
///
/// let mut registry = Registry::default();
/// registry.register(Colorizer::custom("Shout", |s| s.to_uppercase()));
///
/// assert_eq!(registry.resolve("Shout").apply("hi"), "HI");
/// assert_eq!(registry.resolve("NoSuchColor").apply("hi"), "hi");
/// ```
#[derive(Debug, Clone)]
pub struct Registry {
    colorizers: HashMap<String, Colorizer>,
}

impl Registry {
    /// Creates a registry with no entries.
    pub fn empty() -> Self {
        Self {
            colorizers: HashMap::new(),
        }
    }

    /// Adds or replaces a colorizer under its own name.
    pub fn register(&mut self, colorizer: Colorizer) -> &mut Self {
        self.colorizers
            .insert(colorizer.name().to_string(), colorizer);
        self
    }

    /// Looks up a colorizer by name.
    pub fn get(&self, name: &str) -> Option<&Colorizer> {
        self.colorizers.get(name)
    }

    /// Looks up a colorizer by name, falling back to a no-op.
    pub fn resolve(&self, name: &str) -> Colorizer {
        self.get(name).cloned().unwrap_or_default()
    }

    /// Returns the registered names in sorted order.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.colorizers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Returns the number of registered colorizers.
    pub fn len(&self) -> usize {
        self.colorizers.len()
    }

    /// Returns `true` if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.colorizers.is_empty()
    }
}

impl Default for Registry {
    fn default() -> Self {
        let mut registry = Self::empty();
        for colorizer in BUILTIN {
            registry.register(colorizer);
        }
        registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn none_is_identity() {
        let c = Colorizer::none();
        assert!(c.is_noop());
        assert_eq!(c.apply("a\nb\n"), "a\nb\n");
    }

    #[test]
    fn fg_wraps_each_line() {
        let out = RED.apply("one\ntwo");
        assert_eq!(out.matches("\x1b[0m").count(), 2);
        assert!(out.contains("one\x1b[0m\n\x1b[38;2;216;79;79mtwo"));
    }

    #[test]
    fn bold_background_sequence() {
        let out = RED_BOLD_BACKGROUND.apply("x");
        assert_eq!(out, "\x1b[1;38;2;0;0;0;48;2;216;79;79mx\x1b[0m");
    }

    #[test]
    fn default_registry_holds_builtins() {
        let registry = Registry::default();
        assert_eq!(registry.len(), BUILTIN.len());
        assert_eq!(registry.resolve("Green").apply("g"), GREEN.apply("g"));
        assert_eq!(registry.resolve("NoColor").name(), "NoColor");
    }

    #[test]
    fn names_are_sorted() {
        let mut registry = Registry::empty();
        registry.register(YELLOW).register(BLUE).register(RED);
        assert_eq!(registry.names(), vec!["Blue", "Red", "Yellow"]);
    }

    #[test]
    fn unknown_name_falls_back_to_noop() {
        let registry = Registry::default();
        let c = registry.resolve("Chartreuse");
        assert!(c.is_noop());
        assert_eq!(c.apply("x"), "x");
    }

    #[test]
    fn register_replaces_existing() {
        let mut registry = Registry::default();
        registry.register(Colorizer::custom("Red", |s| format!("<{s}>")));
        assert_eq!(registry.resolve("Red").apply("x"), "<x>");
        assert_eq!(registry.len(), BUILTIN.len());
    }

    #[test]
    fn debug_shows_name_only() {
        let debug = format!("{:?}", Colorizer::custom("Mine", |s| s.to_string()));
        assert!(debug.contains("Mine"));
        assert!(debug.contains("custom"));
    }
}
