//! 24-bit colors and ANSI escape wrapping.
//!
//! Colors are applied per line: every line of the input is wrapped in its own
//! escape sequence and reset, so multi-line values stay colored even when a
//! terminal or pager resets attributes at line breaks. A trailing newline is
//! kept outside the escapes.

use std::fmt;
use std::str::FromStr;

use crate::config::{ConfigError, ConfigErrorKind};

const RESET: &str = "\x1b[0m";

/// A 24-bit RGB color.
///
/// # Examples
///
/// ```
/// use tintlog::Rgb;
///
/// let rgb: Rgb = "#d84f4f".parse().unwrap();
/// assert_eq!(rgb, Rgb::new(0xd8, 0x4f, 0x4f));
///
/// // Short forms double each digit; alpha is ignored.
/// assert_eq!("#fa0".parse::<Rgb>().unwrap(), Rgb::new(0xff, 0xaa, 0x00));
/// assert_eq!("#ffaa00cc".parse::<Rgb>().unwrap(), Rgb::new(0xff, 0xaa, 0x00));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    /// Red component.
    pub r: u8,
    /// Green component.
    pub g: u8,
    /// Blue component.
    pub b: u8,
}

impl Rgb {
    /// Creates a color from its components.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Creates a color from a packed `0xRRGGBB` value.
    pub const fn from_u32(hex: u32) -> Self {
        Self {
            r: (hex >> 16) as u8,
            g: (hex >> 8) as u8,
            b: hex as u8,
        }
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl FromStr for Rgb {
    type Err = ConfigError;

    /// Accepts `#RRGGBB`, `#RRGGBBAA`, `#RGB` and `#RGBA`, case-insensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |what: &str| {
            ConfigError::new(ConfigErrorKind::InvalidColor, format!("{what} in {s:?}"))
        };

        let digits = s
            .strip_prefix('#')
            .ok_or_else(|| invalid("want #RRGGBB, #RRGGBBAA, #RGB or #RGBA"))?
            .as_bytes();

        let channel = |i: usize, name: &str| -> Result<u8, ConfigError> {
            let parsed = match digits.len() {
                6 | 8 => nibble(digits[2 * i]).zip(nibble(digits[2 * i + 1])),
                3 | 4 => nibble(digits[i]).map(|n| (n, n)),
                _ => return Err(invalid("unsupported color format")),
            };
            parsed
                .map(|(hi, lo)| hi << 4 | lo)
                .ok_or_else(|| invalid(&format!("bad {name}")))
        };

        Ok(Rgb {
            r: channel(0, "R")?,
            g: channel(1, "G")?,
            b: channel(2, "B")?,
        })
    }
}

fn nibble(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

/// Builds the escape sequence that starts a foreground (and optional background) run.
pub(crate) fn escape(fg: Rgb, bg: Option<Rgb>, bold: bool) -> String {
    let bold = if bold { "1;" } else { "" };
    match bg {
        Some(bg) => format!(
            "\x1b[{bold}38;2;{};{};{};48;2;{};{};{}m",
            fg.r, fg.g, fg.b, bg.r, bg.g, bg.b
        ),
        None => format!("\x1b[{bold}38;2;{};{};{}m", fg.r, fg.g, fg.b),
    }
}

/// Wraps every line of `s` in `start` ... reset, keeping a trailing newline outside.
pub(crate) fn paint_lines(s: &str, start: &str) -> String {
    let (body, trailing) = match s.strip_suffix('\n') {
        Some(body) => (body, "\n"),
        None => (s, ""),
    };
    let mut out = String::with_capacity(s.len() + 16);
    for (i, line) in body.split('\n').enumerate() {
        if i > 0 {
            out.push('\n');
        }
        out.push_str(start);
        out.push_str(line);
        out.push_str(RESET);
    }
    out.push_str(trailing);
    out
}

/// The built-in palette: moderate-contrast base hues with bright and dim variants.
pub mod palette {
    use super::Rgb;

    /// `#ffffff`
    pub const WHITE: Rgb = Rgb::from_u32(0xffffff);
    /// `#000000`
    pub const BLACK: Rgb = Rgb::from_u32(0x000000);

    /// `#d84f4f`
    pub const RED: Rgb = Rgb::from_u32(0xd84f4f);
    /// `#e07f2f`
    pub const ORANGE: Rgb = Rgb::from_u32(0xe07f2f);
    /// `#d1b832`
    pub const YELLOW: Rgb = Rgb::from_u32(0xd1b832);
    /// `#46a65f`
    pub const GREEN: Rgb = Rgb::from_u32(0x46a65f);
    /// `#3aa6b5`
    pub const CYAN: Rgb = Rgb::from_u32(0x3aa6b5);
    /// `#5476cb`
    pub const BLUE: Rgb = Rgb::from_u32(0x5476cb);
    /// `#8d5ec3`
    pub const PURPLE: Rgb = Rgb::from_u32(0x8d5ec3);
    /// `#80858f`
    pub const GRAY: Rgb = Rgb::from_u32(0x80858f);

    /// `#f19a9a`
    pub const BRIGHT_RED: Rgb = Rgb::from_u32(0xf19a9a);
    /// `#f1b77c`
    pub const BRIGHT_ORANGE: Rgb = Rgb::from_u32(0xf1b77c);
    /// `#ece08a`
    pub const BRIGHT_YELLOW: Rgb = Rgb::from_u32(0xece08a);
    /// `#90d0a6`
    pub const BRIGHT_GREEN: Rgb = Rgb::from_u32(0x90d0a6);
    /// `#8fd0d8`
    pub const BRIGHT_CYAN: Rgb = Rgb::from_u32(0x8fd0d8);
    /// `#a1b6e8`
    pub const BRIGHT_BLUE: Rgb = Rgb::from_u32(0xa1b6e8);
    /// `#c4a6e4`
    pub const BRIGHT_PURPLE: Rgb = Rgb::from_u32(0xc4a6e4);
    /// `#bcc1c9`
    pub const BRIGHT_GRAY: Rgb = Rgb::from_u32(0xbcc1c9);

    /// `#8f3434`
    pub const DIM_RED: Rgb = Rgb::from_u32(0x8f3434);
    /// `#9a5c24`
    pub const DIM_ORANGE: Rgb = Rgb::from_u32(0x9a5c24);
    /// `#948826`
    pub const DIM_YELLOW: Rgb = Rgb::from_u32(0x948826);
    /// `#316f45`
    pub const DIM_GREEN: Rgb = Rgb::from_u32(0x316f45);
    /// `#2a707a`
    pub const DIM_CYAN: Rgb = Rgb::from_u32(0x2a707a);
    /// `#3a528a`
    pub const DIM_BLUE: Rgb = Rgb::from_u32(0x3a528a);
    /// `#5f4285`
    pub const DIM_PURPLE: Rgb = Rgb::from_u32(0x5f4285);
    /// `#565b64`
    pub const DIM_GRAY: Rgb = Rgb::from_u32(0x565b64);
}
