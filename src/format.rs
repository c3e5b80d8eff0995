//! printf-style template interpolation.
//!
//! Templates are stored verbatim in the audit trail and interpolated again by
//! the reader, so the syntax is plain data rather than Rust's compile-time
//! `format!` machinery. Every verb consumes the next argument, which has
//! already been rendered (and possibly colorized) to a string:
//!
//! | syntax        | meaning                                   |
//! |---------------|-------------------------------------------|
//! | `%s` `%v` `%d` ... | the argument text                    |
//! | `%q`          | the argument text, double-quoted          |
//! | `%-8s` `%08d` | width with left-align or zero padding     |
//! | `%.3s`        | precision: keep at most 3 characters      |
//! | `%%`          | a literal `%`                             |
//!
//! Mismatches never fail: a verb without an argument renders as
//! `%!v(MISSING)`, leftover arguments are appended as
//! `%!(EXTRA string=...)`, and a lone trailing `%` renders as `%!(NOVERB)`.
//! A width or precision above 1,000,000 renders as `%!(BADWIDTH)` or
//! `%!(BADPREC)` and is ignored.
//!
//! Width and precision count the characters of the argument itself. With
//! [`interpolate_with`] the argument is painted after it is cut and the
//! padding stays outside the paint, so color escapes never skew alignment.

use std::fmt::Write as _;
use std::iter::Peekable;
use std::str::Chars;

/// Largest accepted width or precision.
const MAX_WIDTH: usize = 1_000_000;

#[derive(Debug, Default)]
struct Spec {
    left: bool,
    zero: bool,
    width: usize,
    precision: Option<usize>,
}

impl Spec {
    fn apply<F>(&self, text: &str, paint: &F, out: &mut String)
    where
        F: Fn(&str) -> String,
    {
        let text: String = match self.precision {
            Some(p) => text.chars().take(p).collect(),
            None => text.to_string(),
        };
        let pad = self.width.saturating_sub(text.chars().count());
        if self.left {
            out.push_str(&paint(&text));
            out.extend(std::iter::repeat(' ').take(pad));
        } else {
            let fill = if self.zero { '0' } else { ' ' };
            out.extend(std::iter::repeat(fill).take(pad));
            out.push_str(&paint(&text));
        }
    }
}

/// Consumes a run of digits; `None` if the value exceeds [`MAX_WIDTH`].
fn parse_num(chars: &mut Peekable<Chars<'_>>) -> Option<usize> {
    let mut value = 0usize;
    let mut too_large = false;
    while let Some(digit) = chars.peek().and_then(|c| c.to_digit(10)) {
        chars.next();
        value = value * 10 + digit as usize;
        if value > MAX_WIDTH {
            too_large = true;
            value = MAX_WIDTH;
        }
    }
    (!too_large).then_some(value)
}

/// Substitutes `args` into `template`.
///
/// # Examples
///
/// ```
/// use tintlog::interpolate;
///
/// assert_eq!(interpolate("%s=%d (100%%)", &["load", "42"]), "load=42 (100%)");
/// assert_eq!(interpolate("[%-5s]", &["ab"]), "[ab   ]");
/// assert_eq!(interpolate("%s and %s", &["one"]), "one and %!s(MISSING)");
/// ```
pub fn interpolate<S: AsRef<str>>(template: &str, args: &[S]) -> String {
    interpolate_with(template, args, |s| s.to_string())
}

/// Like [`interpolate`], passing each substituted argument through `paint`
/// after width and precision are applied to its plain text.
///
/// ```
/// use tintlog::interpolate_with;
///
/// let out = interpolate_with("[%-4s]", &["ab"], |s| format!("<{s}>"));
/// assert_eq!(out, "[<ab>  ]");
/// ```
pub fn interpolate_with<S, F>(template: &str, args: &[S], paint: F) -> String
where
    S: AsRef<str>,
    F: Fn(&str) -> String,
{
    let mut args = args.iter().map(AsRef::<str>::as_ref);
    let mut out = String::with_capacity(template.len() + 16 * args.len());
    let mut chars = template.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '%' {
            out.push(c);
            continue;
        }

        let mut spec = Spec::default();
        while let Some(&flag) = chars.peek() {
            match flag {
                '-' => spec.left = true,
                '0' => spec.zero = true,
                '+' | ' ' | '#' => {}
                _ => break,
            }
            chars.next();
        }
        match parse_num(&mut chars) {
            Some(width) => spec.width = width,
            None => out.push_str("%!(BADWIDTH)"),
        }
        if chars.peek() == Some(&'.') {
            chars.next();
            match parse_num(&mut chars) {
                Some(precision) => spec.precision = Some(precision),
                None => out.push_str("%!(BADPREC)"),
            }
        }

        match chars.next() {
            None => out.push_str("%!(NOVERB)"),
            Some('%') => out.push('%'),
            Some(verb) => match args.next() {
                Some(arg) if verb == 'q' => spec.apply(&format!("{arg:?}"), &paint, &mut out),
                Some(arg) => spec.apply(arg, &paint, &mut out),
                None => {
                    let _ = write!(out, "%!{verb}(MISSING)");
                }
            },
        }
    }

    let extra: Vec<&str> = args.collect();
    if !extra.is_empty() {
        out.push_str("%!(EXTRA ");
        for (i, arg) in extra.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            let _ = write!(out, "string={}", paint(arg));
        }
        out.push(')');
    }
    out
}
