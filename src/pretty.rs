//! Human-readable rendering of log arguments for the terminal.
//!
//! These rules are independent of [`sanitize`](crate::sanitize): the display
//! may truncate, indent and summarize, while the stored form never does.

use chrono::SecondsFormat;

use crate::Arg;

/// Longest rendered text or JSON, in bytes, before truncation.
pub const MAX_PRETTY_BYTES: usize = 4096;

/// Number of leading bytes shown for binary buffers.
pub const MAX_HEX_PREVIEW: usize = 32;

const ELLIPSIS: char = '…';

/// Cuts `s` to at most `max` bytes on a char boundary and marks the cut with `…`.
pub(crate) fn truncate(mut s: String, max: usize) -> String {
    if s.len() <= max {
        return s;
    }
    let mut cut = max;
    while !s.is_char_boundary(cut) {
        cut -= 1;
    }
    s.truncate(cut);
    s.push(ELLIPSIS);
    s
}

/// Renders an argument for display.
///
/// - text, errors and `Display` values are shown as-is;
/// - times use RFC 3339;
/// - UTF-8 bytes are shown as text, anything else as a hex preview
///   like `<40 bytes: 00FF…>`;
/// - structured values are pretty-printed JSON (two-space indent);
/// - opaque values show their type name.
///
/// Text from bytes, JSON and debug dumps is capped at
/// [`MAX_PRETTY_BYTES`] bytes plus one `…`.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use tintlog::{Arg, pretty};
///
/// assert_eq!(pretty(&Arg::from("hi")), "hi");
/// assert_eq!(pretty(&Arg::from(vec![0xff, 0x00, 0x1a])), "<3 bytes: FF001A>");
/// assert_eq!(pretty(&Arg::from(json!({"a": 1}))), "{\n  \"a\": 1\n}");
/// ```
pub fn pretty(arg: &Arg) -> String {
    match arg {
        Arg::Text(s) | Arg::Error(s) | Arg::Display(s) => s.clone(),
        Arg::Time(time) => time.to_rfc3339_opts(SecondsFormat::Secs, true),
        Arg::Bytes(bytes) => pretty_bytes(bytes),
        Arg::Opaque(type_name) => (*type_name).to_string(),
        Arg::Generic(value) => match serde_json::to_string_pretty(value) {
            Ok(json) => truncate(json, MAX_PRETTY_BYTES),
            Err(_) => truncate(format!("{value:#?}"), MAX_PRETTY_BYTES),
        },
        Arg::Unencodable(dump) => truncate(dump.clone(), MAX_PRETTY_BYTES),
    }
}

fn pretty_bytes(bytes: &[u8]) -> String {
    if let Ok(text) = std::str::from_utf8(bytes) {
        return truncate(text.to_string(), MAX_PRETTY_BYTES);
    }
    let shown = bytes.len().min(MAX_HEX_PREVIEW);
    let more = if bytes.len() > MAX_HEX_PREVIEW { "…" } else { "" };
    format!(
        "<{} bytes: {}{}>",
        bytes.len(),
        hex::encode_upper(&bytes[..shown]),
        more
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    #[test]
    fn text_like_values_are_direct() {
        assert_eq!(pretty(&Arg::Error("boom".into())), "boom");
        assert_eq!(pretty(&Arg::Display("v1.2".into())), "v1.2");
    }

    #[test]
    fn long_text_is_not_truncated() {
        let long = "x".repeat(MAX_PRETTY_BYTES * 2);
        assert_eq!(pretty(&Arg::from(long.clone())), long);
    }

    #[test]
    fn time_is_rfc3339_seconds() {
        let t = Utc.with_ymd_and_hms(2025, 11, 9, 18, 19, 26).unwrap();
        assert_eq!(pretty(&Arg::from(t)), "2025-11-09T18:19:26Z");
    }

    #[test]
    fn utf8_bytes_render_as_text() {
        assert_eq!(pretty(&Arg::from("héllo".as_bytes())), "héllo");
    }

    #[test]
    fn utf8_bytes_are_truncated() {
        let big = vec![b'a'; MAX_PRETTY_BYTES + 10];
        let out = pretty(&Arg::from(big));
        assert!(out.ends_with('…'));
        assert_eq!(out.chars().count(), MAX_PRETTY_BYTES + 1);
    }

    #[test]
    fn binary_preview_is_capped() {
        let mut bytes = vec![0xffu8];
        bytes.extend(std::iter::repeat(0xab).take(99));
        let out = pretty(&Arg::from(bytes));
        let expected = format!("<100 bytes: FF{}…>", "AB".repeat(MAX_HEX_PREVIEW - 1));
        assert_eq!(out, expected);
    }

    #[test]
    fn binary_preview_without_ellipsis_when_short() {
        let bytes = vec![0xc3u8; MAX_HEX_PREVIEW];
        let out = pretty(&Arg::from(bytes));
        assert_eq!(out, format!("<32 bytes: {}>", "C3".repeat(MAX_HEX_PREVIEW)));
    }

    #[test]
    fn generic_is_indented_json() {
        let out = pretty(&Arg::from(json!({"list": [1, 2]})));
        assert_eq!(out, "{\n  \"list\": [\n    1,\n    2\n  ]\n}");
        assert_eq!(pretty(&Arg::from(42)), "42");
    }

    #[test]
    fn large_json_is_truncated() {
        let value = json!({ "blob": "z".repeat(MAX_PRETTY_BYTES) });
        let out = pretty(&Arg::from(value));
        assert!(out.ends_with('…'));
        assert!(out.len() <= MAX_PRETTY_BYTES + '…'.len_utf8());
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        // 'é' is two bytes; a cut at 3 would split the second one
        let out = truncate("éé".to_string(), 3);
        assert_eq!(out, "é…");
    }

    #[test]
    fn unencodable_uses_dump() {
        let out = pretty(&Arg::Unencodable("Thing { id: 1 }".into()));
        assert_eq!(out, "Thing { id: 1 }");
    }
}
