//! Conversion of log arguments into JSON-safe values for the audit trail.
//!
//! The storage form is deliberately plain: no color escapes, no pretty
//! printing, no truncation. Only raw byte buffers get a wrapper object,
//! `{"__bytes_b64": "<standard base64>"}`, which keeps them unambiguous
//! and lets the reader restore the exact original bytes.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use chrono::SecondsFormat;
use serde_json::{Map, Value};

use crate::Arg;

/// Key of the single-field object that wraps a stored byte buffer.
pub const BYTES_KEY: &str = "__bytes_b64";

/// Converts an argument into its durable JSON form.
///
/// Never fails. Errors and `Display` values are stored as their text, bytes
/// as a base64 wrapper, opaque values as their type name and unencodable
/// values as the dump captured when the argument was built.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use tintlog::{Arg, sanitize};
///
/// assert_eq!(sanitize(&Arg::from("plain")), json!("plain"));
/// assert_eq!(sanitize(&Arg::from(42)), json!(42));
/// assert_eq!(
///     sanitize(&Arg::from(vec![0xde, 0xad, 0xbe, 0xef])),
///     json!({"__bytes_b64": "3q2+7w=="})
/// );
/// ```
pub fn sanitize(arg: &Arg) -> Value {
    match arg {
        Arg::Text(s) | Arg::Error(s) | Arg::Display(s) | Arg::Unencodable(s) => {
            Value::String(s.clone())
        }
        Arg::Bytes(bytes) => {
            let mut wrapper = Map::with_capacity(1);
            wrapper.insert(BYTES_KEY.to_string(), Value::String(STANDARD.encode(bytes)));
            Value::Object(wrapper)
        }
        Arg::Time(time) => Value::String(time.to_rfc3339_opts(SecondsFormat::AutoSi, true)),
        Arg::Opaque(type_name) => Value::String((*type_name).to_string()),
        Arg::Generic(value) => value.clone(),
    }
}

/// Sanitizes every argument, preserving order.
pub fn sanitize_args(args: &[Arg]) -> Vec<Value> {
    args.iter().map(sanitize).collect()
}

/// Decodes a stored byte wrapper back into the original bytes.
///
/// Returns `None` unless `value` is an object whose only field is
/// [`BYTES_KEY`] holding valid standard base64.
pub fn decode_bytes(value: &Value) -> Option<Vec<u8>> {
    let object = value.as_object()?;
    if object.len() != 1 {
        return None;
    }
    let encoded = object.get(BYTES_KEY)?.as_str()?;
    STANDARD.decode(encoded).ok()
}

impl Arg {
    /// Lifts a stored JSON value back into an argument for re-rendering.
    ///
    /// Strings become [`Arg::Text`], byte wrappers become [`Arg::Bytes`] and
    /// everything else is [`Arg::Generic`].
    ///
    /// # Examples
    ///
    /// ```
    /// use tintlog::{Arg, sanitize};
    ///
    /// let original = Arg::from(vec![0xff, 0xfe, 0x00]);
    /// let restored = Arg::from_stored(sanitize(&original));
    /// assert_eq!(restored, original);
    /// ```
    pub fn from_stored(value: Value) -> Self {
        if let Some(bytes) = decode_bytes(&value) {
            return Arg::Bytes(bytes);
        }
        Arg::from(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, TimeZone, Utc};
    use serde_json::json;

    #[test]
    fn error_stores_message() {
        let err = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        assert_eq!(sanitize(&Arg::error(&err)), json!("no such file"));
    }

    #[test]
    fn display_stores_string() {
        assert_eq!(sanitize(&Arg::display(&3.5f64)), json!("3.5"));
    }

    #[test]
    fn bytes_are_wrapped() {
        let value = sanitize(&Arg::from(b"hi".as_slice()));
        assert_eq!(value, json!({ "__bytes_b64": "aGk=" }));
    }

    #[test]
    fn empty_bytes_round_trip() {
        let value = sanitize(&Arg::Bytes(Vec::new()));
        assert_eq!(decode_bytes(&value), Some(Vec::new()));
    }

    #[test]
    fn opaque_stores_type_name() {
        let f = || ();
        let value = sanitize(&Arg::opaque(&f));
        assert!(value.as_str().unwrap().contains("closure"));
    }

    #[test]
    fn time_stores_rfc3339() {
        let utc = Utc.with_ymd_and_hms(2025, 11, 9, 18, 19, 26).unwrap();
        assert_eq!(sanitize(&Arg::from(utc)), json!("2025-11-09T18:19:26Z"));

        let east = FixedOffset::east_opt(2 * 3600).unwrap();
        let local = east.with_ymd_and_hms(2025, 1, 2, 3, 4, 5).unwrap();
        assert_eq!(sanitize(&Arg::from(local)), json!("2025-01-02T03:04:05+02:00"));
    }

    #[test]
    fn generic_passes_through() {
        let value = json!({"user": "ada", "roles": ["admin", "ops"], "age": 36});
        assert_eq!(sanitize(&Arg::json(&value)), value);
    }

    #[test]
    fn plain_string_is_idempotent() {
        let once = sanitize(&Arg::from("already clean"));
        let twice = sanitize(&Arg::from_stored(once.clone()));
        assert_eq!(once, twice);
    }

    #[test]
    fn non_wrapper_objects_stay_generic() {
        let lookalike = json!({ "__bytes_b64": "aGk=", "extra": 1 });
        assert!(matches!(Arg::from_stored(lookalike), Arg::Generic(_)));

        let bad_payload = json!({ "__bytes_b64": "not base64!" });
        assert!(matches!(Arg::from_stored(bad_payload), Arg::Generic(_)));
    }

    #[test]
    fn sanitize_args_keeps_order() {
        let args = [Arg::from("a"), Arg::from(1), Arg::from(false)];
        assert_eq!(sanitize_args(&args), vec![json!("a"), json!(1), json!(false)]);
    }
}
