use std::fmt;

use chrono::{DateTime, FixedOffset, Offset, TimeZone};
use serde::Serialize;
use serde_json::Value;

/// One argument of a log call, classified once at the call site.
///
/// Both the display path ([`pretty`](fn@crate::pretty)) and the storage path
/// ([`sanitize`](crate::sanitize)) dispatch on this closed set of shapes;
/// neither one ever inspects the original value again.
///
/// Most callers rely on the `From` conversions (strings, numbers, bools,
/// byte buffers, timestamps, JSON values) and reach for the named
/// constructors for everything else.
///
/// # Examples
///
/// ```
/// use tintlog::Arg;
///
/// assert!(matches!(Arg::from("hello"), Arg::Text(_)));
/// assert!(matches!(Arg::from(vec![0xffu8, 0x00]), Arg::Bytes(_)));
///
/// let err = std::io::Error::new(std::io::ErrorKind::Other, "disk on fire");
/// assert_eq!(Arg::error(&err), Arg::Error("disk on fire".to_string()));
///
/// let f = |x: i32| x + 1;
/// assert!(matches!(Arg::opaque(&f), Arg::Opaque(_)));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Arg {
    /// Plain text.
    Text(String),
    /// The message of an error value.
    Error(String),
    /// The `Display` output of a value.
    Display(String),
    /// A raw byte buffer.
    Bytes(Vec<u8>),
    /// A point in time.
    Time(DateTime<FixedOffset>),
    /// A value with no data representation (closures, channels, handles); holds its type name.
    Opaque(&'static str),
    /// Any structured value that serializes to JSON.
    Generic(Value),
    /// A value whose serialization failed; holds its `Debug` dump.
    Unencodable(String),
}

impl Arg {
    /// Captures the message of an error.
    pub fn error<E>(err: &E) -> Self
    where
        E: std::error::Error + ?Sized,
    {
        Arg::Error(err.to_string())
    }

    /// Captures the `Display` output of a value.
    pub fn display<T>(value: &T) -> Self
    where
        T: fmt::Display + ?Sized,
    {
        Arg::Display(value.to_string())
    }

    /// Captures a value that cannot be represented as data by its type name.
    pub fn opaque<T: ?Sized>(_value: &T) -> Self {
        Arg::Opaque(std::any::type_name::<T>())
    }

    /// Captures a serializable value as structured JSON.
    ///
    /// Strings become [`Arg::Text`]; a value that fails to serialize (for
    /// example a map with non-string keys) degrades to its `Debug` dump.
    pub fn json<T>(value: &T) -> Self
    where
        T: Serialize + fmt::Debug + ?Sized,
    {
        match serde_json::to_value(value) {
            Ok(Value::String(s)) => Arg::Text(s),
            Ok(value) => Arg::Generic(value),
            Err(_) => Arg::Unencodable(format!("{value:#?}")),
        }
    }

    /// Captures a timestamp in any time zone, keeping its offset.
    pub fn time<Tz: TimeZone>(time: &DateTime<Tz>) -> Self {
        let offset = time.offset().fix();
        Arg::Time(time.with_timezone(&offset))
    }
}

impl From<&str> for Arg {
    fn from(value: &str) -> Self {
        Arg::Text(value.to_string())
    }
}

impl From<String> for Arg {
    fn from(value: String) -> Self {
        Arg::Text(value)
    }
}

impl From<&String> for Arg {
    fn from(value: &String) -> Self {
        Arg::Text(value.clone())
    }
}

impl From<Vec<u8>> for Arg {
    fn from(value: Vec<u8>) -> Self {
        Arg::Bytes(value)
    }
}

impl From<&[u8]> for Arg {
    fn from(value: &[u8]) -> Self {
        Arg::Bytes(value.to_vec())
    }
}

impl<Tz: TimeZone> From<DateTime<Tz>> for Arg {
    fn from(value: DateTime<Tz>) -> Self {
        Arg::time(&value)
    }
}

impl From<Value> for Arg {
    fn from(value: Value) -> Self {
        match value {
            Value::String(s) => Arg::Text(s),
            other => Arg::Generic(other),
        }
    }
}

impl From<bool> for Arg {
    fn from(value: bool) -> Self {
        Arg::Generic(Value::Bool(value))
    }
}

macro_rules! int_args {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Arg {
                fn from(value: $t) -> Self {
                    Arg::Generic(Value::from(value))
                }
            }
        )*
    };
}

int_args!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

impl From<f64> for Arg {
    /// Non-finite floats have no JSON form and are kept as their display text.
    fn from(value: f64) -> Self {
        match serde_json::Number::from_f64(value) {
            Some(n) => Arg::Generic(Value::Number(n)),
            None => Arg::Display(value.to_string()),
        }
    }
}

impl From<f32> for Arg {
    fn from(value: f32) -> Self {
        Arg::from(f64::from(value))
    }
}
