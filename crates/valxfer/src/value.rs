//! Value records: the tagged, named units a cursor yields.
//!
//! A [`ValueRecord`] pairs an optional field name with exactly one [`Value`].
//! The enum replaces the discriminator-plus-union of the wire form, so a
//! reader can only ever observe the payload that matches the record's
//! [`Kind`]. The wire form itself lives in [`crate::wire`].

use std::fmt;

use crate::cursor::Cursor;

/// Name carried by a freshly initialised record, before any field is produced.
pub const ERROR_NAME: &str = "errno";

/// Name carried by every element of an array-shaped stream.
pub const ARRAY_ELEMENT: &str = "[]";

/// Fixed-width time value (seconds and nanoseconds, both 64-bit).
///
/// Both halves are `i64` on every platform so the layout matches across the
/// FFI boundary regardless of the native `time_t`/`long` width.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeSpec64 {
    /// Whole seconds since the Unix epoch.
    pub tv_sec: i64,
    /// Nanoseconds within the second.
    pub tv_nsec: i64,
}

impl TimeSpec64 {
    /// Creates a time value from its two components.
    #[must_use]
    pub const fn new(tv_sec: i64, tv_nsec: i64) -> Self {
        Self { tv_sec, tv_nsec }
    }

    /// Returns the value as fractional seconds.
    #[must_use]
    pub fn as_secs_f64(&self) -> f64 {
        self.tv_sec as f64 + self.tv_nsec as f64 / 1_000_000_000.0
    }
}

impl fmt::Display for TimeSpec64 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:09}s", self.tv_sec, self.tv_nsec)
    }
}

/// Discriminator of a value record.
///
/// The numeric values are part of the wire contract and must not change.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Kind {
    /// The query succeeded and no field has been produced yet.
    Ok = 0,
    /// The query failed; the record carries the OS error code.
    Error = 1,
    /// Signed 64-bit integer.
    Number = 2,
    /// UTF-8 string.
    String = 3,
    /// Nested cursor (object or array).
    Complex = 4,
    /// Seconds plus nanoseconds.
    TimeSpec = 5,
    /// Boolean flag.
    Boolean = 6,
}

/// Payload of a value record.
#[derive(Debug)]
pub enum Value {
    /// Pending success, nothing produced yet.
    Ok,
    /// Terminal failure with the captured OS error code.
    Error(i64),
    /// Signed 64-bit integer.
    Number(i64),
    /// UTF-8 string.
    String(String),
    /// Independently driven nested cursor.
    Complex(Box<Cursor>),
    /// Time value.
    TimeSpec(TimeSpec64),
    /// Boolean flag.
    Boolean(bool),
}

impl Value {
    /// Returns the discriminator for this payload.
    #[must_use]
    pub const fn kind(&self) -> Kind {
        match self {
            Self::Ok => Kind::Ok,
            Self::Error(_) => Kind::Error,
            Self::Number(_) => Kind::Number,
            Self::String(_) => Kind::String,
            Self::Complex(_) => Kind::Complex,
            Self::TimeSpec(_) => Kind::TimeSpec,
            Self::Boolean(_) => Kind::Boolean,
        }
    }

    /// Returns the error code when this is an error payload.
    #[must_use]
    pub const fn error_code(&self) -> Option<i64> {
        match self {
            Self::Error(code) => Some(*code),
            _ => None,
        }
    }

    /// Returns the integer payload.
    #[must_use]
    pub const fn as_number(&self) -> Option<i64> {
        match self {
            Self::Number(number) => Some(*number),
            _ => None,
        }
    }

    /// Returns the string payload.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(string) => Some(string),
            _ => None,
        }
    }

    /// Returns the boolean payload.
    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(flag) => Some(*flag),
            _ => None,
        }
    }

    /// Returns the time payload.
    #[must_use]
    pub const fn as_time_spec(&self) -> Option<TimeSpec64> {
        match self {
            Self::TimeSpec(time) => Some(*time),
            _ => None,
        }
    }

    /// Returns the nested cursor, consuming the payload.
    #[must_use]
    pub fn into_complex(self) -> Option<Cursor> {
        match self {
            Self::Complex(cursor) => Some(*cursor),
            _ => None,
        }
    }
}

impl From<i64> for Value {
    fn from(number: i64) -> Self {
        Self::Number(number)
    }
}

impl From<bool> for Value {
    fn from(flag: bool) -> Self {
        Self::Boolean(flag)
    }
}

impl From<String> for Value {
    fn from(string: String) -> Self {
        Self::String(string)
    }
}

impl From<TimeSpec64> for Value {
    fn from(time: TimeSpec64) -> Self {
        Self::TimeSpec(time)
    }
}

impl From<Cursor> for Value {
    fn from(cursor: Cursor) -> Self {
        Self::Complex(Box::new(cursor))
    }
}

/// One named value yielded by a cursor.
#[derive(Debug)]
pub struct ValueRecord {
    name: Option<&'static str>,
    value: Value,
}

impl ValueRecord {
    /// Creates a named record.
    #[must_use]
    pub fn new(name: &'static str, value: impl Into<Value>) -> Self {
        Self {
            name: Some(name),
            value: value.into(),
        }
    }

    /// Creates an array element record.
    #[must_use]
    pub fn element(value: impl Into<Value>) -> Self {
        Self::new(ARRAY_ELEMENT, value)
    }

    /// Creates the pending record every cursor starts from.
    #[must_use]
    pub const fn pending() -> Self {
        Self {
            name: Some(ERROR_NAME),
            value: Value::Ok,
        }
    }

    /// Creates an error record carrying `code`.
    #[must_use]
    pub const fn error(code: i64) -> Self {
        Self {
            name: Some(ERROR_NAME),
            value: Value::Error(code),
        }
    }

    /// Returns the field name, if any.
    #[must_use]
    pub const fn name(&self) -> Option<&'static str> {
        self.name
    }

    /// Returns `true` when the record is an array element.
    #[must_use]
    pub fn is_element(&self) -> bool {
        self.name == Some(ARRAY_ELEMENT)
    }

    /// Returns the discriminator.
    #[must_use]
    pub const fn kind(&self) -> Kind {
        self.value.kind()
    }

    /// Returns the payload.
    #[must_use]
    pub const fn value(&self) -> &Value {
        &self.value
    }

    /// Returns the payload mutably.
    pub fn value_mut(&mut self) -> &mut Value {
        &mut self.value
    }

    /// Consumes the record, returning its payload.
    #[must_use]
    pub fn into_value(self) -> Value {
        self.value
    }

    /// Consumes the record, returning name and payload.
    #[must_use]
    pub fn into_parts(self) -> (Option<&'static str>, Value) {
        (self.name, self.value)
    }

    /// Returns `true` for an error record.
    #[must_use]
    pub const fn is_error(&self) -> bool {
        matches!(self.value, Value::Error(_))
    }
}

impl Default for ValueRecord {
    fn default() -> Self {
        Self::pending()
    }
}

impl fmt::Display for ValueRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = self.name.unwrap_or("");
        match &self.value {
            Value::Ok => write!(f, "{name}: [OK]"),
            Value::Error(code) => write!(f, "{name}: [Error {code}]"),
            Value::Number(number) => write!(f, "{name}: {number}"),
            Value::String(string) => write!(f, "{name}: {string:?}"),
            Value::Complex(cursor) => write!(f, "{name}: [{:?} cursor]", cursor.shape()),
            Value::TimeSpec(time) => write!(f, "{name}: {time}"),
            Value::Boolean(flag) => write!(f, "{name}: {flag}"),
        }
    }
}
