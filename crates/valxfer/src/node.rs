//! Materialise a cursor into a [`serde_json::Value`].
//!
//! Object-shaped cursors become JSON objects keyed by field name,
//! array-shaped cursors become JSON arrays. Time values are rendered as
//! fractional seconds and nested cursors are drained recursively.

use serde_json::{Map, Number, Value as Json};

use logging::trace_cursor;

use crate::cursor::{Cursor, Shape};
use crate::error::CursorError;
use crate::value::{Kind, Value};

/// Drains `cursor` into a JSON value.
///
/// A cursor seeded with an error yields [`CursorError::Os`]; so does an
/// error record produced mid-stream or inside a nested cursor.
pub fn to_json(mut cursor: Cursor) -> Result<Json, CursorError> {
    if let Some(code) = cursor.error_code() {
        cursor.release();
        return Err(CursorError::os(code));
    }

    match cursor.shape() {
        Shape::Array => {
            let mut items = Vec::new();
            while cursor.advance() {
                let index = cursor.index() - 1;
                let record = cursor.take_record();
                items.push(value_to_json(record.into_value(), index)?);
            }
            Ok(Json::Array(items))
        }
        Shape::Object => {
            let mut object = Map::new();
            while cursor.advance() {
                let index = cursor.index() - 1;
                let (name, value) = cursor.take_record().into_parts();
                let name = name.ok_or(CursorError::MissingName { index })?;
                let json = value_to_json(value, index)?;
                if object.insert(name.to_owned(), json).is_some() {
                    trace_cursor!(field = name, "duplicate field overwritten");
                }
            }
            Ok(Json::Object(object))
        }
    }
}

fn value_to_json(value: Value, index: i64) -> Result<Json, CursorError> {
    Ok(match value {
        Value::Number(number) => Json::Number(Number::from(number)),
        Value::String(string) => Json::String(string),
        Value::Boolean(flag) => Json::Bool(flag),
        Value::TimeSpec(time) => Json::from(time.as_secs_f64()),
        Value::Complex(nested) => to_json(*nested)?,
        Value::Error(code) => return Err(CursorError::os(code)),
        Value::Ok => {
            return Err(CursorError::UnexpectedKind {
                kind: Kind::Ok,
                index,
            });
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::{Elements, SingleValue, from_fn};
    use crate::value::{TimeSpec64, ValueRecord};
    use serde_json::json;

    #[test]
    fn object_with_nested_array() {
        let cursor = Cursor::initialize(from_fn(|index| match index {
            0 => Some(ValueRecord::new("gr_name", String::from("staff"))),
            1 => Some(ValueRecord::new("gr_gid", 50_i64)),
            2 => Some(ValueRecord::new(
                "gr_mem",
                Cursor::initialize(Elements::new(vec![String::from("alice")])),
            )),
            _ => None,
        }));

        let json = to_json(cursor).unwrap();
        assert_eq!(
            json,
            json!({"gr_name": "staff", "gr_gid": 50, "gr_mem": ["alice"]})
        );
    }

    #[test]
    fn empty_array_stays_an_array() {
        let cursor = Cursor::initialize(Elements::new(Vec::<String>::new()));
        assert_eq!(to_json(cursor).unwrap(), json!([]));
    }

    #[test]
    fn time_values_become_fractional_seconds() {
        let cursor = Cursor::initialize(SingleValue::new(
            "st_mtim",
            TimeSpec64::new(10, 250_000_000),
        ));
        let json = to_json(cursor).unwrap();
        assert!((json["st_mtim"].as_f64().unwrap() - 10.25).abs() < 1e-9);
    }

    #[test]
    fn error_seeded_cursor_maps_to_os_error() {
        let error = to_json(Cursor::error(2)).unwrap_err();
        assert_eq!(error.os_code(), Some(2));
    }

    #[test]
    fn nested_error_propagates() {
        let cursor = Cursor::initialize(SingleValue::new("inner", Cursor::error(13)));
        let error = to_json(cursor).unwrap_err();
        assert_eq!(error.os_code(), Some(13));
    }

    #[test]
    fn pending_record_mid_stream_is_rejected() {
        let cursor = Cursor::initialize(from_fn(|index| {
            (index == 0).then(ValueRecord::pending)
        }));
        let error = to_json(cursor).unwrap_err();
        assert!(matches!(
            error,
            CursorError::UnexpectedKind {
                kind: Kind::Ok,
                index: 0
            }
        ));
    }
}
