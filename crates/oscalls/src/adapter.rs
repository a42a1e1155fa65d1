use valxfer::{Cursor, Handler};

use crate::error::AdapterError;

/// Turns an adapter outcome into a cursor.
///
/// Successful queries hand their handler to the cursor; failures seed it with
/// the OS code so the first advance reports the error and the second ends the
/// stream.
pub(crate) fn complete<H>(result: Result<H, AdapterError>) -> Cursor
where
    H: Handler + 'static,
{
    match result {
        Ok(handler) => Cursor::initialize(handler),
        Err(error) => {
            let code = error.os_code();
            logging::trace_ffi!(code, context = error.context(), "{error}");
            Cursor::error(code)
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use valxfer::handler::SingleValue;
    use valxfer::{Kind, Value};

    use super::*;

    #[test]
    fn success_installs_handler() {
        let mut cursor = complete::<SingleValue>(Ok(SingleValue::new("path", String::from("x"))));
        assert!(cursor.advance());
        assert_eq!(cursor.record().name(), Some("path"));
        assert!(!cursor.advance());
    }

    #[test]
    fn failure_reports_code_once() {
        let mut cursor =
            complete::<SingleValue>(Err(AdapterError::from_code("stat", Path::new("gone"), 2)));
        assert!(cursor.advance());
        assert_eq!(cursor.record().kind(), Kind::Error);
        assert!(matches!(cursor.record().value(), Value::Error(2)));
        assert!(!cursor.advance());
    }
}
