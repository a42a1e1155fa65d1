use std::io;

use thiserror::Error;

use crate::value::Kind;

/// Error produced while materialising a cursor into a structured value.
#[derive(Debug, Error)]
pub enum CursorError {
    /// The native query failed; `code` is the raw OS error.
    #[error("native query failed with error {code}: {message}")]
    Os {
        /// Raw OS error code (errno or Win32 error).
        code: i64,
        /// Human-readable rendering of `code`.
        message: String,
    },
    /// An object-shaped cursor produced a record without a field name.
    #[error("record {index} of an object stream has no name")]
    MissingName {
        /// Handler index of the offending record.
        index: i64,
    },
    /// A record carried a kind that is not valid at that position.
    #[error("unexpected {kind:?} record at index {index}")]
    UnexpectedKind {
        /// Kind that was observed.
        kind: Kind,
        /// Handler index of the offending record.
        index: i64,
    },
}

impl CursorError {
    /// Builds an [`Os`](Self::Os) error, rendering `code` with the platform message.
    #[must_use]
    pub fn os(code: i64) -> Self {
        let message = i32::try_from(code).map_or_else(
            |_| format!("error code {code}"),
            |raw| io::Error::from_raw_os_error(raw).to_string(),
        );
        Self::Os { code, message }
    }

    /// Returns the raw OS error code when this is an [`Os`](Self::Os) error.
    #[must_use]
    pub const fn os_code(&self) -> Option<i64> {
        match self {
            Self::Os { code, .. } => Some(*code),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn os_error_carries_code_and_message() {
        let error = CursorError::os(2);
        assert_eq!(error.os_code(), Some(2));
        let rendered = error.to_string();
        assert!(rendered.starts_with("native query failed with error 2:"), "{rendered}");
    }

    #[test]
    fn out_of_range_code_still_renders() {
        let error = CursorError::os(i64::MAX);
        assert!(error.to_string().contains("error code"));
    }

    #[test]
    fn structural_errors_have_no_os_code() {
        let error = CursorError::UnexpectedKind {
            kind: Kind::Ok,
            index: 3,
        };
        assert_eq!(error.os_code(), None);
        assert_eq!(error.to_string(), "unexpected Ok record at index 3");
        assert_eq!(
            CursorError::MissingName { index: 0 }.to_string(),
            "record 0 of an object stream has no name"
        );
    }
}
