use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Code reported when an OS failure carries no raw error number.
#[cfg(unix)]
const FALLBACK_CODE: i64 = libc::EIO as i64;
#[cfg(not(unix))]
const FALLBACK_CODE: i64 = 31; // ERROR_GEN_FAILURE

/// Error produced when a native query fails inside an adapter.
#[derive(Debug, Error)]
#[error("failed to {context} '{}': {source}", path.display())]
pub struct AdapterError {
    context: &'static str,
    path: PathBuf,
    source: io::Error,
}

impl AdapterError {
    /// Creates a new [`AdapterError`] from the supplied context, path, and source error.
    pub(crate) fn new(context: &'static str, path: &Path, source: io::Error) -> Self {
        Self {
            context,
            path: path.to_path_buf(),
            source,
        }
    }

    /// Wraps a raw OS error code.
    pub(crate) fn from_code(context: &'static str, path: &Path, code: i32) -> Self {
        Self::new(context, path, io::Error::from_raw_os_error(code))
    }

    /// Returns the operation being performed when the error occurred.
    #[must_use]
    pub const fn context(&self) -> &'static str {
        self.context
    }

    /// Returns the path involved in the failing operation.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the underlying [`io::Error`].
    #[must_use]
    pub const fn source_error(&self) -> &io::Error {
        &self.source
    }

    /// Returns the numeric OS code the cursor reports for this failure.
    #[must_use]
    pub fn os_code(&self) -> i64 {
        self.source
            .raw_os_error()
            .map_or(FALLBACK_CODE, i64::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_context_and_path() {
        let error = AdapterError::from_code("read symlink", Path::new("/tmp/x"), 2);
        let rendered = error.to_string();
        assert!(rendered.starts_with("failed to read symlink '/tmp/x': "), "{rendered}");
        assert_eq!(error.context(), "read symlink");
        assert_eq!(error.path(), Path::new("/tmp/x"));
    }

    #[test]
    fn os_code_prefers_raw_error() {
        let error = AdapterError::from_code("stat", Path::new("a"), 13);
        assert_eq!(error.os_code(), 13);
        assert_eq!(error.source_error().raw_os_error(), Some(13));
    }

    #[test]
    fn synthetic_errors_fall_back() {
        let error = AdapterError::new("stat", Path::new("a"), io::Error::other("synthetic"));
        assert_eq!(error.os_code(), FALLBACK_CODE);
    }
}
