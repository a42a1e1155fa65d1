//! ACL adapters for builds without the `acl` feature.
//!
//! The adapters still exist so the exported surface does not change; every
//! query reports `ENOTSUP`.

use std::path::Path;

use valxfer::Cursor;

/// Reports `ENOTSUP`; ACL support is not compiled in.
#[must_use]
pub fn acl_get_file_access(path: &Path) -> Cursor {
    unsupported(path)
}

/// Reports `ENOTSUP`; ACL support is not compiled in.
#[must_use]
pub fn acl_get_file_default(path: &Path) -> Cursor {
    unsupported(path)
}

fn unsupported(path: &Path) -> Cursor {
    logging::trace_acl!(path = %path.display(), "acl support not built");
    Cursor::error(i64::from(libc::ENOTSUP))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn both_queries_fail_once() {
        for mut cursor in [
            acl_get_file_access(Path::new("/")),
            acl_get_file_default(Path::new("/")),
        ] {
            assert!(cursor.advance());
            assert_eq!(cursor.error_code(), Some(i64::from(libc::ENOTSUP)));
            assert!(!cursor.advance());
        }
    }
}
