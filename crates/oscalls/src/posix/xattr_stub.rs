use std::ffi::OsStr;
use std::path::Path;

use valxfer::Cursor;

/// Reports `ENOTSUP`; extended attribute support is not compiled in.
#[must_use]
pub fn llistxattr(path: &Path) -> Cursor {
    logging::trace_xattr!(path = %path.display(), "xattr support not built");
    Cursor::error(i64::from(libc::ENOTSUP))
}

/// Reports `ENOTSUP`; extended attribute support is not compiled in.
#[must_use]
pub fn lgetxattr(path: &Path, name: &OsStr) -> Cursor {
    logging::trace_xattr!(path = %path.display(), name = ?name, "xattr support not built");
    Cursor::error(i64::from(libc::ENOTSUP))
}
