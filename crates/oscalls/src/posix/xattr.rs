use std::ffi::OsStr;
use std::io;
use std::os::unix::ffi::OsStrExt;
use std::path::Path;

use valxfer::Cursor;
use valxfer::handler::{Elements, SingleValue};

use crate::adapter::complete;
use crate::error::AdapterError;

#[cfg(any(target_os = "linux", target_os = "android"))]
const MISSING_ATTRIBUTE: i32 = libc::ENODATA;
#[cfg(not(any(target_os = "linux", target_os = "android")))]
const MISSING_ATTRIBUTE: i32 = libc::ENOATTR;

/// Streams the extended attribute names of `path` as an array of strings.
///
/// A symlink's own attributes are listed, not its target's.
#[must_use]
pub fn llistxattr(path: &Path) -> Cursor {
    logging::trace_xattr!(path = %path.display(), "llistxattr");
    let result = xattr::list(path)
        .map(|names| {
            Elements::new(names.map(|name| String::from_utf8_lossy(name.as_bytes()).into_owned()))
        })
        .map_err(|error| AdapterError::new("list extended attributes", path, error));
    complete(result)
}

/// Streams the value of attribute `name` on `path` as one `value` string.
#[must_use]
pub fn lgetxattr(path: &Path, name: &OsStr) -> Cursor {
    logging::trace_xattr!(path = %path.display(), name = ?name, "lgetxattr");
    let result = xattr::get(path, name)
        .and_then(|value| value.ok_or_else(|| io::Error::from_raw_os_error(MISSING_ATTRIBUTE)))
        .map(|value| SingleValue::new("value", String::from_utf8_lossy(&value).into_owned()))
        .map_err(|error| AdapterError::new("read extended attribute", path, error));
    complete(result)
}

#[cfg(test)]
mod tests {
    use valxfer::Kind;

    use super::*;

    #[test]
    fn missing_attribute_code() {
        let dir = test_support::scratch().unwrap();
        let file = test_support::file_of_size(dir.path(), "plain", 0).unwrap();
        let mut cursor = lgetxattr(&file, OsStr::new("user.oscalls.absent"));
        assert!(cursor.advance());
        assert_eq!(cursor.record().kind(), Kind::Error);
        let code = cursor.error_code().unwrap();
        // Filesystems without xattr support report ENOTSUP instead.
        assert!(
            code == i64::from(MISSING_ATTRIBUTE) || code == i64::from(libc::ENOTSUP),
            "unexpected code {code}"
        );
        assert!(!cursor.advance());
    }

    #[test]
    fn stored_value_round_trips() {
        let dir = test_support::scratch().unwrap();
        let file = test_support::file_of_size(dir.path(), "plain", 0).unwrap();
        if xattr::set(&file, "user.oscalls.note", b"hello").is_err() {
            return;
        }
        let mut cursor = lgetxattr(&file, OsStr::new("user.oscalls.note"));
        assert!(cursor.advance());
        assert_eq!(cursor.record().name(), Some("value"));
        assert_eq!(cursor.record().value().as_str(), Some("hello"));
        assert!(!cursor.advance());

        let names: Vec<String> = llistxattr(&file)
            .filter_map(|record| record.value().as_str().map(str::to_owned))
            .collect();
        assert!(names.iter().any(|name| name == "user.oscalls.note"), "{names:?}");
    }
}
