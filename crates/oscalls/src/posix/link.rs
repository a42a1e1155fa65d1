use std::ffi::CString;
use std::fs;
use std::io;
use std::os::unix::ffi::OsStrExt;
use std::path::Path;

use valxfer::Cursor;
use valxfer::handler::SingleValue;

use crate::adapter::complete;
use crate::buffer::{self, LINK};
use crate::error::AdapterError;

/// Streams the target of the symlink at `path` as one `path` string.
#[must_use]
pub fn readlink(path: &Path) -> Cursor {
    logging::trace_link!(path = %path.display(), "readlink");
    let result = read_link_bytes(path, LINK.get())
        .map(|(target, capacity)| {
            LINK.grow_to(capacity);
            SingleValue::new("path", String::from_utf8_lossy(&target).into_owned())
        })
        .map_err(|error| AdapterError::new("read symlink", path, error));
    complete(result)
}

/// Streams the absolute, symlink-free form of `path` as one `path` string.
#[must_use]
pub fn canonicalize_file_name(path: &Path) -> Cursor {
    logging::trace_link!(path = %path.display(), "canonicalize_file_name");
    let result = fs::canonicalize(path)
        .map(|resolved| {
            SingleValue::new(
                "path",
                String::from_utf8_lossy(resolved.as_os_str().as_bytes()).into_owned(),
            )
        })
        .map_err(|error| AdapterError::new("canonicalize", path, error));
    complete(result)
}

/// Reads a symlink target starting from a `capacity`-byte buffer.
///
/// A result that fills all but the last byte may be truncated, so the
/// buffer doubles until the target fits with room to spare. Returns the
/// target and the capacity that finally held it.
#[allow(unsafe_code)]
pub fn read_link_bytes(path: &Path, capacity: usize) -> io::Result<(Vec<u8>, usize)> {
    let c_path = CString::new(path.as_os_str().as_bytes())
        .map_err(|_| io::Error::from_raw_os_error(libc::EINVAL))?;
    let mut capacity = capacity.max(2);

    loop {
        let mut buf = vec![0_u8; capacity];
        // SAFETY: `c_path` is NUL-terminated and `buf` holds at least
        // `capacity - 1` writable bytes.
        let count = unsafe {
            libc::readlink(
                c_path.as_ptr(),
                buf.as_mut_ptr().cast::<libc::c_char>(),
                capacity - 1,
            )
        };
        let Ok(count) = usize::try_from(count) else {
            return Err(io::Error::last_os_error());
        };
        if count < capacity - 1 {
            buf.truncate(count);
            return Ok((buf, capacity));
        }
        let grown = buffer::doubled(capacity);
        logging::trace_link!(from = capacity, to = grown, "readlink buffer too small");
        if grown == capacity {
            return Err(io::Error::from_raw_os_error(libc::ENAMETOOLONG));
        }
        capacity = grown;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_fit_minus_one_forces_resize() {
        let dir = test_support::scratch().unwrap();
        let target = "a".repeat(15);
        let link = test_support::symlink(dir.path(), "link", &target).unwrap();
        let (bytes, capacity) = read_link_bytes(&link, 16).unwrap();
        assert_eq!(bytes, target.as_bytes());
        assert_eq!(capacity, 32);
    }

    #[test]
    fn short_target_keeps_capacity() {
        let dir = test_support::scratch().unwrap();
        let link = test_support::symlink(dir.path(), "link", "short").unwrap();
        let (bytes, capacity) = read_link_bytes(&link, 256).unwrap();
        assert_eq!(bytes, b"short");
        assert_eq!(capacity, 256);
    }

    #[test]
    fn regular_file_is_einval() {
        let dir = test_support::scratch().unwrap();
        let file = test_support::file_of_size(dir.path(), "plain", 1).unwrap();
        let error = read_link_bytes(&file, 64).unwrap_err();
        assert_eq!(error.raw_os_error(), Some(libc::EINVAL));
    }

    #[test]
    fn interior_nul_is_einval() {
        let error = read_link_bytes(Path::new("bad\0path"), 64).unwrap_err();
        assert_eq!(error.raw_os_error(), Some(libc::EINVAL));
    }
}
