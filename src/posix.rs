//! Unix exports. Paths arrive as NUL-terminated byte strings.

use core::ffi::{CStr, c_char};
use std::ffi::OsStr;
use std::os::unix::ffi::OsStrExt;
use std::path::Path;

use valxfer::Cursor;
use valxfer::wire::ValueT;

use crate::lifecycle::export_with;

/// Borrows a C string as a byte-exact `OsStr`, or `None` for null.
///
/// # Safety
///
/// `raw` must be null or a valid NUL-terminated string outliving the call.
unsafe fn os_str<'a>(raw: *const c_char) -> Option<&'a OsStr> {
    if raw.is_null() {
        return None;
    }
    // SAFETY: non-null and NUL-terminated per the caller contract.
    let bytes = unsafe { CStr::from_ptr(raw) }.to_bytes();
    Some(OsStr::from_bytes(bytes))
}

fn invalid() -> Cursor {
    Cursor::error(i64::from(libc::EINVAL))
}

/// Exports a single-path adapter.
///
/// # Safety
///
/// Same contract as [`os_str`] for `path`.
unsafe fn with_path(
    name: &'static str,
    path: *const c_char,
    adapter: fn(&Path) -> Cursor,
) -> *mut ValueT {
    // SAFETY: forwarded caller contract.
    let path = unsafe { os_str(path) }.map(Path::new);
    export_with(name, move || path.map_or_else(invalid, adapter))
}

/// Streams the 24 `lstat` fields of `path` without following symlinks.
///
/// # Safety
///
/// `path` must be null or a valid NUL-terminated string.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn linux_lstat(path: *const c_char) -> *mut ValueT {
    // SAFETY: forwarded caller contract.
    unsafe { with_path("linux_lstat", path, oscalls::lstat) }
}

/// Streams the target of the symlink at `path` as `path`.
///
/// # Safety
///
/// `path` must be null or a valid NUL-terminated string.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn linux_readlink(path: *const c_char) -> *mut ValueT {
    // SAFETY: forwarded caller contract.
    unsafe { with_path("linux_readlink", path, oscalls::readlink) }
}

/// Streams the absolute, symlink-free form of `path`.
///
/// # Safety
///
/// `path` must be null or a valid NUL-terminated string.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn linux_canonicalize_file_name(path: *const c_char) -> *mut ValueT {
    // SAFETY: forwarded caller contract.
    unsafe {
        with_path(
            "linux_canonicalize_file_name",
            path,
            oscalls::canonicalize_file_name,
        )
    }
}

/// Streams the passwd entry for `uid`.
#[unsafe(no_mangle)]
pub extern "C" fn linux_getpwuid(uid: i64) -> *mut ValueT {
    export_with("linux_getpwuid", move || oscalls::getpwuid(uid))
}

/// Streams the group entry for `gid`; `gr_mem` is a nested array.
#[unsafe(no_mangle)]
pub extern "C" fn linux_getgrgid(gid: i64) -> *mut ValueT {
    export_with("linux_getgrgid", move || oscalls::getgrgid(gid))
}

/// Streams the access ACL of `path` in short text form.
///
/// # Safety
///
/// `path` must be null or a valid NUL-terminated string.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn linux_acl_get_file_access(path: *const c_char) -> *mut ValueT {
    // SAFETY: forwarded caller contract.
    unsafe {
        with_path(
            "linux_acl_get_file_access",
            path,
            oscalls::acl_get_file_access,
        )
    }
}

/// Streams the default ACL of the directory at `path` in short text form.
///
/// # Safety
///
/// `path` must be null or a valid NUL-terminated string.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn linux_acl_get_file_default(path: *const c_char) -> *mut ValueT {
    // SAFETY: forwarded caller contract.
    unsafe {
        with_path(
            "linux_acl_get_file_default",
            path,
            oscalls::acl_get_file_default,
        )
    }
}

/// Streams the extended attribute names of `path` as an array.
///
/// # Safety
///
/// `path` must be null or a valid NUL-terminated string.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn linux_llistxattr(path: *const c_char) -> *mut ValueT {
    // SAFETY: forwarded caller contract.
    unsafe { with_path("linux_llistxattr", path, oscalls::llistxattr) }
}

/// Streams the value of the extended attribute `name` on `path`.
///
/// # Safety
///
/// `path` and `name` must each be null or a valid NUL-terminated string.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn linux_lgetxattr(path: *const c_char, name: *const c_char) -> *mut ValueT {
    // SAFETY: forwarded caller contract.
    let (path, name) = unsafe { (os_str(path), os_str(name)) };
    export_with("linux_lgetxattr", move || match (path, name) {
        (Some(path), Some(name)) => oscalls::lgetxattr(Path::new(path), name),
        _ => invalid(),
    })
}
