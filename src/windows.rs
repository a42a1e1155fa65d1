//! Windows exports. Paths arrive as NUL-terminated UTF-16 strings.
//!
//! Every operation is exported twice: under its `win_` name and under the
//! name of the Win32 call it wraps.

use std::ffi::OsString;
use std::os::windows::ffi::OsStringExt;
use std::path::{Path, PathBuf};

use valxfer::Cursor;
use valxfer::wire::ValueT;

use crate::lifecycle::export_with;

const ERROR_INVALID_PARAMETER: i64 = 87;

/// Copies a wide C string into an `OsString`, or `None` for null.
///
/// # Safety
///
/// `raw` must be null or a valid NUL-terminated UTF-16 string.
unsafe fn os_string(raw: *const u16) -> Option<OsString> {
    if raw.is_null() {
        return None;
    }
    let mut len = 0;
    // SAFETY: the string is NUL-terminated, so every unit up to and
    // including the terminator is readable.
    while unsafe { *raw.add(len) } != 0 {
        len += 1;
    }
    // SAFETY: `len` units were just read.
    let units = unsafe { std::slice::from_raw_parts(raw, len) };
    Some(OsString::from_wide(units))
}

fn invalid() -> Cursor {
    Cursor::error(ERROR_INVALID_PARAMETER)
}

/// Exports a single-path adapter.
///
/// # Safety
///
/// Same contract as [`os_string`] for `path`.
unsafe fn with_path(name: &'static str, path: *const u16, adapter: fn(&Path) -> Cursor) -> *mut ValueT {
    // SAFETY: forwarded caller contract.
    let path = unsafe { os_string(path) }.map(PathBuf::from);
    export_with(name, move || path.as_deref().map_or_else(invalid, adapter))
}

/// Streams the 24 `lstat` fields of `path` from its file information.
///
/// # Safety
///
/// `path` must be null or a valid NUL-terminated UTF-16 string.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn win_lstat(path: *const u16) -> *mut ValueT {
    // SAFETY: forwarded caller contract.
    unsafe { with_path("win_lstat", path, oscalls::win_lstat) }
}

/// Streams the target of the symlink or junction at `path` as `path`.
///
/// # Safety
///
/// `path` must be null or a valid NUL-terminated UTF-16 string.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn win_readlink(path: *const u16) -> *mut ValueT {
    // SAFETY: forwarded caller contract.
    unsafe { with_path("win_readlink", path, oscalls::win_readlink) }
}

/// Streams the final path of `path` without the `\\?\` prefix.
///
/// # Safety
///
/// `path` must be null or a valid NUL-terminated UTF-16 string.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn win_canonicalize_file_name(path: *const u16) -> *mut ValueT {
    // SAFETY: forwarded caller contract.
    unsafe {
        with_path(
            "win_canonicalize_file_name",
            path,
            oscalls::win_canonicalize_file_name,
        )
    }
}

/// Streams the security descriptor of `path` as `sddl`.
///
/// # Safety
///
/// `path` must be null or a valid NUL-terminated UTF-16 string.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn win_get_sd(path: *const u16, include_sacl: bool) -> *mut ValueT {
    // SAFETY: forwarded caller contract.
    let path = unsafe { os_string(path) }.map(PathBuf::from);
    export_with("win_get_sd", move || match path {
        Some(path) => oscalls::win_get_sd(&path, include_sacl),
        None => invalid(),
    })
}

/// Streams the alternate data streams of `path` as an array of records.
///
/// # Safety
///
/// `path` must be null or a valid NUL-terminated UTF-16 string.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn win_list_streams(path: *const u16) -> *mut ValueT {
    // SAFETY: forwarded caller contract.
    unsafe { with_path("win_list_streams", path, oscalls::win_list_streams) }
}

/// Streams the content of stream `stream` on `path` as `content`.
///
/// # Safety
///
/// `path` and `stream` must each be null or a valid NUL-terminated UTF-16
/// string.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn win_read_stream(path: *const u16, stream: *const u16) -> *mut ValueT {
    // SAFETY: forwarded caller contract.
    let (path, stream) = unsafe { (os_string(path), os_string(stream)) };
    export_with("win_read_stream", move || match (path, stream) {
        (Some(path), Some(stream)) => oscalls::win_read_stream(Path::new(&path), &stream),
        _ => invalid(),
    })
}

/// Alias of [`win_lstat`].
///
/// # Safety
///
/// See [`win_lstat`].
#[allow(non_snake_case)]
#[unsafe(no_mangle)]
pub unsafe extern "C" fn windows_GetFileInformationByHandle(path: *const u16) -> *mut ValueT {
    // SAFETY: forwarded caller contract.
    unsafe { win_lstat(path) }
}

/// Alias of [`win_readlink`].
///
/// # Safety
///
/// See [`win_readlink`].
#[allow(non_snake_case)]
#[unsafe(no_mangle)]
pub unsafe extern "C" fn windows_DeviceIoControl_GetReparsePoint(path: *const u16) -> *mut ValueT {
    // SAFETY: forwarded caller contract.
    unsafe { win_readlink(path) }
}

/// Alias of [`win_canonicalize_file_name`].
///
/// # Safety
///
/// See [`win_canonicalize_file_name`].
#[allow(non_snake_case)]
#[unsafe(no_mangle)]
pub unsafe extern "C" fn windows_GetFinalPathNameByHandleW(path: *const u16) -> *mut ValueT {
    // SAFETY: forwarded caller contract.
    unsafe { win_canonicalize_file_name(path) }
}

/// Alias of [`win_get_sd`].
///
/// # Safety
///
/// See [`win_get_sd`].
#[allow(non_snake_case)]
#[unsafe(no_mangle)]
pub unsafe extern "C" fn windows_GetNamedSecurityInfoW(
    path: *const u16,
    include_sacl: bool,
) -> *mut ValueT {
    // SAFETY: forwarded caller contract.
    unsafe { win_get_sd(path, include_sacl) }
}

/// Alias of [`win_list_streams`].
///
/// # Safety
///
/// See [`win_list_streams`].
#[allow(non_snake_case)]
#[unsafe(no_mangle)]
pub unsafe extern "C" fn windows_FindFirstStreamW(path: *const u16) -> *mut ValueT {
    // SAFETY: forwarded caller contract.
    unsafe { win_list_streams(path) }
}

/// Alias of [`win_read_stream`].
///
/// # Safety
///
/// See [`win_read_stream`].
#[allow(non_snake_case)]
#[unsafe(no_mangle)]
pub unsafe extern "C" fn windows_ReadFile_Stream(path: *const u16, stream: *const u16) -> *mut ValueT {
    // SAFETY: forwarded caller contract.
    unsafe { win_read_stream(path, stream) }
}
