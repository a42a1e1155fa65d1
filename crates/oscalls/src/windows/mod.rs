//! Win32 backend.
//!
//! Thin wrappers over `windows-sys`. All interpretation of the raw results
//! lives in [`crate::win_mapping`] so it stays testable off Windows.
#![allow(unsafe_code)]

mod file_info;
mod path;
mod reparse;
mod security;
mod streams;

use std::ffi::OsStr;
use std::io;
use std::os::windows::ffi::OsStrExt;
use std::path::Path;
use std::ptr;

use windows_sys::Win32::Foundation::{CloseHandle, HANDLE, INVALID_HANDLE_VALUE};
use windows_sys::Win32::Storage::FileSystem::{
    CreateFileW, FILE_FLAG_BACKUP_SEMANTICS, FILE_FLAG_OPEN_REPARSE_POINT, FILE_SHARE_DELETE,
    FILE_SHARE_READ, FILE_SHARE_WRITE, OPEN_EXISTING,
};

use crate::win_mapping::ERROR_NO_UNICODE_TRANSLATION;

pub use file_info::win_lstat;
pub use path::win_canonicalize_file_name;
pub use reparse::win_readlink;
pub use security::win_get_sd;
pub use streams::{win_list_streams, win_read_stream};

/// NUL-terminated UTF-16 form of `value`.
pub(crate) fn wide(value: &OsStr) -> Vec<u16> {
    value.encode_wide().chain(std::iter::once(0)).collect()
}

/// Decodes UTF-16, mapping invalid data to `ERROR_NO_UNICODE_TRANSLATION`.
pub(crate) fn decode(units: &[u16]) -> io::Result<String> {
    String::from_utf16(units)
        .map_err(|_| io::Error::from_raw_os_error(ERROR_NO_UNICODE_TRANSLATION))
}

/// Owned Win32 file handle closed on drop.
pub(crate) struct HandleGuard(HANDLE);

impl HandleGuard {
    /// Opens `path` for metadata access only.
    ///
    /// With `follow` unset the final reparse point itself is opened.
    pub(crate) fn open_metadata(path: &Path, follow: bool) -> io::Result<Self> {
        let flags = if follow {
            FILE_FLAG_BACKUP_SEMANTICS
        } else {
            FILE_FLAG_BACKUP_SEMANTICS | FILE_FLAG_OPEN_REPARSE_POINT
        };
        let share = FILE_SHARE_READ | FILE_SHARE_WRITE | FILE_SHARE_DELETE;
        Self::open(path.as_os_str(), 0, share, flags)
    }

    pub(crate) fn open(name: &OsStr, access: u32, share: u32, flags: u32) -> io::Result<Self> {
        let name = wide(name);
        // SAFETY: `name` is NUL-terminated and outlives the call.
        let handle = unsafe {
            CreateFileW(
                name.as_ptr(),
                access,
                share,
                ptr::null(),
                OPEN_EXISTING,
                flags,
                ptr::null_mut(),
            )
        };
        if handle == INVALID_HANDLE_VALUE {
            return Err(io::Error::last_os_error());
        }
        Ok(Self(handle))
    }

    pub(crate) const fn raw(&self) -> HANDLE {
        self.0
    }
}

impl Drop for HandleGuard {
    fn drop(&mut self) {
        // SAFETY: the handle came from a successful CreateFileW and is
        // closed exactly once.
        unsafe {
            CloseHandle(self.0);
        }
    }
}
