use std::io;
use std::mem::MaybeUninit;
use std::path::Path;

use valxfer::Cursor;
use windows_sys::Win32::Foundation::FILETIME;
use windows_sys::Win32::Storage::FileSystem::{
    BY_HANDLE_FILE_INFORMATION, GetFileInformationByHandle,
};

use super::HandleGuard;
use super::reparse::reparse_data;
use crate::adapter::complete;
use crate::error::AdapterError;
use crate::win_mapping::{FILE_ATTRIBUTE_REPARSE_POINT, WinFileInfo, join_u32};

/// Streams the stat fields of `path` without following a final reparse point.
#[must_use]
pub fn win_lstat(path: &Path) -> Cursor {
    logging::trace_stat!(path = %path.display(), "win_lstat");
    let result = file_info(path)
        .map(|info| info.to_stat().into_handler())
        .map_err(|error| AdapterError::new("lstat", path, error));
    complete(result)
}

fn reparse_tag_of(buffer: &[u8]) -> Option<u32> {
    let tag: [u8; 4] = buffer.get(..4)?.try_into().ok()?;
    Some(u32::from_le_bytes(tag))
}

const fn ticks(time: FILETIME) -> u64 {
    join_u32(time.dwHighDateTime, time.dwLowDateTime)
}

fn file_info(path: &Path) -> io::Result<WinFileInfo> {
    let handle = HandleGuard::open_metadata(path, false)?;
    let mut raw = MaybeUninit::<BY_HANDLE_FILE_INFORMATION>::zeroed();
    // SAFETY: `raw` is a writable BY_HANDLE_FILE_INFORMATION.
    if unsafe { GetFileInformationByHandle(handle.raw(), raw.as_mut_ptr()) } == 0 {
        return Err(io::Error::last_os_error());
    }
    // SAFETY: the call succeeded and filled the structure.
    let raw = unsafe { raw.assume_init() };

    // The tag is best effort; a failed query leaves the entry a plain file.
    let reparse_tag = if raw.dwFileAttributes & FILE_ATTRIBUTE_REPARSE_POINT != 0 {
        reparse_data(&handle)
            .ok()
            .and_then(|buffer| reparse_tag_of(&buffer))
            .unwrap_or(0)
    } else {
        0
    };

    Ok(WinFileInfo {
        attributes: raw.dwFileAttributes,
        reparse_tag,
        volume_serial: raw.dwVolumeSerialNumber,
        file_index: join_u32(raw.nFileIndexHigh, raw.nFileIndexLow),
        links: raw.nNumberOfLinks,
        size: join_u32(raw.nFileSizeHigh, raw.nFileSizeLow),
        creation: ticks(raw.ftCreationTime),
        last_access: ticks(raw.ftLastAccessTime),
        last_write: ticks(raw.ftLastWriteTime),
    })
}
