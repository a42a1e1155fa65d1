use std::io;
use std::path::Path;
use std::ptr;

use valxfer::Cursor;
use valxfer::handler::SingleValue;
use windows_sys::Win32::Storage::FileSystem::{
    FILE_NAME_NORMALIZED, GetFinalPathNameByHandleW, VOLUME_NAME_DOS,
};

use super::{HandleGuard, decode};
use crate::adapter::complete;
use crate::error::AdapterError;
use crate::win_mapping::strip_verbatim_prefix;

/// Streams the normalized final path of `path`, reparse points resolved.
#[must_use]
pub fn win_canonicalize_file_name(path: &Path) -> Cursor {
    logging::trace_link!(path = %path.display(), "win_canonicalize_file_name");
    let result = final_path(path)
        .map(|resolved| SingleValue::new("path", strip_verbatim_prefix(&resolved)))
        .map_err(|error| AdapterError::new("canonicalize", path, error));
    complete(result)
}

fn final_path(path: &Path) -> io::Result<String> {
    let handle = HandleGuard::open_metadata(path, true)?;
    let flags = FILE_NAME_NORMALIZED | VOLUME_NAME_DOS;

    // SAFETY: a null buffer of length 0 asks for the required size.
    let needed = unsafe { GetFinalPathNameByHandleW(handle.raw(), ptr::null_mut(), 0, flags) };
    if needed == 0 {
        return Err(io::Error::last_os_error());
    }

    let mut buffer = vec![0_u16; needed as usize];
    // SAFETY: `buffer` holds `needed` writable units.
    let written =
        unsafe { GetFinalPathNameByHandleW(handle.raw(), buffer.as_mut_ptr(), needed, flags) };
    if written == 0 {
        return Err(io::Error::last_os_error());
    }
    if written >= needed {
        // Path changed between the two calls.
        return Err(io::Error::from_raw_os_error(
            windows_sys::Win32::Foundation::ERROR_INSUFFICIENT_BUFFER as i32,
        ));
    }
    decode(&buffer[..written as usize])
}
