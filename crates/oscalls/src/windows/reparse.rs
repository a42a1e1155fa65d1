use std::io;
use std::path::Path;
use std::ptr;

use valxfer::Cursor;
use valxfer::handler::SingleValue;
use windows_sys::Win32::System::IO::DeviceIoControl;
use windows_sys::Win32::System::Ioctl::FSCTL_GET_REPARSE_POINT;

use super::HandleGuard;
use crate::adapter::complete;
use crate::error::AdapterError;
use crate::win_mapping::{ERROR_NOT_SUPPORTED, ReparseTarget, parse_reparse_buffer};

const MAXIMUM_REPARSE_DATA_BUFFER_SIZE: usize = 16 * 1024;

/// Streams the print name of the symlink or junction at `path`.
#[must_use]
pub fn win_readlink(path: &Path) -> Cursor {
    logging::trace_link!(path = %path.display(), "win_readlink");
    let result = read_target(path)
        .map(|target| SingleValue::new("path", target))
        .map_err(|error| AdapterError::new("read reparse point", path, error));
    complete(result)
}

fn read_target(path: &Path) -> io::Result<String> {
    let handle = HandleGuard::open_metadata(path, false)?;
    let buffer = reparse_data(&handle)?;
    match parse_reparse_buffer(&buffer).map_err(io::Error::from_raw_os_error)? {
        ReparseTarget::Path(target) => Ok(target),
        ReparseTarget::Unsupported(tag) => {
            logging::trace_link!(tag, "unsupported reparse tag");
            Err(io::Error::from_raw_os_error(ERROR_NOT_SUPPORTED))
        }
    }
}

/// Reads the raw `REPARSE_DATA_BUFFER` of an open reparse point.
pub(super) fn reparse_data(handle: &HandleGuard) -> io::Result<Vec<u8>> {
    let mut buffer = vec![0_u8; MAXIMUM_REPARSE_DATA_BUFFER_SIZE];
    let mut returned = 0_u32;
    // SAFETY: the output buffer is writable for its full length and
    // `returned` receives the filled size.
    let ok = unsafe {
        DeviceIoControl(
            handle.raw(),
            FSCTL_GET_REPARSE_POINT,
            ptr::null(),
            0,
            buffer.as_mut_ptr().cast(),
            buffer.len() as u32,
            &mut returned,
            ptr::null_mut(),
        )
    };
    if ok == 0 {
        return Err(io::Error::last_os_error());
    }
    buffer.truncate(returned as usize);
    Ok(buffer)
}
