//! Alternate data streams.

use std::ffi::OsStr;
use std::io;
use std::mem::MaybeUninit;
use std::path::Path;

use valxfer::handler::{Elements, Field, Fields, SingleValue};
use valxfer::{Cursor, Value};
use windows_sys::Win32::Foundation::{
    ERROR_HANDLE_EOF, GENERIC_READ, HANDLE, INVALID_HANDLE_VALUE,
};
use windows_sys::Win32::Storage::FileSystem::{
    FILE_ATTRIBUTE_NORMAL, FILE_SHARE_READ, FindClose, FindFirstStreamW, FindNextStreamW,
    FindStreamInfoStandard, GetFileSizeEx, ReadFile, WIN32_FIND_STREAM_DATA,
};

use super::{HandleGuard, decode, wide};
use crate::adapter::complete;
use crate::error::AdapterError;
use crate::win_mapping::{MAX_STREAM_READ, stream_path};

/// One entry of a stream listing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StreamEntry {
    pub name: String,
    pub size: i64,
}

static STREAM_FIELDS: &[Field<StreamEntry>] = &[
    Field::new("name", |entry: &StreamEntry| Value::String(entry.name.clone())),
    Field::new("size", |entry: &StreamEntry| Value::Number(entry.size)),
];

/// Streams every data stream of `path` as an array of `{name, size}` objects.
#[must_use]
pub fn win_list_streams(path: &Path) -> Cursor {
    logging::trace_streams!(path = %path.display(), "win_list_streams");
    let result = list(path)
        .map(|entries| {
            Elements::new(
                entries
                    .into_iter()
                    .map(|entry| Cursor::initialize(Fields::new(entry, STREAM_FIELDS))),
            )
        })
        .map_err(|error| AdapterError::new("list streams", path, error));
    complete(result)
}

/// Streams up to 10 MiB of stream `name` on `path` as one `content` string.
#[must_use]
pub fn win_read_stream(path: &Path, name: &OsStr) -> Cursor {
    logging::trace_streams!(path = %path.display(), stream = ?name, "win_read_stream");
    let result = read(path, name)
        .map(|content| SingleValue::new("content", String::from_utf8_lossy(&content).into_owned()))
        .map_err(|error| AdapterError::new("read stream", path, error));
    complete(result)
}

struct FindGuard(HANDLE);

impl Drop for FindGuard {
    fn drop(&mut self) {
        // SAFETY: the handle came from FindFirstStreamW and is closed once.
        unsafe {
            FindClose(self.0);
        }
    }
}

fn entry_of(data: &WIN32_FIND_STREAM_DATA) -> io::Result<StreamEntry> {
    let name = &data.cStreamName;
    let len = name.iter().position(|&unit| unit == 0).unwrap_or(name.len());
    Ok(StreamEntry {
        name: decode(&name[..len])?,
        size: data.StreamSize,
    })
}

fn list(path: &Path) -> io::Result<Vec<StreamEntry>> {
    let name = wide(path.as_os_str());
    let mut data = MaybeUninit::<WIN32_FIND_STREAM_DATA>::zeroed();
    // SAFETY: `name` is NUL-terminated and `data` is a writable
    // WIN32_FIND_STREAM_DATA as required by FindStreamInfoStandard.
    let find = unsafe {
        FindFirstStreamW(name.as_ptr(), FindStreamInfoStandard, data.as_mut_ptr().cast(), 0)
    };
    if find == INVALID_HANDLE_VALUE {
        return Err(io::Error::last_os_error());
    }
    let find = FindGuard(find);

    let mut entries = Vec::new();
    loop {
        // SAFETY: filled by the previous successful find call.
        entries.push(entry_of(unsafe { data.assume_init_ref() })?);
        // SAFETY: as for FindFirstStreamW.
        if unsafe { FindNextStreamW(find.0, data.as_mut_ptr().cast()) } == 0 {
            let error = io::Error::last_os_error();
            if error.raw_os_error() == Some(ERROR_HANDLE_EOF as i32) {
                break;
            }
            return Err(error);
        }
    }
    logging::trace_streams!(count = entries.len(), "streams listed");
    Ok(entries)
}

fn read(path: &Path, name: &OsStr) -> io::Result<Vec<u8>> {
    let full = stream_path(&path.to_string_lossy(), &name.to_string_lossy());
    let handle = HandleGuard::open(
        OsStr::new(&full),
        GENERIC_READ,
        FILE_SHARE_READ,
        FILE_ATTRIBUTE_NORMAL,
    )?;

    let mut size = 0_i64;
    // SAFETY: `size` is a writable LARGE_INTEGER.
    if unsafe { GetFileSizeEx(handle.raw(), &mut size) } == 0 {
        return Err(io::Error::last_os_error());
    }
    let wanted = usize::try_from(size).unwrap_or(0).min(MAX_STREAM_READ);

    let mut content = vec![0_u8; wanted];
    let mut read = 0_u32;
    // SAFETY: `content` holds `wanted` writable bytes, which fits in u32.
    let ok = unsafe {
        ReadFile(
            handle.raw(),
            content.as_mut_ptr(),
            wanted as u32,
            &mut read,
            std::ptr::null_mut(),
        )
    };
    if ok == 0 {
        return Err(io::Error::last_os_error());
    }
    content.truncate(read as usize);
    Ok(content)
}
