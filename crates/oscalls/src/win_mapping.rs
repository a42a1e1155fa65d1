//! Platform-independent conversions used by the Windows backend.
//!
//! Everything here works on plain integers and byte slices so it can be
//! unit-tested on any host; the Windows modules only gather the raw data.

use valxfer::TimeSpec64;

use crate::stat::StatFields;

pub const FILE_ATTRIBUTE_READONLY: u32 = 0x0000_0001;
pub const FILE_ATTRIBUTE_DIRECTORY: u32 = 0x0000_0010;
pub const FILE_ATTRIBUTE_REPARSE_POINT: u32 = 0x0000_0400;

pub const IO_REPARSE_TAG_SYMLINK: u32 = 0xA000_000C;
pub const IO_REPARSE_TAG_MOUNT_POINT: u32 = 0xA000_0003;

pub const ERROR_NOT_SUPPORTED: i32 = 50;
pub const ERROR_INVALID_DATA: i32 = 13;
pub const ERROR_NO_UNICODE_TRANSLATION: i32 = 1113;
pub const ERROR_PRIVILEGE_NOT_HELD: i32 = 1314;

/// Largest alternate stream read in one query.
pub const MAX_STREAM_READ: usize = 10 * 1024 * 1024;

/// Block size reported for every Windows file.
pub const BLOCK_SIZE: i64 = 4096;

const S_IFDIR: u32 = 0o040_000;
const S_IFREG: u32 = 0o100_000;
const S_IFLNK: u32 = 0o120_000;

const TICKS_PER_SECOND: u64 = 10_000_000;
const EPOCH_DIFFERENCE_SECS: i64 = 11_644_473_600;

/// Raw facts gathered from `GetFileInformationByHandle` and friends.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WinFileInfo {
    pub attributes: u32,
    /// Reparse tag, meaningful only with `FILE_ATTRIBUTE_REPARSE_POINT`.
    pub reparse_tag: u32,
    pub volume_serial: u32,
    pub file_index: u64,
    pub links: u32,
    pub size: u64,
    pub creation: u64,
    pub last_access: u64,
    pub last_write: u64,
}

/// Returns whether the attributes and tag describe a symlink or junction.
#[must_use]
pub const fn is_link(attributes: u32, reparse_tag: u32) -> bool {
    attributes & FILE_ATTRIBUTE_REPARSE_POINT != 0
        && (reparse_tag == IO_REPARSE_TAG_SYMLINK || reparse_tag == IO_REPARSE_TAG_MOUNT_POINT)
}

/// Approximates a POSIX mode from file attributes.
#[must_use]
pub const fn attrs_to_mode(attributes: u32, reparse_tag: u32) -> u32 {
    let mut mode = if attributes & FILE_ATTRIBUTE_REPARSE_POINT != 0 {
        if is_link(attributes, reparse_tag) {
            S_IFLNK
        } else {
            S_IFREG
        }
    } else if attributes & FILE_ATTRIBUTE_DIRECTORY != 0 {
        S_IFDIR
    } else {
        S_IFREG
    };

    mode |= 0o400;
    if attributes & FILE_ATTRIBUTE_READONLY == 0 {
        mode |= 0o200;
    }
    if attributes & FILE_ATTRIBUTE_DIRECTORY != 0 {
        mode |= 0o100;
    }
    mode |= (mode & 0o700) >> 3;
    mode |= (mode & 0o700) >> 6;
    mode
}

/// Converts a FILETIME tick count (100 ns since 1601) to Unix time.
#[must_use]
pub const fn filetime_to_timespec(ticks: u64) -> TimeSpec64 {
    let secs = (ticks / TICKS_PER_SECOND) as i64 - EPOCH_DIFFERENCE_SECS;
    let nanos = (ticks % TICKS_PER_SECOND) as i64 * 100;
    TimeSpec64::new(secs, nanos)
}

/// Joins the two halves of a FILETIME or file index.
#[must_use]
pub const fn join_u32(high: u32, low: u32) -> u64 {
    ((high as u64) << 32) | low as u64
}

/// Number of 512-byte blocks needed for `size` bytes.
#[must_use]
pub const fn blocks_for(size: u64) -> i64 {
    size.div_ceil(512) as i64
}

impl WinFileInfo {
    /// Projects the raw facts onto the shared stat field set.
    #[must_use]
    pub fn to_stat(&self) -> StatFields {
        let link = is_link(self.attributes, self.reparse_tag);
        let dir = self.attributes & FILE_ATTRIBUTE_DIRECTORY != 0;
        StatFields {
            dev: i64::from(self.volume_serial),
            ino: self.file_index as i64,
            mode: i64::from(attrs_to_mode(self.attributes, self.reparse_tag)),
            is_dir: dir,
            is_lnk: link,
            is_reg: !dir && !link,
            nlink: i64::from(self.links),
            size: self.size as i64,
            atim: filetime_to_timespec(self.last_access),
            mtim: filetime_to_timespec(self.last_write),
            ctim: filetime_to_timespec(self.creation),
            blksize: BLOCK_SIZE,
            blocks: blocks_for(self.size),
            ..StatFields::default()
        }
    }
}

fn u16_at(buf: &[u8], offset: usize) -> Option<u16> {
    let bytes = buf.get(offset..offset + 2)?;
    Some(u16::from_le_bytes([bytes[0], bytes[1]]))
}

fn u32_at(buf: &[u8], offset: usize) -> Option<u32> {
    let bytes = buf.get(offset..offset + 4)?;
    Some(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
}

/// Outcome of parsing a `REPARSE_DATA_BUFFER`.
#[derive(Debug, PartialEq, Eq)]
pub enum ReparseTarget {
    /// Print name of a symlink or mount point.
    Path(String),
    /// The buffer is a reparse point of another kind.
    Unsupported(u32),
}

/// Extracts the print name from a raw `REPARSE_DATA_BUFFER`.
///
/// Returns `Err(ERROR_INVALID_DATA)` when the buffer is too short for the
/// offsets it declares and `Err(ERROR_NO_UNICODE_TRANSLATION)` when the
/// name is not valid UTF-16.
pub fn parse_reparse_buffer(buf: &[u8]) -> Result<ReparseTarget, i32> {
    let tag = u32_at(buf, 0).ok_or(ERROR_INVALID_DATA)?;
    let path_buffer = match tag {
        IO_REPARSE_TAG_SYMLINK => 20,
        IO_REPARSE_TAG_MOUNT_POINT => 16,
        other => return Ok(ReparseTarget::Unsupported(other)),
    };
    let offset = u16_at(buf, 12).ok_or(ERROR_INVALID_DATA)?;
    let length = u16_at(buf, 14).ok_or(ERROR_INVALID_DATA)?;

    let start = path_buffer + usize::from(offset);
    let name = buf
        .get(start..start + usize::from(length))
        .ok_or(ERROR_INVALID_DATA)?;
    let units: Vec<u16> = name
        .chunks_exact(2)
        .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
        .collect();
    String::from_utf16(&units)
        .map(ReparseTarget::Path)
        .map_err(|_| ERROR_NO_UNICODE_TRANSLATION)
}

/// Removes the `\\?\` verbatim prefix, mapping `\\?\UNC\host` to `\\host`.
#[must_use]
pub fn strip_verbatim_prefix(path: &str) -> String {
    if let Some(rest) = path.strip_prefix(r"\\?\UNC\") {
        format!(r"\\{rest}")
    } else if let Some(rest) = path.strip_prefix(r"\\?\") {
        rest.to_owned()
    } else {
        path.to_owned()
    }
}

/// Builds the `path:name:$DATA` form used to open an alternate stream.
#[must_use]
pub fn stream_path(path: &str, stream: &str) -> String {
    let stream = stream.strip_prefix(':').unwrap_or(stream);
    if stream.contains(":$DATA") {
        format!("{path}:{stream}")
    } else {
        format!("{path}:{stream}:$DATA")
    }
}
