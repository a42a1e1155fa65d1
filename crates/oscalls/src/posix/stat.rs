use std::fs::{self, Metadata};
use std::os::unix::fs::{FileTypeExt, MetadataExt};
use std::path::Path;

use valxfer::{Cursor, TimeSpec64};

use crate::adapter::complete;
use crate::error::AdapterError;
use crate::stat::StatFields;

/// Streams the `lstat` fields of `path` without following a final symlink.
#[must_use]
pub fn lstat(path: &Path) -> Cursor {
    logging::trace_stat!(path = %path.display(), "lstat");
    complete(stat_fields(path).map(StatFields::into_handler))
}

pub(crate) fn stat_fields(path: &Path) -> Result<StatFields, AdapterError> {
    fs::symlink_metadata(path)
        .map(|metadata| from_metadata(&metadata))
        .map_err(|error| AdapterError::new("lstat", path, error))
}

fn from_metadata(metadata: &Metadata) -> StatFields {
    let file_type = metadata.file_type();
    StatFields {
        dev: metadata.dev() as i64,
        ino: metadata.ino() as i64,
        mode: i64::from(metadata.mode()),
        is_blk: file_type.is_block_device(),
        is_chr: file_type.is_char_device(),
        is_dir: file_type.is_dir(),
        is_fifo: file_type.is_fifo(),
        is_lnk: file_type.is_symlink(),
        is_reg: file_type.is_file(),
        is_sock: file_type.is_socket(),
        // POSIX IPC objects never appear as filesystem entries here.
        typeis_mq: false,
        typeis_sem: false,
        typeis_shm: false,
        typeis_tmo: false,
        nlink: metadata.nlink() as i64,
        uid: i64::from(metadata.uid()),
        gid: i64::from(metadata.gid()),
        rdev: metadata.rdev() as i64,
        size: metadata.size() as i64,
        atim: TimeSpec64::new(metadata.atime(), metadata.atime_nsec()),
        mtim: TimeSpec64::new(metadata.mtime(), metadata.mtime_nsec()),
        ctim: TimeSpec64::new(metadata.ctime(), metadata.ctime_nsec()),
        blksize: metadata.blksize() as i64,
        blocks: metadata.blocks() as i64,
    }
}
