//! The `lstat` field set shared by both backends.
//!
//! POSIX fills [`StatFields`] from `symlink_metadata`, Windows from
//! `GetFileInformationByHandle`; either way the cursor walks
//! [`STAT_FIELDS`], so the 24 names and their order never depend on the
//! platform.

use valxfer::handler::{Field, Fields};
use valxfer::{TimeSpec64, Value};

/// Metadata of one path, already converted to the wire's value types.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[allow(clippy::struct_excessive_bools)]
pub struct StatFields {
    pub dev: i64,
    pub ino: i64,
    pub mode: i64,
    pub is_blk: bool,
    pub is_chr: bool,
    pub is_dir: bool,
    pub is_fifo: bool,
    pub is_lnk: bool,
    pub is_reg: bool,
    pub is_sock: bool,
    pub typeis_mq: bool,
    pub typeis_sem: bool,
    pub typeis_shm: bool,
    pub typeis_tmo: bool,
    pub nlink: i64,
    pub uid: i64,
    pub gid: i64,
    pub rdev: i64,
    pub size: i64,
    pub atim: TimeSpec64,
    pub mtim: TimeSpec64,
    pub ctim: TimeSpec64,
    pub blksize: i64,
    pub blocks: i64,
}

/// Cursor handler over an owned [`StatFields`].
pub type StatHandler = Fields<StatFields>;

/// Field table for stat cursors, in emission order.
pub static STAT_FIELDS: &[Field<StatFields>] = &[
    Field::new("st_dev", |s: &StatFields| Value::Number(s.dev)),
    Field::new("st_ino", |s: &StatFields| Value::Number(s.ino)),
    Field::new("st_mode", |s: &StatFields| Value::Number(s.mode)),
    Field::new("S_ISBLK", |s: &StatFields| Value::Boolean(s.is_blk)),
    Field::new("S_ISCHR", |s: &StatFields| Value::Boolean(s.is_chr)),
    Field::new("S_ISDIR", |s: &StatFields| Value::Boolean(s.is_dir)),
    Field::new("S_ISFIFO", |s: &StatFields| Value::Boolean(s.is_fifo)),
    Field::new("S_ISLNK", |s: &StatFields| Value::Boolean(s.is_lnk)),
    Field::new("S_ISREG", |s: &StatFields| Value::Boolean(s.is_reg)),
    Field::new("S_ISSOCK", |s: &StatFields| Value::Boolean(s.is_sock)),
    Field::new("S_TYPEISMQ", |s: &StatFields| Value::Boolean(s.typeis_mq)),
    Field::new("S_TYPEISSEM", |s: &StatFields| Value::Boolean(s.typeis_sem)),
    Field::new("S_TYPEISSHM", |s: &StatFields| Value::Boolean(s.typeis_shm)),
    Field::new("S_TYPEISTMO", |s: &StatFields| Value::Boolean(s.typeis_tmo)),
    Field::new("st_nlink", |s: &StatFields| Value::Number(s.nlink)),
    Field::new("st_uid", |s: &StatFields| Value::Number(s.uid)),
    Field::new("st_gid", |s: &StatFields| Value::Number(s.gid)),
    Field::new("st_rdev", |s: &StatFields| Value::Number(s.rdev)),
    Field::new("st_size", |s: &StatFields| Value::Number(s.size)),
    Field::new("st_atim", |s: &StatFields| Value::TimeSpec(s.atim)),
    Field::new("st_mtim", |s: &StatFields| Value::TimeSpec(s.mtim)),
    Field::new("st_ctim", |s: &StatFields| Value::TimeSpec(s.ctim)),
    Field::new("st_blksize", |s: &StatFields| Value::Number(s.blksize)),
    Field::new("st_blocks", |s: &StatFields| Value::Number(s.blocks)),
];

impl StatFields {
    /// Wraps the fields in a cursor handler.
    #[must_use]
    pub const fn into_handler(self) -> StatHandler {
        Fields::new(self, STAT_FIELDS)
    }
}
