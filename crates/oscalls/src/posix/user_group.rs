//! User and group database lookups.
//!
//! Both queries use the reentrant `*_r` calls with a caller-owned scratch
//! buffer. The buffer starts at the cached size hint and doubles on
//! `ERANGE`; the strings are copied out before the buffer is dropped so the
//! handler owns plain Rust data.

use std::ffi::{CStr, c_char};
use std::mem::MaybeUninit;
use std::path::Path;
use std::ptr;

use valxfer::handler::{Elements, Field, Fields};
use valxfer::{Cursor, Value};

use crate::adapter::complete;
use crate::buffer::{self, BufferHint, GROUP, PASSWD};
use crate::error::AdapterError;

/// Owned copy of a `passwd` entry.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PasswdEntry {
    pub name: String,
    pub passwd: String,
    pub uid: i64,
    pub gid: i64,
    pub gecos: String,
    pub dir: String,
    pub shell: String,
}

/// Owned copy of a `group` entry.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GroupEntry {
    pub name: String,
    pub gid: i64,
    pub members: Vec<String>,
}

static PASSWD_FIELDS: &[Field<PasswdEntry>] = &[
    Field::new("pw_name", |pw: &PasswdEntry| Value::String(pw.name.clone())),
    Field::new("pw_passwd", |pw: &PasswdEntry| Value::String(pw.passwd.clone())),
    Field::new("pw_uid", |pw: &PasswdEntry| Value::Number(pw.uid)),
    Field::new("pw_gid", |pw: &PasswdEntry| Value::Number(pw.gid)),
    Field::new("pw_gecos", |pw: &PasswdEntry| Value::String(pw.gecos.clone())),
    Field::new("pw_dir", |pw: &PasswdEntry| Value::String(pw.dir.clone())),
    Field::new("pw_shell", |pw: &PasswdEntry| Value::String(pw.shell.clone())),
];

static GROUP_FIELDS: &[Field<GroupEntry>] = &[
    Field::new("gr_name", |gr: &GroupEntry| Value::String(gr.name.clone())),
    Field::new("gr_gid", |gr: &GroupEntry| Value::Number(gr.gid)),
    Field::new("gr_mem", |gr: &GroupEntry| {
        Value::from(Cursor::initialize(Elements::new(gr.members.clone())))
    }),
];

/// Streams the password database entry for `uid`.
#[must_use]
pub fn getpwuid(uid: i64) -> Cursor {
    logging::trace_owner!(uid, "getpwuid");
    complete(lookup_passwd(uid).map(|entry| Fields::new(entry, PASSWD_FIELDS)))
}

/// Streams the group database entry for `gid`; `gr_mem` is a nested array.
#[must_use]
pub fn getgrgid(gid: i64) -> Cursor {
    logging::trace_owner!(gid, "getgrgid");
    complete(lookup_group(gid).map(|entry| Fields::new(entry, GROUP_FIELDS)))
}

fn owner_error(context: &'static str, id: i64, code: i32) -> AdapterError {
    AdapterError::from_code(context, Path::new(&id.to_string()), code)
}

/// Runs a reentrant lookup, doubling the scratch buffer on `ERANGE`.
///
/// `call` returns the `*_r` status and, when an entry was found, its copy
/// taken while the scratch buffer is still alive.
fn with_scratch<T>(
    hint: &BufferHint,
    context: &'static str,
    id: i64,
    mut call: impl FnMut(&mut [u8]) -> (i32, Option<T>),
) -> Result<T, AdapterError> {
    let mut size = hint.get();
    loop {
        let mut scratch = vec![0_u8; size];
        match call(&mut scratch) {
            (0, Some(entry)) => {
                hint.grow_to(size);
                return Ok(entry);
            }
            (0, None) => return Err(owner_error(context, id, libc::ENOENT)),
            (libc::ERANGE, _) => {
                let grown = buffer::doubled(size);
                logging::trace_owner!(from = size, to = grown, "{context} buffer too small");
                if grown == size {
                    return Err(owner_error(context, id, libc::ERANGE));
                }
                size = grown;
            }
            (code, _) => return Err(owner_error(context, id, code)),
        }
    }
}

#[allow(unsafe_code)]
fn lookup_passwd(uid: i64) -> Result<PasswdEntry, AdapterError> {
    let id = uid;
    let uid = libc::uid_t::try_from(uid)
        .map_err(|_| owner_error("look up user", id, libc::EINVAL))?;
    with_scratch(&PASSWD, "look up user", id, |scratch| {
        let mut entry = MaybeUninit::<libc::passwd>::zeroed();
        let mut result: *mut libc::passwd = ptr::null_mut();
        // SAFETY: every pointer refers to storage owned by this frame and
        // `scratch.len()` is the true size of the scratch buffer.
        let status = unsafe {
            libc::getpwuid_r(
                uid,
                entry.as_mut_ptr(),
                scratch.as_mut_ptr().cast::<c_char>(),
                scratch.len(),
                &mut result,
            )
        };
        if status != 0 || result.is_null() {
            return (status, None);
        }
        // SAFETY: a non-null result means `entry` was filled and its strings
        // point into `scratch`, which outlives this closure call.
        let pw = unsafe { entry.assume_init_ref() };
        let entry = unsafe {
            PasswdEntry {
                name: owned(pw.pw_name),
                passwd: owned(pw.pw_passwd),
                uid: i64::from(pw.pw_uid),
                gid: i64::from(pw.pw_gid),
                gecos: owned(pw.pw_gecos),
                dir: owned(pw.pw_dir),
                shell: owned(pw.pw_shell),
            }
        };
        (0, Some(entry))
    })
}

#[allow(unsafe_code)]
fn lookup_group(gid: i64) -> Result<GroupEntry, AdapterError> {
    let id = gid;
    let gid = libc::gid_t::try_from(gid)
        .map_err(|_| owner_error("look up group", id, libc::EINVAL))?;
    with_scratch(&GROUP, "look up group", id, |scratch| {
        let mut entry = MaybeUninit::<libc::group>::zeroed();
        let mut result: *mut libc::group = ptr::null_mut();
        // SAFETY: as in `lookup_passwd`.
        let status = unsafe {
            libc::getgrgid_r(
                gid,
                entry.as_mut_ptr(),
                scratch.as_mut_ptr().cast::<c_char>(),
                scratch.len(),
                &mut result,
            )
        };
        if status != 0 || result.is_null() {
            return (status, None);
        }
        // SAFETY: `entry` was filled by a successful lookup.
        let gr = unsafe { entry.assume_init_ref() };
        let entry = unsafe {
            GroupEntry {
                name: owned(gr.gr_name),
                gid: i64::from(gr.gr_gid),
                members: members(gr.gr_mem),
            }
        };
        (0, Some(entry))
    })
}

/// Copies a possibly-null C string.
///
/// # Safety
///
/// `ptr` must be null or point to a NUL-terminated string.
#[allow(unsafe_code)]
unsafe fn owned(ptr: *const c_char) -> String {
    if ptr.is_null() {
        return String::new();
    }
    // SAFETY: guaranteed by the caller.
    unsafe { CStr::from_ptr(ptr) }
        .to_string_lossy()
        .into_owned()
}

/// Copies a null-terminated array of C strings.
///
/// # Safety
///
/// `list` must be null or a valid null-terminated array of C strings.
#[allow(unsafe_code)]
unsafe fn members(list: *mut *mut c_char) -> Vec<String> {
    let mut names = Vec::new();
    if list.is_null() {
        return names;
    }
    let mut cursor = list;
    // SAFETY: guaranteed by the caller; iteration stops at the terminator.
    unsafe {
        while !(*cursor).is_null() {
            names.push(owned(*cursor));
            cursor = cursor.add(1);
        }
    }
    names
}
