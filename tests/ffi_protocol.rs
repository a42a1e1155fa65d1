#![cfg(unix)]

use std::ffi::{CStr, CString};
use std::os::unix::ffi::OsStrExt;
use std::path::Path;
use std::ptr;

use oscalls_shim::{
    GetNextValue, ReleaseValue, ValueT, linux_getgrgid, linux_lgetxattr, linux_lstat,
    linux_readlink,
};
use valxfer::Kind;

const ENOENT: i64 = 2;
const EINVAL: i64 = 22;

fn c_path(path: &Path) -> CString {
    CString::new(path.as_os_str().as_bytes()).unwrap()
}

/// Drains an exported record, returning `(name, kind)` per field.
fn drain(value: *mut ValueT) -> Vec<(String, Kind)> {
    let mut fields = Vec::new();
    // SAFETY: `value` is a live export; it is not read after `false`.
    unsafe {
        assert_eq!((*value).kind, Kind::Ok, "pending record must be Ok");
        while GetNextValue(value) {
            let name = CStr::from_ptr((*value).name).to_string_lossy().into_owned();
            fields.push((name, (*value).kind));
        }
    }
    fields
}

#[test]
fn lstat_export_streams_every_field() {
    let dir = test_support::scratch().unwrap();
    let file = test_support::file_of_size(dir.path(), "data", 10).unwrap();
    let path = c_path(&file);

    // SAFETY: `path` is a valid C string for the duration of the call.
    let fields = drain(unsafe { linux_lstat(path.as_ptr()) });
    assert_eq!(fields.len(), 24);
    assert_eq!(fields[0], ("st_dev".to_owned(), Kind::Number));
    assert_eq!(fields[8], ("S_ISREG".to_owned(), Kind::Boolean));
    assert!(fields.contains(&("st_mtim".to_owned(), Kind::TimeSpec)));
    assert_eq!(fields[23].0, "st_blocks");
}

#[test]
fn missing_path_is_error_seeded() {
    let dir = test_support::scratch().unwrap();
    let path = c_path(&test_support::missing_path(dir.path()));

    // SAFETY: valid C string; the record is not used after `false`.
    unsafe {
        let value = linux_lstat(path.as_ptr());
        assert_eq!((*value).kind, Kind::Error);
        assert_eq!((*value).number, ENOENT);
        assert!(!GetNextValue(value));
    }
}

#[test]
fn null_path_reports_einval() {
    // SAFETY: a null path is part of the contract.
    unsafe {
        let value = linux_readlink(ptr::null());
        assert!(!value.is_null());
        assert_eq!((*value).kind, Kind::Error);
        assert_eq!((*value).number, EINVAL);
        assert!(!GetNextValue(value));

        let value = linux_lgetxattr(ptr::null(), ptr::null());
        assert_eq!((*value).number, EINVAL);
        ReleaseValue(value);
    }
}

#[test]
fn readlink_export_yields_target_string() {
    let dir = test_support::scratch().unwrap();
    let link = test_support::symlink(dir.path(), "link", "some/target").unwrap();
    let path = c_path(&link);

    // SAFETY: valid C string; the string field is read before advancing.
    unsafe {
        let value = linux_readlink(path.as_ptr());
        assert!(GetNextValue(value));
        assert_eq!(CStr::from_ptr((*value).name).to_str().unwrap(), "path");
        assert_eq!((*value).kind, Kind::String);
        assert_eq!(
            CStr::from_ptr((*value).string).to_str().unwrap(),
            "some/target"
        );
        assert_eq!((*value).handle.index, 1);
        assert!(!GetNextValue(value));
    }
}

#[test]
fn release_mid_stream() {
    let dir = test_support::scratch().unwrap();
    let path = c_path(dir.path());

    // SAFETY: valid C string; the record is released exactly once.
    unsafe {
        let value = linux_lstat(path.as_ptr());
        assert!(GetNextValue(value));
        assert!(GetNextValue(value));
        assert_eq!((*value).handle.index, 2);
        ReleaseValue(value);
    }
}

#[test]
fn group_export_nests_members() {
    // SAFETY: the nested record is only read while its parent field is current.
    unsafe {
        let value = linux_getgrgid(0);
        assert_eq!((*value).kind, Kind::Ok);
        let mut saw_members = false;
        while GetNextValue(value) {
            if CStr::from_ptr((*value).name).to_bytes() == b"gr_mem" {
                assert_eq!((*value).kind, Kind::Complex);
                let nested = (*value).complex;
                assert!(!nested.is_null());
                while GetNextValue(nested) {
                    assert_eq!((*nested).kind, Kind::String);
                }
                saw_members = true;
            }
        }
        assert!(saw_members);
    }
}

#[test]
fn drained_adapter_matches_json_materialiser() {
    let dir = test_support::scratch().unwrap();
    let link = test_support::symlink(dir.path(), "link", "elsewhere").unwrap();

    let json = valxfer::node::to_json(oscalls::readlink(&link)).unwrap();
    assert_eq!(json, serde_json::json!({ "path": "elsewhere" }));
}
