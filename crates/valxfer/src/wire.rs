//! C-compatible wire form of the cursor protocol.
//!
//! A [`ValueT`] is both the record and the iteration state: the embedded
//! [`HandleT`] carries the handler pointer, two untyped data slots and the
//! call index. Rust cursors are exported by installing a bridge handler
//! whose `data1` slot owns the boxed cursor plus the C strings currently
//! published through `name` and `string`.
//!
//! Ownership across the boundary: a `ValueT` returned by [`export`] belongs
//! to the caller until [`get_next_value`] returns `false` (the bridge then
//! frees both the state and the `ValueT` itself) or until the caller hands
//! it to [`release_value`]. Nested `complex` values follow the same rule
//! independently of their parent.

#![allow(unsafe_code)]

use std::ffi::{CString, c_char, c_void};
use std::ptr;

use logging::trace_ffi;

use crate::cursor::Cursor;
use crate::value::{Kind, TimeSpec64, Value, ValueRecord};

/// Handler signature of the wire form.
///
/// Returns `true` after populating `value` with the next record and `false`
/// at exhaustion.
pub type HandlerFn = unsafe extern "C" fn(value: *mut ValueT) -> bool;

const ERROR_NAME_C: &std::ffi::CStr = c"errno";

/// Iteration state embedded at the start of every [`ValueT`].
#[repr(C)]
#[derive(Debug)]
pub struct HandleT {
    /// Producer of the next record.
    pub handler: Option<HandlerFn>,
    /// First handler-owned data slot.
    pub data1: *mut c_void,
    /// Second handler-owned data slot.
    pub data2: *mut c_void,
    /// Number of successful handler invocations.
    pub index: i64,
}

/// Wire record: iteration state plus one tagged payload.
#[repr(C)]
#[derive(Debug)]
pub struct ValueT {
    /// Iteration state.
    pub handle: HandleT,
    /// NUL-terminated field name, `"[]"` for array elements.
    pub name: *const c_char,
    /// Payload discriminator.
    pub kind: Kind,
    /// Payload for [`Kind::TimeSpec`].
    pub time_spec: TimeSpec64,
    /// Payload for [`Kind::Number`], and the code for [`Kind::Error`].
    pub number: i64,
    /// Payload for [`Kind::String`].
    pub string: *const c_char,
    /// Payload for [`Kind::Complex`].
    pub complex: *mut ValueT,
    /// Payload for [`Kind::Boolean`].
    pub boolean: bool,
}

impl ValueT {
    fn pending(handler: Option<HandlerFn>, data1: *mut c_void, data2: *mut c_void) -> Self {
        Self {
            handle: HandleT {
                handler,
                data1,
                data2,
                index: 0,
            },
            name: ERROR_NAME_C.as_ptr(),
            kind: Kind::Ok,
            time_spec: TimeSpec64::default(),
            number: 0,
            string: ptr::null(),
            complex: ptr::null_mut(),
            boolean: false,
        }
    }
}

/// Bridge state stored in `data1` of an exported cursor.
struct Exported {
    cursor: Cursor,
    name: Option<CString>,
    string: Option<CString>,
}

impl Exported {
    fn publish(&mut self, slot: &mut ValueT, record: ValueRecord) {
        let (name, value) = record.into_parts();
        self.name = name.map(c_string);
        slot.name = self.name.as_ref().map_or(ptr::null(), |name| name.as_ptr());
        slot.kind = value.kind();
        slot.string = ptr::null();
        slot.complex = ptr::null_mut();
        self.string = None;

        match value {
            Value::Ok => slot.number = 0,
            Value::Error(code) | Value::Number(code) => slot.number = code,
            Value::String(string) => {
                let string = self.string.insert(c_string(string));
                slot.string = string.as_ptr();
            }
            Value::Complex(nested) => slot.complex = export(*nested),
            Value::TimeSpec(time) => slot.time_spec = time,
            Value::Boolean(flag) => slot.boolean = flag,
        }
    }
}

/// Converts text to a C string, truncating at the first interior NUL.
fn c_string(text: impl Into<Vec<u8>>) -> CString {
    let mut bytes = text.into();
    if let Some(nul) = bytes.iter().position(|&byte| byte == 0) {
        bytes.truncate(nul);
    }
    CString::new(bytes).unwrap_or_default()
}

/// Hands a cursor to C as a heap-allocated [`ValueT`].
///
/// The returned record is pending: `kind` is [`Kind::Ok`], or
/// [`Kind::Error`] with the code in `number` when the query failed. An
/// error-seeded value returns `false` on its first [`get_next_value`].
#[must_use]
pub fn export(cursor: Cursor) -> *mut ValueT {
    let seed = cursor.error_code();
    let state = Box::new(Exported {
        cursor,
        name: None,
        string: None,
    });
    let mut value = Box::new(ValueT::pending(
        Some(bridge),
        Box::into_raw(state).cast(),
        ptr::null_mut(),
    ));
    if let Some(code) = seed {
        value.kind = Kind::Error;
        value.number = code;
    }
    let raw = Box::into_raw(value);
    trace_ffi!(value = ?raw, error = ?seed, "cursor exported");
    raw
}

/// Frees the bridge state and the `ValueT` that carries it.
///
/// # Safety
///
/// `value` must have been produced by [`export`] and not freed yet.
unsafe fn dispose(value: *mut ValueT) {
    // SAFETY: the caller guarantees `value` came from `export`, so both the
    // record and its `data1` slot are live boxes allocated there.
    unsafe {
        let state = (*value).handle.data1.cast::<Exported>();
        if !state.is_null() {
            drop(Box::from_raw(state));
        }
        drop(Box::from_raw(value));
    }
}

unsafe extern "C" fn bridge(value: *mut ValueT) -> bool {
    // SAFETY: the bridge is only installed by `export`, which stores a
    // boxed `Exported` in `data1` of a boxed `ValueT`.
    let Some(slot) = (unsafe { value.as_mut() }) else {
        return false;
    };
    let state = slot.handle.data1.cast::<Exported>();
    // SAFETY: see above; the state is freed only together with `value`.
    let Some(exported) = (unsafe { state.as_mut() }) else {
        return false;
    };

    if exported.cursor.advance() && !exported.cursor.record().is_error() {
        let record = exported.cursor.take_record();
        exported.publish(slot, record);
        return true;
    }

    trace_ffi!(value = ?value, "exported cursor exhausted");
    // SAFETY: nothing touches `slot` or `exported` after this point.
    unsafe { dispose(value) };
    false
}

/// Initialises `value` as a pending record driven by `handler`.
///
/// # Safety
///
/// `value` must be null or point to writable memory for a [`ValueT`].
pub unsafe fn create_handle(
    value: *mut ValueT,
    handler: Option<HandlerFn>,
    data1: *mut c_void,
    data2: *mut c_void,
) {
    if value.is_null() {
        return;
    }
    // SAFETY: non-null and writable per the caller contract.
    unsafe { value.write(ValueT::pending(handler, data1, data2)) };
}

/// Invokes the handler stored in `value`.
///
/// Increments the index after a successful call. When the handler returns
/// `false` the record may already have been freed, so it is not touched.
///
/// # Safety
///
/// `value` must be null or a record initialised by [`create_handle`] or
/// returned by [`export`] that has not reported exhaustion yet.
pub unsafe fn get_next_value(value: *mut ValueT) -> bool {
    // SAFETY: validity per the caller contract.
    let Some(handler) = (unsafe { value.as_ref() }).and_then(|slot| slot.handle.handler) else {
        return false;
    };
    // SAFETY: the handler was installed together with its data slots.
    let more = unsafe { handler(value) };
    if more {
        // SAFETY: a handler returning `true` leaves the record alive.
        unsafe { (*value).handle.index += 1 };
    }
    more
}

/// Releases an exported record that will not be drained.
///
/// Records not produced by [`export`] are left untouched.
///
/// # Safety
///
/// `value` must be null or a live record; it must not be used afterwards
/// when it was produced by [`export`].
pub unsafe fn release_value(value: *mut ValueT) {
    // SAFETY: validity per the caller contract.
    let Some(slot) = (unsafe { value.as_ref() }) else {
        return;
    };
    let exported = slot
        .handle
        .handler
        .is_some_and(|handler| ptr::fn_addr_eq(handler, bridge as HandlerFn));
    if exported {
        trace_ffi!(value = ?value, "exported cursor released");
        // SAFETY: installed by `export`, so owned by this module.
        unsafe { dispose(value) };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::{Elements, SingleValue, from_fn};
    use std::ffi::CStr;

    unsafe fn name_of(value: *const ValueT) -> String {
        unsafe { CStr::from_ptr((*value).name) }
            .to_string_lossy()
            .into_owned()
    }

    #[test]
    fn exported_cursor_streams_fields() {
        let cursor = Cursor::initialize(from_fn(|index| match index {
            0 => Some(ValueRecord::new("st_size", 4096_i64)),
            1 => Some(ValueRecord::new("S_ISREG", true)),
            2 => Some(ValueRecord::new("path", String::from("/tmp/a"))),
            _ => None,
        }));
        let value = export(cursor);

        unsafe {
            assert_eq!((*value).kind, Kind::Ok);
            assert_eq!(name_of(value), "errno");

            assert!(get_next_value(value));
            assert_eq!((*value).kind, Kind::Number);
            assert_eq!(name_of(value), "st_size");
            assert_eq!((*value).number, 4096);
            assert_eq!((*value).handle.index, 1);

            assert!(get_next_value(value));
            assert_eq!((*value).kind, Kind::Boolean);
            assert!((*value).boolean);

            assert!(get_next_value(value));
            assert_eq!((*value).kind, Kind::String);
            assert_eq!(CStr::from_ptr((*value).string).to_str().unwrap(), "/tmp/a");

            assert!(!get_next_value(value));
        }
    }

    #[test]
    fn error_seed_is_visible_before_first_advance() {
        let value = export(Cursor::error(2));
        unsafe {
            assert_eq!((*value).kind, Kind::Error);
            assert_eq!((*value).number, 2);
            assert!(!get_next_value(value));
        }
    }

    #[test]
    fn nested_values_drain_independently() {
        let cursor = Cursor::initialize(SingleValue::new(
            "gr_mem",
            Cursor::initialize(Elements::new(vec![
                String::from("alice"),
                String::from("bob"),
            ])),
        ));
        let value = export(cursor);
        unsafe {
            assert!(get_next_value(value));
            assert_eq!((*value).kind, Kind::Complex);
            let nested = (*value).complex;
            assert!(!nested.is_null());

            assert!(!get_next_value(value));

            let mut members = Vec::new();
            while get_next_value(nested) {
                assert_eq!(name_of(nested), "[]");
                members.push(
                    CStr::from_ptr((*nested).string)
                        .to_string_lossy()
                        .into_owned(),
                );
            }
            assert_eq!(members, ["alice", "bob"]);
        }
    }

    #[test]
    fn interior_nul_truncates_string() {
        let value = export(Cursor::initialize(SingleValue::new(
            "value",
            String::from("abc\0def"),
        )));
        unsafe {
            assert!(get_next_value(value));
            assert_eq!(CStr::from_ptr((*value).string).to_bytes(), b"abc");
            release_value(value);
        }
    }

    #[test]
    fn release_of_null_and_foreign_values_is_harmless() {
        unsafe extern "C" fn counting(value: *mut ValueT) -> bool {
            unsafe {
                let slot = &mut *value;
                slot.kind = Kind::Number;
                slot.number = slot.handle.index;
                slot.handle.index < 2
            }
        }

        unsafe {
            release_value(ptr::null_mut());
            assert!(!get_next_value(ptr::null_mut()));

            let mut slot = std::mem::MaybeUninit::<ValueT>::uninit();
            create_handle(slot.as_mut_ptr(), Some(counting), ptr::null_mut(), ptr::null_mut());
            let value = slot.as_mut_ptr();
            assert_eq!(name_of(value), crate::ERROR_NAME);

            assert!(get_next_value(value));
            assert_eq!((*value).number, 0);
            assert!(get_next_value(value));
            assert_eq!((*value).number, 1);
            assert!(!get_next_value(value));
            assert_eq!((*value).handle.index, 2);

            release_value(value);
            assert_eq!((*value).handle.index, 2);
        }
    }

    #[test]
    fn handle_without_handler_reports_exhaustion() {
        let mut slot = std::mem::MaybeUninit::<ValueT>::uninit();
        unsafe {
            create_handle(slot.as_mut_ptr(), None, ptr::null_mut(), ptr::null_mut());
            assert!(!get_next_value(slot.as_mut_ptr()));
        }
    }
}
