//! The three protocol entry points shared by every export.

use core::ffi::c_void;

use valxfer::wire::{self, HandlerFn, ValueT};

/// Advances `value` to its next record.
///
/// Returns `false` once the source is exhausted or failed; an exported
/// record is freed at that point and must not be touched again.
///
/// # Safety
///
/// `value` must be null or a live record produced by an export or
/// initialised by [`CreateHandle`].
#[allow(non_snake_case)]
#[unsafe(no_mangle)]
pub unsafe extern "C" fn GetNextValue(value: *mut ValueT) -> bool {
    // SAFETY: forwarded caller contract.
    unsafe { wire::get_next_value(value) }
}

/// Initialises a caller-owned record around a native handler.
///
/// # Safety
///
/// `value` must be null or point to writable memory for a `ValueT`.
#[allow(non_snake_case)]
#[unsafe(no_mangle)]
pub unsafe extern "C" fn CreateHandle(
    value: *mut ValueT,
    handler: Option<HandlerFn>,
    data1: *mut c_void,
    data2: *mut c_void,
) {
    // SAFETY: forwarded caller contract.
    unsafe { wire::create_handle(value, handler, data1, data2) }
}

/// Frees an exported record the caller stops draining early.
///
/// # Safety
///
/// `value` must be null or a live record; exported records must not be used
/// after this call.
#[allow(non_snake_case)]
#[unsafe(no_mangle)]
pub unsafe extern "C" fn ReleaseValue(value: *mut ValueT) {
    // SAFETY: forwarded caller contract.
    unsafe { wire::release_value(value) }
}
