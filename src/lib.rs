#![deny(rustdoc::broken_intra_doc_links)]
#![deny(clippy::undocumented_unsafe_blocks)]

//! C ABI surface of the `oscalls` adapters.
//!
//! Each export runs one filesystem query and returns a heap-allocated
//! `ValueT` that the caller drains with [`GetNextValue`]. The first record is
//! pending: its kind is `Ok`, or `Error` with the OS code in `number` when
//! the query failed. Every successful `GetNextValue` overwrites the record
//! with the next field. When it returns `false` the record has been freed.
//! Callers that stop early hand the record to [`ReleaseValue`].
//!
//! Diagnostics go through the `logging` crate and are switched on with the
//! `OSCALLS_DEBUG_NATIVE` environment variable, read once on first use.
//!
//! Unix exports take NUL-terminated byte paths and are prefixed `linux_`.
//! Windows exports take NUL-terminated UTF-16 paths and are prefixed `win_`,
//! with a second name per Win32 call they wrap. A null path yields an error
//! record (`EINVAL` or `ERROR_INVALID_PARAMETER`) instead of a null return.

mod lifecycle;
mod protocol;

#[cfg(unix)]
mod posix;
#[cfg(windows)]
mod windows;

pub use lifecycle::{config, export_with};
#[cfg(unix)]
pub use posix::*;
pub use protocol::{CreateHandle, GetNextValue, ReleaseValue};
#[cfg(windows)]
pub use windows::*;

pub use valxfer::wire::{HandleT, HandlerFn, ValueT};
