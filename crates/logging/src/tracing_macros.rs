//! crates/logging/src/tracing_macros.rs
//! Per-category tracing macros.
//!
//! Each macro forwards to `tracing::debug!` with the category's target, so
//! the events reach the [`ShimLayer`](crate::ShimLayer) at level 1. Use
//! `tracing::trace!` with the same target for level 2 detail.
//! Callers need `tracing` as a direct dependency.

/// Target for cursor protocol events.
pub const TARGET_CURSOR: &str = "oscalls::cursor";
/// Target for stat and file information events.
pub const TARGET_STAT: &str = "oscalls::stat";
/// Target for link and path resolution events.
pub const TARGET_LINK: &str = "oscalls::link";
/// Target for user and group lookups.
pub const TARGET_OWNER: &str = "oscalls::owner";
/// Target for ACL events.
pub const TARGET_ACL: &str = "oscalls::acl";
/// Target for extended attribute events.
pub const TARGET_XATTR: &str = "oscalls::xattr";
/// Target for security descriptor events.
pub const TARGET_SECURITY: &str = "oscalls::security";
/// Target for alternate data stream events.
pub const TARGET_STREAMS: &str = "oscalls::streams";
/// Target for C ABI events.
pub const TARGET_FFI: &str = "oscalls::ffi";

/// Emit a cursor protocol trace.
///
/// # Example
/// ```ignore
/// trace_cursor!(index, "handler released");
/// ```
#[macro_export]
macro_rules! trace_cursor {
    ($($arg:tt)*) => {
        ::tracing::debug!(target: $crate::TARGET_CURSOR, $($arg)*)
    };
}

/// Emit a stat trace.
#[macro_export]
macro_rules! trace_stat {
    ($($arg:tt)*) => {
        ::tracing::debug!(target: $crate::TARGET_STAT, $($arg)*)
    };
}

/// Emit a link resolution trace.
///
/// # Example
/// ```ignore
/// trace_link!(capacity, "readlink buffer grown");
/// ```
#[macro_export]
macro_rules! trace_link {
    ($($arg:tt)*) => {
        ::tracing::debug!(target: $crate::TARGET_LINK, $($arg)*)
    };
}

/// Emit a user/group database trace.
#[macro_export]
macro_rules! trace_owner {
    ($($arg:tt)*) => {
        ::tracing::debug!(target: $crate::TARGET_OWNER, $($arg)*)
    };
}

/// Emit an ACL trace.
#[macro_export]
macro_rules! trace_acl {
    ($($arg:tt)*) => {
        ::tracing::debug!(target: $crate::TARGET_ACL, $($arg)*)
    };
}

/// Emit an extended attribute trace.
#[macro_export]
macro_rules! trace_xattr {
    ($($arg:tt)*) => {
        ::tracing::debug!(target: $crate::TARGET_XATTR, $($arg)*)
    };
}

/// Emit a security descriptor trace.
#[macro_export]
macro_rules! trace_security {
    ($($arg:tt)*) => {
        ::tracing::debug!(target: $crate::TARGET_SECURITY, $($arg)*)
    };
}

/// Emit an alternate data stream trace.
#[macro_export]
macro_rules! trace_streams {
    ($($arg:tt)*) => {
        ::tracing::debug!(target: $crate::TARGET_STREAMS, $($arg)*)
    };
}

/// Emit a C ABI trace.
///
/// # Example
/// ```ignore
/// trace_ffi!(export = "linux_lstat", "entered");
/// ```
#[macro_export]
macro_rules! trace_ffi {
    ($($arg:tt)*) => {
        ::tracing::debug!(target: $crate::TARGET_FFI, $($arg)*)
    };
}
