#![deny(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

//! # Overview
//!
//! `oscalls` wraps filesystem metadata queries as [`valxfer::Cursor`]s. Each
//! adapter performs exactly one OS query (retrying only to grow a buffer),
//! moves the result into a handler, and returns a cursor that either streams
//! the named fields or reports the OS error code once.
//!
//! # Design
//!
//! - [`stat`] defines the 24 `lstat` fields shared by both backends.
//! - `posix` holds the Unix adapters: `lstat`, `readlink`,
//!   `canonicalize_file_name`, `getpwuid`, `getgrgid`, ACL text, and
//!   extended attributes.
//! - `windows` holds the Win32 adapters: file information, reparse points,
//!   final path names, security descriptors, and alternate data streams.
//! - [`win_mapping`] and [`acl_text`] contain the pure conversions so they
//!   are tested on every host.
//! - [`buffer`] caches the initial sizes used by grow-and-retry queries.
//!
//! # Features
//!
//! - `xattr` (default): extended attributes through the `xattr` crate.
//! - `acl`: POSIX ACL text through `exacl`.
//!
//! With a feature disabled the adapter still exists and reports `ENOTSUP`.
//!
//! # Examples
//!
//! ```no_run
//! # #[cfg(unix)]
//! # {
//! let mut cursor = oscalls::lstat(std::path::Path::new("/etc/hosts"));
//! while cursor.advance() {
//!     println!("{}", cursor.record());
//! }
//! # }
//! ```

mod adapter;
pub mod acl_text;
pub mod buffer;
mod error;
pub mod stat;
pub mod win_mapping;

#[cfg(unix)]
mod posix;
#[cfg(windows)]
mod windows;

pub use buffer::BufferHint;
pub use error::AdapterError;
pub use stat::{STAT_FIELDS, StatFields};

#[cfg(unix)]
#[cfg_attr(docsrs, doc(cfg(unix)))]
pub use posix::{
    acl_get_file_access, acl_get_file_default, canonicalize_file_name, getgrgid, getpwuid,
    lgetxattr, llistxattr, lstat, read_link_bytes, readlink,
};

#[cfg(windows)]
#[cfg_attr(docsrs, doc(cfg(windows)))]
pub use windows::{
    win_canonicalize_file_name, win_get_sd, win_list_streams, win_lstat, win_read_stream,
    win_readlink,
};
