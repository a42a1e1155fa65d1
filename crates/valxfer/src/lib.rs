#![deny(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

//! # Overview
//!
//! `valxfer` streams heterogeneous OS query results across a foreign-function
//! boundary without either side knowing the layout of the underlying native
//! structures. Every query produces a [`Cursor`]: a pull-based sequence of
//! named, tagged [`ValueRecord`]s. Scalars, strings, time values and flags are
//! carried directly; objects and arrays nest as [`Value::Complex`] records
//! wrapping an independent cursor.
//!
//! # Design
//!
//! - [`value`] defines the record and its payload enum.
//! - [`cursor`] implements the two-operation protocol (`initialize`,
//!   `advance`) and the [`Handler`] trait that adapters implement.
//! - [`handler`] offers the reusable handler shapes (single value, element
//!   list, field table).
//! - [`wire`] exposes cursors through the `#[repr(C)]` record and the
//!   `GetNextValue`/`CreateHandle`/`ReleaseValue` primitives.
//! - [`node`] (feature `json`) drains a cursor into a `serde_json::Value`.
//!
//! # Invariants
//!
//! - A handler observes the indices 0, 1, 2, ... exactly once each.
//! - Exhaustion is terminal; the handler and everything it owns is dropped
//!   exactly once.
//! - A failed query is visible before the first advance and yields only its
//!   error record.
//!
//! # Examples
//!
//! ```
//! use valxfer::{Cursor, ValueRecord, handler::SingleValue};
//!
//! let mut cursor = Cursor::initialize(SingleValue::new("path", String::from("/etc")));
//! assert!(cursor.advance());
//! assert_eq!(cursor.record().to_string(), "path: \"/etc\"");
//! assert!(!cursor.advance());
//!
//! let mut failed = Cursor::error(2);
//! assert!(failed.advance());
//! assert_eq!(failed.record().value().error_code(), Some(2));
//! assert!(!failed.advance());
//! # let _ = ValueRecord::pending();
//! ```

pub mod cursor;
mod error;
pub mod handler;
#[cfg(feature = "json")]
#[cfg_attr(docsrs, doc(cfg(feature = "json")))]
pub mod node;
pub mod value;
pub mod wire;

pub use cursor::{Cursor, Exhausted, Handler, Shape};
pub use error::CursorError;
pub use value::{ARRAY_ELEMENT, ERROR_NAME, Kind, TimeSpec64, Value, ValueRecord};
