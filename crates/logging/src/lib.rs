#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `logging` routes the shim's diagnostics through [`tracing`]. Every event
//! carries a target of the form `oscalls::<category>`; the categories are the
//! [`DebugFlag`]s, each with an independent level held in [`DebugLevels`].
//!
//! # Design
//!
//! - [`LogConfig::from_env`] reads `OSCALLS_DEBUG_NATIVE` once and turns it
//!   into per-category levels.
//! - [`ShimLayer`] is a `tracing-subscriber` layer that accepts events whose
//!   category is enabled at the event's level and records the newest
//!   [`MAX_RETAINED_EVENTS`] of them into a thread-local buffer
//!   ([`drain_events`]).
//! - [`init_tracing`] installs the layer plus a stderr formatter.
//! - The `trace_*!` macros emit events with the right target.
//!
//! # Invariants
//!
//! - Installing tracing never panics, even when a global subscriber exists.
//! - Unknown tokens in the environment toggle are reported in
//!   [`LogConfig::rejected`] and otherwise ignored.
//!
//! # Examples
//!
//! ```
//! use logging::{DebugFlag, LogConfig};
//!
//! let config = LogConfig::parse(Some("acl2,xattr"));
//! assert_eq!(config.debug.get(DebugFlag::Acl), 2);
//! assert_eq!(config.debug.get(DebugFlag::Xattr), 1);
//! assert_eq!(config.debug.get(DebugFlag::Stat), 0);
//! ```

mod config;
mod levels;
mod thread_local;
mod tracing_bridge;
mod tracing_macros;

pub use config::{DEBUG_ENV, LogConfig};
pub use levels::{DebugFlag, DebugLevels};
pub use thread_local::{DiagnosticEvent, MAX_RETAINED_EVENTS, drain_events, emit_debug};
pub use tracing_bridge::{ShimLayer, init_tracing};
pub use tracing_macros::{
    TARGET_ACL, TARGET_CURSOR, TARGET_FFI, TARGET_LINK, TARGET_OWNER, TARGET_SECURITY,
    TARGET_STAT, TARGET_STREAMS, TARGET_XATTR,
};
