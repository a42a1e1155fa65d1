use std::panic::{self, UnwindSafe};
use std::sync::OnceLock;

use logging::{LogConfig, init_tracing, trace_ffi};
use valxfer::Cursor;
use valxfer::wire::{self, ValueT};

/// Code reported when an adapter panics instead of returning a cursor.
#[cfg(unix)]
const PANIC_CODE: i64 = libc::EIO as i64;
#[cfg(not(unix))]
const PANIC_CODE: i64 = 1359; // ERROR_INTERNAL_ERROR

static CONFIG: OnceLock<LogConfig> = OnceLock::new();

/// Reads the debug toggle and installs tracing, once per process.
pub fn config() -> &'static LogConfig {
    CONFIG.get_or_init(|| {
        let config = LogConfig::from_env();
        let installed = init_tracing(&config);
        for token in &config.rejected {
            tracing::warn!(target: logging::TARGET_FFI, token = %token, "ignoring unknown debug flag");
        }
        trace_ffi!(installed, enabled = config.is_enabled(), "shim initialised");
        config
    })
}

/// Runs one adapter behind the C ABI and exports its cursor.
///
/// A panic inside the adapter never crosses the boundary; it becomes an
/// error-seeded cursor instead.
pub fn export_with(name: &'static str, adapter: impl FnOnce() -> Cursor + UnwindSafe) -> *mut ValueT {
    config();
    trace_ffi!(export = name, "entered");
    let cursor = panic::catch_unwind(adapter).unwrap_or_else(|_| {
        tracing::error!(target: logging::TARGET_FFI, export = name, "adapter panicked");
        Cursor::error(PANIC_CODE)
    });
    wire::export(cursor)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_is_initialised_once() {
        let first: *const LogConfig = config();
        let second: *const LogConfig = config();
        assert_eq!(first, second);
    }

    #[test]
    fn panicking_adapter_becomes_error_value() {
        let value = export_with("test_panic", || panic!("adapter bug"));
        assert!(!value.is_null());
        // SAFETY: freshly exported and not yet released.
        unsafe {
            assert_eq!((*value).kind, valxfer::Kind::Error);
            assert_eq!((*value).number, PANIC_CODE);
            wire::release_value(value);
        }
    }
}
