//! Advisory initial sizes for grow-and-retry buffers.
//!
//! A [`BufferHint`] starts empty and is seeded from its initialiser on first
//! use. Adapters start each query from the hint and, after a query needed a
//! larger buffer, raise the hint so later queries succeed on the first try.
//! Races between threads only cost an extra retry.

use std::sync::atomic::{AtomicUsize, Ordering};

/// Size used when the platform gives no usable suggestion.
pub const FALLBACK_SIZE: usize = 1024;

/// Process-wide buffer size suggestion.
#[derive(Debug)]
pub struct BufferHint {
    size: AtomicUsize,
    init: fn() -> usize,
}

impl BufferHint {
    /// Creates an uninitialised hint seeded lazily by `init`.
    pub const fn new(init: fn() -> usize) -> Self {
        Self {
            size: AtomicUsize::new(0),
            init,
        }
    }

    /// Returns the current suggestion, initialising it on first use.
    pub fn get(&self) -> usize {
        let current = self.size.load(Ordering::Relaxed);
        if current != 0 {
            return current;
        }
        let seeded = (self.init)().max(1);
        match self
            .size
            .compare_exchange(0, seeded, Ordering::Relaxed, Ordering::Relaxed)
        {
            Ok(_) => seeded,
            Err(winner) => winner,
        }
    }

    /// Raises the suggestion to at least `size`.
    pub fn grow_to(&self, size: usize) {
        self.size.fetch_max(size, Ordering::Relaxed);
    }
}

/// Initial `readlink` capacity (`_POSIX_PATH_MAX`).
pub static LINK: BufferHint = BufferHint::new(link_default);

/// Initial `getpwuid_r` scratch size.
pub static PASSWD: BufferHint = BufferHint::new(passwd_default);

/// Initial `getgrgid_r` scratch size.
pub static GROUP: BufferHint = BufferHint::new(group_default);

const fn link_default() -> usize {
    256
}

#[cfg(unix)]
fn sysconf_or_fallback(name: libc::c_int) -> usize {
    // SAFETY: sysconf has no preconditions; -1 means "indeterminate".
    #[allow(unsafe_code)]
    let value = unsafe { libc::sysconf(name) };
    usize::try_from(value)
        .ok()
        .filter(|&size| size > 0)
        .unwrap_or(FALLBACK_SIZE)
}

#[cfg(unix)]
fn passwd_default() -> usize {
    sysconf_or_fallback(libc::_SC_GETPW_R_SIZE_MAX)
}

#[cfg(unix)]
fn group_default() -> usize {
    sysconf_or_fallback(libc::_SC_GETGR_R_SIZE_MAX)
}

#[cfg(not(unix))]
const fn passwd_default() -> usize {
    FALLBACK_SIZE
}

#[cfg(not(unix))]
const fn group_default() -> usize {
    FALLBACK_SIZE
}

/// Doubles `size`, saturating at `usize::MAX`.
pub(crate) const fn doubled(size: usize) -> usize {
    size.saturating_mul(2)
}
