//! crates/logging/src/thread_local.rs
//! Thread-local collection of accepted debug events.

use super::levels::DebugFlag;
use std::cell::RefCell;
use std::collections::VecDeque;

/// Events kept per thread; older ones are discarded first.
pub const MAX_RETAINED_EVENTS: usize = 256;

thread_local! {
    #[allow(clippy::missing_const_for_thread_local)]
    static EVENTS: RefCell<VecDeque<DiagnosticEvent>> = RefCell::new(VecDeque::new());
}

/// Debug event accepted by the [`ShimLayer`](crate::ShimLayer).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DiagnosticEvent {
    /// The debug category.
    pub flag: DebugFlag,
    /// The level the event was emitted at.
    pub level: u8,
    /// The rendered message and fields.
    pub message: String,
}

/// Record a debug event for the current thread.
///
/// At most [`MAX_RETAINED_EVENTS`] are kept between drains.
pub fn emit_debug(flag: DebugFlag, level: u8, message: String) {
    EVENTS.with(|e| {
        let mut events = e.borrow_mut();
        if events.len() == MAX_RETAINED_EVENTS {
            events.pop_front();
        }
        events.push_back(DiagnosticEvent {
            flag,
            level,
            message,
        });
    });
}

/// Drain the retained events, oldest first, clearing the internal buffer.
pub fn drain_events() -> Vec<DiagnosticEvent> {
    EVENTS.with(|e| e.borrow_mut().drain(..).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn emit_and_drain() {
        drain_events();
        emit_debug(DebugFlag::Acl, 1, "first".to_string());
        emit_debug(DebugFlag::Xattr, 2, "second".to_string());

        let events = drain_events();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].flag, DebugFlag::Acl);
        assert_eq!(events[1].level, 2);
        assert_eq!(events[1].message, "second");
        assert!(drain_events().is_empty());
    }

    #[test]
    fn buffer_keeps_only_the_newest_events() {
        drain_events();
        for n in 0..MAX_RETAINED_EVENTS * 4 {
            emit_debug(DebugFlag::Stat, 1, n.to_string());
        }

        let events = drain_events();
        assert_eq!(events.len(), MAX_RETAINED_EVENTS);
        assert_eq!(events[0].message, (MAX_RETAINED_EVENTS * 3).to_string());
        assert_eq!(
            events[MAX_RETAINED_EVENTS - 1].message,
            (MAX_RETAINED_EVENTS * 4 - 1).to_string()
        );
    }

    #[test]
    fn events_are_per_thread() {
        drain_events();
        emit_debug(DebugFlag::Stat, 1, "main".to_string());
        let other = std::thread::spawn(drain_events).join().unwrap();
        assert!(other.is_empty());
        assert_eq!(drain_events().len(), 1);
    }
}
