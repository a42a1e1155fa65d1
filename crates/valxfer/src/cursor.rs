//! The cursor protocol: `initialize` plus `advance`.
//!
//! A [`Cursor`] couples one [`Handler`] with the record it populates and a
//! call index. Driving the iteration is identical for every OS query; only
//! the installed handler differs. The handler owns every buffer the query
//! produced, so releasing the handler (on exhaustion, on an error
//! short-circuit, or when the cursor is dropped) releases the native
//! resources exactly once.
//!
//! # Invariants
//!
//! - The index observed by a handler is 0, 1, 2, ... without gaps or repeats.
//! - A cursor seeded with an error never invokes its handler: the first
//!   [`Cursor::advance`] releases the handler and leaves the error record in
//!   place, the second returns `false`.
//! - Once `advance` returns `false` the handler is gone and every further
//!   call returns `false` without side effects.

use std::fmt;
use std::mem;

use logging::trace_cursor;

use crate::value::ValueRecord;

/// Whether a cursor yields key/value pairs or array elements.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Shape {
    /// Named fields.
    #[default]
    Object,
    /// Elements named [`ARRAY_ELEMENT`](crate::ARRAY_ELEMENT).
    Array,
}

/// Produces the field at a given index, or signals exhaustion.
///
/// Implementations encode the field order of one native structure as a
/// multi-way branch over `index`. Returning `None` ends the stream; the
/// cursor then drops the handler, which must release everything it owns in
/// its `Drop` (owned buffers do so automatically).
pub trait Handler: Send {
    /// Returns the record for `index`, or `None` when the stream is exhausted.
    fn next_value(&mut self, index: i64) -> Option<ValueRecord>;

    /// Declares the stream shape. Defaults to [`Shape::Object`].
    fn shape(&self) -> Shape {
        Shape::Object
    }
}

struct Handle {
    handler: Option<Box<dyn Handler>>,
    shape: Shape,
    index: i64,
}

/// Pull-based sequence of [`ValueRecord`]s produced by one native query.
pub struct Cursor {
    handle: Handle,
    record: ValueRecord,
}

enum Step {
    Yield(ValueRecord),
    Failed,
    Exhausted,
}

impl Cursor {
    /// Installs `handler` and resets the cursor to the pending state.
    ///
    /// The record starts as [`Value::Ok`](crate::Value::Ok) named `"errno"`; adapters call
    /// [`with_error`](Self::with_error) before the first advance when the
    /// underlying query failed.
    #[must_use]
    pub fn initialize<H>(handler: H) -> Self
    where
        H: Handler + 'static,
    {
        let shape = handler.shape();
        Self {
            handle: Handle {
                handler: Some(Box::new(handler)),
                shape,
                index: 0,
            },
            record: ValueRecord::pending(),
        }
    }

    /// Creates a cursor for a query that failed with `code`.
    #[must_use]
    pub fn error(code: i64) -> Self {
        Self::initialize(Exhausted).with_error(code)
    }

    /// Builds a cursor from an adapter outcome.
    #[must_use]
    pub fn from_result<H>(result: Result<H, i64>) -> Self
    where
        H: Handler + 'static,
    {
        match result {
            Ok(handler) => Self::initialize(handler),
            Err(code) => Self::error(code),
        }
    }

    /// Seeds the cursor with an OS error code.
    ///
    /// Only meaningful before the first advance.
    #[must_use]
    pub fn with_error(mut self, code: i64) -> Self {
        debug_assert_eq!(self.handle.index, 0, "error seeded after iteration started");
        self.record = ValueRecord::error(code);
        self
    }

    /// Invokes the handler for the next index.
    ///
    /// Returns `true` when the record holds a new value (or, once, the
    /// seeded error) and `false` when the cursor is exhausted.
    pub fn advance(&mut self) -> bool {
        let index = self.handle.index;
        let Some(handler) = self.handle.handler.as_mut() else {
            return false;
        };

        let step = if index == 0 && self.record.is_error() {
            Step::Failed
        } else {
            match handler.next_value(index) {
                Some(record) => Step::Yield(record),
                None => Step::Exhausted,
            }
        };
        self.handle.index += 1;

        match step {
            Step::Yield(record) => {
                self.record = record;
                true
            }
            Step::Failed => {
                trace_cursor!(code = ?self.record.value().error_code(), "error short-circuit");
                self.release();
                true
            }
            Step::Exhausted => {
                trace_cursor!(calls = self.handle.index, "exhausted");
                self.release();
                false
            }
        }
    }

    /// Drops the handler and everything it owns.
    ///
    /// Idempotent; the cursor reports exhaustion afterwards.
    pub fn release(&mut self) {
        if self.handle.handler.take().is_some() {
            trace_cursor!(index = self.handle.index, "handler released");
        }
    }

    /// Returns the current record.
    #[must_use]
    pub const fn record(&self) -> &ValueRecord {
        &self.record
    }

    /// Returns the current record mutably, e.g. to take a nested cursor.
    pub fn record_mut(&mut self) -> &mut ValueRecord {
        &mut self.record
    }

    /// Moves the current record out, leaving a pending placeholder.
    pub fn take_record(&mut self) -> ValueRecord {
        mem::take(&mut self.record)
    }

    /// Returns the number of handler invocations so far.
    #[must_use]
    pub const fn index(&self) -> i64 {
        self.handle.index
    }

    /// Returns the declared stream shape.
    #[must_use]
    pub const fn shape(&self) -> Shape {
        self.handle.shape
    }

    /// Returns `true` once the handler has been released.
    #[must_use]
    pub const fn is_exhausted(&self) -> bool {
        self.handle.handler.is_none()
    }

    /// Returns the seeded error code before iteration, if the query failed.
    #[must_use]
    pub const fn error_code(&self) -> Option<i64> {
        self.record.value().error_code()
    }
}

impl Iterator for Cursor {
    type Item = ValueRecord;

    fn next(&mut self) -> Option<ValueRecord> {
        self.advance().then(|| self.take_record())
    }
}

impl fmt::Debug for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cursor")
            .field("shape", &self.handle.shape)
            .field("index", &self.handle.index)
            .field("exhausted", &self.is_exhausted())
            .field("record", &self.record)
            .finish()
    }
}

/// Handler with nothing to yield.
#[derive(Clone, Copy, Debug, Default)]
pub struct Exhausted;

impl Handler for Exhausted {
    fn next_value(&mut self, _index: i64) -> Option<ValueRecord> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::{Kind, TimeSpec64};
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Counting {
        limit: i64,
        log: Arc<std::sync::Mutex<Vec<i64>>>,
    }

    impl Handler for Counting {
        fn next_value(&mut self, index: i64) -> Option<ValueRecord> {
            self.log.lock().unwrap().push(index);
            (index < self.limit).then(|| ValueRecord::new("n", index))
        }
    }

    struct DropFlag(Arc<AtomicUsize>);

    impl Drop for DropFlag {
        fn drop(&mut self) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    struct Owning {
        _buffer: DropFlag,
        fields: i64,
    }

    impl Handler for Owning {
        fn next_value(&mut self, index: i64) -> Option<ValueRecord> {
            (index < self.fields).then(|| ValueRecord::new("f", true))
        }
    }

    #[test]
    fn handler_sees_consecutive_indices() {
        let log = Arc::new(std::sync::Mutex::new(Vec::new()));
        let mut cursor = Cursor::initialize(Counting {
            limit: 4,
            log: Arc::clone(&log),
        });

        let mut produced = Vec::new();
        while cursor.advance() {
            produced.push(cursor.record().value().as_number().unwrap());
        }

        assert_eq!(produced, vec![0, 1, 2, 3]);
        assert_eq!(*log.lock().unwrap(), vec![0, 1, 2, 3, 4]);
        assert_eq!(cursor.index(), 5);
    }

    #[test]
    fn initial_record_is_pending_ok() {
        let cursor = Cursor::initialize(Exhausted);
        assert_eq!(cursor.record().kind(), Kind::Ok);
        assert_eq!(cursor.record().name(), Some(crate::ERROR_NAME));
        assert_eq!(cursor.index(), 0);
        assert_eq!(cursor.error_code(), None);
    }

    #[test]
    fn exhaustion_releases_handler_once() {
        let drops = Arc::new(AtomicUsize::new(0));
        let mut cursor = Cursor::initialize(Owning {
            _buffer: DropFlag(Arc::clone(&drops)),
            fields: 2,
        });

        assert!(cursor.advance());
        assert!(cursor.advance());
        assert_eq!(drops.load(Ordering::SeqCst), 0);
        assert!(!cursor.advance());
        assert_eq!(drops.load(Ordering::SeqCst), 1);
        assert!(cursor.is_exhausted());

        assert!(!cursor.advance());
        assert!(!cursor.advance());
        drop(cursor);
        assert_eq!(drops.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn error_short_circuits_without_calling_handler() {
        let log = Arc::new(std::sync::Mutex::new(Vec::new()));
        let mut cursor = Cursor::initialize(Counting {
            limit: 10,
            log: Arc::clone(&log),
        })
        .with_error(2);

        assert_eq!(cursor.error_code(), Some(2));
        assert!(cursor.advance());
        assert_eq!(cursor.record().kind(), Kind::Error);
        assert_eq!(cursor.record().value().error_code(), Some(2));
        assert!(cursor.is_exhausted());
        assert!(!cursor.advance());
        assert!(log.lock().unwrap().is_empty());
    }

    #[test]
    fn error_cursor_releases_owned_data_on_first_advance() {
        let drops = Arc::new(AtomicUsize::new(0));
        let mut cursor = Cursor::initialize(Owning {
            _buffer: DropFlag(Arc::clone(&drops)),
            fields: 3,
        })
        .with_error(13);

        assert!(cursor.advance());
        assert_eq!(drops.load(Ordering::SeqCst), 1);
        assert!(!cursor.advance());
        assert_eq!(drops.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn dropping_undrained_cursor_releases_handler() {
        let drops = Arc::new(AtomicUsize::new(0));
        let mut cursor = Cursor::initialize(Owning {
            _buffer: DropFlag(Arc::clone(&drops)),
            fields: 5,
        });
        assert!(cursor.advance());
        drop(cursor);
        assert_eq!(drops.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn explicit_release_is_idempotent() {
        let drops = Arc::new(AtomicUsize::new(0));
        let mut cursor = Cursor::initialize(Owning {
            _buffer: DropFlag(Arc::clone(&drops)),
            fields: 5,
        });
        cursor.release();
        cursor.release();
        assert_eq!(drops.load(Ordering::SeqCst), 1);
        assert!(!cursor.advance());
    }

    #[test]
    fn iterator_moves_records_out() {
        let cursor = Cursor::initialize(crate::handler::from_fn(|index| match index {
            0 => Some(ValueRecord::new("a", 1_i64)),
            1 => Some(ValueRecord::new("b", TimeSpec64::new(1, 2))),
            _ => None,
        }));

        let names: Vec<_> = cursor.map(|record| record.name()).collect();
        assert_eq!(names, vec![Some("a"), Some("b")]);
    }

    #[test]
    fn from_result_seeds_error() {
        let mut cursor = Cursor::from_result::<Exhausted>(Err(5));
        assert_eq!(cursor.error_code(), Some(5));
        assert!(cursor.advance());
        assert!(!cursor.advance());

        let mut ok = Cursor::from_result(Ok(Exhausted));
        assert_eq!(ok.error_code(), None);
        assert!(!ok.advance());
    }
}
