use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use serde_json::json;
use valxfer::handler::{Elements, Field, Fields, SingleValue};
use valxfer::{Cursor, Handler, Kind, Shape, TimeSpec64, Value, ValueRecord};

/// Records every index it is asked for and counts its own drops.
struct Recorder {
    fields: i64,
    seen: Arc<Mutex<Vec<i64>>>,
    dropped: Arc<AtomicUsize>,
}

impl Handler for Recorder {
    fn next_value(&mut self, index: i64) -> Option<ValueRecord> {
        self.seen.lock().unwrap().push(index);
        (index < self.fields).then(|| ValueRecord::new("field", index * 10))
    }
}

impl Drop for Recorder {
    fn drop(&mut self) {
        self.dropped.fetch_add(1, Ordering::SeqCst);
    }
}

fn recorder(fields: i64) -> (Recorder, Arc<Mutex<Vec<i64>>>, Arc<AtomicUsize>) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let dropped = Arc::new(AtomicUsize::new(0));
    (
        Recorder {
            fields,
            seen: Arc::clone(&seen),
            dropped: Arc::clone(&dropped),
        },
        seen,
        dropped,
    )
}

#[test]
fn indices_are_gapless_and_exhaustion_is_terminal() {
    let (handler, seen, dropped) = recorder(3);
    let mut cursor = Cursor::initialize(handler);

    let mut values = Vec::new();
    while cursor.advance() {
        values.push(cursor.record().value().as_number().unwrap());
    }
    assert_eq!(values, [0, 10, 20]);
    assert_eq!(*seen.lock().unwrap(), [0, 1, 2, 3]);
    assert_eq!(dropped.load(Ordering::SeqCst), 1);

    for _ in 0..3 {
        assert!(!cursor.advance());
    }
    assert_eq!(seen.lock().unwrap().len(), 4);
    drop(cursor);
    assert_eq!(dropped.load(Ordering::SeqCst), 1);
}

#[test]
fn failed_query_yields_only_its_error() {
    let (handler, seen, dropped) = recorder(5);
    let mut cursor = Cursor::initialize(handler).with_error(2);

    assert_eq!(cursor.record().kind(), Kind::Error);
    assert!(cursor.advance());
    assert_eq!(cursor.record().value().error_code(), Some(2));
    assert_eq!(cursor.record().name(), Some(valxfer::ERROR_NAME));
    assert!(!cursor.advance());

    assert!(seen.lock().unwrap().is_empty());
    assert_eq!(dropped.load(Ordering::SeqCst), 1);
}

#[test]
fn nested_cursor_outlives_its_parent() {
    let mut parent = Cursor::initialize(SingleValue::new(
        "gr_mem",
        Cursor::initialize(Elements::new(vec![
            String::from("root"),
            String::from("daemon"),
        ])),
    ));

    assert!(parent.advance());
    let nested = parent.take_record().into_value().into_complex().unwrap();
    assert!(!parent.advance());
    drop(parent);

    assert_eq!(nested.shape(), Shape::Array);
    let members: Vec<String> = nested
        .filter_map(|record| record.value().as_str().map(str::to_owned))
        .collect();
    assert_eq!(members, ["root", "daemon"]);
}

#[test]
fn empty_nested_array_exhausts_immediately() {
    let mut parent = Cursor::initialize(SingleValue::new(
        "gr_mem",
        Cursor::initialize(Elements::new(Vec::<String>::new())),
    ));
    assert!(parent.advance());
    assert_eq!(parent.record().kind(), Kind::Complex);
    let Value::Complex(nested) = parent.record_mut().value_mut() else {
        panic!("expected a nested cursor");
    };
    assert!(!nested.advance());
}

struct Inode {
    ino: i64,
    mtime: TimeSpec64,
    dir: bool,
}

static INODE_FIELDS: &[Field<Inode>] = &[
    Field::new("st_ino", |inode: &Inode| Value::Number(inode.ino)),
    Field::new("S_ISDIR", |inode: &Inode| Value::Boolean(inode.dir)),
    Field::new("st_mtim", |inode: &Inode| Value::TimeSpec(inode.mtime)),
];

#[test]
fn field_table_materialises_to_json() {
    let cursor = Cursor::initialize(Fields::new(
        Inode {
            ino: 42,
            mtime: TimeSpec64::new(1_700_000_000, 500_000_000),
            dir: false,
        },
        INODE_FIELDS,
    ));
    let json = valxfer::node::to_json(cursor).unwrap();
    assert_eq!(
        json,
        json!({"st_ino": 42, "S_ISDIR": false, "st_mtim": 1_700_000_000.5})
    );
}

#[test]
fn error_cursor_materialises_to_os_error() {
    let error = valxfer::node::to_json(Cursor::error(13)).unwrap_err();
    assert_eq!(error.os_code(), Some(13));
}

#[test]
fn cursor_is_send() {
    fn assert_send<T: Send>() {}
    assert_send::<Cursor>();
}
