//! Reusable handlers.
//!
//! Most OS queries produce either one scalar, a flat list, or a fixed set of
//! named fields read out of one owned structure. The three handler types here
//! cover those shapes so adapters only supply the data and a field table.

use std::fmt;
use std::vec;

use crate::cursor::{Handler, Shape};
use crate::value::{Value, ValueRecord};

/// Handler backed by a closure over the index.
pub struct FnHandler<F> {
    f: F,
    shape: Shape,
}

/// Wraps `f` as an object-shaped handler.
pub fn from_fn<F>(f: F) -> FnHandler<F>
where
    F: FnMut(i64) -> Option<ValueRecord> + Send,
{
    FnHandler {
        f,
        shape: Shape::Object,
    }
}

impl<F> FnHandler<F> {
    /// Overrides the declared shape.
    #[must_use]
    pub const fn with_shape(mut self, shape: Shape) -> Self {
        self.shape = shape;
        self
    }
}

impl<F> Handler for FnHandler<F>
where
    F: FnMut(i64) -> Option<ValueRecord> + Send,
{
    fn next_value(&mut self, index: i64) -> Option<ValueRecord> {
        (self.f)(index)
    }

    fn shape(&self) -> Shape {
        self.shape
    }
}

impl<F> fmt::Debug for FnHandler<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnHandler").field("shape", &self.shape).finish()
    }
}

/// Yields exactly one named value.
#[derive(Debug)]
pub struct SingleValue {
    name: &'static str,
    value: Option<Value>,
}

impl SingleValue {
    /// Creates a handler yielding `name: value` once.
    pub fn new(name: &'static str, value: impl Into<Value>) -> Self {
        Self {
            name,
            value: Some(value.into()),
        }
    }
}

impl Handler for SingleValue {
    fn next_value(&mut self, index: i64) -> Option<ValueRecord> {
        match index {
            0 => self.value.take().map(|value| ValueRecord::new(self.name, value)),
            _ => None,
        }
    }
}

/// Yields every item as an array element.
#[derive(Debug)]
pub struct Elements {
    items: vec::IntoIter<Value>,
}

impl Elements {
    /// Collects `items` into an owned element list.
    pub fn new<I>(items: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        let items: Vec<Value> = items.into_iter().map(Into::into).collect();
        Self {
            items: items.into_iter(),
        }
    }

    /// Returns the number of elements not yet yielded.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.items.len()
    }
}

impl Handler for Elements {
    fn next_value(&mut self, _index: i64) -> Option<ValueRecord> {
        self.items.next().map(ValueRecord::element)
    }

    fn shape(&self) -> Shape {
        Shape::Array
    }
}

/// One entry of a field table: a name and a projection out of the owned data.
pub struct Field<T> {
    /// Field name emitted with the value.
    pub name: &'static str,
    /// Reads the field out of the owned structure.
    pub get: fn(&T) -> Value,
}

impl<T> Field<T> {
    /// Creates a table entry.
    pub const fn new(name: &'static str, get: fn(&T) -> Value) -> Self {
        Self { name, get }
    }
}

impl<T> fmt::Debug for Field<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Field").field(&self.name).finish()
    }
}

/// Object-shaped handler that walks a static field table over owned data.
///
/// The table position is the call index, so the emitted order is exactly
/// the table order.
pub struct Fields<T: 'static> {
    data: T,
    table: &'static [Field<T>],
}

impl<T: 'static> Fields<T> {
    /// Pairs `data` with the table describing its fields.
    pub const fn new(data: T, table: &'static [Field<T>]) -> Self {
        Self { data, table }
    }

    /// Returns the owned data.
    pub const fn data(&self) -> &T {
        &self.data
    }
}

impl<T: Send + 'static> Handler for Fields<T> {
    fn next_value(&mut self, index: i64) -> Option<ValueRecord> {
        let field = self.table.get(usize::try_from(index).ok()?)?;
        Some(ValueRecord::new(field.name, (field.get)(&self.data)))
    }
}

impl<T: 'static> fmt::Debug for Fields<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Fields")
            .field("table", &self.table)
            .finish_non_exhaustive()
    }
}

/// Field names of `table`, in emission order.
pub fn field_names<T>(table: &[Field<T>]) -> impl Iterator<Item = &'static str> + '_ {
    table.iter().map(|field| field.name)
}
