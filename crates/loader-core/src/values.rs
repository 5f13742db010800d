//! Row and batch representations.
//!
//! A [`Row`] is positionally aligned with the [`ContainerSchema`] it was
//! generated for. A [`Batch`] groups rows by destination container and is the
//! unit handed to a store's batch write.
//!
//! [`ContainerSchema`]: crate::schema::ContainerSchema

use crate::schema::ColumnType;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

/// A single typed column value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    /// Millisecond-precision UTC timestamp
    Timestamp(DateTime<Utc>),

    /// 32-bit signed integer
    Integer(i32),

    /// String value
    String(String),

    /// Boolean value
    Bool(bool),

    /// 64-bit floating point
    Double(f64),

    /// 32-bit floating point
    Float(f32),
}

impl Value {
    /// The column type this value belongs to.
    pub fn column_type(&self) -> ColumnType {
        match self {
            Self::Timestamp(_) => ColumnType::Timestamp,
            Self::Integer(_) => ColumnType::Integer,
            Self::String(_) => ColumnType::String,
            Self::Bool(_) => ColumnType::Bool,
            Self::Double(_) => ColumnType::Double,
            Self::Float(_) => ColumnType::Float,
        }
    }

    /// Try to get this value as a timestamp.
    pub fn as_timestamp(&self) -> Option<&DateTime<Utc>> {
        match self {
            Self::Timestamp(ts) => Some(ts),
            _ => None,
        }
    }

    /// Try to get this value as an i32.
    pub fn as_i32(&self) -> Option<i32> {
        match self {
            Self::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Try to get this value as a string reference.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Try to get this value as a boolean.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Try to get this value as an f64.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Double(d) => Some(*d),
            _ => None,
        }
    }

    /// Try to get this value as an f32.
    pub fn as_f32(&self) -> Option<f32> {
        match self {
            Self::Float(f) => Some(*f),
            _ => None,
        }
    }
}

/// One generated row, ordered by column position.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Row {
    values: Vec<Value>,
}

impl Row {
    /// Create a row from values in column order.
    pub fn new(values: Vec<Value>) -> Self {
        Self { values }
    }

    /// Value at the given column position.
    pub fn get(&self, position: usize) -> Option<&Value> {
        self.values.get(position)
    }

    /// All values in column order.
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Number of values.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the row has no values.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Consume the row, returning its values.
    pub fn into_values(self) -> Vec<Value> {
        self.values
    }
}

/// Rows grouped by destination container.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Batch {
    entries: BTreeMap<String, Vec<Row>>,
}

impl Batch {
    /// Create an empty batch.
    pub fn new() -> Self {
        Self::default()
    }

    /// A batch targeting a single container.
    pub fn single(container: impl Into<String>, rows: Vec<Row>) -> Self {
        let mut batch = Self::new();
        batch.insert(container, rows);
        batch
    }

    /// Append rows for a container, keeping any rows already queued for it.
    pub fn insert(&mut self, container: impl Into<String>, rows: Vec<Row>) {
        self.entries.entry(container.into()).or_default().extend(rows);
    }

    /// Rows queued for a container.
    pub fn rows_for(&self, container: &str) -> Option<&[Row]> {
        self.entries.get(container).map(Vec::as_slice)
    }

    /// Container names in this batch.
    pub fn containers(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Iterate over `(container, rows)` entries in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Row])> {
        self.entries
            .iter()
            .map(|(name, rows)| (name.as_str(), rows.as_slice()))
    }

    /// Total number of rows across all containers.
    pub fn row_count(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    /// Whether the batch carries no rows at all.
    pub fn is_empty(&self) -> bool {
        self.row_count() == 0
    }
}

impl IntoIterator for Batch {
    type Item = (String, Vec<Row>);
    type IntoIter = std::collections::btree_map::IntoIter<String, Vec<Row>>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}
