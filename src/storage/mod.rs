//! Storage Layer - in-memory SQLite snapshot
//!
//! The snapshot lives in two tables:
//! - containers(id, name, names, image, image_id, command, state, status, created, ports, labels)
//! - images(id, reference, tags, parent_id, size, created, labels)

pub mod schema;
pub mod sqlite;

pub use schema::{Column, ColumnType, TableSchema};
pub use sqlite::SqliteStore;

use std::fmt;

use crate::Result;

/// A scalar cell value
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    Blob(Vec<u8>),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "NULL"),
            Value::Integer(i) => write!(f, "{}", i),
            Value::Real(r) => write!(f, "{}", r),
            Value::Text(s) => write!(f, "{}", s),
            Value::Blob(b) => write!(f, "<blob {} bytes>", b.len()),
        }
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Integer(i)
    }
}

/// Rows returned by an ad-hoc query
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryResult {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

impl QueryResult {
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// First cell of the first row, handy for `count(*)` style queries
    pub fn scalar(&self) -> Option<&Value> {
        self.rows.first().and_then(|row| row.first())
    }
}

/// The relational engine holding the snapshot
pub trait RelationalStore {
    /// Declare a table. Fails if it already exists.
    fn create_table(&self, table: &TableSchema) -> Result<()>;

    /// Insert one row, values in the table's column order
    fn insert(&self, table: &TableSchema, values: &[Value]) -> Result<()>;

    /// Run arbitrary SQL text and collect every row it yields
    fn query(&self, sql: &str) -> Result<QueryResult>;

    /// Group the following inserts into one unit
    fn begin(&self) -> Result<()>;

    fn commit(&self) -> Result<()>;

    /// Release the store and everything in it
    fn close(self) -> Result<()>
    where
        Self: Sized;
}
