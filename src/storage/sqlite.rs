//! SQLite storage implementation

use rusqlite::types::{ToSqlOutput, ValueRef};
use rusqlite::{params_from_iter, Batch, Connection, Statement, ToSql};

use super::schema::TableSchema;
use super::{QueryResult, RelationalStore, Value};
use crate::{Error, Result};

/// In-memory SQLite database holding one session's snapshot
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open a fresh in-memory database
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self { conn })
    }
}

/// Step a statement to completion, keeping every row it yields
fn collect_rows(stmt: &mut Statement<'_>) -> Result<QueryResult> {
    let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();
    let width = columns.len();

    let mut rows = stmt.query([])?;
    let mut collected = Vec::new();
    while let Some(row) = rows.next()? {
        let mut cells = Vec::with_capacity(width);
        for i in 0..width {
            cells.push(Value::from(row.get_ref(i)?));
        }
        collected.push(cells);
    }

    Ok(QueryResult {
        columns,
        rows: collected,
    })
}

impl RelationalStore for SqliteStore {
    fn create_table(&self, table: &TableSchema) -> Result<()> {
        self.conn.execute(&table.create_sql(), [])?;
        Ok(())
    }

    fn insert(&self, table: &TableSchema, values: &[Value]) -> Result<()> {
        let mut stmt = self.conn.prepare_cached(&table.insert_sql())?;
        stmt.execute(params_from_iter(values.iter()))?;
        Ok(())
    }

    /// Runs every statement in order and returns the rows of the last one.
    /// Input with no statement at all (blank, `;`, comments) yields no rows.
    fn query(&self, sql: &str) -> Result<QueryResult> {
        let mut batch = Batch::new(&self.conn, sql);
        let mut result = QueryResult::default();
        while let Some(mut stmt) = batch.next()? {
            result = collect_rows(&mut stmt)?;
        }
        Ok(result)
    }

    fn begin(&self) -> Result<()> {
        self.conn.execute_batch("BEGIN TRANSACTION")?;
        Ok(())
    }

    fn commit(&self) -> Result<()> {
        self.conn.execute_batch("COMMIT")?;
        Ok(())
    }

    fn close(self) -> Result<()> {
        self.conn.close().map_err(|(_, e)| Error::Storage(e))
    }
}

impl ToSql for Value {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(match self {
            Value::Null => ToSqlOutput::Borrowed(ValueRef::Null),
            Value::Integer(i) => ToSqlOutput::Borrowed(ValueRef::Integer(*i)),
            Value::Real(r) => ToSqlOutput::Borrowed(ValueRef::Real(*r)),
            Value::Text(s) => ToSqlOutput::Borrowed(ValueRef::Text(s.as_bytes())),
            Value::Blob(b) => ToSqlOutput::Borrowed(ValueRef::Blob(b.as_slice())),
        })
    }
}

impl From<ValueRef<'_>> for Value {
    fn from(value: ValueRef<'_>) -> Self {
        match value {
            ValueRef::Null => Value::Null,
            ValueRef::Integer(i) => Value::Integer(i),
            ValueRef::Real(r) => Value::Real(r),
            ValueRef::Text(t) => Value::Text(String::from_utf8_lossy(t).into_owned()),
            ValueRef::Blob(b) => Value::Blob(b.to_vec()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::schema::{build_schema, IMAGES};

    fn image_row(id: &str) -> Vec<Value> {
        vec![
            id.into(),
            "nginx:latest".into(),
            "nginx:latest".into(),
            "".into(),
            Value::Integer(42),
            "2023-07-22T04:26:40+00:00".into(),
            "".into(),
        ]
    }

    #[test]
    fn test_insert_and_query() {
        let store = SqliteStore::open_in_memory().unwrap();
        build_schema(&store).unwrap();

        store.insert(&IMAGES, &image_row("img1")).unwrap();
        store.insert(&IMAGES, &image_row("img2")).unwrap();

        let result = store.query("SELECT id, size FROM images ORDER BY id").unwrap();
        assert_eq!(result.columns, vec!["id", "size"]);
        assert_eq!(result.row_count(), 2);
        assert_eq!(result.rows[0][0], Value::Text("img1".to_string()));
        assert_eq!(result.rows[1][1], Value::Integer(42));
        assert_eq!(store.query("SELECT count(*) FROM images").unwrap().scalar(), Some(&Value::Integer(2)));
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let store = SqliteStore::open_in_memory().unwrap();
        build_schema(&store).unwrap();

        store.insert(&IMAGES, &image_row("img1")).unwrap();
        let err = store.insert(&IMAGES, &image_row("img1")).unwrap_err();
        assert!(matches!(err, Error::Storage(_)));
        assert_eq!(store.query("SELECT count(*) FROM images").unwrap().scalar(), Some(&Value::Integer(1)));
    }

    #[test]
    fn test_query_errors() {
        let store = SqliteStore::open_in_memory().unwrap();
        build_schema(&store).unwrap();

        assert!(store.query("SELEC nonsense").is_err());
        assert!(store.query("SELECT * FROM volumes").is_err());
    }

    #[test]
    fn test_query_without_rows() {
        let store = SqliteStore::open_in_memory().unwrap();
        let result = store.query("SELECT NULL AS nothing, 1.5 AS half").unwrap();
        assert_eq!(result.rows[0], vec![Value::Null, Value::Real(1.5)]);

        let empty = store.query("CREATE TABLE scratch (x INTEGER)").unwrap();
        assert!(empty.columns.is_empty());
        assert_eq!(empty.row_count(), 0);
    }

    #[test]
    fn test_multiple_statements_return_last() {
        let store = SqliteStore::open_in_memory().unwrap();
        let result = store.query("SELECT 1; SELECT 2 AS two").unwrap();
        assert_eq!(result.columns, vec!["two"]);
        assert_eq!(result.rows, vec![vec![Value::Integer(2)]]);

        let result = store
            .query("CREATE TABLE notes (x TEXT); INSERT INTO notes VALUES ('a'); SELECT x FROM notes")
            .unwrap();
        assert_eq!(result.scalar(), Some(&Value::Text("a".to_string())));
    }

    #[test]
    fn test_error_in_later_statement() {
        let store = SqliteStore::open_in_memory().unwrap();
        assert!(store.query("SELECT 1; SELEC 2").is_err());
    }

    #[test]
    fn test_input_without_statements() {
        let store = SqliteStore::open_in_memory().unwrap();
        for sql in [";", "  ;  ; ", "-- just a comment", "/* nothing */"] {
            let result = store.query(sql).unwrap();
            assert!(result.columns.is_empty(), "{:?}", sql);
            assert_eq!(result.row_count(), 0);
        }
    }
}
